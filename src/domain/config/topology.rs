// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Typed view of the required stack configuration

use super::environment::Environment;
use super::secret::Secret;
use super::stack::StackConfig;
use crate::shared::error::{Result, TopologyError};

pub const LOCATION_KEY: &str = "location";
pub const RESOURCE_GROUP_NAME_KEY: &str = "resourceGroupName";
pub const VNET_CIDR_KEY: &str = "vnetCidr";
pub const SYSTEM_SUBNET_CIDR_KEY: &str = "systemSubnetCidr";
pub const CLIENT_ID_KEY: &str = "azure-native:clientId";
pub const CLIENT_SECRET_KEY: &str = "azure-native:clientSecret";

/// Every key a stack must carry, in resolution order
pub fn required_keys() -> Vec<String> {
    let mut keys = vec![
        LOCATION_KEY.to_string(),
        RESOURCE_GROUP_NAME_KEY.to_string(),
    ];
    for env in Environment::ALL {
        keys.push(env.vm_size_key());
    }
    for env in Environment::ALL {
        keys.push(env.node_count_key());
        keys.push(env.min_count_key());
        keys.push(env.max_count_key());
    }
    keys.push(VNET_CIDR_KEY.to_string());
    keys.push(SYSTEM_SUBNET_CIDR_KEY.to_string());
    for env in Environment::ALL {
        keys.push(env.subnet_cidr_key());
    }
    keys.push(CLIENT_ID_KEY.to_string());
    keys.push(CLIENT_SECRET_KEY.to_string());
    keys
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentPoolConfig {
    pub vm_size: String,
    pub node_count: i32,
    pub min_count: i32,
    pub max_count: i32,
    pub subnet_cidr: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServicePrincipal {
    pub client_id: String,
    pub client_secret: Secret,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TopologyConfig {
    pub location: String,
    pub resource_group_name: String,
    pub vnet_cidr: String,
    pub system_subnet_cidr: String,
    pub dev: EnvironmentPoolConfig,
    pub staging: EnvironmentPoolConfig,
    pub prod: EnvironmentPoolConfig,
    pub service_principal: ServicePrincipal,
}

impl TopologyConfig {
    /// Resolve every required key.
    ///
    /// Absent keys are collected and reported together; a value of the wrong
    /// type fails immediately.
    pub fn from_stack(stack: &StackConfig) -> Result<Self> {
        let mut resolver = Resolver::new(stack);

        let location = resolver.string(LOCATION_KEY)?;
        let resource_group_name = resolver.string(RESOURCE_GROUP_NAME_KEY)?;
        let vnet_cidr = resolver.string(VNET_CIDR_KEY)?;
        let system_subnet_cidr = resolver.string(SYSTEM_SUBNET_CIDR_KEY)?;
        let dev = resolver.pool(Environment::Dev)?;
        let staging = resolver.pool(Environment::Staging)?;
        let prod = resolver.pool(Environment::Prod)?;
        let client_id = resolver.string(CLIENT_ID_KEY)?;
        let client_secret = resolver.secret(CLIENT_SECRET_KEY)?;

        resolver.finish()?;

        Ok(Self {
            location: resolved(location)?,
            resource_group_name: resolved(resource_group_name)?,
            vnet_cidr: resolved(vnet_cidr)?,
            system_subnet_cidr: resolved(system_subnet_cidr)?,
            dev: resolved(dev)?,
            staging: resolved(staging)?,
            prod: resolved(prod)?,
            service_principal: ServicePrincipal {
                client_id: resolved(client_id)?,
                client_secret: resolved(client_secret)?,
            },
        })
    }

    pub fn pool(&self, env: Environment) -> &EnvironmentPoolConfig {
        match env {
            Environment::Dev => &self.dev,
            Environment::Staging => &self.staging,
            Environment::Prod => &self.prod,
        }
    }
}

// Only reachable after Resolver::finish, which has already rejected absences.
fn resolved<T>(value: Option<T>) -> Result<T> {
    value.ok_or_else(|| TopologyError::config_error("unresolved configuration value"))
}

struct Resolver<'a> {
    stack: &'a StackConfig,
    missing: Vec<String>,
}

impl<'a> Resolver<'a> {
    fn new(stack: &'a StackConfig) -> Self {
        Self {
            stack,
            missing: Vec::new(),
        }
    }

    fn note<T>(&mut self, key: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.missing.push(self.stack.namespaced(key));
        }
        value
    }

    fn string(&mut self, key: &str) -> Result<Option<String>> {
        let value = self.stack.try_string(key)?;
        Ok(self.note(key, value))
    }

    fn int(&mut self, key: &str) -> Result<Option<i32>> {
        let value = match self.stack.try_int(key)? {
            Some(v) => Some(i32::try_from(v).map_err(|_| {
                TopologyError::invalid(
                    self.stack.namespaced(key),
                    format!("{} does not fit in a 32-bit integer", v),
                )
            })?),
            None => None,
        };
        Ok(self.note(key, value))
    }

    fn secret(&mut self, key: &str) -> Result<Option<Secret>> {
        let value = self.stack.try_secret(key)?;
        Ok(self.note(key, value))
    }

    fn pool(&mut self, env: Environment) -> Result<Option<EnvironmentPoolConfig>> {
        let vm_size = self.string(&env.vm_size_key())?;
        let node_count = self.int(&env.node_count_key())?;
        let min_count = self.int(&env.min_count_key())?;
        let max_count = self.int(&env.max_count_key())?;
        let subnet_cidr = self.string(&env.subnet_cidr_key())?;

        Ok(match (vm_size, node_count, min_count, max_count, subnet_cidr) {
            (Some(vm_size), Some(node_count), Some(min_count), Some(max_count), Some(subnet_cidr)) => {
                Some(EnvironmentPoolConfig {
                    vm_size,
                    node_count,
                    min_count,
                    max_count,
                    subnet_cidr,
                })
            }
            _ => None,
        })
    }

    fn finish(self) -> Result<()> {
        if self.missing.is_empty() {
            Ok(())
        } else {
            let mut keys = self.missing;
            keys.sort();
            Err(TopologyError::missing(keys))
        }
    }
}
