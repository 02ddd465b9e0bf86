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

use crate::domain::config::{Environment, EnvironmentPoolConfig};
use crate::infrastructure::azure::types::{AgentPoolArgs, AgentPoolMode, OsSku};
use crate::infrastructure::constants::{LABEL_ENVIRONMENT, TAINT_EFFECT_NO_EXECUTE, TYPE_AGENT_POOL};
use crate::infrastructure::pulumi::{Declaration, ResourceRef};
use std::collections::BTreeMap;

/// `environment=<env>:NoExecute`
pub fn environment_taint(env: Environment) -> String {
    format!("{}={}:{}", LABEL_ENVIRONMENT, env, TAINT_EFFECT_NO_EXECUTE)
}

pub fn environment_labels(env: Environment) -> BTreeMap<String, String> {
    let mut labels = BTreeMap::new();
    labels.insert(LABEL_ENVIRONMENT.to_string(), env.to_string());
    labels
}

/// User-mode pool for one environment, attached to an existing cluster and
/// bound to that environment's subnet.
pub struct AgentPoolBuilder<'a> {
    environment: Environment,
    pool: &'a EnvironmentPoolConfig,
    resource_group: ResourceRef,
    cluster: ResourceRef,
    subnet: ResourceRef,
}

impl<'a> AgentPoolBuilder<'a> {
    pub fn new(
        environment: Environment,
        pool: &'a EnvironmentPoolConfig,
        resource_group: ResourceRef,
        cluster: ResourceRef,
        subnet: ResourceRef,
    ) -> Self {
        Self {
            environment,
            pool,
            resource_group,
            cluster,
            subnet,
        }
    }

    pub fn build(&self) -> Declaration<AgentPoolArgs> {
        let name = self.environment.pool_name();

        Declaration::new(
            name.clone(),
            TYPE_AGENT_POOL,
            AgentPoolArgs {
                resource_group_name: self.resource_group.name(),
                resource_name: self.cluster.name(),
                agent_pool_name: name,
                vm_size: self.pool.vm_size.clone(),
                os_sku: OsSku::Ubuntu,
                mode: AgentPoolMode::User,
                enable_auto_scaling: true,
                count: self.pool.node_count,
                min_count: self.pool.min_count,
                max_count: self.pool.max_count,
                vnet_subnet_id: self.subnet.id(),
                node_labels: environment_labels(self.environment),
                node_taints: vec![environment_taint(self.environment)],
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool_config() -> EnvironmentPoolConfig {
        EnvironmentPoolConfig {
            vm_size: "Standard_D2s_v3".to_string(),
            node_count: 2,
            min_count: 1,
            max_count: 4,
            subnet_cidr: "10.0.3.0/24".to_string(),
        }
    }

    #[test]
    fn test_taints() {
        assert_eq!(environment_taint(Environment::Dev), "environment=dev:NoExecute");
        assert_eq!(
            environment_taint(Environment::Staging),
            "environment=staging:NoExecute"
        );
        assert_eq!(environment_taint(Environment::Prod), "environment=prod:NoExecute");
    }

    #[test]
    fn test_build() {
        let config = pool_config();
        let pool = AgentPoolBuilder::new(
            Environment::Staging,
            &config,
            ResourceRef::new("aks-rg"),
            ResourceRef::new("aksCluster"),
            ResourceRef::new("stagingSubnet"),
        )
        .build();

        assert_eq!(pool.logical_name, "stagingpool");
        assert_eq!(pool.args.agent_pool_name, "stagingpool");
        assert_eq!(pool.args.resource_name, "${aksCluster.name}");
        assert_eq!(pool.args.vnet_subnet_id, "${stagingSubnet.id}");
        assert_eq!(pool.args.mode, AgentPoolMode::User);
        assert!(pool.args.enable_auto_scaling);
        assert_eq!(
            (pool.args.min_count, pool.args.count, pool.args.max_count),
            (1, 2, 4)
        );
        assert_eq!(
            pool.args.node_labels.get("environment").map(String::as_str),
            Some("staging")
        );
        assert_eq!(pool.args.node_taints, vec!["environment=staging:NoExecute"]);
    }
}
