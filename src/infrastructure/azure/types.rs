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

//! azure-native resource inputs, serialized with the provider's property names

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AgentPoolMode {
    System,
    User,
}

impl AgentPoolMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentPoolMode::System => "System",
            AgentPoolMode::User => "User",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OsSku {
    Ubuntu,
}

impl OsSku {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsSku::Ubuntu => "Ubuntu",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroupArgs {
    pub resource_group_name: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSpace {
    pub address_prefixes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualNetworkArgs {
    pub resource_group_name: String,
    pub address_space: AddressSpace,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubnetArgs {
    pub resource_group_name: String,
    pub virtual_network_name: String,
    pub address_prefix: String,
}

/// Node pool embedded in the managed cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPoolProfile {
    pub name: String,
    pub count: i32,
    pub max_pods: i32,
    #[serde(rename = "vnetSubnetID")]
    pub vnet_subnet_id: String,
    pub mode: AgentPoolMode,
    pub vm_size: String,
    #[serde(rename = "osSKU")]
    pub os_sku: OsSku,
    pub enable_auto_scaling: bool,
    pub max_count: i32,
    pub min_count: i32,
    pub node_taints: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkProfile {
    pub network_plugin: String,
    #[serde(rename = "dnsServiceIP")]
    pub dns_service_ip: String,
    pub service_cidr: String,
    pub docker_bridge_cidr: String,
}

/// `secret` always carries a config interpolation, never a value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePrincipalProfile {
    pub client_id: String,
    pub secret: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedClusterArgs {
    pub resource_group_name: String,
    pub location: String,
    pub agent_pool_profiles: Vec<AgentPoolProfile>,
    pub dns_prefix: String,
    pub network_profile: NetworkProfile,
    pub service_principal_profile: ServicePrincipalProfile,
}

/// Standalone node pool attached to an existing cluster
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPoolArgs {
    pub resource_group_name: String,
    /// Name of the owning managed cluster
    pub resource_name: String,
    pub agent_pool_name: String,
    pub vm_size: String,
    #[serde(rename = "osSKU")]
    pub os_sku: OsSku,
    pub mode: AgentPoolMode,
    pub enable_auto_scaling: bool,
    pub count: i32,
    pub min_count: i32,
    pub max_count: i32,
    #[serde(rename = "vnetSubnetID")]
    pub vnet_subnet_id: String,
    pub node_labels: BTreeMap<String, String>,
    pub node_taints: Vec<String>,
}
