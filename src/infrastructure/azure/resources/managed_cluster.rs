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

use crate::domain::config::{ServicePrincipal, CLIENT_SECRET_KEY};
use crate::infrastructure::azure::types::{
    AgentPoolMode, AgentPoolProfile, ManagedClusterArgs, NetworkProfile, OsSku,
    ServicePrincipalProfile,
};
use crate::infrastructure::constants::*;
use crate::infrastructure::pulumi::{config_ref, Declaration, ResourceRef};

pub struct ManagedClusterBuilder {
    resource_group: ResourceRef,
    location: String,
    system_subnet: ResourceRef,
    client_id: String,
}

impl ManagedClusterBuilder {
    /// Only the client id is copied out of the service principal; the secret
    /// is rendered as a reference to its stack config key.
    pub fn new(
        resource_group: ResourceRef,
        location: String,
        system_subnet: ResourceRef,
        service_principal: &ServicePrincipal,
    ) -> Self {
        Self {
            resource_group,
            location,
            system_subnet,
            client_id: service_principal.client_id.clone(),
        }
    }

    pub fn build(&self) -> Declaration<ManagedClusterArgs> {
        Declaration::new(
            CLUSTER_NAME,
            TYPE_MANAGED_CLUSTER,
            ManagedClusterArgs {
                resource_group_name: self.resource_group.name(),
                location: self.location.clone(),
                agent_pool_profiles: vec![self.build_system_pool()],
                dns_prefix: DNS_PREFIX.to_string(),
                network_profile: Self::build_network_profile(),
                service_principal_profile: ServicePrincipalProfile {
                    client_id: self.client_id.clone(),
                    secret: config_ref(CLIENT_SECRET_KEY),
                },
            },
        )
    }

    /// Pinned to a single node and tainted so regular workloads stay off it
    fn build_system_pool(&self) -> AgentPoolProfile {
        AgentPoolProfile {
            name: SYSTEM_POOL_NAME.to_string(),
            count: SYSTEM_POOL_NODE_COUNT,
            max_pods: SYSTEM_POOL_MAX_PODS,
            vnet_subnet_id: self.system_subnet.id(),
            mode: AgentPoolMode::System,
            vm_size: SYSTEM_POOL_VM_SIZE.to_string(),
            os_sku: OsSku::Ubuntu,
            enable_auto_scaling: true,
            max_count: SYSTEM_POOL_NODE_COUNT,
            min_count: SYSTEM_POOL_NODE_COUNT,
            node_taints: vec![SYSTEM_POOL_TAINT.to_string()],
        }
    }

    fn build_network_profile() -> NetworkProfile {
        NetworkProfile {
            network_plugin: NETWORK_PLUGIN.to_string(),
            dns_service_ip: DNS_SERVICE_IP.to_string(),
            service_cidr: SERVICE_CIDR.to_string(),
            docker_bridge_cidr: DOCKER_BRIDGE_CIDR.to_string(),
        }
    }
}
