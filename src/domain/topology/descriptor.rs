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

use crate::domain::config::{Environment, StackConfig, TopologyConfig, CLIENT_SECRET_KEY};
use crate::infrastructure::azure::resources::{
    AgentPoolBuilder, ManagedClusterBuilder, ResourceGroupBuilder, SubnetBuilder,
    VirtualNetworkBuilder,
};
use crate::infrastructure::azure::types::{
    AgentPoolArgs, ManagedClusterArgs, ResourceGroupArgs, SubnetArgs, VirtualNetworkArgs,
};
use crate::infrastructure::constants::{SYSTEM_SUBNET_NAME, VIRTUAL_NETWORK_NAME};
use crate::infrastructure::pulumi::{ConfigDeclaration, Declaration, Program, ResourceRef};
use crate::shared::error::Result;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubnetRole {
    System,
    Workload(Environment),
}

impl SubnetRole {
    pub const ALL: [SubnetRole; 4] = [
        SubnetRole::System,
        SubnetRole::Workload(Environment::Dev),
        SubnetRole::Workload(Environment::Staging),
        SubnetRole::Workload(Environment::Prod),
    ];

    pub fn logical_name(&self) -> String {
        match self {
            SubnetRole::System => SYSTEM_SUBNET_NAME.to_string(),
            SubnetRole::Workload(env) => env.subnet_name(),
        }
    }

    /// Same handle the subnet's own declaration hands out
    pub fn reference(&self) -> ResourceRef {
        ResourceRef::new(self.logical_name())
    }

    pub fn address_prefix<'a>(&self, config: &'a TopologyConfig) -> &'a str {
        match self {
            SubnetRole::System => &config.system_subnet_cidr,
            SubnetRole::Workload(env) => &config.pool(*env).subnet_cidr,
        }
    }
}

impl fmt::Display for SubnetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubnetRole::System => f.write_str("system"),
            SubnetRole::Workload(env) => write!(f, "{}", env),
        }
    }
}

/// The declared resource graph, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct Topology {
    pub resource_group: Declaration<ResourceGroupArgs>,
    pub virtual_network: Declaration<VirtualNetworkArgs>,
    pub subnets: Vec<(SubnetRole, Declaration<SubnetArgs>)>,
    pub cluster: Declaration<ManagedClusterArgs>,
    pub node_pools: Vec<(Environment, Declaration<AgentPoolArgs>)>,
}

impl Topology {
    pub fn subnet(&self, role: SubnetRole) -> Option<&Declaration<SubnetArgs>> {
        self.subnets
            .iter()
            .find(|(r, _)| *r == role)
            .map(|(_, subnet)| subnet)
    }

    pub fn node_pool(&self, env: Environment) -> Option<&Declaration<AgentPoolArgs>> {
        self.node_pools
            .iter()
            .find(|(e, _)| *e == env)
            .map(|(_, pool)| pool)
    }

    pub fn resource_count(&self) -> usize {
        3 + self.subnets.len() + self.node_pools.len()
    }

    /// Render the graph as a Pulumi program named `project`
    pub fn to_program(&self, project: &str) -> Result<Program> {
        let mut program = Program::new(project);
        program.declare_config(CLIENT_SECRET_KEY, ConfigDeclaration::secret());

        program.add(&self.resource_group)?;
        program.add(&self.virtual_network)?;
        for (_, subnet) in &self.subnets {
            program.add(subnet)?;
        }
        program.add(&self.cluster)?;
        for (_, pool) in &self.node_pools {
            program.add(pool)?;
        }

        program.export("resourceGroupName", self.resource_group.reference().name());
        program.export("clusterName", self.cluster.reference().name());
        for (role, subnet) in &self.subnets {
            program.export(format!("{}SubnetId", role), subnet.reference().id());
        }
        for (env, pool) in &self.node_pools {
            program.export(format!("{}PoolName", env), pool.reference().name());
        }

        Ok(program)
    }
}

pub struct TopologyDescriptor;

impl TopologyDescriptor {
    /// Resolve configuration, then declare. A configuration error returns
    /// before any resource is declared.
    pub fn from_stack(stack: &StackConfig) -> Result<Topology> {
        let config = TopologyConfig::from_stack(stack)?;
        Ok(Self::declare(&config))
    }

    /// Declare every resource from resolved configuration.
    ///
    /// Each step only references outputs of earlier ones. Nothing here
    /// inspects CIDRs or pool bounds.
    pub fn declare(config: &TopologyConfig) -> Topology {
        let resource_group = ResourceGroupBuilder::new(
            config.resource_group_name.clone(),
            config.location.clone(),
        )
        .build();
        let rg = resource_group.reference();

        let virtual_network = VirtualNetworkBuilder::new(
            VIRTUAL_NETWORK_NAME.to_string(),
            rg.clone(),
            config.vnet_cidr.clone(),
        )
        .build();
        let vnet = virtual_network.reference();

        let subnets: Vec<_> = SubnetRole::ALL
            .iter()
            .map(|role| {
                let subnet = SubnetBuilder::new(
                    role.logical_name(),
                    rg.clone(),
                    vnet.clone(),
                    role.address_prefix(config).to_string(),
                )
                .build();
                (*role, subnet)
            })
            .collect();

        let cluster = ManagedClusterBuilder::new(
            rg.clone(),
            config.location.clone(),
            SubnetRole::System.reference(),
            &config.service_principal,
        )
        .build();
        let cluster_ref = cluster.reference();

        let node_pools: Vec<_> = Environment::ALL
            .iter()
            .map(|env| {
                let pool = AgentPoolBuilder::new(
                    *env,
                    config.pool(*env),
                    rg.clone(),
                    cluster_ref.clone(),
                    SubnetRole::Workload(*env).reference(),
                )
                .build();
                (*env, pool)
            })
            .collect();

        tracing::debug!(
            resource_group = %config.resource_group_name,
            subnets = subnets.len(),
            node_pools = node_pools.len(),
            "declared topology"
        );

        Topology {
            resource_group,
            virtual_network,
            subnets,
            cluster,
            node_pools,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{EnvironmentPoolConfig, Secret, ServicePrincipal};

    fn pool(vm_size: &str, cidr: &str) -> EnvironmentPoolConfig {
        EnvironmentPoolConfig {
            vm_size: vm_size.to_string(),
            node_count: 2,
            min_count: 1,
            max_count: 3,
            subnet_cidr: cidr.to_string(),
        }
    }

    fn config() -> TopologyConfig {
        TopologyConfig {
            location: "eastus".to_string(),
            resource_group_name: "aks-rg".to_string(),
            vnet_cidr: "10.0.0.0/16".to_string(),
            system_subnet_cidr: "10.0.1.0/24".to_string(),
            dev: pool("Standard_D2s_v3", "10.0.2.0/24"),
            staging: pool("Standard_D4s_v3", "10.0.3.0/24"),
            prod: pool("Standard_D8s_v3", "10.0.4.0/24"),
            service_principal: ServicePrincipal {
                client_id: "app-id".to_string(),
                client_secret: Secret::plaintext("s3cr3t"),
            },
        }
    }

    #[test]
    fn test_declares_every_resource() {
        let topology = TopologyDescriptor::declare(&config());
        assert_eq!(topology.resource_count(), 10);
        assert_eq!(topology.subnets.len(), 4);
        assert_eq!(topology.node_pools.len(), 3);
        assert_eq!(
            topology.subnet(SubnetRole::System).unwrap().args.address_prefix,
            "10.0.1.0/24"
        );
    }

    #[test]
    fn test_pools_bound_to_their_own_subnet() {
        let topology = TopologyDescriptor::declare(&config());
        for env in Environment::ALL {
            let pool = topology.node_pool(env).unwrap();
            let subnet = topology.subnet(SubnetRole::Workload(env)).unwrap();
            assert_eq!(pool.args.vnet_subnet_id, subnet.reference().id());
            assert_eq!(pool.args.resource_name, "${aksCluster.name}");
            assert_eq!(pool.args.vm_size, config().pool(env).vm_size);
        }
        assert_eq!(
            topology.cluster.args.agent_pool_profiles[0].vnet_subnet_id,
            "${systemSubnet.id}"
        );
    }

    #[test]
    fn test_program_outputs() {
        let program = TopologyDescriptor::declare(&config())
            .to_program("aks-topology")
            .unwrap();
        assert_eq!(program.resources.len(), 10);
        assert_eq!(program.outputs["clusterName"], "${aksCluster.name}");
        assert_eq!(program.outputs["prodSubnetId"], "${prodSubnet.id}");
        assert_eq!(program.outputs["stagingPoolName"], "${stagingpool.name}");
        assert!(program.config[CLIENT_SECRET_KEY].secret);
    }

    #[test]
    fn test_name_collision_is_rejected() {
        let mut config = config();
        config.resource_group_name = "aksVNet".to_string();
        let topology = TopologyDescriptor::declare(&config);
        assert!(topology.to_program("aks-topology").is_err());
    }
}
