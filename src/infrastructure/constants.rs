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

/// Pulumi program
pub const PROGRAM_RUNTIME: &str = "yaml";
pub const PROGRAM_DESCRIPTION: &str =
    "AKS cluster with dev, staging and prod node pools on dedicated subnets";
pub const PROGRAM_FILE_NAME: &str = "Pulumi.yaml";

/// azure-native resource type tokens
pub const TYPE_RESOURCE_GROUP: &str = "azure-native:resources:ResourceGroup";
pub const TYPE_VIRTUAL_NETWORK: &str = "azure-native:network:VirtualNetwork";
pub const TYPE_SUBNET: &str = "azure-native:network:Subnet";
pub const TYPE_MANAGED_CLUSTER: &str = "azure-native:containerservice:ManagedCluster";
pub const TYPE_AGENT_POOL: &str = "azure-native:containerservice:AgentPool";

/// Logical resource names
pub const VIRTUAL_NETWORK_NAME: &str = "aksVNet";
pub const SYSTEM_SUBNET_NAME: &str = "systemSubnet";
pub const CLUSTER_NAME: &str = "aksCluster";

/// System node pool
pub const SYSTEM_POOL_NAME: &str = "systempool";
pub const SYSTEM_POOL_VM_SIZE: &str = "Standard_D4s_v3";
pub const SYSTEM_POOL_NODE_COUNT: i32 = 1;
pub const SYSTEM_POOL_MAX_PODS: i32 = 110;
pub const SYSTEM_POOL_TAINT: &str = "CriticalAddonsOnly=true:NoExecute";

/// Cluster network profile
pub const DNS_PREFIX: &str = "AKS-Cluster-CWY";
pub const NETWORK_PLUGIN: &str = "azure";
pub const DNS_SERVICE_IP: &str = "10.0.10.10";
pub const SERVICE_CIDR: &str = "10.0.10.0/24";
pub const DOCKER_BRIDGE_CIDR: &str = "172.17.0.1/16";

/// Environment scheduling metadata
pub const LABEL_ENVIRONMENT: &str = "environment";
pub const TAINT_EFFECT_NO_EXECUTE: &str = "NoExecute";

/// Linux agent pool names: lowercase alphanumeric, starting with a letter
pub const AGENT_POOL_NAME_PATTERN: &str = "^[a-z][a-z0-9]{0,11}$";
pub const VM_SIZE_PATTERN: &str = "^Standard_[A-Za-z0-9_]+$";

/// Pulumi CLI
pub const PULUMI_BINARY: &str = "pulumi";
