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

use crate::infrastructure::azure::types::{AddressSpace, SubnetArgs, VirtualNetworkArgs};
use crate::infrastructure::constants::{TYPE_SUBNET, TYPE_VIRTUAL_NETWORK};
use crate::infrastructure::pulumi::{Declaration, ResourceRef};

pub struct VirtualNetworkBuilder {
    logical_name: String,
    resource_group: ResourceRef,
    address_space: String,
}

impl VirtualNetworkBuilder {
    pub fn new(logical_name: String, resource_group: ResourceRef, address_space: String) -> Self {
        Self {
            logical_name,
            resource_group,
            address_space,
        }
    }

    pub fn build(&self) -> Declaration<VirtualNetworkArgs> {
        Declaration::new(
            self.logical_name.clone(),
            TYPE_VIRTUAL_NETWORK,
            VirtualNetworkArgs {
                resource_group_name: self.resource_group.name(),
                address_space: AddressSpace {
                    address_prefixes: vec![self.address_space.clone()],
                },
            },
        )
    }
}

/// Subnet carved from a virtual network.
///
/// The prefix is passed through untouched; containment and overlap are the
/// provider's to enforce.
pub struct SubnetBuilder {
    logical_name: String,
    resource_group: ResourceRef,
    virtual_network: ResourceRef,
    address_prefix: String,
}

impl SubnetBuilder {
    pub fn new(
        logical_name: String,
        resource_group: ResourceRef,
        virtual_network: ResourceRef,
        address_prefix: String,
    ) -> Self {
        Self {
            logical_name,
            resource_group,
            virtual_network,
            address_prefix,
        }
    }

    pub fn build(&self) -> Declaration<SubnetArgs> {
        Declaration::new(
            self.logical_name.clone(),
            TYPE_SUBNET,
            SubnetArgs {
                resource_group_name: self.resource_group.name(),
                virtual_network_name: self.virtual_network.name(),
                address_prefix: self.address_prefix.clone(),
            },
        )
    }
}
