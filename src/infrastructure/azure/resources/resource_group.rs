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

use crate::infrastructure::azure::types::ResourceGroupArgs;
use crate::infrastructure::constants::TYPE_RESOURCE_GROUP;
use crate::infrastructure::pulumi::Declaration;

/// Root of the topology. The logical name and the Azure name are the same.
pub struct ResourceGroupBuilder {
    name: String,
    location: String,
}

impl ResourceGroupBuilder {
    pub fn new(name: String, location: String) -> Self {
        Self { name, location }
    }

    pub fn build(&self) -> Declaration<ResourceGroupArgs> {
        Declaration::new(
            self.name.clone(),
            TYPE_RESOURCE_GROUP,
            ResourceGroupArgs {
                resource_group_name: self.name.clone(),
                location: self.location.clone(),
            },
        )
    }
}
