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

use crate::shared::error::TopologyError;
use std::fmt;

/// Workload environments, each with its own subnet and user node pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Environment::Dev, Environment::Staging, Environment::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Staging => "staging",
            Environment::Prod => "prod",
        }
    }

    /// Capitalized form used in config keys such as `nodeCountDev`
    fn key_suffix(&self) -> &'static str {
        match self {
            Environment::Dev => "Dev",
            Environment::Staging => "Staging",
            Environment::Prod => "Prod",
        }
    }

    pub fn vm_size_key(&self) -> String {
        format!("{}NodePoolVMSize", self.as_str())
    }

    pub fn node_count_key(&self) -> String {
        format!("nodeCount{}", self.key_suffix())
    }

    pub fn min_count_key(&self) -> String {
        format!("minCount{}", self.key_suffix())
    }

    pub fn max_count_key(&self) -> String {
        format!("maxCount{}", self.key_suffix())
    }

    pub fn subnet_cidr_key(&self) -> String {
        format!("{}SubnetCidr", self.as_str())
    }

    /// Agent pool name, also used as the resource's logical name
    pub fn pool_name(&self) -> String {
        format!("{}pool", self.as_str())
    }

    pub fn subnet_name(&self) -> String {
        format!("{}Subnet", self.as_str())
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Environment {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Environment::Dev),
            "staging" => Ok(Environment::Staging),
            "prod" => Ok(Environment::Prod),
            _ => Err(TopologyError::ConfigError(format!(
                "Invalid environment: {}",
                s
            ))),
        }
    }
}
