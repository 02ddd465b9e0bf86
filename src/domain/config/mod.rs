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

//! Configuration domain

pub mod environment;
pub mod overrides;
pub mod secret;
pub mod stack;
pub mod topology;

pub use self::environment::Environment;
pub use self::overrides::{apply_overrides, parse_overrides};
pub use self::secret::Secret;
pub use self::stack::{ConfigValue, StackConfig, DEFAULT_PROJECT};
pub use self::topology::{
    required_keys, EnvironmentPoolConfig, ServicePrincipal, TopologyConfig, CLIENT_ID_KEY,
    CLIENT_SECRET_KEY,
};
