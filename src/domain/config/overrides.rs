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

//! `-C key=value` overrides layered on top of a stack file

use super::stack::{ConfigValue, StackConfig};
use super::topology::CLIENT_SECRET_KEY;
use crate::shared::error::{Result, TopologyError};

/// Parse `key=value` pairs, keeping command-line order
pub fn parse_overrides(raw: &[String]) -> Result<Vec<(String, String)>> {
    let mut pairs = Vec::with_capacity(raw.len());

    for entry in raw {
        let (key, value) = entry.split_once('=').ok_or_else(|| {
            TopologyError::config_error(format!(
                "Invalid override format: '{}'. Expected 'key=value'",
                entry
            ))
        })?;

        let key = key.trim();
        if key.is_empty() {
            return Err(TopologyError::config_error(format!(
                "Empty key in override: '{}'",
                entry
            )));
        }

        pairs.push((key.to_string(), value.trim().to_string()));
    }

    Ok(pairs)
}

/// Apply overrides as plain string values; later entries win.
///
/// The client secret cannot be overridden; the engine only reads it from the
/// stack file. Nothing is applied when any entry is rejected.
pub fn apply_overrides(stack: &mut StackConfig, overrides: &[(String, String)]) -> Result<()> {
    if let Some((key, _)) = overrides
        .iter()
        .find(|(key, _)| stack.namespaced(key) == CLIENT_SECRET_KEY)
    {
        return Err(TopologyError::config_error(format!(
            "'{}' cannot be overridden; set it in the stack file with `pulumi config set --secret {}`",
            key, CLIENT_SECRET_KEY
        )));
    }

    for (key, value) in overrides {
        tracing::debug!(key = %stack.namespaced(key), "applying config override");
        stack.set(key, ConfigValue::Text(value.clone()));
    }
    Ok(())
}
