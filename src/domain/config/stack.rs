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

//! Pulumi stack configuration (`Pulumi.<stack>.yaml`)
//!
//! Keys are namespaced: project keys as `<project>:<key>`, provider keys as
//! `azure-native:<key>`. Lookups without a namespace resolve against the
//! project namespace.

use super::secret::Secret;
use crate::shared::error::{Result, TopologyError};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub const DEFAULT_PROJECT: &str = "aks-topology";

/// A single stack configuration entry
#[derive(Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Secure { secure: String },
    Int(i64),
    Bool(bool),
    Float(f64),
    Text(String),
    Structured(serde_yaml::Value),
}

impl ConfigValue {
    fn type_name(&self) -> &'static str {
        match self {
            ConfigValue::Secure { .. } => "secure value",
            ConfigValue::Int(_) => "integer",
            ConfigValue::Bool(_) => "boolean",
            ConfigValue::Float(_) => "float",
            ConfigValue::Text(_) => "string",
            ConfigValue::Structured(_) => "structured value",
        }
    }
}

impl fmt::Debug for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Text values may hold plaintext secrets set through overrides.
        write!(f, "ConfigValue({})", self.type_name())
    }
}

#[derive(Debug, Default, Deserialize)]
struct StackFile {
    #[serde(default)]
    config: BTreeMap<String, ConfigValue>,
}

#[derive(Debug, Clone)]
pub struct StackConfig {
    project: String,
    values: BTreeMap<String, ConfigValue>,
}

impl StackConfig {
    pub fn new(project: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            values: BTreeMap::new(),
        }
    }

    /// Load a stack file from disk
    pub fn from_file(path: impl AsRef<Path>, project: impl Into<String>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TopologyError::config_error(format!(
                "Failed to read stack file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = Self::from_yaml_str(&content, project)?;
        tracing::debug!(
            path = %path.display(),
            keys = config.values.len(),
            "loaded stack configuration"
        );
        Ok(config)
    }

    pub fn from_yaml_str(content: &str, project: impl Into<String>) -> Result<Self> {
        let file: StackFile = if content.trim().is_empty() {
            StackFile::default()
        } else {
            serde_yaml::from_str(content)?
        };

        Ok(Self {
            project: project.into(),
            values: file.config,
        })
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fully qualified form of `key`
    pub fn namespaced(&self, key: &str) -> String {
        if key.contains(':') {
            key.to_string()
        } else {
            format!("{}:{}", self.project, key)
        }
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(&self.namespaced(key))
    }

    pub fn set(&mut self, key: &str, value: ConfigValue) {
        let key = self.namespaced(key);
        self.values.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        let key = self.namespaced(key);
        self.values.remove(&key)
    }

    /// String value, `Ok(None)` when absent or empty.
    ///
    /// Integers and booleans are accepted and stringified, the way the
    /// engine hands config to programs.
    pub fn try_string(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(ConfigValue::Text(s)) if s.is_empty() => Ok(None),
            Some(ConfigValue::Text(s)) => Ok(Some(s.clone())),
            Some(ConfigValue::Int(i)) => Ok(Some(i.to_string())),
            Some(ConfigValue::Bool(b)) => Ok(Some(b.to_string())),
            Some(ConfigValue::Secure { .. }) => Err(TopologyError::invalid(
                self.namespaced(key),
                "value is secure; it can only be read as a secret",
            )),
            Some(other) => Err(TopologyError::invalid(
                self.namespaced(key),
                format!("expected a string, found {}", other.type_name()),
            )),
        }
    }

    pub fn try_int(&self, key: &str) -> Result<Option<i64>> {
        match self.get(key) {
            None => Ok(None),
            Some(ConfigValue::Int(i)) => Ok(Some(*i)),
            Some(ConfigValue::Text(s)) if s.is_empty() => Ok(None),
            Some(ConfigValue::Text(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| {
                TopologyError::invalid(
                    self.namespaced(key),
                    format!("expected an integer, found '{}'", s),
                )
            }),
            Some(ConfigValue::Secure { .. }) => Err(TopologyError::invalid(
                self.namespaced(key),
                "value is secure; it can only be read as a secret",
            )),
            Some(other) => Err(TopologyError::invalid(
                self.namespaced(key),
                format!("expected an integer, found {}", other.type_name()),
            )),
        }
    }

    pub fn try_secret(&self, key: &str) -> Result<Option<Secret>> {
        match self.get(key) {
            None => Ok(None),
            Some(ConfigValue::Secure { secure }) if secure.is_empty() => Ok(None),
            Some(ConfigValue::Secure { secure }) => Ok(Some(Secret::ciphertext(secure.clone()))),
            Some(ConfigValue::Text(s)) if s.is_empty() => Ok(None),
            Some(ConfigValue::Text(s)) => Ok(Some(Secret::plaintext(s.clone()))),
            Some(other) => Err(TopologyError::invalid(
                self.namespaced(key),
                format!("expected a secret string, found {}", other.type_name()),
            )),
        }
    }
}
