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

//! Pulumi YAML program model
//!
//! Resources reference each other through `${logicalName.property}`
//! interpolations; the engine turns those into dependency edges. Maps are
//! ordered so that rendering the same graph twice yields identical bytes.

use crate::infrastructure::constants::{PROGRAM_DESCRIPTION, PROGRAM_FILE_NAME, PROGRAM_RUNTIME};
use crate::shared::error::{Result, TopologyError};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Handle to a declared resource's outputs
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceRef {
    logical_name: String,
}

impl ResourceRef {
    pub fn new(logical_name: impl Into<String>) -> Self {
        Self {
            logical_name: logical_name.into(),
        }
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    pub fn output(&self, property: &str) -> String {
        format!("${{{}.{}}}", self.logical_name, property)
    }

    pub fn id(&self) -> String {
        self.output("id")
    }

    pub fn name(&self) -> String {
        self.output("name")
    }
}

/// Interpolation of a stack configuration key
pub fn config_ref(key: &str) -> String {
    format!("${{{}}}", key)
}

/// A typed resource declaration before rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration<T> {
    pub logical_name: String,
    pub resource_type: &'static str,
    pub args: T,
}

impl<T: Serialize> Declaration<T> {
    pub fn new(logical_name: impl Into<String>, resource_type: &'static str, args: T) -> Self {
        Self {
            logical_name: logical_name.into(),
            resource_type,
            args,
        }
    }

    pub fn reference(&self) -> ResourceRef {
        ResourceRef::new(self.logical_name.clone())
    }

    pub fn to_program_resource(&self) -> Result<ProgramResource> {
        Ok(ProgramResource {
            resource_type: self.resource_type.to_string(),
            properties: serde_yaml::to_value(&self.args)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramResource {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub properties: serde_yaml::Value,
}

/// Entry in the program's `config:` block.
///
/// Keys outside the project namespace (such as `azure-native:*`) may not
/// carry a `type`, so only the secret marker is emitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfigDeclaration {
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub secret: bool,
}

impl ConfigDeclaration {
    pub fn secret() -> Self {
        Self { secret: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Yaml => "yaml",
            OutputFormat::Json => "json",
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = TopologyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "json" => Ok(OutputFormat::Json),
            _ => Err(TopologyError::ConfigError(format!(
                "Invalid output format: {}",
                s
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Program {
    pub name: String,
    pub runtime: String,
    pub description: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, ConfigDeclaration>,
    pub resources: BTreeMap<String, ProgramResource>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub outputs: BTreeMap<String, String>,
}

impl Program {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            runtime: PROGRAM_RUNTIME.to_string(),
            description: PROGRAM_DESCRIPTION.to_string(),
            config: BTreeMap::new(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Add a resource; logical names must be unique within a program
    pub fn add<T: Serialize>(&mut self, declaration: &Declaration<T>) -> Result<()> {
        if self.resources.contains_key(&declaration.logical_name) {
            return Err(TopologyError::ValidationError(format!(
                "Duplicate resource name '{}'",
                declaration.logical_name
            )));
        }
        let resource = declaration.to_program_resource()?;
        self.resources
            .insert(declaration.logical_name.clone(), resource);
        Ok(())
    }

    pub fn declare_config(&mut self, key: impl Into<String>, declaration: ConfigDeclaration) {
        self.config.insert(key.into(), declaration);
    }

    pub fn export(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.outputs.insert(name.into(), value.into());
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)?;
        json.push('\n');
        Ok(json)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String> {
        match format {
            OutputFormat::Yaml => self.to_yaml(),
            OutputFormat::Json => self.to_json(),
        }
    }

    /// Write `Pulumi.yaml` into `dir`, returning its path
    pub async fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let path = dir.join(PROGRAM_FILE_NAME);
        tokio::fs::write(&path, self.to_yaml()?).await?;
        tracing::debug!(path = %path.display(), "wrote Pulumi program");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Args {
        resource_group_name: String,
        address_prefix: String,
    }

    #[test]
    fn test_reference_interpolation() {
        let r = ResourceRef::new("systemSubnet");
        assert_eq!(r.id(), "${systemSubnet.id}");
        assert_eq!(r.name(), "${systemSubnet.name}");
        assert_eq!(config_ref("azure-native:clientSecret"), "${azure-native:clientSecret}");
    }

    #[test]
    fn test_program_rendering() {
        let mut program = Program::new("demo");
        let decl = Declaration::new(
            "devSubnet",
            "azure-native:network:Subnet",
            Args {
                resource_group_name: "${rg.name}".to_string(),
                address_prefix: "10.0.2.0/24".to_string(),
            },
        );
        program.add(&decl).unwrap();
        program.export("devSubnetId", decl.reference().id());

        let yaml: serde_yaml::Value = serde_yaml::from_str(&program.to_yaml().unwrap()).unwrap();
        assert_eq!(yaml["runtime"], "yaml");
        assert_eq!(
            yaml["resources"]["devSubnet"]["type"],
            "azure-native:network:Subnet"
        );
        assert_eq!(
            yaml["resources"]["devSubnet"]["properties"]["resourceGroupName"],
            "${rg.name}"
        );
        assert_eq!(yaml["outputs"]["devSubnetId"], "${devSubnet.id}");
        assert!(yaml.get("config").is_none());

        let json: serde_json::Value =
            serde_json::from_str(&program.to_json().unwrap()).unwrap();
        assert_eq!(
            json["resources"]["devSubnet"]["properties"]["addressPrefix"],
            "10.0.2.0/24"
        );
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut program = Program::new("demo");
        let decl = Declaration::new(
            "dup",
            "azure-native:network:Subnet",
            Args {
                resource_group_name: "rg".to_string(),
                address_prefix: "10.0.2.0/24".to_string(),
            },
        );
        program.add(&decl).unwrap();
        assert!(program.add(&decl).is_err());
    }

    #[test]
    fn test_secret_config_declaration_has_no_type() {
        let mut program = Program::new("demo");
        program.declare_config("azure-native:clientSecret", ConfigDeclaration::secret());

        let yaml: serde_yaml::Value = serde_yaml::from_str(&program.to_yaml().unwrap()).unwrap();
        let declaration = &yaml["config"]["azure-native:clientSecret"];
        assert_eq!(declaration["secret"], true);
        assert!(declaration.get("type").is_none());
        assert_eq!(declaration.as_mapping().map(|m| m.len()), Some(1));
    }

    #[tokio::test]
    async fn test_write_to_dir_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("work");
        let program = Program::new("demo");

        let path = program.write_to_dir(&target).await.unwrap();
        assert_eq!(path, target.join("Pulumi.yaml"));
        assert_eq!(
            tokio::fs::read_to_string(&path).await.unwrap(),
            program.to_yaml().unwrap()
        );
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("YAML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("toml".parse::<OutputFormat>().is_err());
    }
}
