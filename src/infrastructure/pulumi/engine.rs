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

//! Handoff to the external provisioning engine
//!
//! The engine owns dependency resolution, parallelism, retries and diffing
//! against live state. Nothing here retries: a failed run is reported with
//! the engine's own output and the caller aborts.

use super::program::Program;
use crate::infrastructure::constants::PULUMI_BINARY;
use crate::shared::error::{Result, TopologyError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineOperation {
    Preview,
    Up,
}

impl EngineOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineOperation::Preview => "preview",
            EngineOperation::Up => "up",
        }
    }
}

#[async_trait::async_trait]
pub trait ProvisioningEngine: Send + Sync {
    /// Show the changes applying `program` would make
    async fn preview(&self, program: &Program) -> Result<()>;

    /// Create or update resources to match `program`
    async fn up(&self, program: &Program) -> Result<()>;

    async fn run(&self, operation: EngineOperation, program: &Program) -> Result<()> {
        match operation {
            EngineOperation::Preview => self.preview(program).await,
            EngineOperation::Up => self.up(program).await,
        }
    }
}

/// Drives the `pulumi` CLI against a work directory holding the rendered
/// program and the stack file.
pub struct PulumiCli {
    binary: PathBuf,
    work_dir: PathBuf,
    stack: String,
    stack_file: PathBuf,
    auto_approve: bool,
}

impl PulumiCli {
    pub fn new(work_dir: PathBuf, stack: String, stack_file: PathBuf) -> Self {
        Self {
            binary: PathBuf::from(PULUMI_BINARY),
            work_dir,
            stack,
            stack_file,
            auto_approve: false,
        }
    }

    pub fn with_binary(mut self, binary: PathBuf) -> Self {
        self.binary = binary;
        self
    }

    pub fn with_auto_approve(mut self, auto_approve: bool) -> Self {
        self.auto_approve = auto_approve;
        self
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn stack_file_name(&self) -> String {
        format!("Pulumi.{}.yaml", self.stack)
    }

    /// Write the program and make the stack file visible next to it
    pub async fn prepare(&self, program: &Program) -> Result<()> {
        tokio::fs::create_dir_all(&self.work_dir).await?;
        program.write_to_dir(&self.work_dir).await?;

        let target = self.work_dir.join(self.stack_file_name());
        let same_file = match (
            tokio::fs::canonicalize(&self.stack_file).await,
            tokio::fs::canonicalize(&target).await,
        ) {
            (Ok(a), Ok(b)) => a == b,
            _ => false,
        };
        if !same_file {
            tokio::fs::copy(&self.stack_file, &target).await.map_err(|e| {
                TopologyError::engine(format!(
                    "Failed to stage stack file {} into {}: {}",
                    self.stack_file.display(),
                    self.work_dir.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    pub fn command_args(&self, operation: EngineOperation) -> Vec<String> {
        let mut args = vec![
            operation.as_str().to_string(),
            "--stack".to_string(),
            self.stack.clone(),
            "--non-interactive".to_string(),
            "--cwd".to_string(),
            self.work_dir.display().to_string(),
        ];
        if operation == EngineOperation::Up && self.auto_approve {
            args.push("--yes".to_string());
        }
        args
    }

    async fn execute(&self, operation: EngineOperation, program: &Program) -> Result<()> {
        self.prepare(program).await?;

        let args = self.command_args(operation);
        tracing::info!(
            operation = operation.as_str(),
            stack = %self.stack,
            work_dir = %self.work_dir.display(),
            "invoking pulumi"
        );

        // Output is inherited so the engine's diagnostics reach the operator verbatim.
        let status = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| {
                TopologyError::engine(format!(
                    "Failed to start {}: {}",
                    self.binary.display(),
                    e
                ))
            })?;

        if !status.success() {
            return Err(TopologyError::engine(format!(
                "pulumi {} exited with {}",
                operation.as_str(),
                status
            )));
        }

        tracing::info!(operation = operation.as_str(), "pulumi finished");
        Ok(())
    }
}

#[async_trait::async_trait]
impl ProvisioningEngine for PulumiCli {
    async fn preview(&self, program: &Program) -> Result<()> {
        self.execute(EngineOperation::Preview, program).await
    }

    async fn up(&self, program: &Program) -> Result<()> {
        self.execute(EngineOperation::Up, program).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(auto_approve: bool) -> PulumiCli {
        PulumiCli::new(
            PathBuf::from("/tmp/aks"),
            "dev".to_string(),
            PathBuf::from("Pulumi.dev.yaml"),
        )
        .with_auto_approve(auto_approve)
    }

    #[test]
    fn test_command_args() {
        assert_eq!(
            cli(true).command_args(EngineOperation::Preview),
            vec!["preview", "--stack", "dev", "--non-interactive", "--cwd", "/tmp/aks"]
        );
        let up = cli(true).command_args(EngineOperation::Up);
        assert_eq!(up.last().map(String::as_str), Some("--yes"));
        let up = cli(false).command_args(EngineOperation::Up);
        assert!(!up.contains(&"--yes".to_string()));
    }

    #[test]
    fn test_stack_file_name() {
        assert_eq!(cli(false).stack_file_name(), "Pulumi.dev.yaml");
    }

    #[tokio::test]
    async fn test_missing_binary_is_engine_error() {
        let dir = tempfile::tempdir().unwrap();
        let stack_file = dir.path().join("Pulumi.dev.yaml");
        std::fs::write(&stack_file, "config: {}\n").unwrap();

        let engine = PulumiCli::new(dir.path().join("work"), "dev".to_string(), stack_file)
            .with_binary(dir.path().join("no-such-pulumi"));
        let err = engine.preview(&Program::new("demo")).await.unwrap_err();
        assert!(matches!(err, TopologyError::EngineError(_)));
        assert!(dir.path().join("work").join("Pulumi.yaml").exists());
        assert!(dir.path().join("work").join("Pulumi.dev.yaml").exists());
    }
}
