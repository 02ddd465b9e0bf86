//! Stack commands

use crate::cli::display::TableRenderer;
use crate::domain::config::{apply_overrides, parse_overrides, StackConfig, TopologyConfig, DEFAULT_PROJECT};
use crate::domain::topology::{Topology, TopologyDescriptor, TopologyValidator};
use crate::infrastructure::pulumi::{EngineOperation, OutputFormat, ProvisioningEngine, PulumiCli};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(clap::Args, Debug, Clone)]
pub struct StackArgs {
    /// Path to the Pulumi stack file (Pulumi.<stack>.yaml)
    #[arg(long, short = 's', value_name = "PATH")]
    pub stack_file: PathBuf,

    /// Project namespace for config keys given without one
    #[arg(long, default_value = DEFAULT_PROJECT)]
    pub project: String,

    /// Configuration overrides applied on top of the stack file (-C key=value)
    ///
    /// Keys without a namespace resolve against the project, e.g.
    /// -C nodeCountDev=3 -C azure-native:clientId=<app-id>
    #[arg(short = 'C', value_name = "KEY=VALUE")]
    pub overrides: Vec<String>,
}

impl StackArgs {
    pub fn load(&self) -> anyhow::Result<StackConfig> {
        let mut stack = StackConfig::from_file(&self.stack_file, self.project.clone())?;
        if !self.overrides.is_empty() {
            let overrides = parse_overrides(&self.overrides)
                .map_err(|e| anyhow::anyhow!("Failed to parse overrides: {}", e))?;
            apply_overrides(&mut stack, &overrides)
                .map_err(|e| anyhow::anyhow!("Failed to apply overrides: {}", e))?;
        }
        Ok(stack)
    }

    pub fn topology_config(&self) -> anyhow::Result<TopologyConfig> {
        let stack = self.load()?;
        TopologyConfig::from_stack(&stack).map_err(|e| {
            anyhow::anyhow!(
                "Failed to resolve configuration from {}: {}",
                self.stack_file.display(),
                e
            )
        })
    }

    pub fn topology(&self) -> anyhow::Result<Topology> {
        let config = self.topology_config()?;
        Ok(TopologyDescriptor::declare(&config))
    }

    /// `dev` for `Pulumi.dev.yaml`
    pub fn stack_name_from_file(&self) -> Option<String> {
        stack_name_from_path(&self.stack_file)
    }
}

pub fn stack_name_from_path(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    let name = file_name
        .strip_prefix("Pulumi.")?
        .strip_suffix(".yaml")
        .or_else(|| file_name.strip_prefix("Pulumi.")?.strip_suffix(".yml"))?;
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[derive(Parser, Debug, Clone)]
pub struct RenderCommand {
    #[command(flatten)]
    pub stack: StackArgs,

    /// Output format (yaml, json)
    #[arg(long, short = 'f', default_value = "yaml")]
    pub format: String,

    /// Write to this file instead of stdout
    #[arg(long, short = 'o', value_name = "PATH")]
    pub out: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct CheckCommand {
    #[command(flatten)]
    pub stack: StackArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct PlanCommand {
    #[command(flatten)]
    pub stack: StackArgs,
}

#[derive(clap::Args, Debug, Clone)]
pub struct EngineArgs {
    /// Stack name; defaults to the one in the stack file name
    #[arg(long)]
    pub stack_name: Option<String>,

    /// Directory the program is rendered into before invoking pulumi
    #[arg(long, default_value = ".aks-topology")]
    pub work_dir: PathBuf,

    /// Path to the pulumi binary
    #[arg(long, value_name = "PATH")]
    pub pulumi_bin: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct PreviewCommand {
    #[command(flatten)]
    pub stack: StackArgs,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Parser, Debug, Clone)]
pub struct UpCommand {
    #[command(flatten)]
    pub stack: StackArgs,

    #[command(flatten)]
    pub engine: EngineArgs,

    /// Apply without the engine's confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}

impl RenderCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let format = self
            .format
            .parse::<OutputFormat>()
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        let topology = self.stack.topology()?;
        let program = topology.to_program(&self.stack.project)?;
        let rendered = program.render(format)?;

        match &self.out {
            Some(path) => {
                tokio::fs::write(path, &rendered).await.map_err(|e| {
                    anyhow::anyhow!("Failed to write {}: {}", path.display(), e)
                })?;
                tracing::info!(
                    path = %path.display(),
                    format = format.as_str(),
                    resources = program.resources.len(),
                    "rendered program"
                );
                println!("✓ Program written to {}", path.display());
            }
            None => print!("{}", rendered),
        }
        Ok(())
    }
}

impl CheckCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let config = self.stack.topology_config()?;
        let validator = TopologyValidator::new()?;
        let report = validator.validate(&config);

        println!("{}", TableRenderer::new().render_report(&report));

        if report.has_errors() {
            anyhow::bail!(
                "Preflight check failed with {} error(s)",
                report.errors().count()
            );
        }
        Ok(())
    }
}

impl PlanCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        let topology = self.stack.topology()?;
        println!("{}", TableRenderer::new().render_plan(&topology));
        Ok(())
    }
}

async fn run_engine(
    stack: &StackArgs,
    engine_args: &EngineArgs,
    operation: EngineOperation,
    auto_approve: bool,
) -> anyhow::Result<()> {
    let stack_name = engine_args
        .stack_name
        .clone()
        .or_else(|| stack.stack_name_from_file())
        .ok_or_else(|| {
            anyhow::anyhow!(
                "stack name is required (use --stack-name or a Pulumi.<stack>.yaml stack file)"
            )
        })?;

    // Configuration errors surface here, before the engine is touched.
    let topology = stack.topology()?;
    let program = topology.to_program(&stack.project)?;

    let mut engine = PulumiCli::new(
        engine_args.work_dir.clone(),
        stack_name,
        stack.stack_file.clone(),
    )
    .with_auto_approve(auto_approve);
    if let Some(ref binary) = engine_args.pulumi_bin {
        engine = engine.with_binary(binary.clone());
    }

    engine
        .run(operation, &program)
        .await
        .map_err(|e| anyhow::anyhow!("pulumi {} failed: {}", operation.as_str(), e))
}

impl PreviewCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        run_engine(&self.stack, &self.engine, EngineOperation::Preview, false).await
    }
}

impl UpCommand {
    pub async fn execute(&self) -> anyhow::Result<()> {
        run_engine(&self.stack, &self.engine, EngineOperation::Up, self.yes).await
    }
}
