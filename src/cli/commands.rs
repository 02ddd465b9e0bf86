// CLI command definitions

use super::stack::{CheckCommand, PlanCommand, PreviewCommand, RenderCommand, UpCommand};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "aks-topology",
    version,
    about = "Declare an AKS cluster with per-environment node pools",
    long_about = "Reads a Pulumi stack file, declares the resource group, network, cluster and \
                  dev/staging/prod node pools, and renders them as a Pulumi YAML program"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Render the Pulumi program (YAML or JSON)
    Render(RenderCommand),

    /// Run offline preflight checks on the configuration
    Check(CheckCommand),

    /// Show the declared resources as a table
    Plan(PlanCommand),

    /// Render and run `pulumi preview`
    Preview(PreviewCommand),

    /// Render and run `pulumi up`
    Up(UpCommand),
}
