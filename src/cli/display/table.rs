//! Table rendering for CLI output

use super::colors::table_color_to_colored_str;
use super::{ColorTheme, StatusIcon};
use crate::domain::topology::{Topology, ValidationReport};
use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};

/// One declared resource, flattened for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRow {
    pub name: String,
    pub kind: String,
    pub parent: String,
    pub details: String,
}

fn short_type(resource_type: &str) -> String {
    resource_type
        .rsplit(':')
        .next()
        .unwrap_or(resource_type)
        .to_string()
}

/// Rows in declaration order. Secrets are never part of a row.
pub fn plan_rows(topology: &Topology) -> Vec<PlanRow> {
    let mut rows = Vec::with_capacity(topology.resource_count());

    let rg = &topology.resource_group;
    rows.push(PlanRow {
        name: rg.logical_name.clone(),
        kind: short_type(rg.resource_type),
        parent: "-".to_string(),
        details: format!("location={}", rg.args.location),
    });

    let vnet = &topology.virtual_network;
    rows.push(PlanRow {
        name: vnet.logical_name.clone(),
        kind: short_type(vnet.resource_type),
        parent: rg.logical_name.clone(),
        details: format!(
            "addressSpace={}",
            vnet.args.address_space.address_prefixes.join(",")
        ),
    });

    for (role, subnet) in &topology.subnets {
        rows.push(PlanRow {
            name: subnet.logical_name.clone(),
            kind: short_type(subnet.resource_type),
            parent: vnet.logical_name.clone(),
            details: format!("{} prefix={}", role, subnet.args.address_prefix),
        });
    }

    let cluster = &topology.cluster;
    let system_pools: Vec<String> = cluster
        .args
        .agent_pool_profiles
        .iter()
        .map(|p| {
            format!(
                "{} {} x{} ({})",
                p.name,
                p.vm_size,
                p.count,
                p.mode.as_str()
            )
        })
        .collect();
    rows.push(PlanRow {
        name: cluster.logical_name.clone(),
        kind: short_type(cluster.resource_type),
        parent: rg.logical_name.clone(),
        details: format!(
            "{} plugin={} serviceCidr={}",
            system_pools.join(", "),
            cluster.args.network_profile.network_plugin,
            cluster.args.network_profile.service_cidr
        ),
    });

    for (_, pool) in &topology.node_pools {
        rows.push(PlanRow {
            name: pool.logical_name.clone(),
            kind: short_type(pool.resource_type),
            parent: cluster.logical_name.clone(),
            details: format!(
                "{} count={} [{}..{}] taint={}",
                pool.args.vm_size,
                pool.args.count,
                pool.args.min_count,
                pool.args.max_count,
                pool.args.node_taints.join(",")
            ),
        });
    }

    rows
}

/// Table renderer for formatted output
pub struct TableRenderer {
    theme: ColorTheme,
}

impl Default for TableRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TableRenderer {
    /// Create a new table renderer with default theme
    pub fn new() -> Self {
        Self {
            theme: ColorTheme::default(),
        }
    }

    /// Render the declared resources
    pub fn render_plan(&self, topology: &Topology) -> String {
        let rows = plan_rows(topology);

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("NAME").set_alignment(CellAlignment::Left),
                Cell::new("TYPE").set_alignment(CellAlignment::Left),
                Cell::new("PARENT").set_alignment(CellAlignment::Left),
                Cell::new("DETAILS").set_alignment(CellAlignment::Left),
            ]);

        for row in &rows {
            table.add_row(vec![
                Cell::new(&row.name).fg(self.theme.info),
                Cell::new(&row.kind),
                Cell::new(&row.parent).fg(self.theme.muted),
                Cell::new(&row.details),
            ]);
        }

        let mut output = String::new();
        output.push_str(&format!(
            "╭─ AKS Topology {} ─╮\n",
            format!("[{} resources]", rows.len()).bright_black()
        ));
        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    /// Render preflight findings with an overall verdict
    pub fn render_report(&self, report: &ValidationReport) -> String {
        let verdict_color = table_color_to_colored_str(self.theme.report_color(report));
        let verdict = format!(
            "{} {}",
            StatusIcon::for_report(report),
            StatusIcon::report_status_text(report)
        )
        .color(verdict_color)
        .to_string();

        if report.is_clean() {
            return format!("Preflight check: {}", verdict);
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(vec![
                Cell::new("").set_alignment(CellAlignment::Center),
                Cell::new("SUBJECT").set_alignment(CellAlignment::Left),
                Cell::new("FINDING").set_alignment(CellAlignment::Left),
            ]);

        for finding in report.findings() {
            let color = self.theme.severity_color(finding.severity);
            table.add_row(vec![
                Cell::new(StatusIcon::for_severity(finding.severity))
                    .fg(color)
                    .set_alignment(CellAlignment::Center),
                Cell::new(&finding.subject),
                Cell::new(&finding.message).fg(color),
            ]);
        }

        format!(
            "{}\nPreflight check: {} ({} error(s), {} warning(s))",
            table,
            verdict,
            report.errors().count(),
            report.warnings().count()
        )
    }
}
