//! Color theme for CLI output

use crate::domain::topology::{Severity, ValidationReport};
use comfy_table::Color as TableColor;

/// Color theme for terminal output
#[derive(Debug, Clone)]
pub struct ColorTheme {
    pub success: TableColor,
    pub warning: TableColor,
    pub error: TableColor,
    pub info: TableColor,
    pub muted: TableColor,
}

impl Default for ColorTheme {
    fn default() -> Self {
        Self {
            success: TableColor::Green,
            warning: TableColor::Yellow,
            error: TableColor::Red,
            info: TableColor::Cyan,
            muted: TableColor::DarkGrey,
        }
    }
}

impl ColorTheme {
    pub fn severity_color(&self, severity: Severity) -> TableColor {
        match severity {
            Severity::Warning => self.warning,
            Severity::Error => self.error,
        }
    }

    pub fn report_color(&self, report: &ValidationReport) -> TableColor {
        if report.has_errors() {
            self.error
        } else if report.is_clean() {
            self.success
        } else {
            self.warning
        }
    }
}

/// Convert comfy_table::Color to colored::Color string representation
pub fn table_color_to_colored_str(color: TableColor) -> &'static str {
    match color {
        TableColor::Green => "green",
        TableColor::Yellow => "yellow",
        TableColor::Red => "red",
        TableColor::Cyan => "cyan",
        TableColor::DarkGrey => "bright black",
        _ => "white",
    }
}
