//! Status icons for CLI output

use crate::domain::topology::{Severity, ValidationReport};

/// Status icons for check findings
pub struct StatusIcon;

impl StatusIcon {
    /// Passed
    pub const SUCCESS: &'static str = "✓";

    pub const WARNING: &'static str = "⚠";

    pub const ERROR: &'static str = "✗";

    pub fn for_severity(severity: Severity) -> &'static str {
        match severity {
            Severity::Warning => Self::WARNING,
            Severity::Error => Self::ERROR,
        }
    }

    /// Worst outcome across a report
    pub fn for_report(report: &ValidationReport) -> &'static str {
        if report.has_errors() {
            Self::ERROR
        } else if report.is_clean() {
            Self::SUCCESS
        } else {
            Self::WARNING
        }
    }

    pub fn report_status_text(report: &ValidationReport) -> &'static str {
        if report.has_errors() {
            "Failed"
        } else if report.is_clean() {
            "Passed"
        } else {
            "Passed with warnings"
        }
    }
}
