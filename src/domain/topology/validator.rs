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

//! Offline preflight checks.
//!
//! These mirror what the provider will reject so an operator can catch it
//! before an engine run. Rendering never calls into this module.

use super::descriptor::SubnetRole;
use crate::domain::config::{Environment, TopologyConfig};
use crate::domain::network::Ipv4Cidr;
use crate::infrastructure::constants::{
    AGENT_POOL_NAME_PATTERN, DNS_SERVICE_IP, SERVICE_CIDR, SYSTEM_POOL_NAME, VM_SIZE_PATTERN,
};
use crate::shared::error::{Result, TopologyError};
use regex::Regex;
use std::fmt;
use std::net::Ipv4Addr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub subject: String,
    pub message: String,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity.as_str(), self.subject, self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    findings: Vec<Finding>,
}

impl ValidationReport {
    fn push(&mut self, severity: Severity, subject: impl Into<String>, message: impl Into<String>) {
        self.findings.push(Finding {
            severity,
            subject: subject.into(),
            message: message.into(),
        });
    }

    fn error(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Error, subject, message);
    }

    fn warning(&mut self, subject: impl Into<String>, message: impl Into<String>) {
        self.push(Severity::Warning, subject, message);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Fold error findings into a single validation error
    pub fn into_result(self) -> Result<()> {
        let errors: Vec<String> = self.errors().map(|f| f.to_string()).collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(TopologyError::ValidationError(errors.join("\n")))
        }
    }
}

pub struct TopologyValidator {
    pool_name: Regex,
    vm_size: Regex,
}

impl TopologyValidator {
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                TopologyError::ValidationError(format!("Invalid pattern {}: {}", pattern, e))
            })
        };
        Ok(Self {
            pool_name: compile(AGENT_POOL_NAME_PATTERN)?,
            vm_size: compile(VM_SIZE_PATTERN)?,
        })
    }

    pub fn validate(&self, config: &TopologyConfig) -> ValidationReport {
        let mut report = ValidationReport::default();

        self.validate_network(config, &mut report);
        self.validate_service_network(config, &mut report);
        for env in Environment::ALL {
            self.validate_pool(config, env, &mut report);
        }
        self.validate_pool_name(SYSTEM_POOL_NAME, &mut report);

        tracing::debug!(
            findings = report.findings.len(),
            errors = report.errors().count(),
            "preflight validation finished"
        );
        report
    }

    fn parse_cidr(subject: &str, value: &str, report: &mut ValidationReport) -> Option<Ipv4Cidr> {
        match value.parse::<Ipv4Cidr>() {
            Ok(cidr) => Some(cidr),
            Err(e) => {
                report.error(subject, e.to_string());
                None
            }
        }
    }

    fn validate_network(&self, config: &TopologyConfig, report: &mut ValidationReport) {
        let vnet = Self::parse_cidr("vnet", &config.vnet_cidr, report);
        if let Some(vnet) = vnet {
            if !vnet.is_network_aligned() {
                report.error(
                    "vnet",
                    format!("{} has host bits set (network is {})", vnet, vnet.network()),
                );
            }
        }

        let mut subnets: Vec<(SubnetRole, Ipv4Cidr)> = Vec::new();
        for role in SubnetRole::ALL {
            let subject = format!("{} subnet", role);
            let Some(subnet) = Self::parse_cidr(&subject, role.address_prefix(config), report)
            else {
                continue;
            };

            if !subnet.is_network_aligned() {
                report.error(
                    &subject,
                    format!(
                        "{} has host bits set (network is {})",
                        subnet,
                        subnet.network()
                    ),
                );
            }

            if let Some(vnet) = vnet {
                if !vnet.strictly_contains(&subnet) {
                    report.error(
                        &subject,
                        format!("{} is not a strict subset of vnet {}", subnet, vnet),
                    );
                }
            }

            for (other_role, other) in &subnets {
                if subnet.overlaps(other) {
                    report.error(
                        &subject,
                        format!(
                            "{} overlaps {} subnet {}",
                            subnet, other_role, other
                        ),
                    );
                }
            }

            subnets.push((role, subnet));
        }
    }

    fn validate_service_network(&self, config: &TopologyConfig, report: &mut ValidationReport) {
        let Some(service) = Self::parse_cidr("service cidr", SERVICE_CIDR, report) else {
            return;
        };

        match DNS_SERVICE_IP.parse::<Ipv4Addr>() {
            Ok(ip) if service.contains_addr(ip) => {}
            Ok(ip) => report.error(
                "dns service ip",
                format!("{} is outside service cidr {}", ip, service),
            ),
            Err(_) => report.error("dns service ip", format!("'{}' is not IPv4", DNS_SERVICE_IP)),
        }

        for role in SubnetRole::ALL {
            if let Ok(subnet) = role.address_prefix(config).parse::<Ipv4Cidr>() {
                if service.overlaps(&subnet) {
                    report.error(
                        "service cidr",
                        format!("{} overlaps {} subnet {}", service, role, subnet),
                    );
                }
            }
        }

        if let Ok(vnet) = config.vnet_cidr.parse::<Ipv4Cidr>() {
            if service.overlaps(&vnet) {
                report.warning(
                    "service cidr",
                    format!(
                        "{} lies inside vnet {}; keep it clear of future subnets",
                        service, vnet
                    ),
                );
            }
        }
    }

    fn validate_pool(&self, config: &TopologyConfig, env: Environment, report: &mut ValidationReport) {
        let pool = config.pool(env);
        let subject = env.pool_name();

        if pool.min_count > pool.max_count {
            report.error(
                &subject,
                format!(
                    "minCount {} is greater than maxCount {}",
                    pool.min_count, pool.max_count
                ),
            );
        } else if pool.node_count < pool.min_count || pool.node_count > pool.max_count {
            report.error(
                &subject,
                format!(
                    "nodeCount {} is outside [{}, {}]",
                    pool.node_count, pool.min_count, pool.max_count
                ),
            );
        }

        if pool.min_count < 0 {
            report.error(&subject, format!("minCount {} is negative", pool.min_count));
        }

        if !self.vm_size.is_match(&pool.vm_size) {
            report.warning(
                &subject,
                format!("VM size '{}' does not look like Standard_*", pool.vm_size),
            );
        }

        self.validate_pool_name(&subject, report);
    }

    fn validate_pool_name(&self, name: &str, report: &mut ValidationReport) {
        if !self.pool_name.is_match(name) {
            report.error(
                name,
                "agent pool names must be 1-12 lowercase alphanumerics starting with a letter",
            );
        }
    }
}
