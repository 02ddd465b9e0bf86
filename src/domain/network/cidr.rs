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

use crate::shared::error::TopologyError;
use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 block in CIDR notation.
///
/// The address is kept as written, so `172.17.0.1/16` round-trips; range
/// math always works on the masked network address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4Cidr {
    addr: Ipv4Addr,
    prefix_len: u8,
}

impl Ipv4Cidr {
    pub fn new(addr: Ipv4Addr, prefix_len: u8) -> Result<Self, TopologyError> {
        if prefix_len > 32 {
            return Err(TopologyError::ValidationError(format!(
                "Invalid prefix length /{} (must be 0-32)",
                prefix_len
            )));
        }
        Ok(Self { addr, prefix_len })
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.addr
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    fn mask(&self) -> u32 {
        if self.prefix_len == 0 {
            0
        } else {
            u32::MAX << (32 - self.prefix_len)
        }
    }

    pub fn network(&self) -> Ipv4Addr {
        Ipv4Addr::from(u32::from(self.addr) & self.mask())
    }

    /// True when no host bits are set
    pub fn is_network_aligned(&self) -> bool {
        self.addr == self.network()
    }

    pub fn contains_addr(&self, ip: Ipv4Addr) -> bool {
        u32::from(ip) & self.mask() == u32::from(self.network())
    }

    /// True when `other` lies entirely within this block
    pub fn contains(&self, other: &Ipv4Cidr) -> bool {
        other.prefix_len >= self.prefix_len && self.contains_addr(other.network())
    }

    /// Contained and smaller
    pub fn strictly_contains(&self, other: &Ipv4Cidr) -> bool {
        other.prefix_len > self.prefix_len && self.contains(other)
    }

    pub fn overlaps(&self, other: &Ipv4Cidr) -> bool {
        self.contains(other) || other.contains(self)
    }
}

impl FromStr for Ipv4Cidr {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = s.trim().split_once('/').ok_or_else(|| {
            TopologyError::ValidationError(format!(
                "Invalid CIDR '{}': expected <address>/<prefix>",
                s
            ))
        })?;

        let addr = addr.parse::<Ipv4Addr>().map_err(|_| {
            TopologyError::ValidationError(format!("Invalid CIDR '{}': bad IPv4 address", s))
        })?;
        let prefix_len = prefix.parse::<u8>().map_err(|_| {
            TopologyError::ValidationError(format!("Invalid CIDR '{}': bad prefix length", s))
        })?;

        Self::new(addr, prefix_len)
    }
}

impl fmt::Display for Ipv4Cidr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix_len)
    }
}
