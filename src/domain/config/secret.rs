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

use std::fmt;

const REDACTED: &str = "[secret]";

/// A configuration value that must never reach logs or rendered output.
///
/// Values read from `secure:` stack entries stay as the engine's ciphertext;
/// plain strings from unencrypted stacks are kept as-is. Either way `Debug`
/// and `Display` only print a placeholder.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    value: String,
    encrypted: bool,
}

impl Secret {
    pub fn plaintext(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            encrypted: false,
        }
    }

    pub fn ciphertext(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            encrypted: true,
        }
    }

    pub fn is_encrypted(&self) -> bool {
        self.encrypted
    }

    /// Raw value. Callers must not log or render it.
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secret")
            .field("value", &REDACTED)
            .field("encrypted", &self.encrypted)
            .finish()
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_and_display_are_redacted() {
        let secret = Secret::plaintext("hunter2");
        assert!(!format!("{:?}", secret).contains("hunter2"));
        assert!(!format!("{}", secret).contains("hunter2"));
        assert_eq!(secret.expose(), "hunter2");
    }

    #[test]
    fn test_ciphertext_flag() {
        assert!(Secret::ciphertext("v1:abc").is_encrypted());
        assert!(!Secret::plaintext("abc").is_encrypted());
    }
}
