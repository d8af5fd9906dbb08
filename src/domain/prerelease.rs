//! Pre-release channel handling
//!
//! A channel is the named track (alpha, beta, rc or any custom name) appended as
//! the first pre-release identifier of a version, e.g. `beta` in `2.0.0-beta.3`.

use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// Validated pre-release channel name
///
/// Only ASCII letters, digits and hyphens are allowed, so the channel is always
/// a single semantic-version identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreReleaseChannel(String);

impl PreReleaseChannel {
    /// Parse a channel name
    ///
    /// # Returns
    /// * `Ok(PreReleaseChannel)` - Validated channel
    /// * `Err` - If the string is empty or contains invalid characters
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PreReleaseChannel {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(ReleaseError::version("Empty pre-release channel"));
        }

        if s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            Ok(PreReleaseChannel(s.to_string()))
        } else {
            Err(ReleaseError::version(format!(
                "Invalid pre-release channel: \"{}\".",
                s
            )))
        }
    }
}

impl fmt::Display for PreReleaseChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
