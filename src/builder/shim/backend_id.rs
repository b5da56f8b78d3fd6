//! Backend identifiers.

use serde::{Deserialize, Serialize};

/// Unique identifier for a build backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendId {
    /// Direct builds with the host's `rpmbuild`
    Rpmbuild,
    /// Isolated chroot builds with `mock`
    Mock,
}

impl BackendId {
    /// All known backends.
    pub const ALL: [BackendId; 2] = [BackendId::Rpmbuild, BackendId::Mock];

    /// Get the backend name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendId::Rpmbuild => "rpmbuild",
            BackendId::Mock => "mock",
        }
    }

    /// The external program this backend drives.
    pub fn tool(&self) -> &'static str {
        self.as_str()
    }

    /// Package providing the tool on Fedora-family hosts.
    pub fn install_hint(&self) -> &'static str {
        match self {
            BackendId::Rpmbuild => "dnf install rpm-build",
            BackendId::Mock => "dnf install mock && usermod -a -G mock $USER",
        }
    }
}

impl std::fmt::Display for BackendId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for BackendId {
    type Err = BackendIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rpmbuild" | "direct" => Ok(BackendId::Rpmbuild),
            "mock" | "isolated" => Ok(BackendId::Mock),
            _ => Err(BackendIdParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid backend ID.
#[derive(Debug, Clone)]
pub struct BackendIdParseError(pub String);

impl std::fmt::Display for BackendIdParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid backend ID '{}', valid values: rpmbuild, mock",
            self.0
        )
    }
}

impl std::error::Error for BackendIdParseError {}
