//! core::types
//!
//! Small value types shared across refinenb.
//!
//! - [`Fingerprint`] - Content hash of a notebook file for change detection
//!
//! # Examples
//!
//! ```
//! use refinenb::core::types::Fingerprint;
//!
//! let a = Fingerprint::of_bytes(b"{\"cells\": []}");
//! let b = Fingerprint::of_bytes(b"{\"cells\": []}");
//! assert_eq!(a, b);
//! assert_eq!(a.as_str().len(), 64);
//! ```

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// SHA-256 hex digest of a file's bytes.
///
/// Taken when a notebook is loaded and compared again right before an
/// in-place write, so a file edited by someone else mid-run is never
/// clobbered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Hash raw bytes.
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        Self(hex::encode(digest))
    }

    /// Get the fingerprint as a hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
