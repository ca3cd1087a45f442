//! Stable, anonymised host identifier sent with the version check.
//!
//! The raw machine id never leaves the host: only a SHA-256 digest salted
//! with the application name is transmitted, so the value cannot be joined
//! against identifiers other software reports.

use sha2::{Digest, Sha256};

/// Returned when no machine id source is readable.
pub const FALLBACK_IDENTIFIER: &str = "default-id";

const APP_SALT: &str = "trivy";

const MACHINE_ID_PATHS: &[&str] = &["/etc/machine-id", "/var/lib/dbus/machine-id"];

/// Derive the identifier for this host.
///
/// Deterministic for a given host and never fails; when no source is
/// available the [`FALLBACK_IDENTIFIER`] is returned.
#[must_use]
pub fn identify() -> String {
    match machine_id() {
        Some(id) => protect(&id),
        None => FALLBACK_IDENTIFIER.to_owned(),
    }
}

/// Hash a raw machine id so it can be shared without revealing it.
fn protect(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(APP_SALT.as_bytes());
    hasher.update(b":");
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn machine_id() -> Option<String> {
    MACHINE_ID_PATHS
        .iter()
        .filter_map(|path| std::fs::read_to_string(path).ok())
        .chain(
            ["COMPUTERNAME", "HOSTNAME"]
                .iter()
                .filter_map(|var| std::env::var(var).ok()),
        )
        .map(|s| s.trim().to_owned())
        .find(|s| !s.is_empty())
}
