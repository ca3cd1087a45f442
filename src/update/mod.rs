//! Best-effort version check and notices for the trivy CLI.
//!
//! At startup the host calls [`UpdateChecker::check_update`], which records
//! the running version and fires a detached request for the latest release
//! details. Near exit the host calls [`notify_updates`] to print warnings,
//! current announcements and an upgrade hint, if the check finished in time.
//! Nothing here can fail or delay the host's own work.

pub mod checker;
pub mod flags;
pub mod identity;
pub mod notice;
pub mod response;
pub mod state;

pub use checker::{CheckRequest, UpdateChecker};
pub use flags::extract_flags;
pub use identity::identify;
pub use notice::{compose_notices, notify_updates, notify_updates_at};
pub use response::{Announcement, UpdateResponse, VersionInfo};
pub use state::UpdateState;
