//! Background release check and notice printing for the trivy CLI.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//! use trivy_update::update::{UpdateChecker, UpdateState, notify_updates};
//!
//! # async fn example() -> std::io::Result<()> {
//! let state = Arc::new(UpdateState::new());
//! let checker = UpdateChecker::with_defaults();
//! let args: Vec<String> = std::env::args().skip(1).collect();
//! checker.check_update(Arc::clone(&state), CancellationToken::new(), "0.50.0", &args);
//!
//! // ... the tool's real work ...
//!
//! notify_updates(&state, &mut std::io::stderr())?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod update;

pub use config::UpdateConfig;
pub use error::{Result, UpdateError};
pub use update::{UpdateChecker, UpdateState};
