//! Background version check.
//!
//! [`UpdateChecker::check_update`] records the running version and spawns a
//! single detached task that asks the check endpoint for the latest release,
//! announcements and warnings. Every failure (bad request, transport error,
//! non-200 status, undecodable body, timeout, cancellation) is logged at
//! `warn` and the shared [`UpdateState`] is left unready. Only a fully
//! decoded payload is published.

use super::flags::extract_flags;
use super::identity::{FALLBACK_IDENTIFIER, identify};
use super::response::UpdateResponse;
use super::state::UpdateState;
use crate::config::UpdateConfig;
use crate::error::{Result, UpdateError};
use reqwest::StatusCode;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Anonymised host identifier, see [`identify`].
pub const HEADER_IDENTIFIER: &str = "x-trivy-identifier";
/// Space-joined flag names of the current invocation.
pub const HEADER_COMMAND: &str = "x-trivy-command";
/// Operating system name.
pub const HEADER_OS: &str = "x-trivy-os";
/// CPU architecture name.
pub const HEADER_ARCH: &str = "x-trivy-arch";

/// What one check reports about the running invocation.
///
/// Built on the caller's thread so that reading the host identifier never
/// blocks an async worker and raw argument values never reach the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckRequest {
    /// Running version, sent as `User-Agent: trivy/<version>`.
    pub version: String,
    /// Flag names only, see [`extract_flags`].
    pub flags: Vec<String>,
    /// Anonymised host identifier; `None` when telemetry is disabled.
    pub identifier: Option<String>,
}

impl CheckRequest {
    /// Gather flags and, when `telemetry` is on, the host identifier.
    pub fn new<I, S>(version: &str, args: I, telemetry: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            version: version.to_owned(),
            flags: extract_flags(args),
            identifier: telemetry.then(identify),
        }
    }
}

/// Issues the version check request and publishes its result.
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    config: UpdateConfig,
    /// `None` when the HTTP client could not be built (e.g. no TLS backend).
    client: Option<reqwest::Client>,
}

impl UpdateChecker {
    /// Create a checker with the given configuration.
    ///
    /// Never panics: a client that fails to build is reported when a check
    /// is attempted.
    pub fn new(config: UpdateConfig) -> Self {
        let client = match reqwest::Client::builder().timeout(config.timeout()).build() {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "cannot build HTTP client for version check");
                None
            }
        };
        Self { config, client }
    }

    /// Create a checker against the default endpoint (or `TRIVY_UPDATE_ENDPOINT`).
    pub fn with_defaults() -> Self {
        Self::new(UpdateConfig::from_env())
    }

    /// Start a best-effort check for a newer release.
    ///
    /// `version` is recorded into `state` before this returns. The request
    /// itself runs on a detached tokio task; the returned handle may be
    /// dropped. Returns `None` when no task was started: the check is
    /// disabled, no tokio runtime is available, or a version was already
    /// recorded in `state` by an earlier call (the first call wins).
    ///
    /// Only the flag names from `args` are sent, never their values.
    pub fn check_update<I, S>(
        &self,
        state: Arc<UpdateState>,
        cancel: CancellationToken,
        version: &str,
        args: I,
    ) -> Option<JoinHandle<()>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !state.record_current_version(version) {
            debug!(version, "version check already started, ignoring repeated call");
            return None;
        }

        if self.config.skip_version_check {
            debug!("version check disabled, skipping");
            return None;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                warn!(error = %e, "no async runtime available, skipping version check");
                return None;
            }
        };

        let request = CheckRequest::new(version, args, !self.config.disable_telemetry);
        let checker = self.clone();

        Some(runtime.spawn(async move {
            debug!(endpoint = %checker.config.endpoint, "requesting latest version details");
            match checker.fetch(&request, &cancel).await {
                Ok(response) => {
                    debug!(
                        latest = %response.version.latest_version,
                        "version details received, storing for later"
                    );
                    if state.publish(response) {
                        debug!("version details ready for printing");
                    } else {
                        warn!("version details already published, discarding new result");
                    }
                }
                Err(e) => warn!(error = %e, "version check failed"),
            }
        }))
    }

    /// Perform one request and decode its body.
    ///
    /// Aborts with [`UpdateError::Cancelled`] as soon as `cancel` fires,
    /// whether the request is still connecting or the body is streaming.
    ///
    /// # Errors
    ///
    /// Returns an error for any of the failure modes listed on [`UpdateError`].
    pub async fn fetch(
        &self,
        request: &CheckRequest,
        cancel: &CancellationToken,
    ) -> Result<UpdateResponse> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| UpdateError::Request("HTTP client unavailable".to_owned()))?;
        let http_request = self.build_request(client, request)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(UpdateError::Cancelled),
            result = self.execute(client, http_request) => result,
        }
    }

    fn build_request(
        &self,
        client: &reqwest::Client,
        request: &CheckRequest,
    ) -> Result<reqwest::Request> {
        let mut builder = client
            .get(&self.config.endpoint)
            .timeout(self.config.timeout())
            .header(
                reqwest::header::USER_AGENT,
                format!("trivy/{}", request.version),
            );

        if !self.config.disable_telemetry {
            let identifier = request
                .identifier
                .as_deref()
                .unwrap_or(FALLBACK_IDENTIFIER);
            builder = builder
                .header(HEADER_IDENTIFIER, identifier)
                .header(HEADER_COMMAND, request.flags.join(" "))
                .header(HEADER_OS, os_name())
                .header(HEADER_ARCH, arch_name());
        }

        builder
            .build()
            .map_err(|e| UpdateError::Request(e.to_string()))
    }

    async fn execute(
        &self,
        client: &reqwest::Client,
        request: reqwest::Request,
    ) -> Result<UpdateResponse> {
        let resp = client
            .execute(request)
            .await
            .map_err(|e| self.classify(e))?;

        if resp.status() != StatusCode::OK {
            return Err(UpdateError::Status(resp.status().as_u16()));
        }

        let body = resp.bytes().await.map_err(|e| self.classify(e))?;
        serde_json::from_slice(&body).map_err(|e| UpdateError::Decode(e.to_string()))
    }

    fn classify(&self, e: reqwest::Error) -> UpdateError {
        if e.is_timeout() {
            UpdateError::Timeout(self.config.timeout_secs)
        } else {
            e.into()
        }
    }
}

/// Operating system name in the vocabulary release tooling uses.
pub fn os_name() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    }
}

/// CPU architecture name in the vocabulary release tooling uses.
pub fn arch_name() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "x86" => "386",
        "aarch64" => "arm64",
        "powerpc64" => "ppc64",
        other => other,
    }
}
