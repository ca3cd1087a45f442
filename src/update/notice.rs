//! Turn a published check result into user-facing notices.

use super::state::UpdateState;
use chrono::{DateTime, Utc};
use std::io::{self, Write};
use tracing::debug;

const HEADER: &str = "\n 📣 \x1b[34mNotices:\x1b[0m\n";

/// Assemble notices as of `now`.
///
/// Order: server warnings, then announcements whose window strictly
/// contains `now`, then a new-version message when the running version
/// differs from the latest one. Returns an empty list while `state` is
/// unready.
pub fn compose_notices(state: &UpdateState, now: DateTime<Utc>) -> Vec<String> {
    let Some(latest) = state.latest() else {
        return Vec::new();
    };

    let mut notices = latest.warnings.clone();
    notices.extend(
        latest
            .announcements
            .iter()
            .filter(|a| a.is_active_at(now))
            .map(|a| a.text.clone()),
    );

    // Plain string comparison; "v1.0.0" and "1.0.0" count as different.
    let current = state.current_version().unwrap_or_default();
    if current != latest.version.latest_version {
        notices.push(format!(
            "Version {} of Trivy is now available, current version is {current}",
            latest.version.latest_version
        ));
    }

    notices
}

/// Write any pending notices to `output`, typically stderr.
///
/// Never blocks on the background check: if it has not published yet the
/// call is a no-op.
///
/// # Errors
///
/// Propagates write errors from `output`.
pub fn notify_updates<W: Write>(state: &UpdateState, output: &mut W) -> io::Result<()> {
    notify_updates_at(state, output, Utc::now())
}

/// [`notify_updates`] evaluated at a fixed instant.
///
/// # Errors
///
/// Propagates write errors from `output`.
pub fn notify_updates_at<W: Write>(
    state: &UpdateState,
    output: &mut W,
    now: DateTime<Utc>,
) -> io::Result<()> {
    if !state.is_ready() {
        debug!("update check failed or did not finish in time, no notices to show");
        return Ok(());
    }

    let notices = compose_notices(state, now);
    if notices.is_empty() {
        return Ok(());
    }

    output.write_all(HEADER.as_bytes())?;
    for notice in &notices {
        writeln!(output, "  - {notice}")?;
    }
    writeln!(output)?;
    output.flush()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::update::response::{Announcement, UpdateResponse, VersionInfo};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn ready_state(current: &str, latest: &str) -> UpdateState {
        let t = now();
        let state = UpdateState::new();
        state.record_current_version(current);
        state.publish(UpdateResponse {
            version: VersionInfo {
                latest_version: latest.to_owned(),
                latest_date: Some(t - Duration::days(3)),
            },
            announcements: vec![
                Announcement {
                    from_date: t - Duration::hours(1),
                    to_date: t + Duration::hours(1),
                    text: "A".into(),
                },
                Announcement {
                    from_date: t + Duration::hours(1),
                    to_date: t + Duration::hours(2),
                    text: "B".into(),
                },
            ],
            warnings: vec!["w1".into(), "w2".into()],
        });
        state
    }

    #[test]
    fn same_version_shows_warnings_and_active_announcements() {
        let state = ready_state("1.0.0", "1.0.0");
        assert_eq!(compose_notices(&state, now()), vec!["w1", "w2", "A"]);
    }

    #[test]
    fn different_version_appends_upgrade_message() {
        let state = ready_state("1.0.0", "1.1.0");
        let notices = compose_notices(&state, now());
        assert_eq!(notices.len(), 4);
        assert_eq!(&notices[..3], ["w1", "w2", "A"]);
        assert_eq!(
            notices[3],
            "Version 1.1.0 of Trivy is now available, current version is 1.0.0"
        );
    }

    #[test]
    fn version_comparison_is_literal() {
        let state = ready_state("v1.0.0", "1.0.0");
        let notices = compose_notices(&state, now());
        assert!(notices.last().unwrap().contains("current version is v1.0.0"));
    }

    #[test]
    fn announcement_on_boundary_is_excluded() {
        let t = now();
        let state = UpdateState::new();
        state.record_current_version("1.0.0");
        state.publish(UpdateResponse {
            version: VersionInfo {
                latest_version: "1.0.0".into(),
                latest_date: Some(t),
            },
            announcements: vec![
                Announcement {
                    from_date: t,
                    to_date: t + Duration::hours(1),
                    text: "starts now".into(),
                },
                Announcement {
                    from_date: t - Duration::hours(1),
                    to_date: t,
                    text: "ends now".into(),
                },
            ],
            warnings: Vec::new(),
        });
        assert!(compose_notices(&state, t).is_empty());
    }

    #[test]
    fn unready_state_writes_nothing() {
        let state = UpdateState::new();
        state.record_current_version("1.0.0");
        let mut out = Vec::new();
        notify_updates_at(&state, &mut out, now()).unwrap();
        assert!(out.is_empty());
        assert!(compose_notices(&state, now()).is_empty());
    }

    #[test]
    fn nothing_to_say_writes_nothing() {
        let state = UpdateState::new();
        state.record_current_version("1.0.0");
        state.publish(UpdateResponse {
            version: VersionInfo {
                latest_version: "1.0.0".into(),
                latest_date: Some(now()),
            },
            announcements: Vec::new(),
            warnings: Vec::new(),
        });
        let mut out = Vec::new();
        notify_updates_at(&state, &mut out, now()).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn output_format() {
        let state = ready_state("1.0.0", "1.1.0");
        let mut out = Vec::new();
        notify_updates_at(&state, &mut out, now()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "\n 📣 \x1b[34mNotices:\x1b[0m\n  - w1\n  - w2\n  - A\n  - Version 1.1.0 of Trivy is now available, current version is 1.0.0\n\n"
        );
    }

    #[test]
    fn write_errors_propagate() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let state = ready_state("1.0.0", "1.1.0");
        assert!(notify_updates_at(&state, &mut Broken, now()).is_err());
    }
}
