//! Payload returned by the version check endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Newest known release.
///
/// Missing fields decode to empty values so a sparse server reply still
/// yields the warnings and announcements that came with it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VersionInfo {
    /// Version string of the latest release, compared verbatim.
    pub latest_version: String,
    /// Publication time of the latest release.
    pub latest_date: Option<DateTime<Utc>>,
}

/// Message shown only while the current time lies strictly inside
/// `(from_date, to_date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub from_date: DateTime<Utc>,
    pub to_date: DateTime<Utc>,
    #[serde(rename = "announcement")]
    pub text: String,
}

impl Announcement {
    /// Whether `now` falls inside the open display window.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.from_date < now && now < self.to_date
    }
}

/// Full decoded response body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateResponse {
    #[serde(rename = "trivy", default, deserialize_with = "null_as_default")]
    pub version: VersionInfo,
    /// Display order as sent by the server.
    #[serde(default, deserialize_with = "null_as_default")]
    pub announcements: Vec<Announcement>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub warnings: Vec<String>,
}

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use chrono::TimeZone;

    #[test]
    fn decodes_wire_format() {
        let body = r#"{
            "trivy": {"latest_version": "0.50.1", "latest_date": "2024-03-28T12:00:00Z"},
            "announcements": [
                {"from_date": "2024-03-01T00:00:00Z", "to_date": "2024-04-01T00:00:00Z", "announcement": "hello"}
            ],
            "warnings": ["upgrade your db"]
        }"#;
        let resp: UpdateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.version.latest_version, "0.50.1");
        assert_eq!(
            resp.version.latest_date,
            Some(Utc.with_ymd_and_hms(2024, 3, 28, 12, 0, 0).unwrap())
        );
        assert_eq!(resp.announcements.len(), 1);
        assert_eq!(resp.announcements[0].text, "hello");
        assert_eq!(resp.warnings, vec!["upgrade your db"]);
    }

    #[test]
    fn missing_lists_default_to_empty() {
        let body = r#"{"trivy": {"latest_version": "1.0.0", "latest_date": "2024-01-01T00:00:00+02:00"}}"#;
        let resp: UpdateResponse = serde_json::from_str(body).unwrap();
        assert!(resp.announcements.is_empty());
        assert!(resp.warnings.is_empty());
        assert_eq!(
            resp.version.latest_date,
            Some(Utc.with_ymd_and_hms(2023, 12, 31, 22, 0, 0).unwrap())
        );
    }

    #[test]
    fn null_lists_decode_as_empty() {
        let body = r#"{
            "trivy": {"latest_version": "0.52.0", "latest_date": "2024-05-01T00:00:00Z"},
            "announcements": null,
            "warnings": null
        }"#;
        let resp: UpdateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.version.latest_version, "0.52.0");
        assert!(resp.announcements.is_empty());
        assert!(resp.warnings.is_empty());
    }

    #[test]
    fn missing_latest_date_is_tolerated() {
        let body = r#"{"trivy": {"latest_version": "0.52.0"}, "warnings": ["w"]}"#;
        let resp: UpdateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.version.latest_version, "0.52.0");
        assert!(resp.version.latest_date.is_none());
        assert_eq!(resp.warnings, vec!["w"]);
    }

    #[test]
    fn missing_or_null_version_block_decodes_empty() {
        for body in [r#"{"warnings": ["w"]}"#, r#"{"trivy": null, "warnings": ["w"]}"#] {
            let resp: UpdateResponse = serde_json::from_str(body).unwrap();
            assert_eq!(resp.version, VersionInfo::default());
            assert_eq!(resp.warnings, vec!["w"]);
        }
    }

    #[test]
    fn wrong_shape_is_still_rejected() {
        let result = serde_json::from_str::<UpdateResponse>(r#"{"warnings": "nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn window_is_open_on_both_ends() {
        let from = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let a = Announcement {
            from_date: from,
            to_date: to,
            text: "x".into(),
        };
        assert!(!a.is_active_at(from));
        assert!(!a.is_active_at(to));
        assert!(a.is_active_at(from + chrono::Duration::seconds(1)));
        assert!(!a.is_active_at(to + chrono::Duration::seconds(1)));
    }
}
