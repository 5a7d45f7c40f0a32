//! Listing and aggregate records returned by the store

use std::fmt::Display;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{de, Deserialize, Deserializer, Serialize};

use callscore_core::Scorecard;

/// Filters for the call listing (all optional, combined with AND)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallFilter {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub member_id: Option<String>,
    /// Minimum AI total score (inclusive)
    pub min_score: Option<i64>,
    /// First day included (`YYYY-MM-DD`)
    #[serde(default, deserialize_with = "blank_as_none")]
    pub start_date: Option<NaiveDate>,
    /// Last day included, whole day (`YYYY-MM-DD`)
    #[serde(default, deserialize_with = "blank_as_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub call_center_rep_id: Option<String>,
    /// Attach the AI scorecard to each entry
    #[serde(default)]
    pub include_scorecard: bool,
}

/// `?field=` (empty or whitespace) means the filter is not set
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// One row of the call listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallSummary {
    pub call_id: String,
    pub member_id: Option<String>,
    pub call_date: Option<NaiveDateTime>,
    pub total_score: Option<i64>,
    pub call_center_rep_id: Option<String>,
    pub has_human_override: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scorecard: Option<Scorecard>,
}

/// Aggregate scores for one call-center representative
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct RepStats {
    pub call_center_rep_id: String,
    pub total_calls: i64,
    pub avg_score: Option<f64>,
    pub min_score: Option<i64>,
    pub max_score: Option<i64>,
}

impl CallFilter {
    /// In-process version of the SQL WHERE clause
    pub fn matches(&self, call: &callscore_core::CallRecord) -> bool {
        if let Some(member) = &self.member_id {
            if call.member_id.as_ref() != Some(member) {
                return false;
            }
        }
        if let Some(min) = self.min_score {
            if call.total_score.map_or(true, |score| score < min) {
                return false;
            }
        }
        if let Some(start) = self.start_date {
            if call.call_date.map_or(true, |d| d.date() < start) {
                return false;
            }
        }
        if let Some(end) = self.end_date {
            if call.call_date.map_or(true, |d| d.date() > end) {
                return false;
            }
        }
        if let Some(rep) = &self.call_center_rep_id {
            if call.call_center_rep_id.as_ref() != Some(rep) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::Query;
    use axum::http::Uri;
    use callscore_core::CallRecord;

    fn parse(uri: &'static str) -> Result<CallFilter, String> {
        Query::<CallFilter>::try_from_uri(&Uri::from_static(uri))
            .map(|Query(filter)| filter)
            .map_err(|e| e.body_text())
    }

    #[test]
    fn blank_params_are_unset() {
        let filter = parse(
            "/api/calls?member_id=&start_date=&end_date=%20&call_center_rep_id=",
        )
        .unwrap();

        assert_eq!(filter.member_id, None);
        assert_eq!(filter.start_date, None);
        assert_eq!(filter.end_date, None);
        assert_eq!(filter.call_center_rep_id, None);
    }

    #[test]
    fn set_params_are_parsed() {
        let filter = parse("/api/calls?member_id=m-1&start_date=2024-03-01&min_score=30").unwrap();

        assert_eq!(filter.member_id.as_deref(), Some("m-1"));
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(filter.min_score, Some(30));
        assert!(!filter.include_scorecard);
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(parse("/api/calls?start_date=03/01/2024").is_err());
    }

    fn call(date: &str, score: i64) -> CallRecord {
        CallRecord {
            member_id: Some("m-1".into()),
            call_date: NaiveDateTime::parse_from_str(date, "%Y-%m-%d %H:%M:%S").ok(),
            call_center_rep_id: Some("ccr-1".into()),
            ..CallRecord::new("c-1", Scorecard::new(), Some(score))
        }
    }

    #[test]
    fn end_date_includes_whole_day() {
        let filter = CallFilter {
            end_date: NaiveDate::from_ymd_opt(2024, 3, 1),
            ..Default::default()
        };
        assert!(filter.matches(&call("2024-03-01 23:59:59", 10)));
        assert!(!filter.matches(&call("2024-03-02 00:00:00", 10)));
    }

    #[test]
    fn min_score_is_inclusive() {
        let filter = CallFilter {
            min_score: Some(40),
            ..Default::default()
        };
        assert!(filter.matches(&call("2024-03-01 10:00:00", 40)));
        assert!(!filter.matches(&call("2024-03-01 10:00:00", 39)));
    }

    #[test]
    fn member_and_rep_must_match() {
        let filter = CallFilter {
            member_id: Some("m-2".into()),
            ..Default::default()
        };
        assert!(!filter.matches(&call("2024-03-01 10:00:00", 40)));

        let filter = CallFilter {
            call_center_rep_id: Some("ccr-1".into()),
            ..Default::default()
        };
        assert!(filter.matches(&call("2024-03-01 10:00:00", 40)));
    }
}
