//! Enumeration types shared between the data layer and the API.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The kind of analytics event recorded against a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum AnalyticsEventType {
    /// A post was created.
    PostCreated,
    /// A post was viewed through the view endpoint.
    PostViewed,
}

impl AnalyticsEventType {
    /// The string stored in the `analytics.event_type` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PostCreated => "post_created",
            Self::PostViewed => "post_viewed",
        }
    }

    /// Parse the column value back into a variant.
    ///
    /// Returns `None` for strings written by something other than this
    /// service.
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "post_created" => Some(Self::PostCreated),
            "post_viewed" => Some(Self::PostViewed),
            _ => None,
        }
    }
}

impl core::fmt::Display for AnalyticsEventType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_strings_round_trip() {
        for kind in [AnalyticsEventType::PostCreated, AnalyticsEventType::PostViewed] {
            assert_eq!(AnalyticsEventType::from_db(kind.as_str()), Some(kind));
        }
        assert_eq!(AnalyticsEventType::from_db("post_deleted"), None);
    }

    #[test]
    fn serde_uses_db_spelling() {
        let json = serde_json::to_string(&AnalyticsEventType::PostViewed).unwrap_or_default();
        assert_eq!(json, "\"post_viewed\"");
    }
}
