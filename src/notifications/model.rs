//! Notification records.
//!
//! The backend serialises ids as either JSON strings or numbers depending on
//! the source (database rows vs. synthesised push records), and may deliver
//! `metadata` as a JSON-encoded string. Everything here deserialises
//! leniently and normalises to one shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Badge counts above this render as "99+"
const BADGE_MAX: usize = 99;

// =============================================================================
// RecordId - string-or-number identifier
// =============================================================================

/// Identifier of a backend record, kept in string form.
///
/// `"42"` and `42` compare equal once deserialised, so dedup by id works no
/// matter which path delivered the record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for RecordId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Uint(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Self(s),
            Raw::Int(n) => Self(n.to_string()),
            Raw::Uint(n) => Self(n.to_string()),
        })
    }
}

// =============================================================================
// NotificationKind
// =============================================================================

/// Notification category. Unknown categories are preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationKind {
    Event,
    Review,
    #[default]
    General,
    Other(String),
}

impl NotificationKind {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationKind::Event => "event",
            NotificationKind::Review => "review",
            NotificationKind::General => "general",
            NotificationKind::Other(s) => s,
        }
    }
}

impl From<String> for NotificationKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "event" => NotificationKind::Event,
            "review" => NotificationKind::Review,
            "general" | "" => NotificationKind::General,
            _ => NotificationKind::Other(s),
        }
    }
}

impl From<NotificationKind> for String {
    fn from(kind: NotificationKind) -> Self {
        kind.as_str().to_string()
    }
}

// =============================================================================
// Metadata
// =============================================================================

/// Structured notification metadata. Keys the client does not interpret are
/// kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_id: Option<RecordId>,
    #[serde(
        default,
        deserialize_with = "lenient_rating",
        skip_serializing_if = "Option::is_none"
    )]
    pub rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Accepts an object, a JSON-encoded object string, or null. A string that
/// fails to decode is logged and dropped; the record itself is still kept.
fn lenient_metadata<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NotificationMetadata>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let decoded = match value {
        Value::Null => return Ok(None),
        Value::String(encoded) => serde_json::from_str::<NotificationMetadata>(&encoded),
        other => serde_json::from_value::<NotificationMetadata>(other),
    };
    match decoded {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) => {
            tracing::warn!("Error parsing notification metadata: {}", e);
            Ok(None)
        }
    }
}

/// Ratings arrive as integers, floats or numeric strings
fn lenient_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let rating = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(rating
        .filter(|r| r.is_finite() && *r >= 0.0)
        .map(|r| r.round().min(u8::MAX as f64) as u8))
}

/// JavaScript truthiness: null, `false`, `0`, `""` and NaN are false
pub(crate) fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

/// Integer or numeric string; anything else reads as 0
pub(crate) fn lenient_int<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    let n = match &value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.trunc() as i64)),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    };
    if n.is_none() && !value.is_null() {
        tracing::debug!("Non-numeric id {} read as 0", value);
    }
    Ok(n.unwrap_or(0))
}

/// Text that may be null
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Notification
// =============================================================================

/// A notification as held in the local feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: RecordId,
    #[serde(rename = "type", default)]
    pub kind: NotificationKind,
    #[serde(default, deserialize_with = "lenient_text")]
    pub message: String,
    #[serde(default)]
    pub related_id: Option<RecordId>,
    #[serde(default)]
    pub event_id: Option<RecordId>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_flag")]
    pub is_read: bool,
    #[serde(default, deserialize_with = "lenient_metadata")]
    pub metadata: Option<NotificationMetadata>,
}

/// Where clicking a notification leads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationTarget {
    /// Event detail page
    Event(RecordId),
    /// Feedback responses for an event
    Responses(RecordId),
}

impl Notification {
    /// Build the feed record for a `new-review` push event
    pub fn from_review(review: ReviewSubmitted, now: DateTime<Utc>) -> Self {
        let id = review
            .review_id
            .clone()
            .unwrap_or_else(|| RecordId(format!("review-{}", now.timestamp_millis())));
        let user = review.user_name.as_deref().unwrap_or("a user");
        let product = review.product_name.as_deref().unwrap_or("an event");

        Self {
            id,
            kind: NotificationKind::Review,
            message: format!("New review submitted by {user} for \"{product}\""),
            related_id: review.review_id.clone(),
            event_id: review.event_id.clone(),
            created_at: now,
            is_read: false,
            metadata: Some(NotificationMetadata {
                review_id: review.review_id,
                event_id: review.event_id,
                rating: review.rating,
                product_name: review.product_name,
                extra: Map::new(),
            }),
        }
    }

    /// Star rating for review notifications
    pub fn rating(&self) -> Option<u8> {
        if self.kind != NotificationKind::Review {
            return None;
        }
        self.metadata
            .as_ref()
            .and_then(|m| m.rating)
            .filter(|r| *r > 0)
    }

    /// Event name carried in review metadata
    pub fn product_name(&self) -> Option<&str> {
        self.metadata.as_ref()?.product_name.as_deref()
    }

    /// Navigation target for a click on this notification
    pub fn target(&self) -> Option<NotificationTarget> {
        match self.kind {
            NotificationKind::Event => self.related_id.clone().map(NotificationTarget::Event),
            NotificationKind::Review => self
                .metadata
                .as_ref()
                .and_then(|m| m.event_id.clone())
                .or_else(|| self.event_id.clone())
                .or_else(|| self.related_id.clone())
                .map(NotificationTarget::Responses),
            _ => None,
        }
    }
}

/// Payload of the `new-review` push event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSubmitted {
    #[serde(default)]
    pub review_id: Option<RecordId>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub product_name: Option<String>,
    #[serde(default)]
    pub event_id: Option<RecordId>,
    #[serde(default, deserialize_with = "lenient_rating")]
    pub rating: Option<u8>,
}

/// Text for the unread badge; `None` hides the badge
pub fn badge_label(unread: usize) -> Option<String> {
    match unread {
        0 => None,
        n if n > BADGE_MAX => Some(format!("{BADGE_MAX}+")),
        n => Some(n.to_string()),
    }
}
