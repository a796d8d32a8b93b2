// model.rs: Wire types for playlist items as served by the signage API.

use serde::{Deserialize, Serialize};

/// Screen orientation tag attached to slide content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Landscape,
    Portrait,
}

impl std::fmt::Display for Orientation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Orientation::Landscape => write!(f, "landscape"),
            Orientation::Portrait => write!(f, "portrait"),
        }
    }
}

/// Opaque slide payload handed to the renderer.
///
/// The engine only inspects the orientation tag; `body` is whatever the
/// slide editor produced and is passed through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideContent {
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub body: serde_json::Value,
}

/// Recurring availability window for a playlist item.
///
/// Times are zero-padded 24-hour "HH:MM" local-time strings with inclusive
/// bounds. Windows do not span midnight: a rule whose start sorts after its
/// end never matches within a single day. Known limitation, kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRule {
    pub start_time: String,
    pub end_time: String,
    /// Weekdays the rule applies to, 0 = Sunday .. 6 = Saturday.
    /// Empty means every day qualifies.
    #[serde(default)]
    pub days: Vec<u8>,
}

/// One scheduled entry of a playlist. Treated as an immutable snapshot for
/// the duration of a scheduling cycle; a new fetch replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    pub id: String,
    /// Identifier of the slide this item displays.
    pub content_ref: String,
    /// Sort rank; values need not be contiguous, only their order matters.
    pub order: i64,
    /// How long the item stays current once selected, in whole seconds.
    pub duration_seconds: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_rule: Option<ScheduleRule>,
    pub content: SlideContent,
}
