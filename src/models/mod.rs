use serde::{Deserialize, Deserializer, Serialize};

/// Background color of a note.
///
/// Persisted as the hex string the host has always stored, so older collections keep
/// loading. Anything outside the palette falls back to white.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(from = "String", into = "String")]
pub(crate) enum NoteColor {
    #[default]
    White,
    Green,
    Orange,
    Red,
}

impl NoteColor {
    pub const PALETTE: [NoteColor; 4] = [
        NoteColor::White,
        NoteColor::Green,
        NoteColor::Orange,
        NoteColor::Red,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            NoteColor::White => "#ffffff",
            NoteColor::Green => "#f6ffed",
            NoteColor::Orange => "#fff7e6",
            NoteColor::Red => "#fff1f0",
        }
    }

    pub fn from_hex(hex: &str) -> Self {
        let hex = hex.trim();
        Self::PALETTE
            .into_iter()
            .find(|c| c.hex().eq_ignore_ascii_case(hex))
            .unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        match self {
            NoteColor::White => "White",
            NoteColor::Green => "Green",
            NoteColor::Orange => "Orange",
            NoteColor::Red => "Red",
        }
    }
}

impl From<String> for NoteColor {
    fn from(value: String) -> Self {
        Self::from_hex(&value)
    }
}

impl From<NoteColor> for String {
    fn from(value: NoteColor) -> Self {
        value.hex().to_string()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Note {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub content: String,

    /// Unix epoch milliseconds. Older collections stored an ISO-8601 string here.
    #[serde(deserialize_with = "millis_or_iso")]
    pub last_modified: i64,

    #[serde(default)]
    pub is_starred: bool,

    #[serde(default)]
    pub color: NoteColor,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Timestamp {
    Millis(i64),
    // JS hosts hand numbers over as doubles.
    Fractional(f64),
    Iso(String),
}

/// Accepts epoch millis or an RFC 3339 string. An unreadable string becomes 0
/// rather than failing the whole collection.
fn millis_or_iso<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Ok(match Timestamp::deserialize(deserializer)? {
        Timestamp::Millis(ms) => ms,
        Timestamp::Fractional(ms) => ms as i64,
        Timestamp::Iso(raw) => parse_iso_millis(&raw).unwrap_or_else(|| {
            leptos::logging::warn!("note: unreadable lastModified {raw:?}");
            0
        }),
    })
}

pub(crate) fn parse_iso_millis(raw: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|t| t.timestamp_millis())
}

/// Sidebar list mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::AsRefStr)]
pub(crate) enum ViewMode {
    #[default]
    #[strum(serialize = "All")]
    All,
    #[strum(serialize = "Starred")]
    Starred,
}

impl ViewMode {
    pub fn admits(self, note: &Note) -> bool {
        match self {
            ViewMode::All => true,
            ViewMode::Starred => note.is_starred,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn offset_from(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub(crate) struct Size {
    pub width: f64,
    pub height: f64,
}

/// A free-floating sticky on the board page. Not part of the note collection.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct FloatingNote {
    pub id: String,
    #[serde(default)]
    pub content: String,
    pub position: Point,
    pub size: Size,
    #[serde(default)]
    pub color: NoteColor,
}
