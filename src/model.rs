use std::{fmt, path::PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

/// Extraction mode requested from the backend
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadMode {
    /// Best MP4 the backend can find, no resolution cap
    Quick,
    /// Best video at or below the selected height
    #[default]
    Resolution,
    /// Audio track only
    Audio,
}

impl DownloadMode {
    pub const ALL: [DownloadMode; 3] = [Self::Resolution, Self::Quick, Self::Audio];

    /// Label shown in the mode selector
    pub fn label(self) -> &'static str {
        match self {
            Self::Quick => "Quick (best MP4)",
            Self::Resolution => "Choose resolution",
            Self::Audio => "Audio Only",
        }
    }

    /// Whether the resolution selector applies to this mode
    pub fn uses_height(self) -> bool {
        matches!(self, Self::Resolution)
    }
}

/// What the user has asked for so far; edited by the UI, read when a request starts
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestIntent {
    /// Raw contents of the URL field
    pub url: String,
    /// Selected extraction mode
    pub mode: DownloadMode,
    /// Selected resolution identifier, e.g. "720"
    pub height: Option<String>,
}

/// Metadata resolved by the backend for one URL
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoInfo {
    /// Human-readable title
    pub title: String,
    /// Available resolution identifiers, in backend order
    pub resolutions: Vec<String>,
}

/// One entry of the resolution selector
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolutionOption {
    /// Identifier sent back to the backend
    pub value: String,
    /// Text shown to the user
    pub label: String,
}

impl ResolutionOption {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let label = format!("{value}p");
        Self { value, label }
    }
}

/// Where the session currently stands; drives the status line
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Status {
    /// Nothing requested yet
    #[default]
    Idle,
    /// Metadata request in flight
    FetchingInfo,
    /// Metadata arrived
    InfoReady { title: String },
    /// Metadata request failed
    InfoFailed(String),
    /// Download request in flight
    Downloading,
    /// Media saved to disk
    DownloadComplete(PathBuf),
    /// Download request or save failed
    DownloadFailed(String),
}

impl Status {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::FetchingInfo | Self::Downloading)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => Ok(()),
            Self::FetchingInfo => f.write_str("Fetching video info..."),
            Self::InfoReady { title } => write!(f, "Title: {title}"),
            Self::InfoFailed(msg) | Self::DownloadFailed(msg) => write!(f, "Error: {msg}"),
            Self::Downloading => f.write_str("Downloading..."),
            Self::DownloadComplete(_) => f.write_str("✅ Download complete!"),
        }
    }
}

/// Body of `POST /info`
#[derive(Debug, Serialize)]
pub struct InfoRequest {
    pub url: String,
}

/// Body returned by `/info`; either the metadata or an `error` string
#[derive(Debug, Deserialize)]
pub struct InfoResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "resolution_list")]
    pub resolutions: Option<Vec<String>>,
}

/// Body of `POST /download`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DownloadRequest {
    pub url: String,
    pub mode: DownloadMode,
    pub height: Option<String>,
}

/// The backend reports heights as integers; older deployments send strings.
fn resolution_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Height {
        Number(u64),
        Text(String),
    }

    let raw: Option<Vec<Height>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|items| {
        items
            .into_iter()
            .map(|h| match h {
                Height::Number(n) => n.to_string(),
                Height::Text(s) => s,
            })
            .collect()
    }))
}
