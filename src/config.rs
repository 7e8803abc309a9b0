use std::path::PathBuf;

/// Backend used when `API_BASE` is unset (Flask's default bind).
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";

/// Folder media is saved into when `DOWNLOAD_FOLDER` is unset.
pub const DEFAULT_DOWNLOAD_FOLDER: &str = "./downloads";

/// Runtime settings for the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base address of the download backend, without trailing slash
    pub api_base: String,
    /// Initial destination folder for saved media
    pub download_folder: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            download_folder: PathBuf::from(DEFAULT_DOWNLOAD_FOLDER),
        }
    }
}

impl ClientConfig {
    /// Reads `API_BASE` and `DOWNLOAD_FOLDER`, after loading `.env` if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            api_base: non_blank("API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            download_folder: non_blank("DOWNLOAD_FOLDER")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOWNLOAD_FOLDER)),
        }
    }
}
