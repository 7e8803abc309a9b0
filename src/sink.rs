use std::{
    fs,
    io::{self, Write},
    path::PathBuf,
};

use tracing::info;

/// Name given to every downloaded file; the backend decides the container.
pub const DOWNLOAD_FILENAME: &str = "video";

/// Takes ownership of downloaded bytes and persists them somewhere the user can reach.
pub trait MediaSink {
    /// Stores `data` under (a variant of) `suggested_name`, returning where it went.
    fn save(&self, data: &[u8], suggested_name: &str) -> io::Result<PathBuf>;
}

/// Writes media into a folder, never overwriting an earlier download.
#[derive(Clone, Debug)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// `video`, then `video (1)`, `video (2)`, ...
    fn free_path(&self, name: &str) -> PathBuf {
        let mut candidate = self.dir.join(name);
        let mut n = 1u64;
        while candidate.exists() {
            candidate = self.dir.join(format!("{name} ({n})"));
            n += 1;
        }
        candidate
    }
}

impl MediaSink for DirectorySink {
    fn save(&self, data: &[u8], suggested_name: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.free_path(suggested_name);
        let mut f = fs::File::create_new(&path)?;
        f.write_all(data)?;
        f.flush()?;
        info!(path = %path.display(), bytes = data.len(), "media saved");
        Ok(path)
    }
}
