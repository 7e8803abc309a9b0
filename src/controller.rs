//! Session state for one window: what the user asked for, what the backend said,
//! and which actions are currently allowed.

use tracing::{debug, warn};

use crate::{
    error::{ClientError, ClientResult},
    model::{DownloadRequest, RequestIntent, ResolutionOption, Status, VideoInfo},
    sink::{MediaSink, DOWNLOAD_FILENAME},
};

/// Generation number handed out when a request starts.
pub type Ticket = u64;

/// An info request that passed validation and should now be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingInfo {
    pub ticket: Ticket,
    pub url: String,
}

/// A download request that passed the readiness gate and should now be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDownload {
    pub ticket: Ticket,
    pub request: DownloadRequest,
}

#[derive(Debug, Default)]
pub struct Controller {
    /// Edited directly by the UI widgets
    pub intent: RequestIntent,
    status: Status,
    info: Option<VideoInfo>,
    options: Vec<ResolutionOption>,
    download_enabled: bool,
    alert: Option<String>,
    info_ticket: Ticket,
    download_ticket: Ticket,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn info(&self) -> Option<&VideoInfo> {
        self.info.as_ref()
    }

    pub fn options(&self) -> &[ResolutionOption] {
        &self.options
    }

    pub fn download_enabled(&self) -> bool {
        self.download_enabled
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Label of the currently selected resolution, if any.
    pub fn selected_label(&self) -> Option<&str> {
        let height = self.intent.height.as_deref()?;
        self.options
            .iter()
            .find(|o| o.value == height)
            .map(|o| o.label.as_str())
    }

    /// Validates the URL and moves to `FetchingInfo`.
    ///
    /// An empty URL raises the alert and leaves everything else untouched.
    pub fn begin_fetch_info(&mut self) -> ClientResult<PendingInfo> {
        let url = self.checked_url()?;
        self.info_ticket += 1;
        self.status = Status::FetchingInfo;
        Ok(PendingInfo { ticket: self.info_ticket, url })
    }

    /// Applies the outcome of an info request. Returns `false` if a newer
    /// request has been started since and the outcome was dropped.
    pub fn apply_info(&mut self, ticket: Ticket, result: ClientResult<VideoInfo>) -> bool {
        if ticket != self.info_ticket {
            debug!(ticket, latest = self.info_ticket, "dropping stale info outcome");
            return false;
        }

        match result {
            Ok(info) => {
                self.options = info
                    .resolutions
                    .iter()
                    .map(|r| ResolutionOption::new(r.as_str()))
                    .collect();
                self.intent.height = self.options.first().map(|o| o.value.clone());
                self.status = Status::InfoReady { title: info.title.clone() };
                self.info = Some(info);
                self.download_enabled = true;
            }
            Err(err) => {
                warn!(error = %err, "video info failed");
                self.status = Status::InfoFailed(err.to_string());
                self.info = None;
                self.download_enabled = false;
            }
        }
        true
    }

    /// Moves to `Downloading` if info is ready and the URL is still present.
    pub fn begin_download(&mut self) -> ClientResult<PendingDownload> {
        if !self.download_enabled {
            warn!("download requested before video info was ready");
            return Err(ClientError::NotReady);
        }
        let url = self.checked_url()?;

        self.download_ticket += 1;
        self.status = Status::Downloading;
        Ok(PendingDownload {
            ticket: self.download_ticket,
            request: DownloadRequest {
                url,
                mode: self.intent.mode,
                height: self.intent.height.clone(),
            },
        })
    }

    /// Hands a successful body to `sink`, or records the failure.
    pub fn apply_download(
        &mut self,
        ticket: Ticket,
        result: ClientResult<Vec<u8>>,
        sink: &dyn MediaSink,
    ) -> bool {
        if ticket != self.download_ticket {
            debug!(ticket, latest = self.download_ticket, "dropping stale download outcome");
            return false;
        }

        let saved = result.and_then(|data| {
            sink.save(&data, DOWNLOAD_FILENAME).map_err(ClientError::from)
        });
        self.status = match saved {
            Ok(path) => Status::DownloadComplete(path),
            Err(err) => {
                warn!(error = %err, "download failed");
                Status::DownloadFailed(err.to_string())
            }
        };
        true
    }

    fn checked_url(&mut self) -> ClientResult<String> {
        let url = self.intent.url.trim();
        if url.is_empty() {
            let err = ClientError::EmptyUrl;
            self.alert = Some(err.to_string());
            return Err(err);
        }
        Ok(url.to_string())
    }
}
