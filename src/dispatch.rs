use std::sync::Arc;

use tokio::{
    runtime::Handle,
    sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
};
use tracing::debug;

use crate::{
    api::BackendClient,
    controller::{Controller, Ticket},
    error::ClientResult,
    model::VideoInfo,
    sink::MediaSink,
};

/// Result of a remote call, tagged with the ticket it was started under.
pub enum Outcome {
    Info {
        ticket: Ticket,
        result: ClientResult<VideoInfo>,
    },
    /// `sink` is fixed when the download starts, not when the body arrives.
    Media {
        ticket: Ticket,
        result: ClientResult<Vec<u8>>,
        sink: Box<dyn MediaSink + Send>,
    },
}

/// Runs the two backend calls on the tokio runtime and feeds their results
/// back to whoever owns the [`Controller`].
pub struct Dispatcher {
    client: Arc<BackendClient>,
    handle: Handle,
    tx: UnboundedSender<Outcome>,
    rx: UnboundedReceiver<Outcome>,
    /// Called after each outcome is queued (the UI uses it to request a repaint)
    wake: Arc<dyn Fn() + Send + Sync>,
}

impl Dispatcher {
    pub fn new(client: BackendClient, handle: Handle) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            client: Arc::new(client),
            handle,
            tx,
            rx,
            wake: Arc::new(|| {}),
        }
    }

    pub fn with_wake(mut self, wake: impl Fn() + Send + Sync + 'static) -> Self {
        self.wake = Arc::new(wake);
        self
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    /// Starts a metadata request. Returns `false` when the controller refused
    /// (empty URL), in which case nothing was sent.
    pub fn fetch_info(&self, controller: &mut Controller) -> bool {
        let pending = match controller.begin_fetch_info() {
            Ok(p) => p,
            Err(err) => {
                debug!(error = %err, "fetch info not started");
                return false;
            }
        };

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let wake = Arc::clone(&self.wake);
        self.handle.spawn(async move {
            let result = client.fetch_info(&pending.url).await;
            let _ = tx.send(Outcome::Info { ticket: pending.ticket, result });
            wake();
        });
        true
    }

    /// Starts a download request whose body will be handed to `sink`.
    /// Returns `false` when the controller refused.
    pub fn download(&self, controller: &mut Controller, sink: impl MediaSink + Send + 'static) -> bool {
        let pending = match controller.begin_download() {
            Ok(p) => p,
            Err(err) => {
                debug!(error = %err, "download not started");
                return false;
            }
        };

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let wake = Arc::clone(&self.wake);
        let sink: Box<dyn MediaSink + Send> = Box::new(sink);
        self.handle.spawn(async move {
            let result = client.download(&pending.request).await;
            let _ = tx.send(Outcome::Media { ticket: pending.ticket, result, sink });
            wake();
        });
        true
    }

    /// Applies every outcome that has already arrived without blocking.
    pub fn poll(&mut self, controller: &mut Controller) -> usize {
        let mut applied = 0;
        while let Ok(outcome) = self.rx.try_recv() {
            apply(controller, outcome);
            applied += 1;
        }
        applied
    }

    /// Waits for the next outcome and applies it.
    #[cfg(test)]
    pub async fn settle_one(&mut self, controller: &mut Controller) {
        if let Some(outcome) = self.rx.recv().await {
            apply(controller, outcome);
        }
    }
}

fn apply(controller: &mut Controller, outcome: Outcome) {
    match outcome {
        Outcome::Info { ticket, result } => {
            controller.apply_info(ticket, result);
        }
        Outcome::Media { ticket, result, sink } => {
            controller.apply_download(ticket, result, sink.as_ref());
        }
    }
}
