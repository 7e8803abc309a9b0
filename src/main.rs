//! Desktop client for a remote video-download backend

// HTTP calls to /info and /download
mod api;
// Environment-driven settings
mod config;
// Session state machine
mod controller;
// Spawns backend calls and routes their results back to the UI
mod dispatch;
// Error taxonomy shown in the status line
mod error;
// Data models for requests, responses and status
mod model;
// Where downloaded bytes end up
mod sink;

use api::BackendClient;
use config::ClientConfig;
use controller::Controller;
use dispatch::Dispatcher;
use model::DownloadMode;
use sink::DirectorySink;

// eframe/egui for GUI application framework
use eframe::{egui, App, Frame};
use egui::Visuals;
// OnceCell for single-time runtime initialization
use once_cell::sync::OnceCell;
// FileDialog for folder selection dialogs
use rfd::FileDialog;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// Global Tokio runtime stored in a OnceCell for lazy init
static RUNTIME: OnceCell<Arc<Runtime>> = OnceCell::new();

/// Program entry point: initializes logging and runtime, then launches GUI
fn main() -> Result<(), eframe::Error> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hyper=warn,reqwest=warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();

    let config = ClientConfig::from_env();
    info!(api_base = %config.api_base, folder = %config.download_folder.display(), "starting client");

    let handle = match RUNTIME.get_or_try_init(|| Runtime::new().map(Arc::new)) {
        Ok(rt) => rt.handle().clone(),
        Err(e) => {
            error!("failed to start tokio runtime: {}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Video Downloader",
        options,
        Box::new(move |cc| {
            cc.egui_ctx.set_visuals(Visuals::dark());

            let ctx = cc.egui_ctx.clone();
            let dispatcher = Dispatcher::new(BackendClient::new(config.api_base.clone()), handle)
                .with_wake(move || ctx.request_repaint());
            Box::new(DownloaderApp::new(&config, dispatcher))
        }),
    )
}

/// Application state for the GUI
struct DownloaderApp {
    /// Session: intent, status, resolution options
    controller: Controller,
    /// Issues backend calls and collects their outcomes
    dispatcher: Dispatcher,
    /// Destination folder, as typed or picked
    download_folder: String,
}

impl DownloaderApp {
    fn new(config: &ClientConfig, dispatcher: Dispatcher) -> Self {
        Self {
            controller: Controller::new(),
            dispatcher,
            download_folder: config.download_folder.display().to_string(),
        }
    }

    /// Sink for the folder as it reads right now; captured per download
    fn sink(&self) -> DirectorySink {
        DirectorySink::new(self.download_folder.trim())
    }

    /// Blocking notice for input problems, like a browser alert
    fn show_alert(&mut self, ctx: &egui::Context) {
        let Some(msg) = self.controller.alert().map(str::to_owned) else {
            return;
        };
        egui::Window::new("Notice")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(msg);
                if ui.button("OK").clicked() {
                    self.controller.dismiss_alert();
                }
            });
    }
}

/// GUI update loop: called each frame to redraw and handle interactions
impl App for DownloaderApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        // Apply any backend results that arrived since the last frame
        self.dispatcher.poll(&mut self.controller);

        self.show_alert(ctx);
        let blocked = self.controller.alert().is_some();

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.set_enabled(!blocked);
            ui.heading("Video Downloader");
            ui.small(format!("Backend: {}", self.dispatcher.client().base()));

            // URL input field
            ui.label("Paste YouTube video URL:");
            ui.horizontal(|ui| {
                ui.text_edit_singleline(&mut self.controller.intent.url);
                if ui.button("Fetch Info").clicked() {
                    self.dispatcher.fetch_info(&mut self.controller);
                }
            });

            // Mode selector
            ui.label("Download mode:");
            egui::ComboBox::from_id_source("mode")
                .selected_text(self.controller.intent.mode.label())
                .show_ui(ui, |ui| {
                    for mode in DownloadMode::ALL {
                        ui.selectable_value(&mut self.controller.intent.mode, mode, mode.label());
                    }
                });

            // Resolution dropdown, only meaningful when capping by height
            if self.controller.intent.mode.uses_height() {
                ui.label("Select Video Quality:");
                let selected = self.controller.selected_label().unwrap_or("-").to_owned();
                let options = self.controller.options().to_vec();
                egui::ComboBox::from_id_source("resolution")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        for opt in options {
                            ui.selectable_value(
                                &mut self.controller.intent.height,
                                Some(opt.value.clone()),
                                opt.label,
                            );
                        }
                    });
            }

            // Folder selection
            ui.horizontal(|ui| {
                ui.label("Download folder:");
                ui.text_edit_singleline(&mut self.download_folder);
                if ui.button("Browse…").clicked() {
                    if let Some(folder) = FileDialog::new().set_directory(&self.download_folder).pick_folder() {
                        self.download_folder = folder.display().to_string();
                    }
                }
            });

            // Download button, enabled once info is ready
            let enabled = self.controller.download_enabled();
            if ui.add_enabled(enabled, egui::Button::new("Download")).clicked() {
                let sink = self.sink();
                self.dispatcher.download(&mut self.controller, sink);
            }

            ui.separator();
            if let Some(info) = self.controller.info() {
                ui.small(format!("Loaded: {} ({} resolutions)", info.title, info.resolutions.len()));
            }
            ui.horizontal(|ui| {
                if self.controller.status().is_busy() {
                    ui.spinner();
                }
                ui.label(self.controller.status().to_string());
            });
            if let model::Status::DownloadComplete(path) = self.controller.status() {
                ui.small(format!("Saved to {}", path.display()));
            }
        });
    }
}
