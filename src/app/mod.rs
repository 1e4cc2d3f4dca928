// src/app/mod.rs
// Main application logic for ModelDeck. Defines the App struct, implements the
// eframe::App trait, and coordinates UI, state, configuration, and annotation
// server interactions.

// Declare sibling modules within the `app` module
pub mod api;
pub mod config;
pub mod page;
pub mod state;
pub mod ui;
pub mod utils;

use chrono_tz::Tz;
use confy;
use eframe::{
    egui::{
        self, CentralPanel, CollapsingHeader, Context, Separator, TopBottomPanel, ViewportCommand,
    },
    App, CreationContext,
};
use log::{error, info, warn};
use std::{
    path::PathBuf,
    str::FromStr,
    sync::{
        mpsc::{Receiver, Sender},
        Arc, Mutex,
    },
};
use tokio::runtime::Runtime;

use self::{
    api::{Capabilities, Model, User},
    config::{AppSettings, Config, APP_NAME, APP_VERSION},
    state::{AppStatus, UpdateMessage},
    ui::{views, widgets, windows},
    utils::{load_image_from_bytes, LOGO_BYTES},
};

// --- Main Application Struct ---

/// Holds the state and logic for the ModelDeck application.
pub struct ModelDeckApp {
    // --- UI State ---
    logs: Arc<Mutex<Vec<String>>>,
    logs_string_cache: String,
    logs_dirty: bool,
    logs_collapsed: bool,
    show_settings_window: bool,
    show_about_window: bool,
    /// Uploaded model (id, name) queued for deletion confirmation.
    model_to_delete: Option<(u64, String)>,
    copy_logs_requested: bool,

    // --- Application State & Data (the store the page reacts to) ---
    status_text: Arc<Mutex<String>>,
    status: Arc<Mutex<AppStatus>>,
    models: Arc<Mutex<Vec<Model>>>,
    users: Arc<Mutex<Vec<User>>>,
    capabilities: Arc<Mutex<Capabilities>>,
    /// Whether the model list has completed at least one load attempt.
    models_initialized: bool,

    // --- Configuration & Resources ---
    settings: AppSettings,
    config_path: Option<PathBuf>,
    logo_texture: Option<egui::TextureHandle>,

    // --- Temporary State for Windows ---
    pending_settings: Option<AppSettings>,

    // --- Communication & Async ---
    task_update_sender: Sender<UpdateMessage>,
    update_receiver: Receiver<UpdateMessage>,
    rt: Arc<Runtime>,
}

// --- Application Implementation ---

impl ModelDeckApp {
    /// Creates a new instance of ModelDeck.
    ///
    /// The persisted settings are loaded in main() before the logger is
    /// initialized (so the saved log level takes effect) and handed in here.
    pub fn new(
        cc: &CreationContext<'_>,
        settings: AppSettings,
        task_update_sender: Sender<UpdateMessage>,
        update_receiver: Receiver<UpdateMessage>,
    ) -> Self {
        info!("Running ModelDeckApp::new - v{}", APP_VERSION);

        let config_path = confy::get_configuration_file_path(APP_NAME, None).ok();
        if let Some(path) = &config_path {
            info!("Using config file: {}", path.display());
        } else {
            warn!("Could not determine config file path.");
        }
        info!("--- Loaded Persistent Settings ---");
        info!("MODELDECK_HOST: {}", settings.server_host);
        info!("LOG_LEVEL: {}", settings.log_level);
        info!("TZ: {}", settings.tz);
        info!("--------------------------------");

        // Create the Tokio runtime
        let rt = Arc::new(
            tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .expect("Failed to create Tokio runtime"),
        );

        // Load the logo image for the About window
        let logo_texture = load_image_from_bytes(&cc.egui_ctx, "logo", LOGO_BYTES);
        if logo_texture.is_none() {
            error!("Failed to load embedded logo image from '../assets/ModelDeck.png'.");
        } else {
            info!("Successfully loaded embedded logo image.");
        }

        // Perform initial connectivity check (warn only; fetching is driven by the load-gate)
        match std::net::TcpStream::connect(&settings.server_host) {
            Ok(_) => info!(
                "Successfully connected to MODELDECK_HOST '{}' on startup.",
                settings.server_host
            ),
            Err(e) => {
                let warn_msg = format!(
                    "WARN: Could not connect to MODELDECK_HOST '{}' on startup: {}. Check host/port and ensure the annotation server is running.",
                    settings.server_host, e
                );
                warn!("{}", warn_msg);
                let _ = task_update_sender.send(UpdateMessage::Log(warn_msg));
            }
        }

        Self {
            logs: Arc::new(Mutex::new(Vec::new())),
            logs_string_cache: String::new(),
            logs_dirty: true,
            logs_collapsed: true,
            show_settings_window: false,
            show_about_window: false,
            model_to_delete: None,
            copy_logs_requested: false,
            status_text: Arc::new(Mutex::new("Idle".to_string())),
            status: Arc::new(Mutex::new(AppStatus::Idle)),
            models: Arc::new(Mutex::new(Vec::new())),
            users: Arc::new(Mutex::new(Vec::new())),
            capabilities: Arc::new(Mutex::new(Capabilities::default())),
            models_initialized: false,
            settings,
            config_path,
            logo_texture,
            pending_settings: None,
            task_update_sender,
            update_receiver,
            rt,
        }
    }

    /// Rebuilds the cached log string if the logs are marked as dirty.
    fn rebuild_log_cache(&mut self) {
        if self.logs_dirty {
            let logs_vec = self.logs.lock().unwrap();
            self.logs_string_cache = logs_vec.join("\n");
            self.logs_dirty = false;
        }
    }

    /// Gets the current runtime configuration based on loaded settings.
    fn get_current_config(&self) -> Config {
        Config {
            server_host: self.settings.server_host.clone(),
            tz: Tz::from_str(&self.settings.tz).unwrap_or_else(|_| {
                warn!(
                    "Invalid TZ '{}' in settings during runtime config fetch, falling back to UTC.",
                    self.settings.tz
                );
                let _ = self.task_update_sender.send(UpdateMessage::Log(format!(
                    "WARN: Invalid TZ '{}', falling back to UTC.",
                    self.settings.tz
                )));
                Tz::UTC
            }),
        }
    }

    /// Saves the current `self.settings` to the persistent configuration file using confy.
    fn save_settings(&self) {
        match confy::store(APP_NAME, None, &self.settings) {
            Ok(_) => {
                info!("Settings saved successfully.");
                let _ = self
                    .task_update_sender
                    .send(UpdateMessage::Log("INFO: Settings saved.".to_string()));
            }
            Err(e) => {
                error!("Failed to save settings: {}", e);
                let _ = self.task_update_sender.send(UpdateMessage::Log(format!(
                    "ERROR: Failed to save settings: {}",
                    e
                )));
            }
        }
        info!("--- Updated Configuration Saved ---");
        info!("MODELDECK_HOST: {}", self.settings.server_host);
        info!("LOG_LEVEL: {}", self.settings.log_level);
        info!("TZ: {}", self.settings.tz);
        info!("--------------------------------");
    }

    /// Spawns an asynchronous task to fetch capabilities, users and the model
    /// list from the annotation server.
    ///
    /// Flips the status to `FetchingModels` before spawning, so the load-gate
    /// (and any further refresh clicks) cannot dispatch a second fetch while
    /// this one is in flight. Duplicate-request dedup lives here, not in the
    /// page core.
    fn refresh_models(&self) {
        let config = self.get_current_config();
        let sender = self.task_update_sender.clone();
        let rt_handle = self.rt.clone();
        let status_arc = self.status.clone();

        // Use try_lock to avoid blocking the UI if the lock is held
        if let Ok(mut current_status) = status_arc.try_lock() {
            if *current_status == AppStatus::FetchingModels {
                warn!("Model list refresh already in progress.");
                return;
            }
            if !current_status.can_begin_operation() {
                warn!(
                    "Cannot refresh model list while another operation ({:?}) is in progress.",
                    *current_status
                );
                let _ = sender.send(UpdateMessage::Log(format!(
                    "WARN: Cannot refresh model list during {:?}.",
                    *current_status
                )));
                return;
            }
            *current_status = AppStatus::FetchingModels;
        } else {
            warn!("Could not acquire status lock to start refresh.");
            return;
        }
        // Lock is released here

        let _ = sender.send(UpdateMessage::StatusText("Fetching models...".to_string()));
        info!("Refreshing model list...");

        rt_handle.spawn(async move {
            // Capabilities and users are auxiliary; failure to fetch them keeps
            // the previous values and only logs a warning.
            match api::capabilities_async(&config).await {
                Ok(caps) => {
                    let _ = sender.send(UpdateMessage::Capabilities(caps));
                }
                Err(e) => {
                    warn!("Failed to fetch capabilities: {}", e);
                    let _ = sender.send(UpdateMessage::Log(format!(
                        "WARN: Failed to fetch capabilities: {}",
                        e
                    )));
                }
            }
            match api::list_users_async(&config).await {
                Ok(users) => {
                    let _ = sender.send(UpdateMessage::Users(users));
                }
                Err(e) => {
                    warn!("Failed to fetch users: {}", e);
                    let _ = sender.send(UpdateMessage::Log(format!(
                        "WARN: Failed to fetch users: {}",
                        e
                    )));
                }
            }
            match api::list_models_async(&config, sender.clone()).await {
                Ok(models) => {
                    info!("Successfully listed {} models.", models.len());
                    let _ = sender.send(UpdateMessage::ModelList(models));
                    let _ = sender.send(UpdateMessage::StatusText(
                        "Model list updated.".to_string(),
                    ));
                    let _ = sender.send(UpdateMessage::Status(AppStatus::Idle));
                }
                Err(e) => {
                    error!("Failed to list models: {}", e);
                    let error_message = format!("Error listing models: {}", e);
                    let _ = sender.send(UpdateMessage::StatusText(error_message));
                    let _ = sender.send(UpdateMessage::Status(AppStatus::Error(e.to_string())));
                }
            }
        });
    }

    /// Spawns an asynchronous task to delete an uploaded model on the annotation server.
    fn trigger_delete_model(&self, model_id: u64, model_name: &str) {
        let config = self.get_current_config();
        let sender = self.task_update_sender.clone();
        let rt_handle = self.rt.clone();
        let status_arc = self.status.clone();
        let model_name_clone = model_name.to_string();

        if let Ok(mut current_status) = status_arc.try_lock() {
            if !current_status.can_begin_operation() {
                warn!(
                    "Cannot delete model while another operation ({:?}) is in progress.",
                    *current_status
                );
                let _ = sender.send(UpdateMessage::Log(format!(
                    "WARN: Cannot delete model during {:?}.",
                    *current_status
                )));
                return;
            }
            *current_status = AppStatus::DeletingModel(model_name_clone.clone());
        } else {
            warn!("Could not acquire status lock to start delete.");
            return;
        }
        // Lock is released

        let _ = sender.send(UpdateMessage::StatusText(format!(
            "Deleting model {}...",
            model_name_clone
        )));
        info!("Attempting to delete model {}...", model_name_clone);

        rt_handle.spawn(async move {
            match api::delete_model_async(model_id, &model_name_clone, &config, sender.clone())
                .await
            {
                Ok(_) => {
                    info!("Successfully deleted model '{}'.", model_name_clone);
                    let _ = sender.send(UpdateMessage::Log(format!(
                        "INFO: Successfully deleted model '{}'.",
                        model_name_clone
                    )));
                    let _ = sender.send(UpdateMessage::StatusText(
                        "Model deleted successfully.".to_string(),
                    ));
                    // Status Success triggers a list refresh in update()
                    let _ = sender.send(UpdateMessage::Status(AppStatus::Success));
                }
                Err(e) => {
                    error!("Failed to delete model '{}': {}", model_name_clone, e);
                    let _ = sender.send(UpdateMessage::Log(format!(
                        "ERROR: Failed to delete model '{}': {}",
                        model_name_clone, e
                    )));
                    let _ = sender.send(UpdateMessage::StatusText(format!(
                        "Error deleting model: {}",
                        e
                    )));
                    let _ = sender.send(UpdateMessage::Status(AppStatus::Error(e.to_string())));
                }
            }
        });
    }
}

// --- eframe::App Implementation ---

impl App for ModelDeckApp {
    /// Called once before shutdown.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Shutting down {}.", APP_NAME);
        self.save_settings();
    }

    /// Called on each frame to update the UI and handle events.
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut trigger_refresh_after_delete = false;
        let mut needs_repaint = false;

        // --- 1. Process MPSC Messages ---
        while let Ok(msg) = self.update_receiver.try_recv() {
            needs_repaint = true;
            match msg {
                UpdateMessage::Log(log_line) => {
                    let mut logs = self.logs.lock().unwrap();
                    logs.push(log_line);
                    self.logs_dirty = true;
                }
                UpdateMessage::StatusText(s) => *self.status_text.lock().unwrap() = s,
                UpdateMessage::Status(new_status) => {
                    let mut current_status_lock = self.status.lock().unwrap();
                    if state::delete_settled_ok(&current_status_lock, &new_status) {
                        trigger_refresh_after_delete = true;
                    }
                    // A fetch that failed still counts as one completed load
                    // attempt; further refreshes are manual. Without this the
                    // load-gate would re-fire every frame against a dead server.
                    if state::fetch_settled_err(&current_status_lock, &new_status) {
                        self.models_initialized = true;
                    }
                    *current_status_lock = new_status;
                }
                UpdateMessage::ModelList(models) => {
                    *self.models.lock().unwrap() = models;
                    self.models_initialized = true;
                }
                UpdateMessage::Users(users) => {
                    *self.users.lock().unwrap() = users;
                }
                UpdateMessage::Capabilities(caps) => {
                    *self.capabilities.lock().unwrap() = caps;
                }
            }
        }

        // --- 2. Load-gate: dispatch the initial fetch exactly once ---
        // The guarded dispatch in refresh_models() flips the status to
        // FetchingModels synchronously, so the gate cannot fire again on the
        // next frame while the load is in flight.
        {
            let fetching = *self.status.lock().unwrap() == AppStatus::FetchingModels;
            if page::needs_fetch(self.models_initialized, fetching) {
                info!("Models not initialized, dispatching initial fetch.");
                self.refresh_models();
                needs_repaint = true;
            }
        }

        // --- 3. Handle Triggered Refresh ---
        // The status text is left to the refresh path, which reports
        // "Fetching models..." and then the completion message in order.
        if trigger_refresh_after_delete {
            info!("Delete succeeded, triggering model list refresh.");
            self.refresh_models();
            needs_repaint = true;
        }

        // --- 4. Rebuild Log Cache ---
        self.rebuild_log_cache();

        // --- 5. Handle Other Actions ---
        let current_status = self.status.lock().unwrap().clone();
        let is_busy = current_status.is_busy();

        if self.copy_logs_requested {
            if !self.logs_string_cache.is_empty() {
                ctx.copy_text(self.logs_string_cache.clone());
                info!("Logs copied to clipboard.");
                let _ = self
                    .task_update_sender
                    .send(UpdateMessage::Log("INFO: Logs copied to clipboard.".to_string()));
            } else {
                warn!("Log buffer is empty, nothing to copy.");
                let _ = self.task_update_sender.send(UpdateMessage::Log(
                    "WARN: Log buffer is empty, nothing to copy.".to_string(),
                ));
            }
            self.copy_logs_requested = false;
            needs_repaint = true;
        }

        // --- 6. Draw UI Elements (Panels, then Modals) ---

        // Draw Top Panel (Menu)
        TopBottomPanel::top("top_panel").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Settings").clicked() {
                        self.show_settings_window = true;
                        needs_repaint = true;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(ViewportCommand::Close);
                    }
                });
                ui.menu_button("Help", |ui| {
                    if ui.button("Copy Logs").clicked() {
                        self.copy_logs_requested = true;
                        needs_repaint = true;
                        ui.close_menu();
                    }
                    ui.separator();
                    if ui.button("About").clicked() {
                        self.show_about_window = true;
                        needs_repaint = true;
                        info!("About button clicked - {} v{}", APP_NAME, APP_VERSION);
                        ui.close_menu();
                    }
                });
            });
            ui.add_space(4.0);
            ui.add(Separator::default().spacing(0.0));
        });

        // Draw Bottom Panel (Logs)
        TopBottomPanel::bottom("log_panel")
            .resizable(true)
            .show_separator_line(true)
            .show(ctx, |ui| {
                let header_response = CollapsingHeader::new("Logs")
                    .default_open(!self.logs_collapsed)
                    .show(ui, |ui| {
                        widgets::draw_log_view_content(self, ui);
                    });
                if header_response.header_response.clicked() {
                    self.logs_collapsed = header_response.body_returned.is_none();
                    needs_repaint = true;
                }
                header_response
                    .header_response
                    .on_hover_text("Click to expand/collapse logs");
            });

        // Draw Central Panel (the Models page)
        CentralPanel::default().show(ctx, |ui| {
            views::models_page::draw_models_page(self, ui, &current_status);
        });

        // Draw Modals / Separate Windows after the main panels
        if self.show_settings_window {
            if self.pending_settings.is_none() {
                info!("Settings window opened, cloning current settings to pending state.");
                self.pending_settings = Some(self.settings.clone());
            }
            windows::settings_window::draw_settings_window(self, ctx);
            if !self.show_settings_window {
                needs_repaint = true;
            }
        }
        if self.show_about_window {
            windows::about_window::draw_about_window(self, ctx);
            if !self.show_about_window {
                needs_repaint = true;
            }
        }

        // Handle Delete Confirmation Modal last
        let delete_confirmation_result =
            windows::delete_confirmation_window::draw_delete_confirmation_window(self, ctx);
        if delete_confirmation_result.is_some() {
            needs_repaint = true;
        }
        match delete_confirmation_result {
            Some(true) => {
                if let Some((model_id, model_name)) = self.model_to_delete.take() {
                    self.trigger_delete_model(model_id, &model_name);
                }
            }
            Some(false) => {
                if self.model_to_delete.is_some() {
                    info!("Model deletion cancelled by user.");
                    self.model_to_delete = None;
                }
            }
            None => {}
        }

        // --- 7. Final Repaint Request ---
        if needs_repaint || is_busy {
            ctx.request_repaint();
        }
    }
}
