// src/app/ui/views/models_page.rs
// Contains the UI drawing function for the Models page: top bar, built models
// list, uploaded models list, empty-state call-to-action and loading indicator.

use crate::app::{
    api::{Capabilities, Model, User},
    page,
    state::AppStatus,
    ModelDeckApp,
};
use egui::{Button, Grid, Layout, RichText, Ui};
use egui_extras::{Column, TableBuilder};
use log::info;

// --- View Drawing Functions ---

// Draws the Models page. The regions drawn are decided by the render plan
// computed in app::page; this function only translates the plan into widgets.
pub fn draw_models_page(app: &mut ModelDeckApp, ui: &mut Ui, current_status: &AppStatus) {
    let is_fetching = *current_status == AppStatus::FetchingModels;
    let is_busy = current_status.is_busy();

    let caps = *app.capabilities.lock().unwrap();
    let models = app.models.lock().unwrap().clone();
    let users = app.users.lock().unwrap().clone();

    let plan = page::plan_page(app.models_initialized, is_fetching, &caps, &models);

    // Top bar renders regardless of the rest of the page
    draw_top_bar(app, ui, &caps, current_status, is_busy);
    ui.separator();

    if plan.loading {
        ui.vertical_centered(|ui| {
            ui.add_space(40.0);
            ui.spinner();
            ui.label("Loading models...");
        });
        return;
    }

    // Disjoint subsets, recomputed from the full list every frame
    let (uploaded, integrated) = page::partition(&models);

    if plan.show_built {
        draw_built_models_list(ui, &integrated);
    }
    if plan.show_uploaded {
        draw_uploaded_models_list(app, ui, &uploaded, &users, is_busy);
    }
    if plan.show_empty_state {
        draw_empty_state(ui);
    }
}

// The always-visible page header, parameterized by the auto-annotation capability.
fn draw_top_bar(
    app: &ModelDeckApp,
    ui: &mut Ui,
    caps: &Capabilities,
    current_status: &AppStatus,
    is_busy: bool,
) {
    ui.heading("Models");
    ui.horizontal(|ui| {
        if caps.auto_annotation {
            ui.label("Models available for automatic annotation:");
        } else {
            ui.weak("The automatic annotation feature is not installed on this platform.");
        }
        ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
            if ui
                .add_enabled(!is_busy, Button::new("🔄 Refresh"))
                .clicked()
            {
                app.refresh_models();
            }
            if *current_status == AppStatus::FetchingModels {
                ui.spinner();
                ui.label("Fetching...");
            } else if let AppStatus::DeletingModel(name) = current_status {
                ui.spinner();
                ui.label(format!("Deleting {}...", name));
            } else if let AppStatus::Error(e) = current_status {
                ui.colored_label(ui.visuals().error_fg_color, "!")
                    .on_hover_text(format!("Error: {}. Check logs.", e));
            } else {
                ui.weak(app.status_text.lock().unwrap().clone());
            }
        });
    });
}

// Grid of platform-integrated models. Only drawn when at least one exists.
fn draw_built_models_list(ui: &mut Ui, integrated: &[&Model]) {
    ui.add_space(8.0);
    ui.strong("Integrated models");
    ui.separator();
    Grid::new("built_models_grid")
        .num_columns(2)
        .spacing([40.0, 4.0])
        .striped(true)
        .show(ui, |ui| {
            ui.label(RichText::new("Name").strong());
            ui.label(RichText::new("Framework").strong());
            ui.end_row();
            for model in integrated {
                ui.label(&model.name);
                ui.label(model.framework.as_deref().unwrap_or("-"));
                ui.end_row();
            }
        });
}

// Table of user-uploaded models with owner resolution and per-row delete.
fn draw_uploaded_models_list(
    app: &mut ModelDeckApp,
    ui: &mut Ui,
    uploaded: &[&Model],
    users: &[User],
    is_busy: bool,
) {
    ui.add_space(8.0);
    ui.strong("Uploaded models");
    ui.separator();

    let row_height = ui.text_style_height(&egui::TextStyle::Body);
    let delete_button_width = 60.0;

    TableBuilder::new(ui)
        .id_salt("uploaded_models_table")
        .column(Column::initial(180.0).resizable(true))
        .column(Column::initial(120.0).resizable(true))
        .column(Column::initial(120.0).resizable(true))
        .column(Column::initial(150.0).resizable(true))
        .column(Column::exact(delete_button_width))
        .striped(true)
        .header(20.0, |mut header| {
            for title in ["Name", "Framework", "Owner", "Uploaded"] {
                header.col(|ui| {
                    ui.label(RichText::new(title).strong());
                });
            }
            header.col(|ui| {
                ui.label("");
            });
        })
        .body(|body| {
            body.rows(row_height, uploaded.len(), |mut row| {
                let model = uploaded[row.index()];
                row.col(|ui| {
                    ui.label(&model.name);
                });
                row.col(|ui| {
                    ui.label(model.framework.as_deref().unwrap_or("-"));
                });
                row.col(|ui| {
                    ui.label(owner_name(model, users));
                });
                row.col(|ui| {
                    ui.label(model.uploaded_local.as_deref().unwrap_or("N/A"));
                });
                row.col(|ui| {
                    if ui
                        .add_enabled(!is_busy, Button::new("🗑").small())
                        .on_hover_text("Delete Model")
                        .clicked()
                    {
                        // Uploaded models always carry an id; partition guarantees it.
                        if let Some(id) = model.id {
                            app.model_to_delete = Some((id, model.name.clone()));
                            info!(
                                "User initiated delete for model '{}'. Showing confirmation.",
                                model.name
                            );
                        }
                    }
                });
            });
        });
}

// Call-to-action shown when auto-annotation is installed but no model has
// been uploaded and no competing TF capability is present.
fn draw_empty_state(ui: &mut Ui) {
    ui.add_space(40.0);
    ui.vertical_centered(|ui| {
        ui.label(RichText::new("No models uploaded yet.").heading());
        ui.add_space(8.0);
        ui.label("To annotate your tasks automatically, upload a model to the annotation server.");
    });
}

fn owner_name(model: &Model, users: &[User]) -> String {
    model
        .owner
        .and_then(|id| users.iter().find(|u| u.id == id))
        .map(|u| u.username.clone())
        .unwrap_or_else(|| "-".to_string())
}
