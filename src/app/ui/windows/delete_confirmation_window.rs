// src/app/ui/windows/delete_confirmation_window.rs
// Contains the drawing function for the model deletion confirmation window.

use crate::app::ModelDeckApp;
use egui::{Align2, Color32, Context, Layout, RichText, Window};

// --- Window Drawing Function ---

// Draws the modal confirmation dialog for deleting an uploaded model.
//
// Returns Some(true) if the user confirmed deletion, Some(false) if the user
// cancelled (or closed the window), and None when no deletion is pending.
pub fn draw_delete_confirmation_window(app: &mut ModelDeckApp, ctx: &Context) -> Option<bool> {
    let mut result: Option<bool> = None;

    if let Some((_, model_name)) = &app.model_to_delete {
        let mut open = true;
        let model_name_display = model_name.clone();

        Window::new("Confirm Deletion")
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!(
                    "Are you sure you want to permanently delete the model '{}'?",
                    model_name_display
                ));
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    ui.with_layout(Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.add_space(10.0);
                        if ui
                            .button(RichText::new("Delete").color(Color32::RED))
                            .clicked()
                        {
                            result = Some(true);
                        }
                        ui.add_space(10.0);
                        if ui.button("Cancel").clicked() {
                            result = Some(false);
                        }
                    });
                });
            });

        // Closing via 'X' counts as cancel unless a button decided first
        if !open && result.is_none() {
            result = Some(false);
        }
    }
    result
}
