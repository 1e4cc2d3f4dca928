// src/app/ui/windows/about_window.rs
// Contains the drawing function for the About window.

use crate::app::{
    config::{APP_NAME, APP_VERSION},
    ModelDeckApp,
};
use egui::{Align2, Context, Image, Window};

// --- Window Drawing Function ---

// Draws the "About" window.
pub fn draw_about_window(app: &mut ModelDeckApp, ctx: &Context) {
    let mut about_window_open = app.show_about_window;
    let mut close_button_clicked = false;

    Window::new("About ModelDeck")
        .open(&mut about_window_open)
        .collapsible(false)
        .resizable(false)
        .default_size(egui::vec2(350.0, 380.0))
        .anchor(Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);

                // Display Logo
                if let Some(texture) = &app.logo_texture {
                    ui.add(
                        Image::new(texture)
                            .max_size(egui::vec2(128.0, 128.0))
                            .maintain_aspect_ratio(true),
                    );
                } else {
                    ui.label("[Logo Load Failed]");
                    ui.add_space(128.0);
                }
                ui.add_space(10.0);

                // App Name and Version
                ui.heading(APP_NAME);
                ui.label(format!("Version: {}", APP_VERSION));
                ui.add_space(15.0);

                ui.label("Management GUI for annotation models.");

                ui.add_space(30.0);

                if ui.button("Close").clicked() {
                    close_button_clicked = true;
                }
            });
            ui.add_space(10.0);
        });

    // --- Post-Window Logic ---
    if close_button_clicked {
        about_window_open = false;
    }
    app.show_about_window = about_window_open;
}
