// src/app/ui/widgets.rs
// Contains drawing functions for reusable UI widgets, such as the log view content area.

use crate::app::ModelDeckApp;
use egui::{Align, Layout, RichText, ScrollArea, TextWrapMode, Ui};

// --- Widget Drawing Functions ---

// Draws the content area for the collapsible log view.
// This function is typically called within a CollapsingHeader.
pub fn draw_log_view_content(app: &mut ModelDeckApp, ui: &mut Ui) {
    ScrollArea::vertical()
        .stick_to_bottom(true)
        .auto_shrink([false, false])
        .show(ui, |ui| {
            // Ensure the label uses the full available width and doesn't center text
            ui.with_layout(Layout::top_down(Align::LEFT), |ui| {
                ui.add(
                    egui::Label::new(RichText::new(&app.logs_string_cache).monospace())
                        .wrap_mode(TextWrapMode::Extend),
                );
            });
        });
}
