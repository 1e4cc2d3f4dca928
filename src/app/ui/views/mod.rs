// src/app/ui/views/mod.rs
// Declares the view modules within the UI.

/// Contains the UI drawing function for the Models page.
pub mod models_page;
