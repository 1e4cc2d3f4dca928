// src/app/ui/mod.rs
// Declares the submodules within the UI part of the ModelDeck application.

/// Contains functions for drawing the main content panels (views) of the application.
pub mod views;

/// Contains functions for drawing separate windows (like Settings, About, Confirmation dialogs).
pub mod windows;

/// Contains functions for drawing reusable UI components (widgets), like the log view.
pub mod widgets;
