// src/app/ui/windows/mod.rs
// Declares the modules for individual UI windows (About, Settings, Delete confirmation).

pub mod about_window;
pub mod delete_confirmation_window;
pub mod settings_window;
