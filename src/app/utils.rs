// src/app/utils.rs
// Contains utility functions and constants for ModelDeck, such as image loading.

use egui::{ColorImage, Context, ImageData, TextureHandle, TextureOptions};
use image;
use log::error;
use std::sync::Arc;

// --- Constants ---
pub const LOGO_BYTES: &[u8] = include_bytes!("../../assets/ModelDeck.png");

// --- Utility Functions ---

pub fn load_image_from_bytes(
    ctx: &Context,
    name: &str,
    bytes: &'static [u8],
) -> Option<TextureHandle> {
    match image::load_from_memory(bytes) {
        Ok(image) => {
            let size = [image.width() as _, image.height() as _];
            let image_buffer = image.to_rgba8();
            let pixels_u8 = image_buffer.into_raw();

            let pixels_color32: Vec<egui::Color32> = pixels_u8
                .chunks_exact(4)
                .map(|rgba| egui::Color32::from_rgba_unmultiplied(rgba[0], rgba[1], rgba[2], rgba[3]))
                .collect();

            let color_image = ColorImage {
                size,
                pixels: pixels_color32,
            };

            let image_data = ImageData::Color(Arc::new(color_image));
            let texture_options = TextureOptions::LINEAR;

            Some(ctx.load_texture(name, image_data, texture_options))
        }
        Err(err) => {
            error!(
                "Failed to decode image '{}' from bytes using image crate: {:?}",
                name, err
            );
            None
        }
    }
}
