/// Snap Todo - Chrome side panel for job-application todos
/// Built with Rust + WASM + Yew

mod api;
mod attachment;
mod background;
mod config;
mod details;
mod fetch;
mod listing;
mod notice;
mod operations;
mod todo_data;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Re-export the title logic for JavaScript access
#[wasm_bindgen]
pub fn todo_title(text: &str) -> String {
    listing::display_title(&details::parse_structured_text(text), None)
}

// Start the Yew app for the side panel
#[wasm_bindgen]
pub fn start_side_panel() {
    yew::Renderer::<ui::panel::App>::new().render();
}

// Register the service-worker listeners that open the side panel
#[wasm_bindgen]
pub fn start_background() {
    background::register_listeners();
}
