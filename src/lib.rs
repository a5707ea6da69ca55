pub mod backend;
pub mod chrome;
pub mod config;
pub mod deck;
pub mod dsp;
pub mod error;
pub mod gesture;
pub mod player;
pub mod web;

pub use config::PlayerConfig;
pub use deck::{Deck, DeckState, PlaybackState};
pub use error::{LoadError, VinylError};
pub use player::VinylPlayer;

use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Runs when the WASM module is instantiated: panics and `log` records
/// go to the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Fails only if a logger is already installed.
    let _ = console_log::init_with_level(log::Level::Debug);
}

/// WASM-exposed: return the vinyl_scratch version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

