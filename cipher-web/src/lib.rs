#![forbid(unsafe_code)]
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

pub mod bridge;
pub mod controller;
pub mod dom;
pub mod game;
pub mod i18n;
pub mod theme;

pub use bridge::CipherApp;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // Apply the saved language before the first render
    crate::i18n::set_language(crate::i18n::current_language());
}
