#[cfg(target_arch = "wasm32")]
mod browser;
mod logging;
mod settings;
