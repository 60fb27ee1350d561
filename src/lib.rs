//! Starfall portfolio core crate.
//!
//! Drives the decorative layer of a static portfolio page from WASM: a
//! self-renewing falling star field, staggered reveal animations for the
//! skills and certificates sections, and the mobile navigation menu with
//! smooth scrolling. The page calls `start_portfolio()` once the module is
//! loaded; the remaining exports are manual triggers and debug hooks.

use wasm_bindgen::prelude::*;

pub mod config;
mod dom;
pub mod error;
pub mod nav;
pub mod page;
pub mod random;
pub mod reveal;
pub mod stars;

pub use config::Config;
pub use error::PageError;
pub use page::ScrollTracker;
pub use reveal::RevealGroup;

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    #[cfg(target_arch = "wasm32")]
    let _ = console_log::init_with_level(log_level());
}

/// Console verbosity: debug builds show star rebuilds and reveal starts.
pub fn log_level() -> log::Level {
    if cfg!(debug_assertions) {
        log::Level::Debug
    } else {
        log::Level::Info
    }
}

// -----------------------------------------------------------------------------
// Entry points
// -----------------------------------------------------------------------------

/// Start with the stock configuration.
#[wasm_bindgen]
pub fn start_portfolio() -> std::result::Result<(), JsValue> {
    page::start(Config::default())?;
    Ok(())
}

/// Start with a JSON config; omitted fields keep their defaults.
#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_portfolio_with_config(json: &str) -> std::result::Result<(), JsValue> {
    page::start(Config::from_json(json)?)?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Manual triggers / debug hooks
// -----------------------------------------------------------------------------

#[wasm_bindgen(js_name = createStars)]
pub fn create_stars() -> std::result::Result<(), JsValue> {
    stars::create_stars()?;
    Ok(())
}

#[wasm_bindgen(js_name = animateSkills)]
pub fn animate_skills() -> std::result::Result<(), JsValue> {
    reveal::animate_group(RevealGroup::Skills)?;
    Ok(())
}

#[wasm_bindgen(js_name = animateCertificates)]
pub fn animate_certificates() -> std::result::Result<(), JsValue> {
    reveal::animate_group(RevealGroup::Certificates)?;
    Ok(())
}

#[wasm_bindgen(js_name = animateAll)]
pub fn animate_all() -> std::result::Result<(), JsValue> {
    reveal::animate_all()?;
    Ok(())
}

#[wasm_bindgen(js_name = scrollToSection)]
pub fn scroll_to_section(id: &str) -> std::result::Result<bool, JsValue> {
    Ok(nav::scroll_to_section(id)?)
}

#[wasm_bindgen(js_name = checkStars)]
pub fn check_stars() -> std::result::Result<usize, JsValue> {
    Ok(stars::check_stars()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_level_follows_build_profile() {
        let expected = if cfg!(debug_assertions) { log::Level::Debug } else { log::Level::Info };
        assert_eq!(log_level(), expected);
    }
}
