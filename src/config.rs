//! Runtime Configuration
//!
//! Read from the `window.BOARD_CONFIG` object the hosting page defines.
//! Every field is optional.

use serde::Deserialize;
use wasm_bindgen::JsValue;

/// Name of the page global holding the configuration
pub const CONFIG_GLOBAL: &str = "BOARD_CONFIG";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// API root listing the collection endpoints
    pub api_root: String,
    /// Token login endpoint
    pub api_login: String,
    /// localStorage key of the API token
    pub token_key: String,
    /// Cookie carrying the CSRF token
    pub csrf_cookie: String,
    /// Homepage lists sprints that ended at most this many days ago
    pub recent_days: i64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_root: "/api/".to_string(),
            api_login: "/api/token/".to_string(),
            token_key: "apiToken".to_string(),
            csrf_cookie: "csrftoken".to_string(),
            recent_days: 7,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from the page, falling back to defaults
    pub fn from_window() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)).unwrap_or(JsValue::UNDEFINED);
        if value.is_undefined() || value.is_null() {
            return Self::default();
        }
        match serde_wasm_bindgen::from_value(value) {
            Ok(config) => config,
            Err(e) => {
                // Logger is not up yet
                web_sys::console::warn_1(&format!("[CONFIG] Ignoring invalid {}: {}", CONFIG_GLOBAL, e).into());
                Self::default()
            }
        }
    }

    pub fn log_level(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}
