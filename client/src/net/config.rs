//! API configuration for the browser build.
//!
//! Build-time values come from `option_env!`; a static deployment can
//! override them at runtime through `window.PORTAL_CONFIG` without a rebuild.
//! Configuration values are public; never store secrets here.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use portal::ApiConfig;

/// Overrides read from `window.PORTAL_CONFIG`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub api_base_url: Option<String>,
    pub api_prefix: Option<String>,
    pub request_timeout_secs: Option<String>,
}

/// Resolve the effective config from build-time values and runtime overrides.
pub fn load() -> ApiConfig {
    let runtime = runtime_config().unwrap_or_default();
    resolve(
        [
            option_env!("PORTAL_API_BASE_URL"),
            option_env!("PORTAL_API_PREFIX"),
            option_env!("PORTAL_REQUEST_TIMEOUT_SECS"),
        ],
        &runtime,
    )
}

/// Runtime values win over build-time values; blank values are ignored.
pub fn resolve(build: [Option<&str>; 3], runtime: &RuntimeConfig) -> ApiConfig {
    let [base_url, api_prefix, timeout] = build;
    ApiConfig::from_values(
        runtime.api_base_url.as_deref().or(base_url),
        runtime.api_prefix.as_deref().or(api_prefix),
        runtime.request_timeout_secs.as_deref().or(timeout),
    )
}

pub(crate) fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

#[cfg(feature = "csr")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("PORTAL_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);
    let read = |key: &str| {
        let value = Reflect::get(&object, &JsValue::from_str(key)).ok()?;
        let text = value.as_string().or_else(|| value.as_f64().map(|n| n.to_string()))?;
        normalize_runtime_value(&text)
    };

    Some(RuntimeConfig {
        api_base_url: read("api_base_url"),
        api_prefix: read("api_prefix"),
        request_timeout_secs: read("request_timeout_secs"),
    })
}

#[cfg(not(feature = "csr"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}
