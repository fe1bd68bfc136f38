use shared::WidgetConfig;
use web_sys::window;

/// Get the base HTTP URL (e.g., "http://localhost:5000" or "https://myapp.com")
pub fn get_base_url() -> String {
    let Some(window) = window() else {
        return String::new();
    };
    let location = window.location();

    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let host = location
        .host()
        .unwrap_or_else(|_| "localhost:5000".to_string());

    format!("{}//{}", protocol, host)
}

/// Widget configuration for the page the app is served from
pub fn widget_config() -> WidgetConfig {
    WidgetConfig::default().with_base_url(get_base_url())
}
