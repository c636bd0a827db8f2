//! User-visible notices

/// Shows a blocking notice to the user
pub trait Notifier {
    fn alert(&self, message: &str);
}

/// `window.alert`
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserAlert;

impl Notifier for BrowserAlert {
    fn alert(&self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
}
