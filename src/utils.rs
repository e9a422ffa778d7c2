// Utility functions

/// Minimal HTML/attribute escaping for the generated payment and voucher
/// pages.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
