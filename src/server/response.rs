use may_minihttp::Response;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

pub const HTML_CONTENT_TYPE: &str = "Content-Type: text/html; charset=utf-8";
pub const JSON_CONTENT_TYPE: &str = "Content-Type: application/json";

fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        302 => "Found",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        413 => "Payload Too Large",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// `Location: <location>` as a `'static` header line.
///
/// `may_minihttp` only takes `&'static str` headers. Redirect targets are
/// themselves `'static` and few, so each distinct line is built once and
/// kept for the life of the process.
pub fn location_header(location: &'static str) -> &'static str {
    static LINES: OnceLock<Mutex<HashMap<&'static str, &'static str>>> = OnceLock::new();
    let lines = LINES.get_or_init(|| Mutex::new(HashMap::new()));
    let mut lines = match lines.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    *lines.entry(location).or_insert_with(|| {
        let line: &'static str = Box::leak(format!("Location: {location}").into_boxed_str());
        line
    })
}

/// Write an HTML page. `head_only` keeps status and headers but drops the body.
pub fn write_html(res: &mut Response, status: u16, html: String, head_only: bool) {
    res.status_code(status as usize, status_reason(status));
    res.header(HTML_CONTENT_TYPE);
    if !head_only {
        res.body_vec(html.into_bytes());
    }
}

/// `302 Found` to `location`, with a minimal body for clients that do not follow.
pub fn write_redirect(res: &mut Response, location: &'static str) {
    res.status_code(302, status_reason(302));
    res.header(location_header(location));
    res.header(HTML_CONTENT_TYPE);
    res.body_vec(
        format!(r#"<html><body>You are being <a href="{location}">redirected</a>.</body></html>"#)
            .into_bytes(),
    );
}

/// Write a JSON document. `head_only` behaves as in [`write_html`].
pub fn write_json(res: &mut Response, status: u16, body: &Value, head_only: bool) {
    res.status_code(status as usize, status_reason(status));
    res.header(JSON_CONTENT_TYPE);
    if !head_only {
        res.body_vec(body.to_string().into_bytes());
    }
}

pub fn write_json_error(res: &mut Response, status: u16, message: &str) {
    write_json(res, status, &serde_json::json!({ "error": message }), false);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reason() {
        assert_eq!(status_reason(200), "OK");
        assert_eq!(status_reason(302), "Found");
        assert_eq!(status_reason(405), "Method Not Allowed");
        assert_eq!(status_reason(413), "Payload Too Large");
    }

    #[test]
    fn test_location_header_is_interned() {
        let a = location_header("/contact_us/thank_you");
        let b = location_header("/contact_us/thank_you");
        assert_eq!(a, "Location: /contact_us/thank_you");
        assert!(std::ptr::eq(a, b));
    }
}
