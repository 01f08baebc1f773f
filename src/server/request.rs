use crate::ids::RequestId;
use crate::params::FormParams;
use may_minihttp::Request;
use std::collections::HashMap;
use std::io::Read;
use tracing::{debug, warn};

/// Bodies larger than this are not decoded.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Why a request body could not be turned into params.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyError {
    /// More than [`MAX_BODY_BYTES`] were sent.
    TooLarge,
    /// The body could not be read as UTF-8 text.
    Unreadable,
}

impl BodyError {
    pub fn status(self) -> u16 {
        match self {
            BodyError::TooLarge => 413,
            BodyError::Unreadable => 400,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            BodyError::TooLarge => "Payload Too Large",
            BodyError::Unreadable => "Bad Request",
        }
    }
}

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug, PartialEq)]
pub struct ParsedRequest {
    /// Taken from `x-request-id` when it holds a ULID, otherwise fresh
    pub request_id: RequestId,
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Parsed query string parameters
    pub query_params: FormParams,
    /// Parameters decoded from the request body
    pub body_params: FormParams,
    /// Set when the body was rejected; `body_params` is then empty and
    /// must not be handed to a controller.
    pub body_error: Option<BodyError>,
}

impl ParsedRequest {
    /// Query string and body parameters combined; body values win.
    pub fn params(&self) -> FormParams {
        let mut params = self.query_params.clone();
        params.merge(self.body_params.clone());
        params
    }
}

/// Parse query string parameters from a URL path
///
/// Everything after the first `?` is URL-decoded. A path without a query
/// string yields an empty bag.
pub fn parse_query_params(path: &str) -> FormParams {
    match path.split_once('?') {
        Some((_, query)) => FormParams::from_urlencoded(query),
        None => FormParams::new(),
    }
}

/// Decode a request body according to its content type.
///
/// - `application/x-www-form-urlencoded`, or no content type at all: form decoding
/// - `application/json`: a flat JSON object (see [`FormParams::from_json`])
/// - anything else: ignored
pub fn parse_body(content_type: Option<&str>, body: &str) -> FormParams {
    if body.is_empty() {
        return FormParams::new();
    }
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());

    match mime.as_deref() {
        None | Some("application/x-www-form-urlencoded") => FormParams::from_urlencoded(body),
        Some("application/json") => match serde_json::from_str(body) {
            Ok(json) => FormParams::from_json(&json),
            Err(e) => {
                debug!(error = %e, "JSON body parse failed");
                FormParams::new()
            }
        },
        Some(other) => {
            debug!(content_type = other, "Ignoring body with unsupported content type");
            FormParams::new()
        }
    }
}

/// Extract everything the service needs from a `may_minihttp::Request`.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();

    let request_id = RequestId::from_header_or_new(headers.get("x-request-id").map(String::as_str));
    let query_params = parse_query_params(&raw_path);

    let (body_params, body_error) = {
        let mut body = String::new();
        let mut reader = req.body().take(MAX_BODY_BYTES as u64 + 1);
        match reader.read_to_string(&mut body) {
            Ok(size) if size > MAX_BODY_BYTES => {
                warn!(%request_id, limit = MAX_BODY_BYTES, "Request body too large");
                (FormParams::new(), Some(BodyError::TooLarge))
            }
            Ok(_) => (
                parse_body(headers.get("content-type").map(String::as_str), &body),
                None,
            ),
            Err(e) => {
                warn!(%request_id, error = %e, "Request body unreadable");
                (FormParams::new(), Some(BodyError::Unreadable))
            }
        }
    };

    debug!(
        %request_id,
        method = %method,
        path = %path,
        header_count = headers.len(),
        query_param_count = query_params.len(),
        body_param_count = body_params.len(),
        body_error = ?body_error,
        "HTTP request parsed"
    );

    ParsedRequest {
        request_id,
        method,
        path,
        headers,
        query_params,
        body_params,
        body_error,
    }
}
