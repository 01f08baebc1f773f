pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{parse_request, BodyError, ParsedRequest};
pub use service::{AppService, SharedFactory};
