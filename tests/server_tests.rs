//! End-to-end tests over a real socket.
//!
//! Each test starts its own `AppService` on an ephemeral port with an
//! in-memory store it keeps a handle to, so persistence can be checked
//! directly.

mod common;

use common::http::{get, post, post_form, send_request, parse_response};
use common::test_server::TestServer;
use contact_us::model::NewContactUsRequest;
use contact_us::server::AppService;
use contact_us::store::StoredContactUsRequest;
use contact_us::views::Views;
use contact_us::{ContactUsRequestFactory, ContactUsStore, InMemoryStore};
use std::io;
use std::sync::Arc;

const VALID_FORM: &str = "contact_us_request%5Bname%5D=Jane&contact_us_request%5Bemail%5D=jane%40example.com&contact_us_request%5Bmessage%5D=Hello+there";

fn start_with_store(store: Arc<dyn ContactUsStore>) -> TestServer {
    let factory = ContactUsRequestFactory::new(store);
    TestServer::start(AppService::new(Arc::new(factory), Views::new().unwrap()))
}

fn start() -> (TestServer, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let server = start_with_store(store.clone());
    (server, store)
}

#[test]
fn test_get_form() {
    let (server, store) = start();
    let resp = get(&server.addr(), "/contact_us");
    assert_eq!(resp.status, 200);
    assert!(resp.header("content-type").unwrap().starts_with("text/html"));
    assert!(resp.body.contains(r#"<form action="/contact_us" method="post""#));
    assert!(!resp.body.contains("prevented your message"));
    assert!(store.all().unwrap().is_empty());
}

#[test]
fn test_valid_submission_redirects_and_persists() {
    let (server, store) = start();
    let resp = post_form(&server.addr(), "/contact_us", VALID_FORM);
    assert_eq!(resp.status, 302);
    assert_eq!(resp.header("location"), Some("/contact_us/thank_you"));

    let saved = store.all().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name, "Jane");
    assert_eq!(saved[0].email, "jane@example.com");
    assert_eq!(saved[0].message, "Hello there");
}

#[test]
fn test_empty_submission_rerenders_form_without_redirect() {
    let (server, store) = start();
    let resp = post_form(&server.addr(), "/contact_us", "");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("location"), None);
    assert!(resp.body.contains("3 errors prevented your message from being sent"));
    assert!(resp.body.contains("<li>Name can"));
    assert!(store.all().unwrap().is_empty());
}

#[test]
fn test_invalid_submission_keeps_entered_values() {
    let (server, store) = start();
    let resp = post_form(
        &server.addr(),
        "/contact_us",
        "name=Jane&email=jane-at-example&message=Hi",
    );
    assert_eq!(resp.status, 200);
    assert!(resp.body.contains("<li>Email is invalid</li>"));
    assert!(resp.body.contains(r#"value="Jane""#));
    assert!(resp.body.contains(r#"value="jane-at-example""#));
    assert!(resp.body.contains(">Hi</textarea>"));
    assert!(store.all().unwrap().is_empty());
}

#[test]
fn test_json_submission() {
    let (server, store) = start();
    let resp = post(
        &server.addr(),
        "/contact_us",
        "application/json",
        r#"{"contact_us_request":{"name":"Jane","email":"jane@example.com","message":"From a script"}}"#,
    );
    assert_eq!(resp.status, 302);
    assert_eq!(store.all().unwrap()[0].message, "From a script");
}

#[test]
fn test_query_params_fill_missing_fields() {
    let (server, store) = start();
    let resp = post_form(
        &server.addr(),
        "/contact_us?email=jane%40example.com",
        "name=Jane&message=Hello",
    );
    assert_eq!(resp.status, 302);
    assert_eq!(store.all().unwrap()[0].email, "jane@example.com");
}

#[test]
fn test_identical_submissions_are_stored_separately() {
    let (server, store) = start();
    for _ in 0..2 {
        let resp = post_form(&server.addr(), "/contact_us", VALID_FORM);
        assert_eq!(resp.status, 302);
    }
    let saved = store.all().unwrap();
    assert_eq!(saved.len(), 2);
    assert_ne!(saved[0].id, saved[1].id);
}

#[test]
fn test_thank_you_page() {
    let (server, _store) = start();
    let resp = get(&server.addr(), "/contact_us/thank_you");
    assert_eq!(resp.status, 200);
    assert!(resp.body.contains("<h1>Thank you</h1>"));
}

#[test]
fn test_health_endpoint() {
    let (server, _store) = start();
    let resp = get(&server.addr(), "/health");
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json()["status"], "ok");
}

#[test]
fn test_unknown_path_and_wrong_method() {
    let (server, _store) = start();

    let missing = get(&server.addr(), "/contact");
    assert_eq!(missing.status, 404);
    assert_eq!(missing.json()["error"], "Not Found");

    let wrong = parse_response(&send_request(
        &server.addr(),
        "DELETE /contact_us HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n",
    ));
    assert_eq!(wrong.status, 405);
    assert_eq!(wrong.header("allow"), Some("GET, HEAD, POST"));
}

#[test]
fn test_oversized_body_is_rejected_before_the_controller() {
    let (server, store) = start();
    let body = format!("{VALID_FORM}&padding={}", "x".repeat(70 * 1024));
    let resp = post_form(&server.addr(), "/contact_us", &body);
    assert_eq!(resp.status, 413);
    assert_eq!(resp.json()["error"], "Payload Too Large");
    assert!(!resp.body.contains("prevented your message"));
    assert!(store.all().unwrap().is_empty());
}

#[test]
fn test_body_just_under_the_limit_is_accepted() {
    let (server, store) = start();
    let padding = 60 * 1024;
    let body = format!("{VALID_FORM}&padding={}", "x".repeat(padding));
    let resp = post_form(&server.addr(), "/contact_us", &body);
    assert_eq!(resp.status, 302);
    assert_eq!(store.all().unwrap().len(), 1);
}

#[test]
fn test_head_requests_have_no_body() {
    let (server, _store) = start();
    for path in ["/health", "/contact_us", "/contact_us/thank_you"] {
        let resp = parse_response(&send_request(
            &server.addr(),
            &format!("HEAD {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n"),
        ));
        assert_eq!(resp.status, 200, "{path}");
        assert!(resp.body.is_empty(), "{path}: {}", resp.body);
    }
}

struct FailingStore;

impl ContactUsStore for FailingStore {
    fn save(&self, _request: &NewContactUsRequest) -> io::Result<StoredContactUsRequest> {
        Err(io::Error::other("database unavailable"))
    }

    fn all(&self) -> io::Result<Vec<StoredContactUsRequest>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_store_failure_rerenders_instead_of_redirecting() {
    let server = start_with_store(Arc::new(FailingStore));
    let resp = post_form(&server.addr(), "/contact_us", VALID_FORM);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("location"), None);
    assert!(resp.body.contains("could not be saved, please try again"));
    assert!(resp.body.contains(r#"value="Jane""#));
}
