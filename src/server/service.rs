use super::request::{parse_request, ParsedRequest};
use super::response::{write_html, write_json, write_json_error, write_redirect};
use crate::config::ServiceConfig;
use crate::controller::{ContactUsController, SubmitOutcome, View};
use crate::logging::RedactionLevel;
use crate::model::{ContactUsRequest, ContactUsRequestFactory, SubmissionFactory};
use crate::router::{Route, RouteResolution, Router};
use crate::views::Views;
use anyhow::{Context, Result};
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, info_span, warn};

/// Factory handle shared by every connection.
pub type SharedFactory = Arc<dyn SubmissionFactory<Record = ContactUsRequest>>;

/// The `may_minihttp` service behind the contact-us pages.
///
/// One clone is handed to each connection; all of them share the controller
/// and views.
#[derive(Clone)]
pub struct AppService {
    pub router: Router,
    pub controller: Arc<ContactUsController<SharedFactory>>,
    pub views: Arc<Views>,
}

impl AppService {
    pub fn new(factory: SharedFactory, views: Views) -> Self {
        Self {
            router: Router::new(),
            controller: Arc::new(ContactUsController::new(factory)),
            views: Arc::new(views),
        }
    }

    /// Wire store, factory and views as described by `config`.
    pub fn from_config(config: &ServiceConfig, redact_level: RedactionLevel) -> Result<Self> {
        let store = config.build_store()?;
        let factory = ContactUsRequestFactory::new(store).with_redaction(redact_level);
        let views = match &config.templates_dir {
            Some(dir) => Views::with_overrides(dir)
                .with_context(|| format!("Failed to load templates from {}", dir.display()))?,
            None => Views::new().context("Failed to compile built-in templates")?,
        };
        Ok(Self::new(Arc::new(factory), views))
    }

    fn dispatch(&self, route: Route, req: &ParsedRequest, head_only: bool, res: &mut Response) -> u16 {
        match route {
            Route::Health => {
                write_json(res, 200, &serde_json::json!({ "status": "ok" }), head_only);
                200
            }
            Route::Index => match self.controller.index() {
                View::Form => self.render(res, head_only, self.views.render_index()),
            },
            Route::Submit => match self.controller.submit(&req.params()) {
                SubmitOutcome::Redirect(location) => {
                    write_redirect(res, location);
                    302
                }
                SubmitOutcome::Rerender(contact_us_request) => {
                    self.render(res, head_only, self.views.render_submit(&contact_us_request))
                }
            },
            Route::ThankYou => self.render(res, head_only, self.views.render_thank_you()),
        }
    }

    fn render(
        &self,
        res: &mut Response,
        head_only: bool,
        rendered: Result<String, minijinja::Error>,
    ) -> u16 {
        match rendered {
            Ok(html) => {
                write_html(res, 200, html, head_only);
                200
            }
            Err(e) => {
                error!(error = %e, "Template rendering failed");
                write_json_error(res, 500, "Internal Server Error");
                500
            }
        }
    }
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let start = Instant::now();
        let parsed = parse_request(req);
        let span = info_span!(
            "request",
            request_id = %parsed.request_id,
            method = %parsed.method,
            path = %parsed.path
        );
        let _entered = span.enter();

        let status = match parsed.method.parse::<Method>() {
            Err(_) => {
                warn!("Unparseable request method");
                write_json_error(res, 400, "Bad Request");
                400
            }
            Ok(method) => match (self.router.route(&method, &parsed.path), parsed.body_error) {
                (RouteResolution::Matched(_), Some(err)) => {
                    write_json_error(res, err.status(), err.message());
                    err.status()
                }
                (RouteResolution::Matched(route), None) => {
                    self.dispatch(route, &parsed, method == Method::HEAD, res)
                }
                (RouteResolution::MethodNotAllowed(allow), _) => {
                    res.header(allow);
                    write_json_error(res, 405, "Method Not Allowed");
                    405
                }
                (RouteResolution::NotFound, _) => {
                    write_json_error(res, 404, "Not Found");
                    404
                }
            },
        };

        info!(
            status,
            latency_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );
        Ok(())
    }
}
