//! # contact_us
//!
//! A "contact us" page: show a form, accept a visitor's submission, persist
//! it, and redirect to a thank-you page. Served over HTTP by `may_minihttp`
//! on `may` coroutines.
//!
//! ## Architecture
//!
//! - **[`controller`]** - `index` and `submit`, the whole of the page logic
//! - **[`model`]** - the `Validatable` record and the `SubmissionFactory` that builds it
//! - **[`store`]** - where accepted requests go (memory or a JSON lines file)
//! - **[`views`]** - minijinja templates for the form and the thank-you page
//! - **[`router`]** - the fixed route table
//! - **[`server`]** - request parsing, response writing, server lifecycle
//! - **[`config`]** / **[`runtime_config`]** - YAML, environment and runtime settings
//! - **[`logging`]** - `tracing` subscriber setup and PII redaction
//! - **[`cli`]** - the `contact-us` binary's commands
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Client
//!     participant Server as AppService<br/>(may_minihttp)
//!     participant Router
//!     participant Controller as ContactUsController
//!     participant Factory as ContactUsRequestFactory
//!     participant Store
//!     participant Views
//!
//!     Client->>Server: POST /contact_us
//!     Server->>Server: Parse query + form body
//!     Server->>Router: route(POST, /contact_us)
//!     Router-->>Server: Route::Submit
//!     Server->>Controller: submit(params)
//!     Controller->>Factory: create_from_a_web_visitor(params)
//!     Factory->>Factory: validate
//!     alt valid
//!         Factory->>Store: save
//!         Controller-->>Server: Redirect(/contact_us/thank_you)
//!         Server-->>Client: 302 Found
//!     else invalid
//!         Controller-->>Server: Rerender(record)
//!         Server->>Views: render_submit(record)
//!         Server-->>Client: 200 form with errors
//!     end
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use contact_us::config::ServiceConfig;
//! use contact_us::logging::RedactionLevel;
//! use contact_us::server::{AppService, HttpServer};
//!
//! fn main() -> anyhow::Result<()> {
//!     may::config().set_stack_size(0x8000);
//!     let config = ServiceConfig::default();
//!     let service = AppService::from_config(&config, RedactionLevel::Credentials)?;
//!     let handle = HttpServer(service).start("127.0.0.1:8080")?;
//!     handle.join().map_err(|e| anyhow::anyhow!("server failed: {e:?}"))?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod controller;
pub mod ids;
pub mod logging;
pub mod model;
pub mod params;
pub mod router;
pub mod runtime_config;
pub mod server;
pub mod store;
pub mod views;

pub use controller::{ContactUsController, SubmitOutcome, View, THANK_YOU_PATH};
pub use model::{
    ContactUsRequest, ContactUsRequestFactory, NewContactUsRequest, SubmissionFactory, Validatable,
};
pub use params::FormParams;
pub use store::{ContactUsStore, InMemoryStore, JsonLinesStore, StoredContactUsRequest};
