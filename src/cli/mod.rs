//! # CLI Module
//!
//! ## Commands
//!
//! ### `serve`
//!
//! ```bash
//! contact-us serve --config config/config.yaml
//! contact-us serve --addr 127.0.0.1:8080 --store-path data/requests.jsonl
//! ```
//!
//! ### `check-config`
//!
//! Resolve file, environment and flags exactly like `serve` would, print
//! the result as YAML and exit. Useful in deploy pipelines.
//!
//! ```bash
//! CONTACT_US_BIND_ADDR=0.0.0.0:9000 contact-us check-config -c config/config.yaml
//! ```

mod commands;


pub use commands::{run_cli, serve, Cli, Commands, ConfigArgs};
