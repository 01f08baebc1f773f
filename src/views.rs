//! HTML views for the contact-us pages.
//!
//! The templates under `templates/` are compiled into the binary. A
//! templates directory can be configured to override any of them; files
//! are matched by their path relative to that directory
//! (`contact_us/index.html`, `layout.html`, ...).
//!
//! Templates ending in `.html` are auto-escaped, so visitor input echoed back
//! into the form cannot inject markup.

use crate::model::ContactUsRequest;
use minijinja::{context, Environment};
use std::fs;
use std::io;
use std::path::Path;
use tracing::info;

pub const LAYOUT: &str = "layout.html";
pub const FORM_PARTIAL: &str = "contact_us/_form.html";
pub const INDEX: &str = "contact_us/index.html";
pub const SUBMIT: &str = "contact_us/submit.html";
pub const THANK_YOU: &str = "contact_us/thank_you.html";

const BUILTIN_TEMPLATES: [(&str, &str); 5] = [
    (LAYOUT, include_str!("../templates/layout.html")),
    (FORM_PARTIAL, include_str!("../templates/contact_us/_form.html")),
    (INDEX, include_str!("../templates/contact_us/index.html")),
    (SUBMIT, include_str!("../templates/contact_us/submit.html")),
    (THANK_YOU, include_str!("../templates/contact_us/thank_you.html")),
];

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    /// Views backed by the built-in templates only.
    pub fn new() -> io::Result<Self> {
        let mut env = Environment::new();
        for (name, source) in BUILTIN_TEMPLATES {
            env.add_template(name, source).map_err(io::Error::other)?;
        }
        Ok(Self { env })
    }

    /// Built-in templates, with any same-named file under `dir` taking over.
    ///
    /// # Errors
    ///
    /// Returns an error if `dir` is not a directory, an override cannot be
    /// read, or an override fails to compile.
    pub fn with_overrides(dir: &Path) -> io::Result<Self> {
        if !dir.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("templates directory {} not found", dir.display()),
            ));
        }
        let mut views = Self::new()?;
        for (name, _) in BUILTIN_TEMPLATES {
            let path = dir.join(name);
            if !path.is_file() {
                continue;
            }
            let source = fs::read_to_string(&path)?;
            views
                .env
                .add_template_owned(name.to_string(), source)
                .map_err(io::Error::other)?;
            info!(template = name, path = %path.display(), "Template overridden");
        }
        Ok(views)
    }

    /// The empty form shown by `GET /contact_us`.
    pub fn render_index(&self) -> Result<String, minijinja::Error> {
        self.env.get_template(INDEX)?.render(context! {})
    }

    /// The form again, filled in from a rejected request and listing its errors.
    pub fn render_submit(&self, request: &ContactUsRequest) -> Result<String, minijinja::Error> {
        self.env.get_template(SUBMIT)?.render(context! {
            contact_us_request => request,
            errors => request.full_messages(),
        })
    }

    pub fn render_thank_you(&self) -> Result<String, minijinja::Error> {
        self.env.get_template(THANK_YOU)?.render(context! {})
    }
}
