//! The contact-us controller.
//!
//! Two actions: `index` shows the empty form, `submit` hands the visitor's
//! params to the [`SubmissionFactory`] and decides between redirecting to the
//! thank-you page and re-rendering the form with the invalid record.
//!
//! The controller never touches the HTTP response itself. It returns a
//! [`SubmitOutcome`] and the server turns that into a `302` or an HTML page,
//! so "redirected" and "record kept for the view" cannot both happen.

use crate::model::{SubmissionFactory, Validatable};
use crate::params::FormParams;
use tracing::{debug, info};

/// Where a valid submission is sent.
pub const THANK_YOU_PATH: &str = "/contact_us/thank_you";

/// Views the controller can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// The empty contact-us form.
    Form,
}

/// Result of handling one submission.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitOutcome<R> {
    /// The record was valid; send the visitor to this location.
    Redirect(&'static str),
    /// The record was invalid; re-render the form from it.
    Rerender(R),
}

impl<R> SubmitOutcome<R> {
    /// The redirect target, if the submission was accepted.
    pub fn redirect_location(&self) -> Option<&'static str> {
        match self {
            SubmitOutcome::Redirect(location) => Some(*location),
            SubmitOutcome::Rerender(_) => None,
        }
    }

    /// The record kept for the view, if the submission was rejected.
    pub fn into_record(self) -> Option<R> {
        match self {
            SubmitOutcome::Redirect(_) => None,
            SubmitOutcome::Rerender(record) => Some(record),
        }
    }
}

/// Handles the contact-us page on top of a [`SubmissionFactory`].
pub struct ContactUsController<F> {
    factory: F,
}

impl<F: SubmissionFactory> ContactUsController<F> {
    /// Controller that builds every submission through `factory`.
    pub fn new(factory: F) -> Self {
        Self { factory }
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn index(&self) -> View {
        View::Form
    }

    pub fn submit(&self, params: &FormParams) -> SubmitOutcome<F::Record> {
        let contact_us_request = self.factory.create_from_a_web_visitor(params);
        if contact_us_request.is_valid() {
            info!(location = THANK_YOU_PATH, "Contact us request accepted");
            SubmitOutcome::Redirect(THANK_YOU_PATH)
        } else {
            debug!("Contact us request rejected, re-rendering form");
            SubmitOutcome::Rerender(contact_us_request)
        }
    }
}
