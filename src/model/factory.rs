use super::contact_us_request::{ContactUsRequest, BASE};
use super::{SubmissionFactory, Validatable};
use crate::logging::{redact_email, RedactionLevel};
use crate::params::FormParams;
use crate::store::ContactUsStore;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Builds [`ContactUsRequest`]s from visitor input and saves the valid ones.
#[derive(Clone)]
pub struct ContactUsRequestFactory {
    store: Arc<dyn ContactUsStore>,
    redact_level: RedactionLevel,
}

impl ContactUsRequestFactory {
    pub fn new(store: Arc<dyn ContactUsStore>) -> Self {
        Self {
            store,
            redact_level: RedactionLevel::default(),
        }
    }

    pub fn with_redaction(mut self, level: RedactionLevel) -> Self {
        self.redact_level = level;
        self
    }

    pub fn store(&self) -> &Arc<dyn ContactUsStore> {
        &self.store
    }
}

impl SubmissionFactory for ContactUsRequestFactory {
    type Record = ContactUsRequest;

    /// Build, validate and (when valid) persist one request.
    ///
    /// A store failure is reported on the record as a `base` error, which
    /// makes it invalid. This never fails outright.
    fn create_from_a_web_visitor(&self, params: &FormParams) -> ContactUsRequest {
        let mut request = ContactUsRequest::from_params(params);
        request.validate();

        if !request.is_valid() {
            debug!(
                param_count = params.len(),
                invalid_fields = ?request.errors.keys().collect::<Vec<_>>(),
                "Contact us request failed validation"
            );
            return request;
        }

        match self.store.save(&request.to_new()) {
            Ok(stored) => {
                info!(
                    submission_id = %stored.id,
                    email = %redact_email(&stored.email, self.redact_level),
                    message_chars = stored.message.chars().count(),
                    "Contact us request saved"
                );
                request.id = Some(stored.id);
            }
            Err(e) => {
                error!(
                    error = %e,
                    email = %redact_email(&request.email, self.redact_level),
                    "Failed to save contact us request"
                );
                request.add_error(BASE, "could not be saved, please try again");
            }
        }
        request
    }
}
