use super::Validatable;
use crate::ids::SubmissionId;
use crate::params::FormParams;
use serde::Serialize;
use std::collections::BTreeMap;

/// Prefix the HTML form uses for its fields (`contact_us_request[name]`).
pub const FORM_SCOPE: &str = "contact_us_request";

pub const MAX_NAME_CHARS: usize = 256;
pub const MAX_EMAIL_CHARS: usize = 254;
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// Error key for problems that do not belong to a single field.
pub const BASE: &str = "base";

/// One visitor's contact-us submission, valid or not.
///
/// `errors` is empty exactly when the record is valid. `id` is only set
/// after the record has been persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContactUsRequest {
    pub id: Option<SubmissionId>,
    pub name: String,
    pub email: String,
    pub message: String,
    pub errors: BTreeMap<&'static str, Vec<String>>,
}

/// The validated fields of a request, as handed to a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewContactUsRequest {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl ContactUsRequest {
    /// Pull the known fields out of `params` without validating them.
    ///
    /// Each field is looked up under its scoped key first, then the bare
    /// key. Unknown keys are ignored.
    pub fn from_params(params: &FormParams) -> Self {
        Self {
            name: field(params, "name"),
            email: field(params, "email"),
            message: field(params, "message"),
            ..Self::default()
        }
    }

    /// Re-run every field rule, replacing any previous errors.
    pub fn validate(&mut self) {
        self.errors.clear();

        if self.name.is_empty() {
            self.add_error("name", "can't be blank");
        } else if self.name.chars().count() > MAX_NAME_CHARS {
            self.add_error(
                "name",
                format!("is too long (maximum is {MAX_NAME_CHARS} characters)"),
            );
        }

        if self.email.is_empty() {
            self.add_error("email", "can't be blank");
        } else if self.email.chars().count() > MAX_EMAIL_CHARS {
            self.add_error(
                "email",
                format!("is too long (maximum is {MAX_EMAIL_CHARS} characters)"),
            );
        } else if !is_plausible_email(&self.email) {
            self.add_error("email", "is invalid");
        }

        if self.message.is_empty() {
            self.add_error("message", "can't be blank");
        } else if self.message.chars().count() > MAX_MESSAGE_CHARS {
            self.add_error(
                "message",
                format!("is too long (maximum is {MAX_MESSAGE_CHARS} characters)"),
            );
        }
    }

    pub fn add_error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    pub fn errors_on(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Human readable messages, e.g. `"Email is invalid"`.
    pub fn full_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .flat_map(|(field, messages)| {
                messages.iter().map(move |m| {
                    if *field == BASE {
                        m.clone()
                    } else {
                        format!("{} {}", humanize(field), m)
                    }
                })
            })
            .collect()
    }

    pub fn to_new(&self) -> NewContactUsRequest {
        NewContactUsRequest {
            name: self.name.clone(),
            email: self.email.clone(),
            message: self.message.clone(),
        }
    }
}

impl Validatable for ContactUsRequest {
    fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

fn field(params: &FormParams, name: &str) -> String {
    params
        .get(&format!("{FORM_SCOPE}[{name}]"))
        .or_else(|| params.get(name))
        .map(|v| v.trim().to_string())
        .unwrap_or_default()
}

fn humanize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>().replace('_', " "),
        None => String::new(),
    }
}

/// Structural check only: one `@`, something before it, and a dotted domain.
fn is_plausible_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    !local.is_empty()
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
}
