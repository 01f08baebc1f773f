//! Submission records and the collaborator that builds them.
//!
//! The controller only ever sees two capabilities:
//!
//! - [`SubmissionFactory`] turns raw [`FormParams`] into a record. It must not
//!   fail: malformed input produces an invalid record, and persistence (if
//!   any) happens inside the factory.
//! - [`Validatable`] answers whether that record is valid.
//!
//! [`ContactUsRequest`] and [`ContactUsRequestFactory`] are the concrete pair
//! the service runs with.

pub mod contact_us_request;
pub mod factory;

pub use contact_us_request::{ContactUsRequest, NewContactUsRequest};
pub use factory::ContactUsRequestFactory;

use crate::params::FormParams;
use std::sync::Arc;

/// Anything that can report whether it passed validation.
pub trait Validatable {
    fn is_valid(&self) -> bool;
}

/// Builds one record per submission attempt from the visitor's raw params.
pub trait SubmissionFactory: Send + Sync {
    type Record: Validatable;

    fn create_from_a_web_visitor(&self, params: &FormParams) -> Self::Record;
}

impl<T: SubmissionFactory + ?Sized> SubmissionFactory for Arc<T> {
    type Record = T::Record;

    fn create_from_a_web_visitor(&self, params: &FormParams) -> Self::Record {
        (**self).create_from_a_web_visitor(params)
    }
}

impl<T: Validatable + ?Sized> Validatable for Box<T> {
    fn is_valid(&self) -> bool {
        (**self).is_valid()
    }
}
