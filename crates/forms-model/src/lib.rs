//! Data model for the forms submission engine.
//!
//! Pure data: forms, containers, elements, typed settings, submissions and
//! their lifecycle, request context, and the outcome/error value types shared
//! by the validation, gate, and action layers. Behavior lives in the sibling
//! crates.

pub mod context;
pub mod error;
pub mod form;
pub mod ids;
pub mod outcome;
pub mod settings;
pub mod submission;
pub mod validation;
pub mod value;

pub use context::RequestContext;
pub use error::{ModelError, Result};
pub use form::{Container, Element, ElementChoice, Form};
pub use ids::{ElementId, FormId, SubmissionId};
pub use outcome::{
    ActionOutcome, CookieDirective, GateOutcome, InterruptPayload, ResponseDirectives,
};
pub use settings::{ElementSettings, SettingDescriptor, SettingKind, SettingValue};
pub use submission::{Interruption, Submission, SubmissionStatus};
pub use validation::{ValidationError, ValidationErrorKind};
pub use value::{FieldValue, MAIN_FACET, RawValue};
