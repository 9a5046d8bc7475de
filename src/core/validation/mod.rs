//! Request body validation
//!
//! Request DTOs derive [`validator::Validate`]; the [`ValidatedJson`]
//! extractor runs those rules and turns failures into a 400 with per-field
//! details. Domain-specific field rules live in [`validators`].

pub mod extractor;
pub mod validators;

pub use extractor::ValidatedJson;
