//! # Forms
//!
//! Client-side form state for the booking, package and account forms:
//! a path-addressed store, a declarative validator, and helpers that keep
//! variable-length sections (travelers, itinerary days, list entries) in
//! step with their count fields.
//!
//! The concrete forms are typed structs. Each one can be turned into a
//! [`FormState`] for field-by-field editing, produces its [`RuleSet`], and
//! runs its cross-field checks before converting into an API request.

pub mod account;
pub mod array_sync;
pub mod booking;
pub mod package;
pub mod path;
pub mod rules;
pub mod state;
pub mod validator;

pub use account::{PasswordForm, ProfileForm, RegisterForm};
pub use array_sync::{push_blank, remove_and_renumber, remove_at, renumber, sync_len, Positional};
pub use booking::{BookingForm, BookingTarget, TravelerForm};
pub use package::{AvailabilityForm, ItineraryDayForm, PackageForm, PackageFormMode};
pub use path::{FieldPath, Segment};
pub use rules::{RuleSet, ValidationResult, ValidationRule};
pub use state::FormState;
pub use self::validator::{is_valid_email, is_valid_phone, validate};

use crate::errors::{Result, TravelBookError};

/// A typed form that validates itself before being sent
pub trait Form {
    /// Request body produced by a valid form
    type Request;

    /// Declarative per-field rules for the current shape of the form
    fn rules(&self) -> RuleSet;

    /// Checks spanning several fields, run after the declarative rules
    fn cross_check(&self, _result: &mut ValidationResult) {}

    /// Convert into the request body; only called on valid forms
    fn to_request(&self) -> Result<Self::Request>;

    /// Run the declarative rules and the cross-field checks
    fn validate(&self) -> Result<ValidationResult>
    where
        Self: serde::Serialize,
    {
        let record = serde_json::to_value(self)?;
        let mut result = self::validator::validate_value(&record, &self.rules());
        self.cross_check(&mut result);
        Ok(result)
    }

    /// Validate and build the request, or fail with the field errors
    fn submit(&self) -> Result<Self::Request>
    where
        Self: serde::Serialize,
    {
        let result = self.validate()?;
        if !result.is_valid() {
            return Err(TravelBookError::InvalidForm(result));
        }
        self.to_request()
    }
}
