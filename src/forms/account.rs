//! Registration, profile and password forms.

use serde::{Deserialize, Serialize};

use super::path::FieldPath;
use super::rules::{RuleSet, ValidationResult, ValidationRule};
use super::Form;
use crate::api::auth::{ChangePasswordRequest, ProfileUpdate, RegisterRequest};
use crate::domain::{Address, User};
use crate::errors::Result;

const PASSWORD_MISMATCH: &str = "Passwords do not match";

fn name_rule() -> ValidationRule {
    ValidationRule::new().required().min_length(2).max_length(50)
}

fn optional_address(address: &Address) -> Option<Address> {
    if address.is_empty() {
        return None;
    }
    Some(Address {
        street: address.street.trim().to_string(),
        city: address.city.trim().to_string(),
        state: address.state.trim().to_string(),
        zip_code: address.zip_code.trim().to_string(),
        country: address.country.trim().to_string(),
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    pub address: Address,
}

impl Form for RegisterForm {
    type Request = RegisterRequest;

    fn rules(&self) -> RuleSet {
        RuleSet::new()
            .rule(FieldPath::key("name"), name_rule())
            .rule(FieldPath::key("email"), ValidationRule::new().required().email())
            .rule(FieldPath::key("password"), ValidationRule::new().required().min_length(6))
            .rule(FieldPath::key("phone"), ValidationRule::new().required().phone())
    }

    fn cross_check(&self, result: &mut ValidationResult) {
        if self.password != self.confirm_password {
            result.insert(FieldPath::key("confirmPassword"), PASSWORD_MISMATCH);
        }
    }

    /// The confirmation field stays local
    fn to_request(&self) -> Result<RegisterRequest> {
        Ok(RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone: self.phone.trim().to_string(),
            address: optional_address(&self.address),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileForm {
    pub name: String,
    pub phone: String,
    pub address: Address,
}

impl ProfileForm {
    /// Seed from the signed-in user
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            phone: user.phone.clone().unwrap_or_default(),
            address: user.address.clone().unwrap_or_default(),
        }
    }
}

impl Form for ProfileForm {
    type Request = ProfileUpdate;

    fn rules(&self) -> RuleSet {
        RuleSet::new()
            .rule(FieldPath::key("name"), name_rule())
            .rule(FieldPath::key("phone"), ValidationRule::new().required().phone())
    }

    fn to_request(&self) -> Result<ProfileUpdate> {
        Ok(ProfileUpdate {
            name: self.name.trim().to_string(),
            phone: self.phone.trim().to_string(),
            address: optional_address(&self.address),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl Form for PasswordForm {
    type Request = ChangePasswordRequest;

    fn rules(&self) -> RuleSet {
        RuleSet::new()
            .rule(FieldPath::key("currentPassword"), ValidationRule::new().required())
            .rule(FieldPath::key("newPassword"), ValidationRule::new().required().min_length(6))
            .rule(FieldPath::key("confirmPassword"), ValidationRule::new().required())
    }

    fn cross_check(&self, result: &mut ValidationResult) {
        if self.new_password != self.confirm_password {
            result.insert(FieldPath::key("confirmPassword"), PASSWORD_MISMATCH);
        }
    }

    fn to_request(&self) -> Result<ChangePasswordRequest> {
        Ok(ChangePasswordRequest {
            current_password: self.current_password.clone(),
            new_password: self.new_password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Role, UserId};
    use crate::errors::TravelBookError;

    fn register_form() -> RegisterForm {
        RegisterForm {
            name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password: "engine42".into(),
            confirm_password: "engine42".into(),
            phone: "+44 20 7946 0000".into(),
            address: Address::default(),
        }
    }

    #[test]
    fn test_register_request_drops_confirmation() {
        let request = register_form().submit().unwrap();
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("confirmPassword").is_none());
        assert!(json.get("address").is_none());
        assert_eq!(json["email"], "ada@example.com");
    }

    #[test]
    fn test_register_password_mismatch() {
        let mut form = register_form();
        form.confirm_password = "engine43".into();
        let result = form.validate().unwrap();
        assert_eq!(result.message_for("confirmPassword"), Some(PASSWORD_MISMATCH));
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_register_field_messages() {
        let form = RegisterForm {
            name: "A".into(),
            email: "not-an-email".into(),
            password: "123".into(),
            confirm_password: "123".into(),
            phone: "555".into(),
            address: Address::default(),
        };
        let result = form.validate().unwrap();
        assert_eq!(result.message_for("name"), Some("name must be at least 2 characters"));
        assert_eq!(result.message_for("email"), Some("Please enter a valid email address"));
        assert_eq!(result.message_for("password"), Some("password must be at least 6 characters"));
        assert_eq!(result.message_for("phone"), Some("Please enter a valid phone number"));
    }

    #[test]
    fn test_profile_from_user() {
        let user = User {
            id: UserId::from("u-1"),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            phone: None,
            role: Role::User,
            address: Some(Address { city: "London".into(), ..Default::default() }),
            created_at: None,
        };
        let form = ProfileForm::from_user(&user);
        assert_eq!(form.address.city, "London");

        let result = form.validate().unwrap();
        assert_eq!(result.message_for("phone"), Some("phone is required"));
        assert!(matches!(form.submit(), Err(TravelBookError::InvalidForm(_))));
    }

    #[test]
    fn test_password_form() {
        let form = PasswordForm {
            current_password: "old-secret".into(),
            new_password: "new-secret".into(),
            confirm_password: "new-secret".into(),
        };
        let request = form.submit().unwrap();
        assert_eq!(request.new_password, "new-secret");

        let blank = PasswordForm::default();
        let result = blank.validate().unwrap();
        assert_eq!(result.message_for("currentPassword"), Some("currentPassword is required"));
        assert_eq!(result.message_for("newPassword"), Some("newPassword is required"));
        assert_eq!(result.message_for("confirmPassword"), Some("confirmPassword is required"));
    }
}
