//! Authentication and profile endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::client::{MessageResponse, TravelBookClient};
use crate::domain::{Address, User};
use crate::errors::Result;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 2, max = 50, message = "Name must be 2-50 characters"))]
    pub name: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    pub phone: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Token and account returned by login and registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl TravelBookClient {
    /// `POST /auth/login`
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse> {
        request.validate()?;
        self.post_json("/auth/login", request, "Login failed").await
    }

    /// `POST /auth/register`
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse> {
        request.validate()?;
        self.post_json("/auth/register", request, "Registration failed").await
    }

    /// `GET /auth/me`
    pub async fn me(&self) -> Result<User> {
        let response: UserResponse = self.get_json("/auth/me", "Failed to load profile").await?;
        Ok(response.user)
    }

    /// `PUT /auth/profile`
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let response: UserResponse =
            self.put_json("/auth/profile", update, "Profile update failed").await?;
        Ok(response.user)
    }

    /// `POST /auth/change-password`
    pub async fn change_password(&self, request: &ChangePasswordRequest) -> Result<MessageResponse> {
        self.post_json("/auth/change-password", request, "Password change failed").await
    }
}
