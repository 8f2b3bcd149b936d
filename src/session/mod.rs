//! # Session
//!
//! The signed-in identity: bearer token plus user record. A [`Session`] is
//! an explicit value handed to whatever needs it. Login and registration
//! replace the identity, logout clears it, a profile update replaces the
//! user record.

pub mod token_store;

pub use token_store::{MemoryTokenStore, TokenStore};

use tracing::{info, warn};

use crate::api::{LoginRequest, TravelBookClient};
use crate::domain::User;
use crate::errors::{AuthErrorType, Result, TravelBookError};
use crate::forms::{Form, PasswordForm, ProfileForm, RegisterForm};

/// Token and user of the signed-in account
#[derive(Debug, Clone, PartialEq)]
pub struct AuthIdentity {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct Session {
    client: TravelBookClient,
    identity: Option<AuthIdentity>,
}

impl Session {
    /// Signed-out session over `client`
    pub fn new(client: TravelBookClient) -> Self {
        Self { client, identity: None }
    }

    pub fn client(&self) -> &TravelBookClient {
        &self.client
    }

    pub fn user(&self) -> Option<&User> {
        self.identity.as_ref().map(|identity| &identity.user)
    }

    pub fn identity(&self) -> Option<&AuthIdentity> {
        self.identity.as_ref()
    }

    /// Token and user are both present and the token has not been dropped
    /// by a 401 since
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some() && matches!(self.client.tokens().load(), Ok(Some(_)))
    }

    pub fn is_admin(&self) -> bool {
        self.is_authenticated() && self.user().is_some_and(User::is_admin)
    }

    /// The signed-in user, or an error asking to log in
    pub fn require_user(&self) -> Result<&User> {
        match self.user() {
            Some(user) if self.is_authenticated() => Ok(user),
            _ => Err(TravelBookError::unauthorized(
                "Please log in to continue",
                AuthErrorType::MissingToken,
            )),
        }
    }

    /// The signed-in user if they are an administrator
    pub fn require_admin(&self) -> Result<&User> {
        let user = self.require_user()?;
        if !user.is_admin() {
            return Err(TravelBookError::unauthorized(
                "Administrator access required",
                AuthErrorType::InsufficientPermissions,
            ));
        }
        Ok(user)
    }

    /// Load the stored token and fetch its account. A token the API no
    /// longer accepts is discarded.
    pub async fn restore(&mut self) -> Result<Option<&User>> {
        let Some(token) = self.client.tokens().load()? else {
            self.identity = None;
            return Ok(None);
        };

        match self.client.me().await {
            Ok(user) => {
                self.identity = Some(AuthIdentity { token, user });
            }
            Err(e) => {
                warn!(error = %e, "Stored token rejected, signing out");
                self.client.tokens().clear()?;
                self.identity = None;
            }
        }
        Ok(self.user())
    }

    /// `POST /auth/login`, then hold and persist the returned identity
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&User> {
        let request = LoginRequest { email: email.trim().to_string(), password: password.to_string() };
        let response = self.client.login(&request).await?;
        self.replace_identity(response.token, response.user)
    }

    /// Validate the registration form, register, and sign in as the new
    /// account
    pub async fn register(&mut self, form: &RegisterForm) -> Result<&User> {
        let request = form.submit()?;
        let response = self.client.register(&request).await?;
        self.replace_identity(response.token, response.user)
    }

    /// Drop the identity and the stored token
    pub fn logout(&mut self) -> Result<()> {
        self.client.tokens().clear()?;
        if let Some(identity) = self.identity.take() {
            info!(user = %identity.user.email, "Logged out");
        }
        Ok(())
    }

    /// Validate and send a profile update, replacing the held user record
    pub async fn update_profile(&mut self, form: &ProfileForm) -> Result<&User> {
        self.require_user()?;
        let update = form.submit()?;
        let user = self.client.update_profile(&update).await?;
        match self.identity.as_mut() {
            Some(identity) => {
                identity.user = user;
                Ok(&identity.user)
            }
            None => Err(TravelBookError::internal("session identity vanished during profile update")),
        }
    }

    /// Validate and send a password change
    pub async fn change_password(&self, form: &PasswordForm) -> Result<()> {
        self.require_user()?;
        let request = form.submit()?;
        self.client.change_password(&request).await?;
        Ok(())
    }

    fn replace_identity(&mut self, token: String, user: User) -> Result<&User> {
        self.client.tokens().save(&token)?;
        info!(user = %user.email, role = %user.role, "Signed in");
        let identity = self.identity.insert(AuthIdentity { token, user });
        Ok(&identity.user)
    }
}
