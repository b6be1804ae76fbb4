//! User model and related types

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

/// Minimum password length is exclusive: a password must be longer than this
pub const PASSWORD_MIN_EXCLUSIVE_LEN: usize = 8;

/// User roles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    #[default]
    User,
    Technician,
    Manager,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::User => "user",
            UserRole::Technician => "technician",
            UserRole::Manager => "manager",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored user document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    /// Hashed password (argon2 PHC string)
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
    /// Hex id of the team this user belongs to
    #[serde(default)]
    pub team_id: Option<String>,
}

/// Public view of a user, never carries the password
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserProfile {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub team_id: Option<String>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        UserProfile {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            name: user.name,
            email: user.email,
            role: user.role,
            team_id: user.team_id,
        }
    }
}

/// Signup request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
    #[serde(default)]
    pub role: UserRole,
}

/// Signup response
#[derive(Debug, Serialize, ToSchema)]
pub struct SignupResponse {
    pub id: String,
    pub role: UserRole,
}

/// User list filter
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    pub role: Option<UserRole>,
}

/// True when the password is longer than 8 characters and mixes lowercase,
/// uppercase and at least one non-alphanumeric character
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() > PASSWORD_MIN_EXCLUSIVE_LEN
        && password.chars().any(char::is_lowercase)
        && password.chars().any(char::is_uppercase)
        && password.chars().any(|c| !c.is_alphanumeric())
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if is_strong_password(password) {
        return Ok(());
    }
    let mut err = ValidationError::new("weak_password");
    err.message = Some(Cow::from(
        "Password must be longer than 8 characters and contain a lowercase letter, \
         an uppercase letter and a special character",
    ));
    Err(err)
}

/// JWT claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    /// User email
    pub sub: String,
    /// Hex user id
    pub user_id: String,
    pub role: UserRole,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }
}
