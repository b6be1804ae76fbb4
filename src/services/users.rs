//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use mongodb::bson::Document;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{SignupRequest, SignupResponse, User, UserClaims, UserProfile, UserRole},
    presentation::parse_id,
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

/// Hash a password using Argon2 with a random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a new user
    pub async fn signup(&self, mut data: SignupRequest) -> AppResult<SignupResponse> {
        data.email = normalize_email(&data.email);

        if self.repository.users.email_exists(&data.email).await? {
            return Err(AppError::Validation("Email already registered".to_string()));
        }
        data.validate()?;

        let user = User {
            id: None,
            name: data.name,
            email: data.email,
            password: hash_password(&data.password)?,
            role: data.role,
            team_id: None,
        };
        let id = self.repository.users.create(&user).await?;

        tracing::info!("Registered user {} with role {}", id, user.role);

        Ok(SignupResponse {
            id: id.to_hex(),
            role: user.role,
        })
    }

    /// Authenticate by email and password, returning a JWT token and the profile
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(String, UserProfile)> {
        let user = self
            .repository
            .users
            .get_by_email(&normalize_email(email))
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !verify_password(&user.password, password)? {
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        let profile = UserProfile::from(user);
        let token = self.create_token(&profile)?;
        Ok((token, profile))
    }

    fn create_token(&self, profile: &UserProfile) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: profile.email.clone(),
            user_id: profile.id.clone(),
            role: profile.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Validate a bearer token
    pub fn decode_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }

    /// Get a user's profile
    pub async fn get_profile(&self, user_id: &str) -> AppResult<UserProfile> {
        let id = parse_id(user_id)?;
        let user = self.repository.users.get_by_id(id).await?;
        Ok(UserProfile::from(user))
    }

    /// List users, optionally only those with the given role
    pub async fn list_users(&self, role: Option<UserRole>) -> AppResult<Vec<Document>> {
        self.repository.users.list(role).await
    }
}
