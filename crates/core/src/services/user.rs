//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use gatherly_common::{AppError, AppResult};
use gatherly_db::entities::user;
use gatherly_db::repositories::UserRepository;
use regex::Regex;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Default number of rows returned by user listings.
const DEFAULT_USER_LIMIT: u64 = 30;

#[allow(clippy::unwrap_used)] // Static pattern is known to be valid
static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_.-]+$").unwrap());

#[allow(clippy::unwrap_used)] // Static pattern is known to be valid
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$").unwrap()
});

/// Input for registering a user.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Input for logging in.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// User response without the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<user::Model> for UserResponse {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            created_at: model.created_at.into(),
        }
    }
}

/// Service for managing users and credentials.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(user_repo: UserRepository) -> Self {
        Self { user_repo }
    }

    /// Register a new user.
    ///
    /// Credentials are validated before any database access and the password
    /// is hashed before storage; the plaintext is never persisted or logged.
    pub async fn register(&self, input: RegisterInput) -> AppResult<user::Model> {
        validate_username(&input.username)?;
        validate_email(&input.email)?;
        validate_password(&input.password)?;

        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Duplicate("Username already taken".to_string()));
        }

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Duplicate("Email already registered".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let model = user::ActiveModel {
            username: Set(input.username),
            email: Set(input.email),
            password_hash: Set(password_hash),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
            ..Default::default()
        };

        self.user_repo.create(model).await
    }

    /// Authenticate a user by username and password.
    ///
    /// Returns the same error for an unknown username and a wrong password.
    pub async fn authenticate(&self, input: LoginInput) -> AppResult<user::Model> {
        let user = self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i32) -> AppResult<user::Model> {
        self.user_repo.get_by_id(id).await
    }

    /// Search users by username substring; an empty query lists users.
    pub async fn search(&self, query: &str, limit: Option<u64>) -> AppResult<Vec<user::Model>> {
        let limit = limit.unwrap_or(DEFAULT_USER_LIMIT);

        if query.trim().is_empty() {
            return self.user_repo.list(limit).await;
        }

        self.user_repo.search(query, limit).await
    }

    /// Delete a user account. Callers may only delete themselves.
    pub async fn delete(&self, user_id: i32, caller_id: i32) -> AppResult<()> {
        if user_id != caller_id {
            return Err(AppError::Forbidden(
                "You can only delete your own account".to_string(),
            ));
        }

        self.user_repo.get_by_id(user_id).await?;
        self.user_repo.delete(user_id).await
    }
}

/// Validate a username: 3-80 chars of letters, digits, `_`, `.`, `-`.
fn validate_username(username: &str) -> AppResult<()> {
    if username.len() < 3 || username.len() > 80 {
        return Err(AppError::Validation(
            "Username must be between 3 and 80 characters".to_string(),
        ));
    }

    if !USERNAME_RE.is_match(username) {
        return Err(AppError::Validation(
            "Username may only contain letters, digits, '_', '.' and '-'".to_string(),
        ));
    }

    Ok(())
}

/// Validate an email address.
fn validate_email(email: &str) -> AppResult<()> {
    if email.is_empty() || email.len() > 120 || !EMAIL_RE.is_match(email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    Ok(())
}

/// Validate a password: at least 8 chars with one uppercase, one lowercase and
/// one digit.
fn validate_password(password: &str) -> AppResult<()> {
    let long_enough = password.len() >= 8;
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if long_enough && has_upper && has_lower && has_digit {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Password must be at least 8 characters with an uppercase letter, \
             a lowercase letter and a digit"
                .to_string(),
        ))
    }
}

/// Hash a password with argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: i32, username: &str, password: &str) -> user::Model {
        user::Model {
            id,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: hash_password(password).unwrap(),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_validate_username() {
        assert!(validate_username("alice").is_ok());
        assert!(validate_username("a.b-c_d9").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
        assert!(validate_username(&"x".repeat(81)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("alice@example.com").is_ok());
        assert!(validate_email("a.b+c@mail.co.uk").is_ok());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("Passw0rd").is_ok());
        assert!(validate_password("short1A").is_err());
        assert!(validate_password("alllowercase1").is_err());
        assert!(validate_password("ALLUPPERCASE1").is_err());
        assert!(validate_password("NoDigitsHere").is_err());
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("Passw0rd!").unwrap();
        assert_ne!(hash, "Passw0rd!");
        assert!(verify_password("Passw0rd!", &hash).unwrap());
        assert!(!verify_password("WrongPass1", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let user = create_test_user(1, "alice", "Passw0rd!");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[user]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service
            .authenticate(LoginInput {
                username: "alice".to_string(),
                password: "WrongPass1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_username() {
        let existing = create_test_user(1, "alice", "Passw0rd!");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = UserService::new(UserRepository::new(db));
        let result = service
            .register(RegisterInput {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "Passw0rd!".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_password_before_db() {
        // No query results queued: validation must fail first.
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = UserService::new(UserRepository::new(db));
        let result = service
            .register(RegisterInput {
                username: "alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "weak".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
