//! Account service.
//!
//! Signup, signin, and token authentication.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::Set;
use serde::Deserialize;
use shutter_common::{AppError, AppResult, IdGenerator};
use shutter_db::{
    entities::{profile, user},
    repositories::{ProfileRepository, UserRepository},
};
use validator::Validate;

/// Signup input.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupInput {
    /// Email address.
    #[validate(email)]
    pub email: String,
    /// Username (unique, case-insensitive).
    #[validate(length(min = 1, max = 32))]
    pub username: String,
    /// Password.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Signin input. Either the email or the username identifies the account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SigninInput {
    /// Email or username.
    #[validate(length(min = 1))]
    pub identifier: String,
    /// Password.
    #[validate(length(min = 1))]
    pub password: String,
}

/// Account service for business logic.
#[derive(Clone)]
pub struct AccountService {
    user_repo: UserRepository,
    profile_repo: ProfileRepository,
    id_gen: IdGenerator,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub fn new(user_repo: UserRepository, profile_repo: ProfileRepository) -> Self {
        Self {
            user_repo,
            profile_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new account with an empty profile.
    pub async fn signup(&self, input: SignupInput) -> AppResult<user::Model> {
        input.validate()?;

        if !is_valid_username(&input.username) {
            return Err(AppError::Validation(
                "Username may only contain letters, digits, and underscores".to_string(),
            ));
        }

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        // Uniqueness is case-insensitive ("Alice" and "alice" collide)
        if self
            .user_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        let password_hash = hash_password(&input.password)?;

        let user_id = self.id_gen.generate();
        let token = self.id_gen.generate_token();

        let user_model = user::ActiveModel {
            id: Set(user_id.clone()),
            email: Set(input.email),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            password_hash: Set(password_hash),
            token: Set(Some(token)),
            is_admin: Set(false),
            ..Default::default()
        };

        let created = self.user_repo.create(user_model).await?;

        let profile_model = profile::ActiveModel {
            user_id: Set(user_id.clone()),
            is_public: Set(false),
            ..Default::default()
        };
        self.profile_repo.create(profile_model).await?;

        tracing::info!(user_id = %user_id, "Registered new account");

        Ok(created)
    }

    /// Authenticate with email-or-username and password.
    pub async fn signin(&self, input: SigninInput) -> AppResult<user::Model> {
        input.validate()?;

        let user = if input.identifier.contains('@') {
            self.user_repo.find_by_email(&input.identifier).await?
        } else {
            self.user_repo.find_by_username(&input.identifier).await?
        };

        let Some(user) = user else {
            return Err(AppError::Unauthorized);
        };

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        Ok(user)
    }

    /// Look up the account holding an API token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<Option<user::Model>> {
        if token.is_empty() {
            return Ok(None);
        }
        self.user_repo.find_by_token(token).await
    }

    /// Issue a fresh API token, invalidating the previous one.
    pub async fn regenerate_token(&self, user_id: &str) -> AppResult<String> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let token = self.id_gen.generate_token();
        self.user_repo.set_token(&user.id, &token).await?;

        Ok(token)
    }
}

fn is_valid_username(username: &str) -> bool {
    !username.is_empty()
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))?;

    Ok(hash.to_string())
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
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_user(id: &str, email: &str, username: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: email.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            password_hash: hash_password("correct horse").unwrap(),
            token: Some("token123".to_string()),
            is_admin: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_is_valid_username() {
        assert!(is_valid_username("alice_1"));
        assert!(!is_valid_username("alice bob"));
        assert!(!is_valid_username("alice!"));
        assert!(!is_valid_username(""));
    }

    #[test]
    fn test_hash_and_verify_password() {
        let hash = hash_password("secret-password").unwrap();
        assert!(verify_password("secret-password", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_signup_rejects_duplicate_email() {
        let existing = create_test_user("u1", "a@example.com", "alice");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );
        let profile_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = AccountService::new(
            UserRepository::new(user_db),
            ProfileRepository::new(profile_db),
        );

        let result = service
            .signup(SignupInput {
                email: "a@example.com".to_string(),
                username: "bob".to_string(),
                password: "longenough".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_signup_rejects_invalid_username() {
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let profile_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = AccountService::new(
            UserRepository::new(user_db),
            ProfileRepository::new(profile_db),
        );

        let result = service
            .signup(SignupInput {
                email: "a@example.com".to_string(),
                username: "not valid!".to_string(),
                password: "longenough".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_signin_wrong_password() {
        let existing = create_test_user("u1", "a@example.com", "alice");

        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );
        let profile_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = AccountService::new(
            UserRepository::new(user_db),
            ProfileRepository::new(profile_db),
        );

        let result = service
            .signin(SigninInput {
                identifier: "a@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_signin_unknown_user() {
        let user_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let profile_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = AccountService::new(
            UserRepository::new(user_db),
            ProfileRepository::new(profile_db),
        );

        let result = service
            .signin(SigninInput {
                identifier: "ghost".to_string(),
                password: "whatever".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_by_empty_token() {
        let user_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let profile_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = AccountService::new(
            UserRepository::new(user_db),
            ProfileRepository::new(profile_db),
        );

        let result = service.authenticate_by_token("").await.unwrap();
        assert!(result.is_none());
    }
}
