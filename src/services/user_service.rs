//! User service - Handles user-related business logic.
//!
//! Registration, profile updates, password changes, photos and the
//! one-time genesis admin.

use async_trait::async_trait;
use std::sync::Arc;
use validator::ValidateEmail;

use crate::config::{GenesisSettings, GENESIS_NAME, MAX_TEXT_LENGTH, MIN_NAME_LENGTH};
use crate::domain::{
    ensure_confirmed, validate_password, AccessLevel, CreateUser, CredentialHasher, Image,
    UpdateUser, User,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::UnitOfWork;

/// Self-registration input
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
}

/// Password change input
#[derive(Debug, Clone)]
pub struct PasswordChange {
    pub old_password: String,
    pub new_password: String,
    pub new_password_confirmation: String,
}

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Register a new basic user
    async fn register(&self, registration: Registration) -> AppResult<User>;

    /// Get user by ID
    async fn get_user(&self, id: i64) -> AppResult<User>;

    /// List all users, newest first
    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Update profile fields and, for admins, the access level
    async fn update_user(&self, id: i64, changes: UpdateUser) -> AppResult<User>;

    /// Delete a user
    async fn delete_user(&self, id: i64) -> AppResult<()>;

    /// Change password after verifying the old one
    async fn change_password(&self, id: i64, change: PasswordChange) -> AppResult<()>;

    /// Store or replace the user's photo
    async fn update_photo(&self, id: i64, photo: Vec<u8>) -> AppResult<()>;

    /// Remove the user's photo
    async fn delete_photo(&self, id: i64) -> AppResult<()>;

    /// Load the user's photo
    async fn get_photo(&self, id: i64) -> AppResult<Image>;

    /// Seed an admin when no users exist. Returns `None` when nothing was created.
    async fn create_genesis_user(&self, seed: &GenesisSettings) -> AppResult<Option<User>>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
    hasher: Arc<dyn CredentialHasher>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { uow, hasher }
    }

    async fn ensure_email_free(&self, email: &str, owner: Option<i64>) -> AppResult<()> {
        match self.uow.users().find_by_email(email).await? {
            Some(other) if Some(other.id) != owner => {
                Err(AppError::conflict("User with this email"))
            }
            _ => Ok(()),
        }
    }

    async fn ensure_username_free(&self, username: &str, owner: Option<i64>) -> AppResult<()> {
        match self.uow.users().find_by_username(username).await? {
            Some(other) if Some(other.id) != owner => {
                Err(AppError::conflict("User with this username"))
            }
            _ => Ok(()),
        }
    }
}

fn validate_length(field: &str, value: &str) -> AppResult<()> {
    let len = value.chars().count();
    if len < MIN_NAME_LENGTH || len > MAX_TEXT_LENGTH {
        return Err(AppError::validation(format!(
            "{} must be between {} and {} characters",
            field, MIN_NAME_LENGTH, MAX_TEXT_LENGTH
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> AppResult<()> {
    if !email.validate_email() {
        return Err(AppError::validation("Invalid email format"));
    }
    Ok(())
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn register(&self, registration: Registration) -> AppResult<User> {
        let name = registration.name.trim().to_string();
        let username = registration.username.trim().to_string();
        let email = registration.email.trim().to_string();
        let password = registration.password.trim();
        let confirmation = registration.password_confirmation.trim();

        ensure_confirmed(password, confirmation)?;
        validate_length("Name", &name)?;
        validate_length("Username", &username)?;
        validate_email(&email)?;
        validate_password(password)?;

        self.ensure_email_free(&email, None).await?;
        self.ensure_username_free(&username, None).await?;

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .uow
            .users()
            .create(CreateUser {
                name,
                username,
                email,
                password_hash,
                access_level: AccessLevel::Basic,
            })
            .await?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> AppResult<User> {
        self.uow.users().find_by_id(id).await?.ok_or_not_found("User")
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.users().list().await
    }

    async fn update_user(&self, id: i64, changes: UpdateUser) -> AppResult<User> {
        let changes = UpdateUser {
            name: changes.name.map(|v| v.trim().to_string()),
            username: changes.username.map(|v| v.trim().to_string()),
            email: changes.email.map(|v| v.trim().to_string()),
            access_level: changes.access_level,
        };

        if let Some(name) = &changes.name {
            validate_length("Name", name)?;
        }
        if let Some(username) = &changes.username {
            validate_length("Username", username)?;
            self.ensure_username_free(username, Some(id)).await?;
        }
        if let Some(email) = &changes.email {
            validate_email(email)?;
            self.ensure_email_free(email, Some(id)).await?;
        }

        if changes.is_empty() {
            return self.get_user(id).await;
        }

        self.uow.users().update(id, changes).await
    }

    async fn delete_user(&self, id: i64) -> AppResult<()> {
        self.uow.users().delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    async fn change_password(&self, id: i64, change: PasswordChange) -> AppResult<()> {
        let user = self.get_user(id).await?;

        if !self
            .hasher
            .verify(change.old_password.trim(), &user.password_hash)?
        {
            return Err(AppError::validation("Old password is wrong"));
        }

        let new_password = change.new_password.trim();
        ensure_confirmed(new_password, change.new_password_confirmation.trim())?;
        validate_password(new_password)?;

        let password_hash = self.hasher.hash(new_password)?;
        self.uow.users().update_password(id, password_hash).await?;

        tracing::info!(user_id = id, "Password changed");
        Ok(())
    }

    async fn update_photo(&self, id: i64, photo: Vec<u8>) -> AppResult<()> {
        let photo = Image::from_upload(photo)?;
        self.uow.users().update_photo(id, Some(photo.bytes)).await
    }

    async fn delete_photo(&self, id: i64) -> AppResult<()> {
        self.uow.users().update_photo(id, None).await
    }

    async fn get_photo(&self, id: i64) -> AppResult<Image> {
        self.get_user(id).await?;
        self.uow
            .users()
            .find_photo(id)
            .await?
            .map(Image::new)
            .ok_or_not_found("Photo")
    }

    async fn create_genesis_user(&self, seed: &GenesisSettings) -> AppResult<Option<User>> {
        if self.uow.users().count().await? > 0 {
            tracing::debug!("Users already exist, skipping genesis admin");
            return Ok(None);
        }

        let Some(password) = seed.password().map(str::trim) else {
            tracing::warn!("User table is empty but GENESIS_PASSWORD is not set; no admin created");
            return Ok(None);
        };

        let username = seed.username.trim().to_string();
        let email = seed.email.trim().to_string();
        validate_length("Username", &username)?;
        validate_email(&email)?;
        validate_password(password)?;

        let password_hash = self.hasher.hash(password)?;
        let user = self
            .uow
            .users()
            .create(CreateUser {
                name: GENESIS_NAME.to_string(),
                username,
                email,
                password_hash,
                access_level: AccessLevel::Admin,
            })
            .await?;

        tracing::info!(user_id = user.id, username = %user.username, "Genesis admin created");
        Ok(Some(user))
    }
}
