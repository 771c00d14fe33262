use std::sync::Arc;

use tracing::{info, instrument};
use user_entitlement_sdk::UserDto;

use crate::domain::error::DomainError;
use crate::domain::repos::UserRepository;

pub struct UserService<U: UserRepository> {
    repo: Arc<U>,
}

impl<U: UserRepository> UserService<U> {
    pub fn new(repo: Arc<U>) -> Self {
        Self { repo }
    }

    #[instrument(skip(self), fields(user_id = %id))]
    pub async fn get_user(&self, id: i32) -> Result<UserDto, DomainError> {
        self.repo
            .get(id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))
    }

    /// Usernames are unique and at most 50 characters.
    #[instrument(skip(self))]
    pub async fn create_user(&self, username: &str) -> Result<UserDto, DomainError> {
        if username.trim().is_empty() {
            return Err(DomainError::validation("username", "must not be empty"));
        }
        if username.len() > 50 {
            return Err(DomainError::validation(
                "username",
                "must be at most 50 characters",
            ));
        }

        if self.repo.find_by_username(username).await?.is_some() {
            return Err(DomainError::UsernameTaken {
                username: username.to_owned(),
            });
        }

        let user = self.repo.insert(username).await?;
        info!(user_id = user.id, "user created");
        Ok(user)
    }
}
