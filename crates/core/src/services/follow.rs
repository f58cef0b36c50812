//! Follow service.

use sea_orm::Set;
use shutter_common::{AppError, AppResult, IdGenerator};
use shutter_db::{
    entities::follow,
    repositories::{FollowRepository, ProfileRepository, UserRepository},
};

/// Follow service for business logic.
#[derive(Clone)]
pub struct FollowService {
    follow_repo: FollowRepository,
    user_repo: UserRepository,
    profile_repo: ProfileRepository,
    id_gen: IdGenerator,
}

impl FollowService {
    /// Create a new follow service.
    #[must_use]
    pub fn new(
        follow_repo: FollowRepository,
        user_repo: UserRepository,
        profile_repo: ProfileRepository,
    ) -> Self {
        Self {
            follow_repo,
            user_repo,
            profile_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Follow a user.
    pub async fn follow(&self, follower_id: &str, following_id: &str) -> AppResult<follow::Model> {
        if follower_id == following_id {
            return Err(AppError::BadRequest("Cannot follow yourself".to_string()));
        }

        if self
            .user_repo
            .find_by_id(following_id)
            .await?
            .is_none()
        {
            return Err(AppError::UserNotFound);
        }

        if self.follow_repo.is_following(follower_id, following_id).await? {
            return Err(AppError::Conflict("Already following".to_string()));
        }

        let model = follow::ActiveModel {
            id: Set(self.id_gen.generate()),
            follower_id: Set(follower_id.to_string()),
            following_id: Set(following_id.to_string()),
            ..Default::default()
        };

        let created = self.follow_repo.create(model).await?;

        self.profile_repo
            .increment_followers_count(following_id)
            .await?;
        self.profile_repo
            .increment_following_count(follower_id)
            .await?;

        Ok(created)
    }

    /// Unfollow a user.
    pub async fn unfollow(&self, follower_id: &str, following_id: &str) -> AppResult<()> {
        let deleted = self
            .follow_repo
            .delete_by_pair(follower_id, following_id)
            .await?;

        if !deleted {
            return Err(AppError::NotFound("Not following this user".to_string()));
        }

        self.profile_repo
            .decrement_followers_count(following_id)
            .await?;
        self.profile_repo
            .decrement_following_count(follower_id)
            .await?;

        Ok(())
    }

    /// Whether one user follows another.
    pub async fn is_following(&self, follower_id: &str, following_id: &str) -> AppResult<bool> {
        self.follow_repo.is_following(follower_id, following_id).await
    }

    /// IDs of users following the given user.
    pub async fn followers(&self, user_id: &str) -> AppResult<Vec<String>> {
        let edges = self.follow_repo.find_followers(user_id).await?;
        Ok(edges.into_iter().map(|f| f.follower_id).collect())
    }

    /// IDs of users the given user follows.
    pub async fn following(&self, user_id: &str) -> AppResult<Vec<String>> {
        let edges = self.follow_repo.find_following(user_id).await?;
        Ok(edges.into_iter().map(|f| f.following_id).collect())
    }
}
