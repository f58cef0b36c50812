//! Profile service.

use sea_orm::Set;
use serde::Deserialize;
use shutter_common::{AppError, AppResult};
use shutter_db::{
    entities::profile,
    repositories::{FollowRepository, ProfileRepository},
};
use validator::Validate;

/// Profile update input. Absent fields are left untouched.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileInput {
    /// Display name.
    #[validate(length(max = 100))]
    pub name: Option<String>,
    /// Age in years.
    #[validate(range(min = 13, max = 120))]
    pub age: Option<i32>,
    /// Avatar URL.
    #[validate(length(max = 512))]
    pub avatar_url: Option<String>,
    /// Continent name.
    #[validate(length(max = 64))]
    pub continent: Option<String>,
    /// Country name.
    #[validate(length(max = 128))]
    pub country: Option<String>,
    /// ISO country code.
    #[validate(length(max = 8))]
    pub country_code: Option<String>,
    /// State or province name.
    #[validate(length(max = 128))]
    pub state: Option<String>,
    /// District name.
    #[validate(length(max = 128))]
    pub district: Option<String>,
    /// City name.
    #[validate(length(max = 128))]
    pub city: Option<String>,
    /// Opt in to public visibility. Opting back out is not supported.
    pub is_public: Option<bool>,
}

/// Profile service for business logic.
#[derive(Clone)]
pub struct ProfileService {
    profile_repo: ProfileRepository,
    follow_repo: FollowRepository,
}

impl ProfileService {
    /// Create a new profile service.
    #[must_use]
    pub const fn new(profile_repo: ProfileRepository, follow_repo: FollowRepository) -> Self {
        Self {
            profile_repo,
            follow_repo,
        }
    }

    /// Get a profile. Private profiles are visible only to their owner
    /// and to the owner's followers.
    pub async fn get(&self, viewer_id: Option<&str>, user_id: &str) -> AppResult<profile::Model> {
        let profile = self
            .profile_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if !profile.is_public && !self.can_view(viewer_id, user_id).await? {
            return Err(AppError::Forbidden);
        }

        Ok(profile)
    }

    /// Whether a viewer may see a private profile.
    pub async fn can_view(&self, viewer_id: Option<&str>, owner_id: &str) -> AppResult<bool> {
        match viewer_id {
            Some(viewer) if viewer == owner_id => Ok(true),
            Some(viewer) => self.follow_repo.is_following(viewer, owner_id).await,
            None => Ok(false),
        }
    }

    /// Get the caller's own profile.
    pub async fn get_own(&self, user_id: &str) -> AppResult<profile::Model> {
        self.profile_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    /// Update the caller's profile.
    ///
    /// `is_public` is a one-way switch: a profile can be made public, but
    /// never taken private again.
    pub async fn update(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<profile::Model> {
        input.validate()?;

        let existing = self
            .profile_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        if input.is_public == Some(false) && existing.is_public {
            return Err(AppError::BadRequest(
                "A public profile cannot be made private".to_string(),
            ));
        }

        let mut model = profile::ActiveModel {
            user_id: Set(user_id.to_string()),
            updated_at: Set(Some(chrono::Utc::now().into())),
            ..Default::default()
        };

        if let Some(name) = input.name {
            model.name = Set(Some(name));
        }
        if let Some(age) = input.age {
            model.age = Set(Some(age));
        }
        if let Some(avatar_url) = input.avatar_url {
            model.avatar_url = Set(Some(avatar_url));
        }
        if let Some(continent) = input.continent {
            model.continent = Set(Some(continent));
        }
        if let Some(country) = input.country {
            model.country = Set(Some(country));
        }
        if let Some(country_code) = input.country_code {
            model.country_code = Set(Some(country_code));
        }
        if let Some(state) = input.state {
            model.state = Set(Some(state));
        }
        if let Some(district) = input.district {
            model.district = Set(Some(district));
        }
        if let Some(city) = input.city {
            model.city = Set(Some(city));
        }
        if input.is_public == Some(true) {
            model.is_public = Set(true);
        }

        self.profile_repo.update(model).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_profile(user_id: &str, is_public: bool) -> profile::Model {
        profile::Model {
            user_id: user_id.to_string(),
            name: Some("Test".to_string()),
            age: Some(30),
            avatar_url: None,
            continent: Some("Europe".to_string()),
            country: Some("France".to_string()),
            country_code: Some("FR".to_string()),
            state: None,
            district: None,
            city: Some("Paris".to_string()),
            is_public,
            badge_rank: None,
            total_images: 0,
            followers_count: 0,
            following_count: 0,
            average_rating: 0.0,
            total_ratings_received: 0,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn build_service(
        profile_db: Arc<sea_orm::DatabaseConnection>,
        follow_db: Arc<sea_orm::DatabaseConnection>,
    ) -> ProfileService {
        ProfileService::new(
            ProfileRepository::new(profile_db),
            FollowRepository::new(follow_db),
        )
    }

    #[tokio::test]
    async fn test_get_private_profile_by_stranger() {
        let profile = create_test_profile("u1", false);

        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile]])
                .into_connection(),
        );
        // Viewer does not follow the owner
        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<shutter_db::entities::follow::Model>::new()])
                .into_connection(),
        );

        let service = build_service(profile_db, follow_db);
        let result = service.get(Some("u2"), "u1").await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_get_private_profile_by_follower() {
        let profile = create_test_profile("u1", false);
        let edge = shutter_db::entities::follow::Model {
            id: "f1".to_string(),
            follower_id: "u2".to_string(),
            following_id: "u1".to_string(),
            created_at: Utc::now().into(),
        };

        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile]])
                .into_connection(),
        );
        let follow_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[edge]])
                .into_connection(),
        );

        let service = build_service(profile_db, follow_db);
        let result = service.get(Some("u2"), "u1").await.unwrap();

        assert_eq!(result.user_id, "u1");
    }

    #[tokio::test]
    async fn test_get_private_profile_by_owner() {
        let profile = create_test_profile("u1", false);

        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile]])
                .into_connection(),
        );
        let follow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = build_service(profile_db, follow_db);
        let result = service.get(Some("u1"), "u1").await.unwrap();

        assert_eq!(result.user_id, "u1");
    }

    #[tokio::test]
    async fn test_get_public_profile_anonymously() {
        let profile = create_test_profile("u1", true);

        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile]])
                .into_connection(),
        );
        let follow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = build_service(profile_db, follow_db);
        let result = service.get(None, "u1").await.unwrap();

        assert!(result.is_public);
    }

    #[tokio::test]
    async fn test_update_cannot_revoke_public() {
        let profile = create_test_profile("u1", true);

        let profile_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[profile]])
                .into_connection(),
        );
        let follow_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = build_service(profile_db, follow_db);
        let result = service
            .update(
                "u1",
                UpdateProfileInput {
                    is_public: Some(false),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
