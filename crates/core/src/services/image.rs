//! Image service.
//!
//! Upload, fetch, list, and delete photos.

use std::sync::Arc;

use crate::services::detection::DetectionService;
use sea_orm::Set;
use serde::Deserialize;
use shutter_common::{
    AppError, AppResult, IdGenerator, StorageBackend, generate_storage_key,
};
use shutter_db::{
    entities::image,
    repositories::{ImageRepository, ProfileRepository},
};
use validator::Validate;

/// Upload metadata accompanying the file.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UploadImageInput {
    /// Short title.
    #[validate(length(max = 100))]
    pub title: Option<String>,
    /// One-line caption.
    #[validate(length(max = 150))]
    pub caption: Option<String>,
    /// Longer description.
    #[validate(length(max = 2000))]
    pub description: Option<String>,
}

/// Image service for business logic.
#[derive(Clone)]
pub struct ImageService {
    image_repo: ImageRepository,
    profile_repo: ProfileRepository,
    storage: Arc<dyn StorageBackend>,
    detection: DetectionService,
    max_upload_bytes: usize,
    id_gen: IdGenerator,
}

impl ImageService {
    /// Create a new image service.
    #[must_use]
    pub fn new(
        image_repo: ImageRepository,
        profile_repo: ProfileRepository,
        storage: Arc<dyn StorageBackend>,
        detection: DetectionService,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            image_repo,
            profile_repo,
            storage,
            detection,
            max_upload_bytes,
            id_gen: IdGenerator::new(),
        }
    }

    /// Upload a photo and create its image record.
    ///
    /// The external AI check is best-effort: a detector failure logs a
    /// warning and the upload proceeds without a verdict.
    pub async fn upload(
        &self,
        user_id: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
        input: UploadImageInput,
    ) -> AppResult<image::Model> {
        input.validate()?;

        if data.is_empty() {
            return Err(AppError::BadRequest("Empty file".to_string()));
        }
        if data.len() > self.max_upload_bytes {
            return Err(AppError::BadRequest(format!(
                "File exceeds maximum size of {} bytes",
                self.max_upload_bytes
            )));
        }

        // Reject non-image payloads regardless of the declared content type
        if ::image::guess_format(data).is_err() {
            return Err(AppError::BadRequest(
                "File is not a recognized image format".to_string(),
            ));
        }

        let detection = match self.detection.check(data).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, "AI detection failed, continuing without verdict");
                None
            }
        };

        let key = generate_storage_key(user_id, file_name);
        let stored = self.storage.upload(&key, data, content_type).await?;

        let model = image::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            image_url: Set(stored.url),
            title: Set(input.title),
            caption: Set(input.caption),
            description: Set(input.description),
            ai_detected: Set(detection.as_ref().map(|d| d.is_ai)),
            ai_confidence: Set(detection.as_ref().map(|d| d.confidence)),
            ai_detection_reason: Set(detection.and_then(|d| d.reason)),
            ..Default::default()
        };

        let created = self.image_repo.create(model).await?;
        self.profile_repo.increment_total_images(user_id).await?;

        tracing::info!(image_id = %created.id, user_id = %user_id, "Uploaded image");

        Ok(created)
    }

    /// Get an image by ID.
    pub async fn get(&self, id: &str) -> AppResult<image::Model> {
        self.image_repo.get_by_id(id).await
    }

    /// List a user's images, newest first.
    pub async fn list_by_owner(&self, user_id: &str) -> AppResult<Vec<image::Model>> {
        self.image_repo.find_by_owner(user_id).await
    }

    /// Delete an image. Only the owner or an admin may delete.
    ///
    /// The owner's profile aggregates are recomputed afterwards, since the
    /// ratings on the deleted image no longer count. Removing the stored
    /// file is best-effort: the database row is the source of truth.
    pub async fn delete(&self, caller_id: &str, is_admin: bool, image_id: &str) -> AppResult<()> {
        let image = self.image_repo.get_by_id(image_id).await?;

        if image.user_id != caller_id && !is_admin {
            return Err(AppError::Forbidden);
        }

        self.image_repo.delete(image_id).await?;
        self.profile_repo
            .decrement_total_images(&image.user_id)
            .await?;
        self.profile_repo
            .recompute_rating_aggregates(&image.user_id)
            .await?;

        if let Some(key) = self.storage.key_for_url(&image.image_url) {
            if let Err(e) = self.storage.delete(&key).await {
                tracing::warn!(error = %e, image_id = %image_id, "Failed to delete stored file");
            }
        }

        tracing::info!(image_id = %image_id, caller_id = %caller_id, "Deleted image");

        Ok(())
    }
}
