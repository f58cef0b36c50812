//! Image endpoints.

use axum::{
    Router,
    extract::{Multipart, Path, State},
    routing::{get, post},
};
use serde::Serialize;
use shutter_common::{AppError, AppResult};
use shutter_core::services::image::UploadImageInput;
use shutter_db::entities::image;

use crate::{
    extractors::{AuthUser, MaybeAuthUser},
    middleware::AppState,
    response::ApiResponse,
};

/// Image response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageResponse {
    pub id: String,
    pub user_id: String,
    pub image_url: String,
    pub title: Option<String>,
    pub caption: Option<String>,
    pub description: Option<String>,
    pub average_rating: f64,
    pub total_ratings: i32,
    pub is_flagged: bool,
    pub ai_detected: Option<bool>,
    pub ai_confidence: Option<i32>,
    pub created_at: String,
    /// The viewer's own score on this image, when asked for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub my_rating: Option<i32>,
}

impl From<image::Model> for ImageResponse {
    fn from(i: image::Model) -> Self {
        Self {
            id: i.id,
            user_id: i.user_id,
            image_url: i.image_url,
            title: i.title,
            caption: i.caption,
            description: i.description,
            average_rating: i.average_rating,
            total_ratings: i.total_ratings,
            is_flagged: i.is_flagged,
            ai_detected: i.ai_detected,
            ai_confidence: i.ai_confidence,
            created_at: i.created_at.to_rfc3339(),
            my_rating: None,
        }
    }
}

/// Upload a photo (multipart: `file` plus optional text fields).
async fn upload(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<ApiResponse<ImageResponse>> {
    let mut file_name = String::new();
    let mut content_type = "application/octet-stream".to_string();
    let mut data: Option<Vec<u8>> = None;
    let mut input = UploadImageInput::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "file" => {
                file_name = field.file_name().unwrap_or("upload").to_string();
                if let Some(ct) = field.content_type() {
                    content_type = ct.to_string();
                }
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read file: {e}")))?;
                data = Some(bytes.to_vec());
            }
            "title" => {
                input.title = Some(read_text(field).await?);
            }
            "caption" => {
                input.caption = Some(read_text(field).await?);
            }
            "description" => {
                input.description = Some(read_text(field).await?);
            }
            _ => {}
        }
    }

    let data = data.ok_or_else(|| AppError::BadRequest("Missing file field".to_string()))?;

    let created = state
        .image_service
        .upload(&user.id, &file_name, &content_type, &data, input)
        .await?;

    Ok(ApiResponse::ok(created.into()))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid field value: {e}")))
}

/// Get one image, with the viewer's own rating attached when signed in.
async fn show(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> AppResult<ApiResponse<ImageResponse>> {
    let image = state.image_service.get(&image_id).await?;

    let my_rating = match &viewer {
        Some(user) => state.rating_service.get(&user.id, &image.id).await?,
        None => None,
    };

    let mut response = ImageResponse::from(image);
    response.my_rating = my_rating;

    Ok(ApiResponse::ok(response))
}

/// List a user's images. Gated by the same visibility rule as the
/// owner's profile.
async fn by_user(
    MaybeAuthUser(viewer): MaybeAuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<ApiResponse<Vec<ImageResponse>>> {
    state
        .profile_service
        .get(viewer.as_ref().map(|u| u.id.as_str()), &user_id)
        .await?;

    let images = state.image_service.list_by_owner(&user_id).await?;
    Ok(ApiResponse::ok(images.into_iter().map(Into::into).collect()))
}

/// Delete an image (owner or admin).
async fn remove(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Path(image_id): Path<String>,
) -> AppResult<ApiResponse<()>> {
    state
        .image_service
        .delete(&user.id, user.is_admin, &image_id)
        .await?;
    Ok(ApiResponse::ok(()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload))
        .route("/user/{user_id}", get(by_user))
        .route("/{image_id}", get(show).delete(remove))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_response() -> ImageResponse {
        ImageResponse {
            id: "img1".to_string(),
            user_id: "u1".to_string(),
            image_url: "/files/2025/img1.jpg".to_string(),
            title: Some("Sunset".to_string()),
            caption: None,
            description: None,
            average_rating: 7.5,
            total_ratings: 4,
            is_flagged: false,
            ai_detected: Some(false),
            ai_confidence: Some(12),
            created_at: Utc::now().to_rfc3339(),
            my_rating: None,
        }
    }

    #[test]
    fn test_image_response_serialization() {
        let json = serde_json::to_string(&sample_response()).unwrap();
        assert!(json.contains("\"imageUrl\":\"/files/2025/img1.jpg\""));
        assert!(json.contains("\"averageRating\":7.5"));
        assert!(json.contains("\"totalRatings\":4"));
    }

    #[test]
    fn test_my_rating_omitted_when_absent() {
        let json = serde_json::to_string(&sample_response()).unwrap();
        assert!(!json.contains("myRating"));

        let mut with_rating = sample_response();
        with_rating.my_rating = Some(9);
        let json = serde_json::to_string(&with_rating).unwrap();
        assert!(json.contains("\"myRating\":9"));
    }
}
