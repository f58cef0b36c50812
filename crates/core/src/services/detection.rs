//! AI image detection service.
//!
//! Calls an external classifier over HTTP. Detection is best-effort:
//! the caller decides what to do when the service is unavailable.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use shutter_common::{AppError, AppResult, DetectionConfig};
use std::time::Duration;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct DetectionRequest {
    image_base64: String,
}

/// Verdict from the external classifier.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    /// Whether the image was classified as AI-generated.
    #[serde(rename = "isAI")]
    pub is_ai: bool,
    /// Confidence percentage, 0 to 100.
    pub confidence: i32,
    /// Human-readable explanation.
    pub reason: Option<String>,
}

/// AI detection service.
#[derive(Clone)]
pub struct DetectionService {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl DetectionService {
    /// Create a new detection service from configuration.
    pub fn new(config: &DetectionConfig) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Whether an endpoint is configured.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Classify image bytes. Returns `None` when no endpoint is configured.
    pub async fn check(&self, image_bytes: &[u8]) -> AppResult<Option<DetectionResult>> {
        let Some(endpoint) = &self.endpoint else {
            return Ok(None);
        };

        let request = DetectionRequest {
            image_base64: base64::engine::general_purpose::STANDARD.encode(image_bytes),
        };

        let response = self
            .client
            .post(endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Detection request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::ExternalService(format!(
                "Detection service returned {}",
                response.status()
            )));
        }

        let result: DetectionResult = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("Invalid detection response: {e}")))?;

        Ok(Some(result))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_check_disabled_without_endpoint() {
        let service = DetectionService::new(&DetectionConfig {
            endpoint: None,
            timeout_secs: 5,
        })
        .unwrap();

        assert!(!service.is_enabled());
        let result = service.check(b"not an image").await.unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_detection_result_parsing() {
        let json = r#"{"isAI": true, "confidence": 87, "reason": "texture artifacts"}"#;
        let result: DetectionResult = serde_json::from_str(json).unwrap();

        assert!(result.is_ai);
        assert_eq!(result.confidence, 87);
        assert_eq!(result.reason.as_deref(), Some("texture artifacts"));
    }

    #[test]
    fn test_detection_result_without_reason() {
        let json = r#"{"isAI": false, "confidence": 12}"#;
        let result: DetectionResult = serde_json::from_str(json).unwrap();

        assert!(!result.is_ai);
        assert!(result.reason.is_none());
    }
}
