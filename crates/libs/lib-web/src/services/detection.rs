//! # Detection Service
//!
//! Eye disease detection through a hosted inference API.
//!
//! ## Flow
//!
//! ```text
//! data URL → base64 payload → decode image → POST {api_url}/{model_id}
//!          → keep predictions for known conditions → DetectResponse
//! ```
//!
//! The base64 payload is forwarded as-is; decoding happens only to reject
//! garbage before spending an upstream call on it.

use lib_core::dto::{BoundingBox, DetectRequest, DetectResponse, Detection, DETECTABLE_CLASSES};
use lib_core::{AppError, Config};
use lib_utils::{b64_decode, split_data_url};
use serde::Deserialize;
use tracing::{debug, error, instrument};

/// Raw prediction from the inference API.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InferencePrediction {
    pub class: Option<String>,
    pub confidence: Option<f64>,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InferenceResponse {
    pub predictions: Vec<InferencePrediction>,
}

/// Check that the uploaded bytes decode to an image.
pub fn ensure_decodable(bytes: &[u8]) -> Result<(u32, u32), image::ImageError> {
    let img = image::load_from_memory(bytes)?;
    Ok((img.width(), img.height()))
}

/// Keep predictions whose class is a known condition.
pub fn filter_detections(predictions: Vec<InferencePrediction>) -> Vec<Detection> {
    predictions
        .into_iter()
        .filter_map(|p| {
            let class = p.class?;
            if !DETECTABLE_CLASSES.contains(&class.as_str()) {
                return None;
            }
            Some(Detection {
                class,
                confidence: p.confidence,
                bbox: BoundingBox {
                    x: p.x,
                    y: p.y,
                    width: p.width,
                    height: p.height,
                },
            })
        })
        .collect()
}

/// Client for the hosted eye disease model.
pub struct DetectionService {
    client: reqwest::Client,
    api_url: String,
    model_id: String,
    api_key: Option<String>,
}

impl DetectionService {
    pub fn from_config(config: &Config) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: config.roboflow_api_url.trim_end_matches('/').to_string(),
            model_id: config.roboflow_model_id.clone(),
            api_key: config.roboflow_api_key.clone(),
        }
    }

    /// Validate the uploaded image and run it through the model.
    #[instrument(skip(self, request))]
    pub async fn detect(&self, request: DetectRequest) -> Result<DetectResponse, AppError> {
        let data_url = request
            .image
            .ok_or_else(|| AppError::InvalidInput("No image provided".to_string()))?;

        let payload = split_data_url(&data_url).ok_or_else(|| {
            error!("Error decoding image: data URL has no payload");
            AppError::Decoding("Invalid image data".to_string())
        })?;

        let bytes = b64_decode(payload).map_err(|e| {
            error!("Error decoding image: {}", e);
            AppError::Decoding("Invalid image data".to_string())
        })?;

        let size_bytes = bytes.len();
        let (width, height) = tokio::task::spawn_blocking(move || ensure_decodable(&bytes))
            .await
            .map_err(|e| AppError::Internal(format!("image decode task failed: {}", e)))?
            .map_err(|e| {
                debug!("Image decode failed: {}", e);
                AppError::Decoding("Could not decode image".to_string())
            })?;
        debug!(width, height, size_bytes, "image accepted for detection");

        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("Detection service is not configured".to_string()))?;

        let inference = self.infer(api_key, payload).await.map_err(|e| {
            error!("Error during inference: {}", e);
            AppError::Upstream("Inference failed".to_string())
        })?;

        Ok(DetectResponse::new(filter_detections(inference.predictions)))
    }

    async fn infer(&self, api_key: &str, payload: &str) -> Result<InferenceResponse, reqwest::Error> {
        let url = format!("{}/{}", self.api_url, self.model_id);
        self.client
            .post(url)
            .query(&[("api_key", api_key)])
            .header(reqwest::header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(payload.trim().to_string())
            .send()
            .await?
            .error_for_status()?
            .json::<InferenceResponse>()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 1x1 transparent PNG
    const TINY_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn service() -> DetectionService {
        DetectionService::from_config(&Config::default())
    }

    #[test]
    fn test_ensure_decodable() {
        let png = b64_decode(TINY_PNG).unwrap();
        assert_eq!(ensure_decodable(&png).unwrap(), (1, 1));
        assert!(ensure_decodable(b"hello world").is_err());
        // Signature with no image data behind it
        assert!(ensure_decodable(&png[..8]).is_err());
    }

    #[test]
    fn test_filter_keeps_known_classes() {
        let predictions = vec![
            InferencePrediction {
                class: Some("glaucoma".into()),
                confidence: Some(0.91),
                x: Some(10.0),
                y: Some(20.0),
                width: Some(30.0),
                height: Some(40.0),
            },
            InferencePrediction {
                class: Some("pink_eye".into()),
                ..Default::default()
            },
            InferencePrediction::default(),
        ];

        let detections = filter_detections(predictions);
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].class, "glaucoma");
        assert_eq!(detections[0].bbox.width, Some(30.0));
    }

    #[test]
    fn test_inference_response_tolerates_missing_fields() {
        let parsed: InferenceResponse =
            serde_json::from_str(r#"{"predictions":[{"class":"cataract"}],"image":{"width":1}}"#).unwrap();
        assert_eq!(parsed.predictions[0].class.as_deref(), Some("cataract"));

        let empty: InferenceResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.predictions.is_empty());
    }

    #[tokio::test]
    async fn test_missing_image() {
        let err = service().detect(DetectRequest { image: None }).await.unwrap_err();
        assert_eq!(err.user_message(), "No image provided");
    }

    #[tokio::test]
    async fn test_invalid_payloads() {
        let err = service()
            .detect(DetectRequest { image: Some("no-comma-here".into()) })
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Invalid image data");

        let err = service()
            .detect(DetectRequest { image: Some("data:image/png;base64,@@@".into()) })
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Invalid image data");

        // Valid base64, not an image
        let err = service()
            .detect(DetectRequest { image: Some("data:image/png;base64,aGVsbG8gd29ybGQ=".into()) })
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Could not decode image");
    }

    #[tokio::test]
    async fn test_truncated_images_are_not_decodable() {
        // PNG signature alone, then a bare "BM" bitmap header
        for image in ["data:image/png;base64,iVBORw0KGgo=", "data:image/bmp;base64,Qk0="] {
            let err = service()
                .detect(DetectRequest { image: Some(image.into()) })
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Decoding(_)));
            assert_eq!(err.user_message(), "Could not decode image");
        }
    }

    #[tokio::test]
    async fn test_unconfigured_service_rejects_valid_image() {
        let err = service()
            .detect(DetectRequest { image: Some(format!("data:image/png;base64,{}", TINY_PNG)) })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
