//! # Detection Handler
//!
//! **Route**: `POST /detect`
//!
//! ```bash
//! curl -X POST http://localhost:5000/detect \
//!   -H "Content-Type: application/json" \
//!   -d '{"image": "data:image/jpeg;base64,/9j/4AAQ..."}'
//! ```
//!
//! Response:
//! ```json
//! {
//!   "detections": [
//!     {"class": "cataract", "confidence": 0.87, "bbox": {"x": 120.5, "y": 88.0, "width": 64.0, "height": 60.0}}
//!   ],
//!   "count": 1
//! }
//! ```
//!
//! Errors: 400 `No image provided`, `Invalid image data` or
//! `Could not decode image`; 500 `Inference failed`.

use crate::services::DetectionService;
use axum::{extract::State, Json};
use lib_core::dto::{DetectRequest, DetectResponse};
use lib_core::AppError;
use std::sync::Arc;
use tracing::{info, instrument};

#[instrument(skip_all)]
pub async fn detect(
    State(service): State<Arc<DetectionService>>,
    Json(request): Json<DetectRequest>,
) -> Result<Json<DetectResponse>, AppError> {
    let response = service.detect(request).await?;
    info!("[DETECT] {} detections", response.count);
    Ok(Json(response))
}
