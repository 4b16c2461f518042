//! Eye disease detection DTOs.

use serde::{Deserialize, Serialize};

/// Conditions the detection model reports that are surfaced to clients.
pub const DETECTABLE_CLASSES: [&str; 5] = [
    "bulging_eyes",
    "cataract",
    "crossed_eye",
    "glaucoma",
    "uveitis",
];

/// Body of `POST /detect`; `image` is a browser data URL.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DetectRequest {
    pub image: Option<String>,
}

/// Bounding box in source image pixels, centre-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub class: String,
    pub confidence: Option<f64>,
    pub bbox: BoundingBox,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectResponse {
    pub detections: Vec<Detection>,
    pub count: usize,
}

impl DetectResponse {
    pub fn new(detections: Vec<Detection>) -> Self {
        let count = detections.len();
        Self { detections, count }
    }
}
