//! Symptom report and alert DTOs.

use crate::model::store::models::Alert;
use serde::{Deserialize, Serialize};

/// Body of `POST /submit-report`.
///
/// Both fields are optional at the wire level so a missing field produces the
/// domain error message instead of a generic deserialization rejection.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportRequest {
    pub location: Option<String>,
    pub description: Option<String>,
}

/// Geographic point attached to an alert.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// An alert as returned by `POST /submit-report` and `GET /alerts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub location: String,
    pub coordinates: Coordinates,
    pub radius: i64,
    pub severity: String,
    pub timestamp: String,
    pub description: String,
    pub preventive_measures: Vec<String>,
}

impl TryFrom<Alert> for AlertResponse {
    type Error = serde_json::Error;

    fn try_from(alert: Alert) -> Result<Self, Self::Error> {
        let preventive_measures = serde_json::from_str(&alert.preventive_measures)?;
        Ok(Self {
            id: alert.id.to_string(),
            title: alert.title,
            location: alert.location,
            coordinates: Coordinates { lat: alert.lat, lng: alert.lng },
            radius: alert.radius,
            severity: alert.severity,
            timestamp: alert.timestamp,
            description: alert.description,
            preventive_measures,
        })
    }
}
