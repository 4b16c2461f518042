//! # Alert Service
//!
//! Turns community symptom reports into map alerts.
//!
//! Reports are not geocoded: every alert is pinned to the same default
//! coordinates with a fixed radius and severity, and carries the standard
//! preventive measures.

use lib_core::dto::{AlertResponse, ReportRequest};
use lib_core::model::store::models::AlertForCreate;
use lib_core::model::store::AlertRepository;
use lib_core::{AppError, DbPool};
use lib_utils::{format_report_stamp, validate_not_empty};
use tracing::{info, instrument};

pub const DEFAULT_LAT: f64 = 10.8505;
pub const DEFAULT_LNG: f64 = 76.2711;
pub const DEFAULT_RADIUS: i64 = 5;
pub const DEFAULT_SEVERITY: &str = "medium";
pub const PREVENTIVE_MEASURES: [&str; 3] = [
    "Seek medical attention",
    "Avoid contact with others",
    "Monitor symptoms",
];

const MISSING_FIELDS: &str = "Missing required fields: location and description";

/// Service for symptom reports and the alerts they produce.
pub struct AlertService {
    db: DbPool,
}

impl AlertService {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }

    /// Validate a report and store it as an alert.
    ///
    /// # Errors
    ///
    /// - `AppError::InvalidInput` if `location` or `description` is missing or blank
    /// - `AppError::Internal` if the alert cannot be written
    #[instrument(skip(self, report))]
    pub async fn submit_report(&self, report: ReportRequest) -> Result<AlertResponse, AppError> {
        let location = report.location.unwrap_or_default();
        let description = report.description.unwrap_or_default();
        validate_not_empty(&location, "location")
            .and_then(|_| validate_not_empty(&description, "description"))
            .map_err(|_| AppError::InvalidInput(MISSING_FIELDS.to_string()))?;
        let (location, description) = (location.trim().to_string(), description.trim().to_string());

        let alert = AlertForCreate {
            title: format!("Symptom Report - {}", location),
            location,
            lat: DEFAULT_LAT,
            lng: DEFAULT_LNG,
            radius: DEFAULT_RADIUS,
            severity: DEFAULT_SEVERITY.to_string(),
            timestamp: format_report_stamp(),
            description,
            preventive_measures: PREVENTIVE_MEASURES.iter().map(|m| m.to_string()).collect(),
        };

        let stored = AlertRepository::create(&self.db, &alert).await?;
        info!(alert_id = stored.id, location = %stored.location, "symptom report stored");

        Ok(AlertResponse::try_from(stored)?)
    }

    /// Every alert, oldest first.
    pub async fn list_alerts(&self) -> Result<Vec<AlertResponse>, AppError> {
        AlertRepository::list_all(&self.db)
            .await?
            .into_iter()
            .map(|a| AlertResponse::try_from(a).map_err(AppError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lib_core::model::store::memory_pool;

    fn report(location: Option<&str>, description: Option<&str>) -> ReportRequest {
        ReportRequest {
            location: location.map(String::from),
            description: description.map(String::from),
        }
    }

    #[tokio::test]
    async fn test_submit_report_builds_fixed_alert() {
        let service = AlertService::new(memory_pool().await.unwrap());

        let alert = service
            .submit_report(report(Some("Thrissur"), Some("red, watery eyes")))
            .await
            .unwrap();

        assert_eq!(alert.title, "Symptom Report - Thrissur");
        assert_eq!(alert.coordinates.lat, DEFAULT_LAT);
        assert_eq!(alert.radius, 5);
        assert_eq!(alert.severity, "medium");
        assert_eq!(alert.preventive_measures.len(), 3);
        assert_eq!(alert.timestamp.len(), "2024-01-01 00:00:00".len());
        assert!(!alert.id.is_empty());
    }

    #[tokio::test]
    async fn test_submit_report_rejects_missing_fields() {
        let service = AlertService::new(memory_pool().await.unwrap());

        for bad in [
            report(None, Some("x")),
            report(Some("Kochi"), None),
            report(Some("   "), Some("x")),
        ] {
            let err = service.submit_report(bad).await.unwrap_err();
            assert_eq!(err.user_message(), MISSING_FIELDS);
        }
        assert!(service.list_alerts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_alerts_in_insertion_order() {
        let service = AlertService::new(memory_pool().await.unwrap());
        service.submit_report(report(Some("A"), Some("one"))).await.unwrap();
        service.submit_report(report(Some("B"), Some("two"))).await.unwrap();

        let alerts = service.list_alerts().await.unwrap();
        let locations: Vec<_> = alerts.iter().map(|a| a.location.as_str()).collect();
        assert_eq!(locations, ["A", "B"]);
    }
}
