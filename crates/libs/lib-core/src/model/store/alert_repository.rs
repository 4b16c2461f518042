//! # Alert Repository
//!
//! Storage for symptom report alerts.

use super::models::{Alert, AlertForCreate};
use super::DbPool;
use sqlx::query_as;

/// Alert repository for database operations.
pub struct AlertRepository;

impl AlertRepository {
    /// Insert an alert and return the stored row.
    pub async fn create(pool: &DbPool, alert: &AlertForCreate) -> Result<Alert, sqlx::Error> {
        let measures = serde_json::to_string(&alert.preventive_measures)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        let result = sqlx::query(
            r#"
            INSERT INTO alerts (title, location, lat, lng, radius, severity, timestamp, description, preventive_measures)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#
        )
        .bind(&alert.title)
        .bind(&alert.location)
        .bind(alert.lat)
        .bind(alert.lng)
        .bind(alert.radius)
        .bind(&alert.severity)
        .bind(&alert.timestamp)
        .bind(&alert.description)
        .bind(measures)
        .execute(pool)
        .await?;

        let id = result.last_insert_rowid();

        query_as::<_, Alert>("SELECT * FROM alerts WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
    }

    /// List every alert in insertion order.
    pub async fn list_all(pool: &DbPool) -> Result<Vec<Alert>, sqlx::Error> {
        query_as::<_, Alert>("SELECT * FROM alerts ORDER BY id ASC")
            .fetch_all(pool)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::store::test_pool;

    fn sample(location: &str) -> AlertForCreate {
        AlertForCreate {
            title: format!("Symptom Report - {}", location),
            location: location.to_string(),
            lat: 10.8505,
            lng: 76.2711,
            radius: 5,
            severity: "medium".to_string(),
            timestamp: "2024-03-01 14:05:09".to_string(),
            description: "red eyes".to_string(),
            preventive_measures: vec!["Seek medical attention".to_string()],
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let pool = test_pool().await;

        let first = AlertRepository::create(&pool, &sample("Kochi")).await.unwrap();
        AlertRepository::create(&pool, &sample("Thrissur")).await.unwrap();

        assert_eq!(first.title, "Symptom Report - Kochi");
        assert_eq!(first.preventive_measures, r#"["Seek medical attention"]"#);

        let all = AlertRepository::list_all(&pool).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[1].location, "Thrissur");
    }
}
