// libs/booking-cell/src/store/supabase.rs
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;
use shared_models::{Doctor, Order, OrderStatus};

use super::{DoctorDirectory, OrderStore, StoreError};

/// Order store backed by PostgREST tables on a Supabase project.
pub struct SupabaseOrderStore {
    supabase: SupabaseClient,
    orders_table: String,
    doctors_table: String,
}

impl SupabaseOrderStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            orders_table: config.orders_table.clone(),
            doctors_table: config.doctors_table.clone(),
        }
    }

    fn orders_path(&self, query_parts: &[String]) -> String {
        format!("/rest/v1/{}?{}", self.orders_table, query_parts.join("&"))
    }

    async fn fetch_orders(&self, path: &str) -> Result<Vec<Order>, StoreError> {
        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, path, None, None)
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        decode_rows(rows)
    }

    async fn write_orders(
        &self,
        method: Method,
        path: &str,
        body: Value,
    ) -> Result<Vec<Value>, StoreError> {
        let mut headers = HeaderMap::new();
        headers.insert("Prefer", HeaderValue::from_static("return=representation"));

        self.supabase
            .request_with_headers(method, path, None, Some(body), Some(headers))
            .await
            .map_err(|e| StoreError::Request(e.to_string()))
    }
}

// "+00:00" would be read as a space inside a query string. Sub-second digits
// are kept so range filters compare against the exact instant.
fn query_time(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, StoreError> {
    rows.into_iter()
        .map(serde_json::from_value)
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| StoreError::Decode(e.to_string()))
}

#[async_trait]
impl OrderStore for SupabaseOrderStore {
    async fn find_doctor_orders_at(
        &self,
        doctor_id: i64,
        instant: DateTime<Utc>,
    ) -> Result<Vec<Order>, StoreError> {
        debug!("Fetching orders of doctor {} covering {}", doctor_id, instant);

        let path = self.orders_path(&[
            format!("doctor_id=eq.{}", doctor_id),
            format!("start_time=lte.{}", query_time(instant)),
            format!("end_time=gte.{}", query_time(instant)),
        ]);
        self.fetch_orders(&path).await
    }

    async fn order_exists(&self, order_id: Uuid) -> Result<bool, StoreError> {
        let path = self.orders_path(&[
            format!("id=eq.{}", order_id),
            "select=id".to_string(),
        ]);

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        Ok(!rows.is_empty())
    }

    async fn find_patient_order(
        &self,
        order_id: Uuid,
        patient_id: i64,
    ) -> Result<Option<Order>, StoreError> {
        let path = self.orders_path(&[
            format!("id=eq.{}", order_id),
            format!("patient_id=eq.{}", patient_id),
        ]);
        Ok(self.fetch_orders(&path).await?.into_iter().next())
    }

    async fn find_patient_orders_after(
        &self,
        patient_id: i64,
        status: OrderStatus,
        after: DateTime<Utc>,
    ) -> Result<Vec<Order>, StoreError> {
        debug!("Fetching {} orders of patient {} after {}", status, patient_id, after);

        let path = self.orders_path(&[
            format!("patient_id=eq.{}", patient_id),
            format!("status=eq.{}", status),
            format!("start_time=gt.{}", query_time(after)),
        ]);
        self.fetch_orders(&path).await
    }

    async fn insert(&self, order: Order) -> Result<(), StoreError> {
        let path = format!("/rest/v1/{}", self.orders_table);
        let body = serde_json::to_value(&order).map_err(|e| StoreError::Decode(e.to_string()))?;

        let created = self.write_orders(Method::POST, &path, body).await?;
        if created.is_empty() {
            let message = format!("insert of order {} returned no rows", order.id);
            return Err(StoreError::Request(message));
        }
        Ok(())
    }

    async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<(), StoreError> {
        let path = self.orders_path(&[format!("id=eq.{}", order_id)]);

        let body = json!({ "status": status });
        let updated = self.write_orders(Method::PATCH, &path, body).await?;

        if updated.is_empty() {
            return Err(StoreError::MissingRecord(order_id));
        }
        Ok(())
    }
}

#[async_trait]
impl DoctorDirectory for SupabaseOrderStore {
    async fn find_doctor(&self, doctor_id: i64) -> Result<Option<Doctor>, StoreError> {
        let path = format!(
            "/rest/v1/{}?id=eq.{}&select=id,first_name,last_name",
            self.doctors_table, doctor_id
        );

        let rows: Vec<Value> = self
            .supabase
            .request(Method::GET, &path, None, None)
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        Ok(decode_rows::<Doctor>(rows)?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use shared_utils::test_utils::at;

    #[test]
    fn query_times_use_zulu_suffix() {
        assert_eq!(query_time(at(14, 45)), "2020-01-12T14:45:00Z");
    }

    #[test]
    fn query_times_keep_sub_second_precision() {
        let instant = at(14, 30) + Duration::milliseconds(700);
        assert_eq!(query_time(instant), "2020-01-12T14:30:00.700Z");

        let instant = at(14, 30) + Duration::microseconds(250);
        assert_eq!(query_time(instant), "2020-01-12T14:30:00.000250Z");
    }

    #[test]
    fn decode_rows_reports_malformed_records() {
        let rows = vec![json!({ "id": "not-a-uuid" })];
        let result = decode_rows::<Order>(rows);
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }
}
