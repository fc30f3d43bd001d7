use std::sync::Once;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use shared_config::{AppConfig, StoreBackend};
use shared_models::{Order, OrderStatus, SurgeryType};

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary. `RUST_LOG` applies.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// "Now" used across the booking tests: 2020-01-12 13:00 UTC.
pub fn test_now() -> DateTime<Utc> {
    at(13, 0)
}

/// An instant on the test day.
pub fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2020, 1, 12, hour, minute, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid test time {}:{}", hour, minute))
}

pub struct TestConfig {
    pub supabase_url: String,
    pub supabase_anon_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
        }
    }
}

impl TestConfig {
    pub fn with_url(url: &str) -> Self {
        Self {
            supabase_url: url.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            orders_table: "orders".to_string(),
            doctors_table: "doctors".to_string(),
            store_backend: StoreBackend::Supabase,
        }
    }
}

/// Builder for stored orders in test fixtures.
pub struct TestOrder {
    order: Order,
}

impl TestOrder {
    pub fn new(patient_id: i64, doctor_id: i64) -> Self {
        Self {
            order: Order {
                id: Uuid::new_v4(),
                patient_id,
                doctor_id,
                start_time: at(14, 30),
                end_time: at(15, 30),
                status: OrderStatus::Active,
                surgery_type: SurgeryType::SystemOne,
            },
        }
    }

    pub fn id(mut self, id: Uuid) -> Self {
        self.order.id = id;
        self
    }

    pub fn between(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.order.start_time = start;
        self.order.end_time = end;
        self
    }

    pub fn canceled(mut self) -> Self {
        self.order.status = OrderStatus::Canceled;
        self
    }

    pub fn surgery_type(mut self, surgery_type: SurgeryType) -> Self {
        self.order.surgery_type = surgery_type;
        self
    }

    pub fn build(self) -> Order {
        self.order
    }
}

pub struct MockSupabaseResponses;

impl MockSupabaseResponses {
    pub fn order_response(order: &Order) -> serde_json::Value {
        json!({
            "id": order.id,
            "patient_id": order.patient_id,
            "doctor_id": order.doctor_id,
            "start_time": order.start_time.to_rfc3339(),
            "end_time": order.end_time.to_rfc3339(),
            "status": order.status.to_string(),
            "surgery_type": order.surgery_type.to_string()
        })
    }

    pub fn doctor_response(doctor_id: i64, first_name: &str, last_name: &str) -> serde_json::Value {
        json!({
            "id": doctor_id,
            "first_name": first_name,
            "last_name": last_name,
            "email": format!("{}.{}@clinic.example", first_name.to_lowercase(), last_name.to_lowercase())
        })
    }

    pub fn error_response(message: &str, code: &str) -> serde_json::Value {
        json!({
            "message": message,
            "code": code,
            "details": null,
            "hint": null
        })
    }
}
