// libs/booking-cell/src/store/mod.rs
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use shared_models::{Doctor, Order, OrderStatus};

pub mod memory;
pub mod supabase;

pub use memory::InMemoryOrderStore;
pub use supabase::SupabaseOrderStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("malformed record: {0}")]
    Decode(String),

    #[error("order {0} does not exist")]
    MissingRecord(Uuid),

    #[error("order {0} already exists")]
    DuplicateKey(Uuid),
}

/// Persistence collaborator for bookings. Every write is committed before
/// the call returns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Orders of `doctor_id`, any status, whose closed interval contains `instant`.
    async fn find_doctor_orders_at(
        &self,
        doctor_id: i64,
        instant: DateTime<Utc>,
    ) -> Result<Vec<Order>, StoreError>;

    async fn order_exists(&self, order_id: Uuid) -> Result<bool, StoreError>;

    async fn find_patient_order(
        &self,
        order_id: Uuid,
        patient_id: i64,
    ) -> Result<Option<Order>, StoreError>;

    /// Orders of `patient_id` with `status` starting strictly after `after`.
    async fn find_patient_orders_after(
        &self,
        patient_id: i64,
        status: OrderStatus,
        after: DateTime<Utc>,
    ) -> Result<Vec<Order>, StoreError>;

    async fn insert(&self, order: Order) -> Result<(), StoreError>;

    async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<(), StoreError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DoctorDirectory: Send + Sync {
    async fn find_doctor(&self, doctor_id: i64) -> Result<Option<Doctor>, StoreError>;
}
