// libs/booking-cell/src/store/memory.rs
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use shared_models::{Doctor, Order, OrderStatus};

use super::{DoctorDirectory, OrderStore, StoreError};

/// Orders keyed by id, doctors keyed by id. Relations are resolved by lookup.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<Uuid, Order>>,
    doctors: RwLock<HashMap<i64, Doctor>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_orders(orders: impl IntoIterator<Item = Order>) -> Self {
        let orders = orders.into_iter().map(|order| (order.id, order)).collect();
        Self {
            orders: RwLock::new(orders),
            doctors: RwLock::new(HashMap::new()),
        }
    }

    pub async fn add_doctor(&self, doctor: Doctor) {
        self.doctors.write().await.insert(doctor.id, doctor);
    }

    pub async fn get(&self, order_id: Uuid) -> Option<Order> {
        self.orders.read().await.get(&order_id).cloned()
    }

    pub async fn all(&self) -> Vec<Order> {
        self.orders.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn find_doctor_orders_at(
        &self,
        doctor_id: i64,
        instant: DateTime<Utc>,
    ) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .filter(|order| order.doctor_id == doctor_id && order.covers(instant))
            .cloned()
            .collect())
    }

    async fn order_exists(&self, order_id: Uuid) -> Result<bool, StoreError> {
        Ok(self.orders.read().await.contains_key(&order_id))
    }

    async fn find_patient_order(
        &self,
        order_id: Uuid,
        patient_id: i64,
    ) -> Result<Option<Order>, StoreError> {
        let orders = self.orders.read().await;
        Ok(orders
            .get(&order_id)
            .filter(|order| order.patient_id == patient_id)
            .cloned())
    }

    async fn find_patient_orders_after(
        &self,
        patient_id: i64,
        status: OrderStatus,
        after: DateTime<Utc>,
    ) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().await;
        Ok(orders
            .values()
            .filter(|order| {
                order.patient_id == patient_id
                    && order.status == status
                    && order.start_time > after
            })
            .cloned()
            .collect())
    }

    async fn insert(&self, order: Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(StoreError::DuplicateKey(order.id));
        }
        debug!("Storing order {} for doctor {}", order.id, order.doctor_id);
        orders.insert(order.id, order);
        Ok(())
    }

    async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or(StoreError::MissingRecord(order_id))?;
        order.status = status;
        Ok(())
    }
}

#[async_trait]
impl DoctorDirectory for InMemoryOrderStore {
    async fn find_doctor(&self, doctor_id: i64) -> Result<Option<Doctor>, StoreError> {
        Ok(self.doctors.read().await.get(&doctor_id).cloned())
    }
}
