// libs/shared/models/src/order.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A booked appointment between a patient and a doctor.
///
/// Relations are plain foreign keys; doctor and patient records are looked
/// up separately and never embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: OrderStatus,
    pub surgery_type: SurgeryType,
}

impl Order {
    pub fn is_active(&self) -> bool {
        self.status == OrderStatus::Active
    }

    /// Closed-interval containment: both boundaries count as inside.
    pub fn covers(&self, instant: DateTime<Utc>) -> bool {
        self.start_time <= instant && instant <= self.end_time
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Active,
    Canceled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderStatus::Active => write!(f, "active"),
            OrderStatus::Canceled => write!(f, "canceled"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurgeryType {
    #[default]
    #[serde(alias = "system1")]
    SystemOne,
    #[serde(alias = "system2")]
    SystemTwo,
}

impl fmt::Display for SurgeryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurgeryType::SystemOne => write!(f, "system_one"),
            SurgeryType::SystemTwo => write!(f, "system_two"),
        }
    }
}
