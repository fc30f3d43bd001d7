// libs/booking-cell/src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use shared_models::{Doctor, Order, OrderStatus, SurgeryType};

use crate::store::StoreError;

// ==============================================================================
// REQUEST/RESPONSE MODELS
// ==============================================================================

/// A proposed booking. Missing times deserialize to `None` and are reported
/// by validation rather than rejected by the decoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddBookingRequest {
    #[serde(default)]
    pub patient_id: i64,
    #[serde(default)]
    pub doctor_id: i64,
    #[serde(default)]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub surgery_type: SurgeryType,
}

/// The patient id scopes the lookup: a patient may only cancel their own booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelBookingRequest {
    #[serde(default)]
    pub order_id: Uuid,
    #[serde(default)]
    pub patient_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub first_name: String,
    pub last_name: String,
}

impl From<Doctor> for DoctorSummary {
    fn from(doctor: Doctor) -> Self {
        Self {
            first_name: doctor.first_name,
            last_name: doctor.last_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientNextAppointment {
    pub order_id: Uuid,
    pub status: OrderStatus,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub doctor: Option<DoctorSummary>,
    pub surgery_type: SurgeryType,
}

impl PatientNextAppointment {
    pub fn from_order(order: Order, doctor: Option<Doctor>) -> Self {
        Self {
            order_id: order.id,
            status: order.status,
            start_time: order.start_time,
            end_time: order.end_time,
            patient_id: order.patient_id,
            doctor_id: order.doctor_id,
            doctor: doctor.map(DoctorSummary::from),
            surgery_type: order.surgery_type,
        }
    }
}

// ==============================================================================
// VALIDATION
// ==============================================================================

/// Outcome of a request validator. A failed result always carries at least
/// one message, in the order the checks produced them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    passed_validation: bool,
    errors: Vec<String>,
}

impl ValidationResult {
    pub fn passed() -> Self {
        Self {
            passed_validation: true,
            errors: Vec::new(),
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        let mut result = Self::passed();
        result.fail(error);
        result
    }

    pub fn fail(&mut self, error: impl Into<String>) {
        self.passed_validation = false;
        self.errors.push(error.into());
    }

    pub fn passed_validation(&self) -> bool {
        self.passed_validation
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

pub mod messages {
    pub const BOOKING_DATE_NOT_SPECIFIED: &str = "Booking date is not specified";
    pub const DOCTOR_NOT_SPECIFIED: &str = "Doctor is not specified";
    pub const PATIENT_NOT_SPECIFIED: &str = "Patient is not specified";
    pub const BOOKING_DATE_IN_PAST: &str = "Booking date cannot be set in the past";
    pub const DOCTOR_IS_BUSY: &str = "Doctor is already busy";
    pub const BOOKING_ID_NOT_SPECIFIED: &str = "Booking identifier is not specified";
    pub const NO_ORDER_FOUND: &str = "No order was found";
    pub const NO_ORDER_FOR_CANCELLATION: &str = "No order was found for cancellation";
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Error, Debug)]
pub enum BookingError {
    /// Carries only the first message of the failed validation result.
    #[error("{0}")]
    ValidationFailed(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Order store unavailable: {0}")]
    StoreUnavailable(#[from] StoreError),
}

impl BookingError {
    pub(crate) fn from_validation(result: &ValidationResult) -> Self {
        let message = result.first_error().unwrap_or("Validation failed");
        BookingError::ValidationFailed(message.to_string())
    }
}
