// libs/booking-cell/src/services/add_booking.rs
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use shared_utils::Clock;

use crate::models::{messages, AddBookingRequest, BookingError, ValidationResult};
use crate::store::OrderStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AddBookingValidator: Send + Sync {
    async fn validate_request(
        &self,
        request: &AddBookingRequest,
    ) -> Result<ValidationResult, BookingError>;
}

/// Preconditions for creating a booking. Stages run in order and stop at
/// the first failing stage.
pub struct AddBookingRequestValidator {
    orders: Arc<dyn OrderStore>,
    clock: Arc<dyn Clock>,
}

impl AddBookingRequestValidator {
    pub fn new(orders: Arc<dyn OrderStore>, clock: Arc<dyn Clock>) -> Self {
        Self { orders, clock }
    }

    /// Every missing field is reported, not just the first one.
    fn missing_required_fields(
        request: &AddBookingRequest,
    ) -> Result<DateTime<Utc>, ValidationResult> {
        let mut result = ValidationResult::passed();

        let start_time = match (request.start_time, request.end_time) {
            (Some(start), Some(_)) => Some(start),
            _ => {
                result.fail(messages::BOOKING_DATE_NOT_SPECIFIED);
                None
            }
        };

        if request.doctor_id <= 0 {
            result.fail(messages::DOCTOR_NOT_SPECIFIED);
        }

        if request.patient_id <= 0 {
            result.fail(messages::PATIENT_NOT_SPECIFIED);
        }

        match start_time {
            Some(start) if result.passed_validation() => Ok(start),
            _ => Err(result),
        }
    }

    fn booking_date_invalid(&self, start_time: DateTime<Utc>) -> bool {
        start_time <= self.clock.now()
    }

    /// Only the requested start is tested against existing intervals, so a
    /// booking that swallows an existing one without sharing its start passes.
    async fn doctor_is_busy(
        &self,
        doctor_id: i64,
        start_time: DateTime<Utc>,
    ) -> Result<bool, BookingError> {
        let existing = self.orders.find_doctor_orders_at(doctor_id, start_time).await?;

        Ok(existing
            .iter()
            .any(|order| order.is_active() && order.covers(start_time)))
    }
}

#[async_trait]
impl AddBookingValidator for AddBookingRequestValidator {
    async fn validate_request(
        &self,
        request: &AddBookingRequest,
    ) -> Result<ValidationResult, BookingError> {
        let start_time = match Self::missing_required_fields(request) {
            Ok(start_time) => start_time,
            Err(result) => return Ok(result),
        };

        if self.booking_date_invalid(start_time) {
            return Ok(ValidationResult::failed(messages::BOOKING_DATE_IN_PAST));
        }

        if self.doctor_is_busy(request.doctor_id, start_time).await? {
            debug!("Doctor {} already has a booking covering {}", request.doctor_id, start_time);
            return Ok(ValidationResult::failed(messages::DOCTOR_IS_BUSY));
        }

        Ok(ValidationResult::passed())
    }
}
