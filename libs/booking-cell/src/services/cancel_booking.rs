// libs/booking-cell/src/services/cancel_booking.rs
use std::sync::Arc;

use async_trait::async_trait;

use crate::models::{messages, BookingError, CancelBookingRequest, ValidationResult};
use crate::store::OrderStore;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CancelBookingValidator: Send + Sync {
    async fn validate_request(
        &self,
        request: &CancelBookingRequest,
    ) -> Result<ValidationResult, BookingError>;
}

pub struct CancelBookingRequestValidator {
    orders: Arc<dyn OrderStore>,
}

impl CancelBookingRequestValidator {
    pub fn new(orders: Arc<dyn OrderStore>) -> Self {
        Self { orders }
    }

    fn missing_required_fields(request: &CancelBookingRequest) -> Option<ValidationResult> {
        if request.order_id.is_nil() {
            return Some(ValidationResult::failed(messages::BOOKING_ID_NOT_SPECIFIED));
        }
        None
    }

    // Ownership is enforced by the service's (order, patient) lookup.
    async fn no_order_was_found(
        &self,
        request: &CancelBookingRequest,
    ) -> Result<bool, BookingError> {
        Ok(!self.orders.order_exists(request.order_id).await?)
    }
}

#[async_trait]
impl CancelBookingValidator for CancelBookingRequestValidator {
    async fn validate_request(
        &self,
        request: &CancelBookingRequest,
    ) -> Result<ValidationResult, BookingError> {
        if let Some(result) = Self::missing_required_fields(request) {
            return Ok(result);
        }

        if self.no_order_was_found(request).await? {
            return Ok(ValidationResult::failed(messages::NO_ORDER_FOUND));
        }

        Ok(ValidationResult::passed())
    }
}
