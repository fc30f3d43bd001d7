// libs/booking-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use shared_config::{AppConfig, StoreBackend};
use shared_models::{Order, OrderStatus};
use shared_utils::{Clock, IdGenerator, SystemClock, UuidGenerator};

use crate::models::{
    messages, AddBookingRequest, BookingError, CancelBookingRequest, PatientNextAppointment,
};
use crate::services::add_booking::{AddBookingRequestValidator, AddBookingValidator};
use crate::services::cancel_booking::{CancelBookingRequestValidator, CancelBookingValidator};
use crate::store::{DoctorDirectory, InMemoryOrderStore, OrderStore, SupabaseOrderStore};

/// Owns the booking lifecycle: validates requests, creates `Active` orders
/// and moves them to `Canceled`. All state lives in the order store.
pub struct BookingService {
    orders: Arc<dyn OrderStore>,
    doctors: Arc<dyn DoctorDirectory>,
    add_validator: Arc<dyn AddBookingValidator>,
    cancel_validator: Arc<dyn CancelBookingValidator>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl BookingService {
    /// Wire the service with the standard validators over `orders`.
    pub fn new(
        orders: Arc<dyn OrderStore>,
        doctors: Arc<dyn DoctorDirectory>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        let add_validator = Arc::new(AddBookingRequestValidator::new(
            Arc::clone(&orders),
            Arc::clone(&clock),
        ));
        let cancel_validator = Arc::new(CancelBookingRequestValidator::new(Arc::clone(&orders)));

        Self::with_validators(orders, doctors, add_validator, cancel_validator, clock, ids)
    }

    pub fn with_validators(
        orders: Arc<dyn OrderStore>,
        doctors: Arc<dyn DoctorDirectory>,
        add_validator: Arc<dyn AddBookingValidator>,
        cancel_validator: Arc<dyn CancelBookingValidator>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Self {
        Self {
            orders,
            doctors,
            add_validator,
            cancel_validator,
            clock,
            ids,
        }
    }

    /// Production wiring: system clock, v4 UUIDs and the configured store.
    pub fn from_config(config: &AppConfig) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let ids: Arc<dyn IdGenerator> = Arc::new(UuidGenerator);

        match config.store_backend {
            StoreBackend::Supabase => {
                if !config.is_configured() {
                    warn!("Supabase order store wired without credentials; requests will fail");
                }
                let store = Arc::new(SupabaseOrderStore::new(config));
                Self::new(store.clone(), store, clock, ids)
            }
            StoreBackend::Memory => {
                info!("Using in-memory order store");
                let store = Arc::new(InMemoryOrderStore::new());
                Self::new(store.clone(), store, clock, ids)
            }
        }
    }

    pub async fn add_booking(&self, request: AddBookingRequest) -> Result<(), BookingError> {
        debug!(
            "Adding booking for patient {} with doctor {}",
            request.patient_id, request.doctor_id
        );

        let validation = self.add_validator.validate_request(&request).await?;
        if !validation.passed_validation() {
            warn!(
                "Booking rejected for patient {}: {:?}",
                request.patient_id,
                validation.errors()
            );
            return Err(BookingError::from_validation(&validation));
        }

        let (Some(start_time), Some(end_time)) = (request.start_time, request.end_time) else {
            let message = messages::BOOKING_DATE_NOT_SPECIFIED.to_string();
            return Err(BookingError::ValidationFailed(message));
        };

        let order = Order {
            id: self.ids.new_id(),
            patient_id: request.patient_id,
            doctor_id: request.doctor_id,
            start_time,
            end_time,
            status: OrderStatus::Active,
            surgery_type: request.surgery_type,
        };
        let order_id = order.id;

        self.orders.insert(order).await?;

        info!(
            "Booking {} created for patient {} with doctor {}",
            order_id, request.patient_id, request.doctor_id
        );
        Ok(())
    }

    /// Canceling an already canceled booking succeeds and leaves it canceled.
    /// An unknown order, or one owned by another patient, is `NotFound`.
    pub async fn cancel_booking(&self, request: CancelBookingRequest) -> Result<(), BookingError> {
        debug!(
            "Canceling booking {} for patient {}",
            request.order_id, request.patient_id
        );

        let validation = self.cancel_validator.validate_request(&request).await?;
        if !validation.passed_validation() {
            warn!(
                "Cancellation rejected for booking {}: {:?}",
                request.order_id,
                validation.errors()
            );
            if validation.first_error() == Some(messages::NO_ORDER_FOUND) {
                return Err(order_not_found());
            }
            return Err(BookingError::from_validation(&validation));
        }

        let order = self
            .orders
            .find_patient_order(request.order_id, request.patient_id)
            .await?
            .ok_or_else(order_not_found)?;

        self.orders.update_status(order.id, OrderStatus::Canceled).await?;

        info!("Booking {} canceled for patient {}", order.id, order.patient_id);
        Ok(())
    }

    /// The latest active booking that starts after now, not the soonest one.
    pub async fn get_patient_next_appointment(
        &self,
        patient_id: i64,
    ) -> Result<Option<PatientNextAppointment>, BookingError> {
        let now = self.clock.now();
        debug!("Looking up next appointment for patient {} after {}", patient_id, now);

        let candidates = self
            .orders
            .find_patient_orders_after(patient_id, OrderStatus::Active, now)
            .await?;

        let Some(order) = select_next_appointment(candidates, patient_id, now) else {
            return Ok(None);
        };

        let doctor = self.doctors.find_doctor(order.doctor_id).await?;
        if doctor.is_none() {
            debug!("No doctor record for doctor {}", order.doctor_id);
        }

        Ok(Some(PatientNextAppointment::from_order(order, doctor)))
    }
}

fn order_not_found() -> BookingError {
    BookingError::NotFound(messages::NO_ORDER_FOR_CANCELLATION.to_string())
}

/// Keep the patient's active future orders, order by start descending and
/// take the head.
fn select_next_appointment(
    orders: Vec<Order>,
    patient_id: i64,
    now: DateTime<Utc>,
) -> Option<Order> {
    let mut candidates: Vec<Order> = orders
        .into_iter()
        .filter(|order| {
            order.patient_id == patient_id && order.is_active() && order.start_time > now
        })
        .collect();

    candidates.sort_by(|a, b| b.start_time.cmp(&a.start_time));
    candidates.into_iter().next()
}
