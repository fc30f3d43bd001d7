use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Duration;
use uuid::Uuid;

use booking_cell::models::messages;
use booking_cell::*;
use shared_config::AppConfig;
use shared_models::{Doctor, OrderStatus, SurgeryType};
use shared_utils::test_utils::{at, init_test_tracing, test_now, TestOrder};
use shared_utils::{FixedClock, FixedIdGenerator, UuidGenerator};

const PATIENT_ID: i64 = 20;
const DOCTOR_ID: i64 = 10;

struct TestBed {
    store: Arc<InMemoryOrderStore>,
    clock: Arc<FixedClock>,
    service: BookingService,
}

impl TestBed {
    fn new(orders: Vec<shared_models::Order>) -> Self {
        init_test_tracing();

        let store = Arc::new(InMemoryOrderStore::with_orders(orders));
        let clock = Arc::new(FixedClock::new(test_now()));
        let service = BookingService::new(
            store.clone(),
            store.clone(),
            clock.clone(),
            Arc::new(UuidGenerator),
        );

        Self { store, clock, service }
    }
}

fn booking(doctor_id: i64, start_hour: u32, start_minute: u32) -> AddBookingRequest {
    let start = at(start_hour, start_minute);
    AddBookingRequest {
        patient_id: PATIENT_ID,
        doctor_id,
        start_time: Some(start),
        end_time: Some(start + Duration::hours(1)),
        surgery_type: SurgeryType::SystemOne,
    }
}

#[tokio::test]
async fn test_past_bookings_are_rejected() {
    let bed = TestBed::new(vec![]);

    for (hour, minute) in [(9, 0), (12, 59), (13, 0)] {
        let error = bed.service.add_booking(booking(DOCTOR_ID, hour, minute)).await.unwrap_err();
        assert_matches!(error, BookingError::ValidationFailed(ref m)
            if m == messages::BOOKING_DATE_IN_PAST);
    }
    assert!(bed.store.is_empty().await);
}

#[tokio::test]
async fn test_missing_fields_surface_first_message() {
    let bed = TestBed::new(vec![]);
    let request = AddBookingRequest {
        patient_id: 0,
        doctor_id: -1,
        start_time: Some(at(14, 0)),
        end_time: Some(at(15, 0)),
        surgery_type: SurgeryType::SystemOne,
    };

    let error = bed.service.add_booking(request.clone()).await.unwrap_err();
    assert_matches!(error, BookingError::ValidationFailed(ref m)
        if m == messages::DOCTOR_NOT_SPECIFIED);

    // The full list is still available from the validator itself.
    let validator = AddBookingRequestValidator::new(bed.store.clone(), bed.clock.clone());
    let result = validator.validate_request(&request).await.unwrap();
    assert_eq!(
        result.errors(),
        [messages::DOCTOR_NOT_SPECIFIED.to_string(), messages::PATIENT_NOT_SPECIFIED.to_string()]
    );
}

#[tokio::test]
async fn test_doctor_double_booking_is_rejected() {
    let existing = TestOrder::new(99, DOCTOR_ID).between(at(15, 0), at(16, 0)).build();
    let bed = TestBed::new(vec![existing]);

    let error = bed.service.add_booking(booking(DOCTOR_ID, 15, 30)).await.unwrap_err();
    assert_matches!(error, BookingError::ValidationFailed(ref m) if m == messages::DOCTOR_IS_BUSY);

    bed.service.add_booking(booking(DOCTOR_ID, 16, 30)).await.unwrap();
    assert_eq!(bed.store.len().await, 2);
}

#[tokio::test]
async fn test_sub_second_start_inside_existing_booking_is_rejected() {
    let existing = TestOrder::new(99, DOCTOR_ID)
        .between(at(14, 30) + Duration::milliseconds(500), at(15, 30))
        .build();
    let bed = TestBed::new(vec![existing]);
    let start = at(14, 30) + Duration::milliseconds(700);

    let error = bed.service.add_booking(AddBookingRequest {
        start_time: Some(start),
        end_time: Some(start + Duration::hours(1)),
        ..booking(DOCTOR_ID, 14, 30)
    }).await.unwrap_err();

    assert_matches!(error, BookingError::ValidationFailed(ref m) if m == messages::DOCTOR_IS_BUSY);
    assert_eq!(bed.store.len().await, 1);
}

#[tokio::test]
async fn test_added_booking_is_active_with_generated_id() {
    let store = Arc::new(InMemoryOrderStore::new());
    let order_id = Uuid::new_v4();
    let service = BookingService::new(
        store.clone(),
        store.clone(),
        Arc::new(FixedClock::new(test_now())),
        Arc::new(FixedIdGenerator::new(order_id)),
    );
    let request = AddBookingRequest {
        surgery_type: SurgeryType::SystemTwo,
        ..booking(DOCTOR_ID, 14, 0)
    };

    service.add_booking(request.clone()).await.unwrap();

    let orders = store.all().await;
    assert_eq!(orders.len(), 1);
    let order = &orders[0];
    assert_eq!(order.id, order_id);
    assert_eq!(order.status, OrderStatus::Active);
    assert_eq!(order.patient_id, request.patient_id);
    assert_eq!(order.doctor_id, request.doctor_id);
    assert_eq!(Some(order.start_time), request.start_time);
    assert_eq!(Some(order.end_time), request.end_time);
    assert_eq!(order.surgery_type, SurgeryType::SystemTwo);
}

#[tokio::test]
async fn test_canceled_slot_can_be_rebooked() {
    let bed = TestBed::new(vec![]);
    bed.service.add_booking(booking(DOCTOR_ID, 15, 0)).await.unwrap();
    let first = bed.store.all().await.remove(0);

    bed.service.cancel_booking(CancelBookingRequest {
        order_id: first.id,
        patient_id: PATIENT_ID,
    }).await.unwrap();

    bed.service.add_booking(booking(DOCTOR_ID, 15, 30)).await.unwrap();
    assert_eq!(bed.store.get(first.id).await.unwrap().status, OrderStatus::Canceled);
    assert_eq!(bed.store.len().await, 2);
}

#[tokio::test]
async fn test_cancel_with_nil_id_is_a_validation_failure() {
    let bed = TestBed::new(vec![]);

    let error = bed.service.cancel_booking(CancelBookingRequest {
        order_id: Uuid::nil(),
        patient_id: PATIENT_ID,
    }).await.unwrap_err();

    assert_matches!(error, BookingError::ValidationFailed(ref m)
        if m == messages::BOOKING_ID_NOT_SPECIFIED);
}

#[tokio::test]
async fn test_cancel_unknown_order_is_not_found() {
    let existing = TestOrder::new(PATIENT_ID, DOCTOR_ID).build();
    let bed = TestBed::new(vec![existing.clone()]);

    let error = bed.service.cancel_booking(CancelBookingRequest {
        order_id: Uuid::new_v4(),
        patient_id: PATIENT_ID,
    }).await.unwrap_err();

    assert_matches!(error, BookingError::NotFound(ref m)
        if m == messages::NO_ORDER_FOR_CANCELLATION);
    assert_eq!(bed.store.get(existing.id).await.unwrap().status, OrderStatus::Active);
}

#[tokio::test]
async fn test_cancel_other_patients_order_is_not_found() {
    let order = TestOrder::new(PATIENT_ID, DOCTOR_ID).build();
    let bed = TestBed::new(vec![order.clone()]);

    let error = bed.service.cancel_booking(CancelBookingRequest {
        order_id: order.id,
        patient_id: 21,
    }).await.unwrap_err();

    assert_matches!(error, BookingError::NotFound(_));
    assert_eq!(bed.store.get(order.id).await.unwrap().status, OrderStatus::Active);
}

#[tokio::test]
async fn test_next_appointment_is_latest_future_booking() {
    let t1 = TestOrder::new(PATIENT_ID, DOCTOR_ID).between(at(14, 0), at(15, 0)).build();
    let t2 = TestOrder::new(PATIENT_ID, DOCTOR_ID).between(at(17, 0), at(18, 0)).build();
    let bed = TestBed::new(vec![t1, t2.clone()]);
    bed.store.add_doctor(Doctor {
        id: DOCTOR_ID,
        first_name: "Lisa".to_string(),
        last_name: "Cuddy".to_string(),
    }).await;

    let next = bed.service.get_patient_next_appointment(PATIENT_ID).await.unwrap().unwrap();
    assert_eq!(next.order_id, t2.id);
    assert_eq!(next.start_time, at(17, 0));
    assert_eq!(next.doctor, Some(DoctorSummary {
        first_name: "Lisa".to_string(),
        last_name: "Cuddy".to_string(),
    }));

    let again = bed.service.get_patient_next_appointment(PATIENT_ID).await.unwrap().unwrap();
    assert_eq!(next, again);
}

#[tokio::test]
async fn test_next_appointment_none_when_past_or_canceled() {
    let past = TestOrder::new(PATIENT_ID, DOCTOR_ID).between(at(9, 0), at(10, 0)).build();
    let canceled = TestOrder::new(PATIENT_ID, DOCTOR_ID)
        .between(at(16, 0), at(17, 0))
        .canceled()
        .build();
    let bed = TestBed::new(vec![past, canceled]);

    assert!(bed.service.get_patient_next_appointment(PATIENT_ID).await.unwrap().is_none());
    assert!(bed.service.get_patient_next_appointment(404).await.unwrap().is_none());
}

#[tokio::test]
async fn test_next_appointment_follows_the_clock() {
    let order = TestOrder::new(PATIENT_ID, DOCTOR_ID).between(at(14, 0), at(15, 0)).build();
    let bed = TestBed::new(vec![order]);

    assert!(bed.service.get_patient_next_appointment(PATIENT_ID).await.unwrap().is_some());

    bed.clock.set(at(14, 0));
    assert!(bed.service.get_patient_next_appointment(PATIENT_ID).await.unwrap().is_none());
}

#[tokio::test]
async fn test_memory_backed_service_from_config() {
    let service = BookingService::from_config(&AppConfig::default());

    assert!(service.get_patient_next_appointment(PATIENT_ID).await.unwrap().is_none());

    let error = service.cancel_booking(CancelBookingRequest {
        order_id: Uuid::new_v4(),
        patient_id: PATIENT_ID,
    }).await.unwrap_err();
    assert_matches!(error, BookingError::NotFound(_));
}
