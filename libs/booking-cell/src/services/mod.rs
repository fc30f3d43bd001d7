pub mod add_booking;
pub mod booking;
pub mod cancel_booking;

pub use add_booking::{AddBookingRequestValidator, AddBookingValidator};
pub use booking::BookingService;
pub use cancel_booking::{CancelBookingRequestValidator, CancelBookingValidator};
