pub mod doctor;
pub mod order;

pub use doctor::Doctor;
pub use order::{Order, OrderStatus, SurgeryType};
