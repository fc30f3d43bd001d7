pub mod clock;
pub mod id;
pub mod test_utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use id::{FixedIdGenerator, IdGenerator, UuidGenerator};
