use std::collections::VecDeque;
use std::sync::Mutex;

use uuid::Uuid;

/// Source of fresh booking identifiers.
pub trait IdGenerator: Send + Sync {
    fn new_id(&self) -> Uuid;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn new_id(&self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Hands out a scripted sequence of identifiers, then repeats the last one.
#[derive(Debug)]
pub struct FixedIdGenerator {
    queue: Mutex<VecDeque<Uuid>>,
    last: Uuid,
}

impl FixedIdGenerator {
    pub fn new(id: Uuid) -> Self {
        Self::sequence(vec![id])
    }

    pub fn sequence(ids: Vec<Uuid>) -> Self {
        let last = ids.last().copied().unwrap_or_else(Uuid::nil);
        Self {
            queue: Mutex::new(ids.into()),
            last,
        }
    }
}

impl IdGenerator for FixedIdGenerator {
    fn new_id(&self) -> Uuid {
        let next = match self.queue.lock() {
            Ok(mut queue) => queue.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        next.unwrap_or(self.last)
    }
}
