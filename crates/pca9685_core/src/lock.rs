use std::sync::{Arc, Mutex, MutexGuard};

///Mutual exclusion capability held for the whole of one logical device operation.
///
/// Register updates are multi-step (select register, read, modify, write) and are not atomic against other users
/// of the same physical bus. Devices sharing a bus across threads must share one lock.
pub trait BusLock {
    type Guard<'a>
    where
        Self: 'a;

    fn acquire(&self) -> Self::Guard<'_>;
}

///For a device that is the only user of its bus.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLock;

impl BusLock for NoLock {
    type Guard<'a> = ();

    fn acquire(&self) -> Self::Guard<'_> {}
}

///A lock that can be cloned into every device on the same bus.
#[derive(Debug, Default, Clone)]
pub struct SharedBusLock {
    inner: Arc<Mutex<()>>,
}

impl SharedBusLock {
    pub fn new() -> Self {
        Self::default()
    }

    ///True when both handles guard the same bus.
    pub fn same_bus(&self, other: &SharedBusLock) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl BusLock for SharedBusLock {
    type Guard<'a> = MutexGuard<'a, ()>;

    fn acquire(&self) -> Self::Guard<'_> {
        // the guarded value is (), a panic while holding it leaves nothing inconsistent
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}
