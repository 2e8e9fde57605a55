use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::AppError;

/// "Submitting..." flag for one form. Cloning shares the flag.
#[derive(Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

/// Clears the flag when dropped, including on early return.
pub struct InFlightGuard(Arc<AtomicBool>);

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Result<InFlightGuard, AppError> {
        if self
            .0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(AppError::Busy);
        }
        Ok(InFlightGuard(self.0.clone()))
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
