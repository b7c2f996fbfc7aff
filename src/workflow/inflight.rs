//! One-request-at-a-time guard for a panel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{DashboardError, Result};

/// Shared in-flight flag. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct InFlight(Arc<AtomicBool>);

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the panel. Fails with `Busy` while another request is pending.
    pub fn try_begin(&self) -> Result<InFlightTicket> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| DashboardError::Busy)?;
        Ok(InFlightTicket(self.0.clone()))
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Releases the flag when dropped, whether the request succeeded or failed
#[derive(Debug)]
pub struct InFlightTicket(Arc<AtomicBool>);

impl Drop for InFlightTicket {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_claim_is_busy() {
        let flag = InFlight::new();
        let ticket = flag.try_begin().unwrap();
        assert!(flag.is_busy());
        assert!(matches!(flag.try_begin(), Err(DashboardError::Busy)));

        drop(ticket);
        assert!(!flag.is_busy());
        assert!(flag.try_begin().is_ok());
    }

    #[test]
    fn test_distinct_flags_are_independent() {
        let a = InFlight::new();
        let b = InFlight::new();
        let _ticket = a.try_begin().unwrap();
        assert!(b.try_begin().is_ok());
    }
}
