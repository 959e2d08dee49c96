//! Application state.

use std::sync::Arc;

use tindung_core::{Clock, Loan, SystemClock};
use tindung_store::Store;

use crate::config::ServiceConfig;
use crate::services::{
    CodeGenerator, ContractService, HistoryService, ScheduleGenerator, SequentialCodeGenerator,
};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<dyn Store>,

    /// Source of today's date for schedule generation.
    pub clock: Arc<dyn Clock>,

    /// Assigns codes to new contracts.
    pub codes: Arc<dyn CodeGenerator>,

    /// Service configuration.
    pub config: ServiceConfig,
}

impl AppState {
    /// Create application state with the system clock and sequential codes.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, config: ServiceConfig) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock::new()),
            codes: Arc::new(SequentialCodeGenerator),
            config,
        }
    }

    /// Replace the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Contract service for the product `L`.
    #[must_use]
    pub fn contracts<L: Loan>(&self) -> ContractService<'_, L> {
        ContractService::new(self.store.as_ref(), self.codes.as_ref())
    }

    /// Payment-history service.
    #[must_use]
    pub fn history(&self) -> HistoryService<'_> {
        HistoryService::new(self.store.as_ref())
    }

    /// Schedule generator reading today's date from the configured clock and
    /// capped at the configured period count.
    #[must_use]
    pub fn schedule(&self) -> ScheduleGenerator<'_> {
        ScheduleGenerator::new(self.store.as_ref(), self.clock.as_ref())
            .with_max_periods(self.config.max_schedule_periods)
    }
}
