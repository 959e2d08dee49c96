//! Domain services.
//!
//! Each service borrows the store for the duration of one call; handlers
//! build them from [`crate::AppState`] per request.

pub mod codes;
pub mod contracts;
pub mod history;
pub mod schedule;

pub use codes::{CodeGenerator, SequentialCodeGenerator};
pub use contracts::{find_contract, ContractService};
pub use history::HistoryService;
pub use schedule::ScheduleGenerator;
