//! Tindung HTTP API Service.
//!
//! This crate provides the HTTP API for credit management, including:
//!
//! - Credit loans (tín chấp) and installment loans (trả góp)
//! - Payment history (lịch sử trả lãi)
//! - The repayment schedule generator
//!
//! Handlers are thin: they build a service from [`AppState`] per request and
//! map [`tindung_core::CreditError`] to [`ApiError`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Allow some pedantic lints that are noisy for Axum handler functions
#![allow(clippy::missing_errors_doc)] // Axum handlers all return Result
#![allow(clippy::unused_async)] // Handlers are synchronous over the store

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod services;
pub mod state;

pub use config::ServiceConfig;
pub use error::ApiError;
pub use routes::create_router;
pub use services::{
    find_contract, CodeGenerator, ContractService, HistoryService, ScheduleGenerator,
    SequentialCodeGenerator,
};
pub use state::AppState;
