//! Commands module - service layer for the account integration workflow

mod integrate;
pub(crate) mod service;

pub use integrate::IntegrationOutcome;
pub use service::StackerService;
