//! Formgate API Library
//!
//! HTTP surface for the marketing-site form processors: one POST endpoint per
//! form type, all routed through the same submission gate.

pub mod extract;
pub mod forms;
pub mod gate;
pub mod handlers;
pub mod response;
pub mod security;
pub mod services;
pub mod session;
pub mod setup;
pub mod state;
pub mod telemetry;
pub mod utils;

pub use response::FormResponse;
pub use state::AppState;
