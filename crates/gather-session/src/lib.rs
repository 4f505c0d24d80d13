pub mod gate;
pub mod hub;
pub mod monitor;
pub mod token;

pub use gate::{evaluate, GateDecision, Route};
pub use hub::SessionHub;
pub use monitor::{Navigate, SessionMonitor, SessionStatus};
pub use token::TokenError;
