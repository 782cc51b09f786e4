// Runtime load configuration
pub mod config;

// Dispatch tokens handed from the metronome to workers
pub mod dispatch;

// Result of one request attempt
pub mod outcome;

// Port interfaces
pub mod ports;

// Status projection for the control surface
pub mod status;

// Domain-specific error types
pub mod errors;

pub use config::LoadConfig;
pub use dispatch::DispatchToken;
pub use outcome::Outcome;
pub use status::StatusSnapshot;
