// Shared runtime configuration
pub mod config_store;

// Metronome to worker token hand-off
pub mod dispatch;

// Rate metronome
pub mod metronome;

// Outcome to telemetry translation
pub mod outcome_recorder;

// Worker pool reconciliation
pub mod pool_manager;

pub mod settings;
pub mod throughput;
pub mod worker;

// System orchestrator
pub mod system;
