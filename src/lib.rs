// Scrutineer Library - Voting Workflow Engine
// This exposes the core components for testing and integration

pub mod config;
pub mod scenario;
pub mod telemetry;
pub mod voting;

// Re-export key types for easy access
pub use config::{config, init_config, ScrutineerConfig};
pub use scenario::{
    demo_scenario, run_scenario, ProposalEntry, ScenarioFile, ScenarioReport, VoteEntry,
};
pub use telemetry::{create_run_span, generate_correlation_id, init_telemetry};
pub use voting::{
    Address, EngineSnapshot, ErrorKind, EventLog, EventRecord, EventSink, Operation, Proposal,
    ProposalId, Voter, VotingEngine, VotingError, VotingEvent, WorkflowStatus,
};
