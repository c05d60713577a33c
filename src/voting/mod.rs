//! Voting workflow engine
//!
//! This module implements the full election lifecycle as a sequential state
//! machine: an owner registers voters, opens and closes proposal
//! registration, runs a voting session, and tallies the result.
//!
//! # Architecture
//!
//! The engine consists of:
//! - **Domain types**: phases, addresses, registry entries, ballot entries
//! - **State machine**: `VotingEngine`, the single owner of all mutable state
//! - **Event log**: append-only audit trail with pluggable observer sinks
//! - **Tally**: the plurality winner scan
//! - **Snapshots**: serde round trip of a whole election for persistence
//!
//! # Key invariants
//!
//! - Phases advance one step at a time and never go back
//! - Every write validates its whole guard chain before mutating anything
//! - Rejected calls publish no events and leave no partial state
//! - The ballot is append-only and ids never move

pub mod engine;
pub mod errors;
pub mod events;
pub mod snapshot;
pub mod tally;
pub mod types;

pub use engine::VotingEngine;
pub use errors::{ErrorKind, VotingError};
pub use events::{EventLog, EventRecord, EventSink, VotingEvent};
pub use snapshot::{EngineSnapshot, SnapshotError, SNAPSHOT_VERSION};
pub use tally::winning_proposal;
pub use types::{
    Address, Operation, Proposal, ProposalId, Voter, WorkflowStatus, GENESIS_DESCRIPTION,
    MAX_PROPOSALS, MAX_PROPOSALS_PER_VOTER,
};
