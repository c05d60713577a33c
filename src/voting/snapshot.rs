use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use super::engine::VotingEngine;
use super::events::EventLog;
use super::types::{Address, Proposal, ProposalId, Voter, WorkflowStatus};

/// Snapshot schema version, bumped on any incompatible layout change.
pub const SNAPSHOT_VERSION: &str = "1";

/// Errors that can occur while saving or loading engine snapshots.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },
}

/// Complete serializable image of one engine, event log included. Attached
/// sinks are the one thing that does not survive the round trip; a restored
/// engine starts with none.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub version: String,
    pub captured_at: DateTime<Utc>,
    pub owner: Address,
    pub status: WorkflowStatus,
    pub voters: HashMap<Address, Voter>,
    pub proposals: Vec<Proposal>,
    pub winning_proposal_id: Option<ProposalId>,
    pub events: EventLog,
}

impl EngineSnapshot {
    pub fn capture(engine: &VotingEngine) -> Self {
        Self {
            version: SNAPSHOT_VERSION.to_string(),
            captured_at: Utc::now(),
            owner: engine.owner.clone(),
            status: engine.status,
            voters: engine.voters.clone(),
            proposals: engine.proposals.clone(),
            winning_proposal_id: engine.winning_proposal_id,
            events: engine.events.clone(),
        }
    }

    /// Rebuild a live engine from this snapshot.
    pub fn restore(self) -> VotingEngine {
        VotingEngine::from_parts(
            self.owner,
            self.status,
            self.voters,
            self.proposals,
            self.winning_proposal_id,
            self.events,
        )
    }

    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        info!(path = %path.as_ref().display(), "engine snapshot saved");
        Ok(())
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let snapshot: EngineSnapshot = serde_json::from_str(&contents)?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                expected: SNAPSHOT_VERSION.to_string(),
                found: snapshot.version,
            });
        }
        debug!(path = %path.as_ref().display(), "engine snapshot loaded");
        Ok(snapshot)
    }
}
