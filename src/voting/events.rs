use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::types::{Address, ProposalId, WorkflowStatus};

/// Everything the engine announces to the outside world. Exactly one event
/// per accepted write, except `start_proposals_registering`, which announces
/// the GENESIS proposal and then the phase change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VotingEvent {
    VoterRegistered {
        voter: Address,
    },
    ProposalRegistered {
        proposal_id: ProposalId,
    },
    Voted {
        voter: Address,
        proposal_id: ProposalId,
    },
    WorkflowStatusChange {
        previous: WorkflowStatus,
        new: WorkflowStatus,
    },
}

/// A published event with its position in the log and the wall-clock time
/// it was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub seq: u64,
    pub recorded_at: DateTime<Utc>,
    pub event: VotingEvent,
}

/// Observer hook for external consumers. A sink sees each record exactly
/// once, immediately after it lands in the log. Rejected operations publish
/// nothing.
pub trait EventSink: Send {
    fn publish(&mut self, record: &EventRecord);
}

/// Append-only in-memory event log; the audit trail of one election.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, stamping it with the next sequence number.
    pub(crate) fn append(&mut self, event: VotingEvent) -> EventRecord {
        let record = EventRecord {
            seq: self.records.len() as u64,
            recorded_at: Utc::now(),
            event,
        };
        self.records.push(record.clone());
        record
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// The events alone, in publication order.
    pub fn events(&self) -> impl Iterator<Item = &VotingEvent> {
        self.records.iter().map(|record| &record.event)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }
}
