use thiserror::Error;

use super::types::{Address, Operation, ProposalId, WorkflowStatus};

/// Coarse classification of a rejected call, for callers that branch on the
/// family rather than the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller lacks the role the operation requires.
    Unauthorized,
    /// Operation is valid for some phase, just not the current one.
    WrongPhase,
    /// Caller and phase are fine, the payload is not.
    Validation,
}

/// Every way an engine call can be rejected. The display strings are part
/// of the public surface and stay stable; tests match on them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VotingError {
    #[error("caller {caller} is not the owner")]
    NotOwner { caller: Address },

    #[error("You're not a voter")]
    NotVoter { caller: Address },

    #[error("{}", .operation.rejection_message())]
    WrongPhase {
        operation: Operation,
        current: WorkflowStatus,
    },

    #[error("Already registered")]
    AlreadyRegistered { address: Address },

    #[error("Vous ne pouvez pas ne rien proposer")]
    EmptyDescription,

    #[error("Maximum number of 3 proposals per user reached")]
    ProposalQuotaReached { voter: Address },

    #[error("Maximum number of proposals reached")]
    ProposalListFull,

    #[error("You have already voted")]
    AlreadyVoted { voter: Address },

    #[error("Proposal not found")]
    ProposalNotFound { proposal_id: ProposalId },
}

impl VotingError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VotingError::NotOwner { .. } | VotingError::NotVoter { .. } => ErrorKind::Unauthorized,
            VotingError::WrongPhase { .. } => ErrorKind::WrongPhase,
            VotingError::AlreadyRegistered { .. }
            | VotingError::EmptyDescription
            | VotingError::ProposalQuotaReached { .. }
            | VotingError::ProposalListFull
            | VotingError::AlreadyVoted { .. }
            | VotingError::ProposalNotFound { .. } => ErrorKind::Validation,
        }
    }
}
