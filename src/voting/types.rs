use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a proposal on the ballot. The proposal list is append-only, so
/// an id stays valid for the whole life of the election.
pub type ProposalId = usize;

/// Hard cap on the ballot length, GENESIS included.
pub const MAX_PROPOSALS: usize = 1000;

/// Number of proposals a single voter may submit. GENESIS is seeded by the
/// workflow itself and does not count against anyone.
pub const MAX_PROPOSALS_PER_VOTER: u8 = 3;

/// Description of the sentinel proposal seeded at ballot index 0.
pub const GENESIS_DESCRIPTION: &str = "GENESIS";

/// Participant identity. The owner and every voter are plain addresses;
/// equality is exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for Address {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for Address {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The six phases of an election, in the order they must be traversed.
/// A successful transition advances by exactly one phase; there is no skip,
/// no revisit, and nothing after `VotesTallied`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WorkflowStatus {
    RegisteringVoters,
    ProposalsRegistrationStarted,
    ProposalsRegistrationEnded,
    VotingSessionStarted,
    VotingSessionEnded,
    VotesTallied,
}

impl WorkflowStatus {
    /// Every phase in workflow order. Useful for exhaustive table tests.
    pub const ALL: [WorkflowStatus; 6] = [
        WorkflowStatus::RegisteringVoters,
        WorkflowStatus::ProposalsRegistrationStarted,
        WorkflowStatus::ProposalsRegistrationEnded,
        WorkflowStatus::VotingSessionStarted,
        WorkflowStatus::VotingSessionEnded,
        WorkflowStatus::VotesTallied,
    ];

    /// Ordinal of the phase, 0 for `RegisteringVoters` through 5 for
    /// `VotesTallied`.
    pub fn rank(self) -> u8 {
        self as u8
    }

    /// The phase that follows this one, or `None` from the terminal phase.
    pub fn successor(self) -> Option<WorkflowStatus> {
        match self {
            WorkflowStatus::RegisteringVoters => Some(WorkflowStatus::ProposalsRegistrationStarted),
            WorkflowStatus::ProposalsRegistrationStarted => {
                Some(WorkflowStatus::ProposalsRegistrationEnded)
            }
            WorkflowStatus::ProposalsRegistrationEnded => {
                Some(WorkflowStatus::VotingSessionStarted)
            }
            WorkflowStatus::VotingSessionStarted => Some(WorkflowStatus::VotingSessionEnded),
            WorkflowStatus::VotingSessionEnded => Some(WorkflowStatus::VotesTallied),
            WorkflowStatus::VotesTallied => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, WorkflowStatus::VotesTallied)
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            WorkflowStatus::RegisteringVoters => "Registering Voters",
            WorkflowStatus::ProposalsRegistrationStarted => "Proposals Registration Started",
            WorkflowStatus::ProposalsRegistrationEnded => "Proposals Registration Ended",
            WorkflowStatus::VotingSessionStarted => "Voting Session Started",
            WorkflowStatus::VotingSessionEnded => "Voting Session Ended",
            WorkflowStatus::VotesTallied => "Votes Tallied",
        };
        f.write_str(label)
    }
}

/// Registry entry for one address. Unknown addresses read as the default
/// record with every field zeroed, so lookups never fail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voter {
    pub is_registered: bool,
    pub has_voted: bool,
    pub voted_proposal_id: Option<ProposalId>,
    pub proposal_count: u8,
}

/// One entry on the ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub description: String,
    pub vote_count: u32,
}

impl Proposal {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            vote_count: 0,
        }
    }

    /// The sentinel seeded at index 0 when proposal registration opens. It
    /// wins the tally when nobody votes.
    pub fn genesis() -> Self {
        Self::new(GENESIS_DESCRIPTION)
    }
}

/// The write surface of the engine, as data. Each operation is allowed in
/// exactly one phase and carries the message reported when it is called in
/// any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    AddVoter,
    StartProposalsRegistering,
    AddProposal,
    EndProposalsRegistering,
    StartVotingSession,
    SetVote,
    EndVotingSession,
    TallyVotes,
}

impl Operation {
    /// Every operation, in workflow order.
    pub const ALL: [Operation; 8] = [
        Operation::AddVoter,
        Operation::StartProposalsRegistering,
        Operation::AddProposal,
        Operation::EndProposalsRegistering,
        Operation::StartVotingSession,
        Operation::SetVote,
        Operation::EndVotingSession,
        Operation::TallyVotes,
    ];

    /// The only phase this operation is accepted in.
    pub fn required_status(self) -> WorkflowStatus {
        match self {
            Operation::AddVoter => WorkflowStatus::RegisteringVoters,
            Operation::StartProposalsRegistering => WorkflowStatus::RegisteringVoters,
            Operation::AddProposal => WorkflowStatus::ProposalsRegistrationStarted,
            Operation::EndProposalsRegistering => WorkflowStatus::ProposalsRegistrationStarted,
            Operation::StartVotingSession => WorkflowStatus::ProposalsRegistrationEnded,
            Operation::SetVote => WorkflowStatus::VotingSessionStarted,
            Operation::EndVotingSession => WorkflowStatus::VotingSessionStarted,
            Operation::TallyVotes => WorkflowStatus::VotingSessionEnded,
        }
    }

    /// Message reported when the operation is attempted outside its phase.
    pub fn rejection_message(self) -> &'static str {
        match self {
            Operation::AddVoter => "Voters registration is not open yet",
            Operation::StartProposalsRegistering => "Registering proposals cant be started now",
            Operation::AddProposal => "Proposals are not allowed yet",
            Operation::EndProposalsRegistering => "Registering proposals havent started yet",
            Operation::StartVotingSession => "Registering proposals phase is not finished",
            Operation::SetVote => "Voting session havent started yet",
            Operation::EndVotingSession => "Voting session havent started yet",
            Operation::TallyVotes => "Current status is not voting session ended",
        }
    }
}
