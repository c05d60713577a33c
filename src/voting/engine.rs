use std::collections::HashMap;

use tracing::{info, warn};

use super::errors::VotingError;
use super::events::{EventLog, EventSink, VotingEvent};
use super::tally;
use super::types::{
    Address, Operation, Proposal, ProposalId, Voter, WorkflowStatus, MAX_PROPOSALS,
    MAX_PROPOSALS_PER_VOTER,
};

/// The voting workflow engine. One value owns the entire election: the
/// registry, the ballot, the phase, the event log. Every write validates its
/// full guard chain before touching anything, so a rejected call leaves no
/// trace in state or in the log.
pub struct VotingEngine {
    pub(super) owner: Address,
    pub(super) status: WorkflowStatus,
    pub(super) voters: HashMap<Address, Voter>,
    pub(super) proposals: Vec<Proposal>,
    pub(super) winning_proposal_id: Option<ProposalId>,
    pub(super) events: EventLog,
    sinks: Vec<Box<dyn EventSink>>,
}

impl std::fmt::Debug for VotingEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VotingEngine")
            .field("owner", &self.owner)
            .field("status", &self.status)
            .field("voters", &self.voters.len())
            .field("proposals", &self.proposals.len())
            .field("winning_proposal_id", &self.winning_proposal_id)
            .field("events", &self.events.len())
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl VotingEngine {
    /// A fresh election owned by `owner`: phase `RegisteringVoters`, empty
    /// registry, empty ballot, empty log.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            status: WorkflowStatus::RegisteringVoters,
            voters: HashMap::new(),
            proposals: Vec::new(),
            winning_proposal_id: None,
            events: EventLog::new(),
            sinks: Vec::new(),
        }
    }

    /// Attach an observer that sees every record as it is published.
    pub fn with_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub(super) fn from_parts(
        owner: Address,
        status: WorkflowStatus,
        voters: HashMap<Address, Voter>,
        proposals: Vec<Proposal>,
        winning_proposal_id: Option<ProposalId>,
        events: EventLog,
    ) -> Self {
        Self {
            owner,
            status,
            voters,
            proposals,
            winning_proposal_id,
            events,
            sinks: Vec::new(),
        }
    }

    // ---- guards ----

    fn require_owner(&self, caller: &Address) -> Result<(), VotingError> {
        if caller != &self.owner {
            warn!(caller = %caller, "rejected: caller is not the owner");
            return Err(VotingError::NotOwner {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    fn require_voter(&self, caller: &Address) -> Result<(), VotingError> {
        let registered = self
            .voters
            .get(caller)
            .map_or(false, |voter| voter.is_registered);
        if !registered {
            warn!(caller = %caller, "rejected: caller is not a registered voter");
            return Err(VotingError::NotVoter {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    fn require_status(&self, operation: Operation) -> Result<(), VotingError> {
        if self.status != operation.required_status() {
            warn!(
                operation = ?operation,
                current = %self.status,
                required = %operation.required_status(),
                "rejected: wrong workflow phase"
            );
            return Err(VotingError::WrongPhase {
                operation,
                current: self.status,
            });
        }
        Ok(())
    }

    // ---- event plumbing ----

    fn publish(&mut self, event: VotingEvent) {
        let record = self.events.append(event);
        for sink in &mut self.sinks {
            sink.publish(&record);
        }
    }

    fn advance_status(&mut self, operation: Operation, to: WorkflowStatus) {
        let previous = self.status;
        self.status = to;
        info!(
            operation = ?operation,
            previous = %previous,
            new = %to,
            "workflow phase advanced"
        );
        self.publish(VotingEvent::WorkflowStatusChange { previous, new: to });
    }

    // ---- registration ----

    /// Register `address` as a voter. Owner only, `RegisteringVoters` only,
    /// once per address.
    pub fn add_voter(&mut self, caller: &Address, address: Address) -> Result<(), VotingError> {
        self.require_owner(caller)?;
        self.require_status(Operation::AddVoter)?;
        if self
            .voters
            .get(&address)
            .map_or(false, |voter| voter.is_registered)
        {
            return Err(VotingError::AlreadyRegistered { address });
        }

        self.voters.insert(
            address.clone(),
            Voter {
                is_registered: true,
                ..Default::default()
            },
        );
        info!(voter = %address, "voter registered");
        self.publish(VotingEvent::VoterRegistered { voter: address });
        Ok(())
    }

    /// Submit a proposal. Voters only, during `ProposalsRegistrationStarted`,
    /// within both the per-voter and the global ballot caps. Returns the new
    /// proposal's id.
    pub fn add_proposal(
        &mut self,
        caller: &Address,
        description: impl Into<String>,
    ) -> Result<ProposalId, VotingError> {
        self.require_voter(caller)?;
        self.require_status(Operation::AddProposal)?;

        let description = description.into();
        if description.is_empty() {
            return Err(VotingError::EmptyDescription);
        }
        let quota_used = self
            .voters
            .get(caller)
            .map_or(0, |voter| voter.proposal_count);
        if quota_used >= MAX_PROPOSALS_PER_VOTER {
            return Err(VotingError::ProposalQuotaReached {
                voter: caller.clone(),
            });
        }
        if self.proposals.len() >= MAX_PROPOSALS {
            return Err(VotingError::ProposalListFull);
        }

        let proposal_id = self.proposals.len();
        self.proposals.push(Proposal::new(description));
        if let Some(voter) = self.voters.get_mut(caller) {
            voter.proposal_count += 1;
        }
        info!(voter = %caller, proposal_id = %proposal_id, "proposal registered");
        self.publish(VotingEvent::ProposalRegistered { proposal_id });
        Ok(proposal_id)
    }

    /// Cast the caller's single vote for `proposal_id`. Voters only, during
    /// `VotingSessionStarted`.
    pub fn set_vote(
        &mut self,
        caller: &Address,
        proposal_id: ProposalId,
    ) -> Result<(), VotingError> {
        self.require_voter(caller)?;
        self.require_status(Operation::SetVote)?;
        if self
            .voters
            .get(caller)
            .map_or(false, |voter| voter.has_voted)
        {
            return Err(VotingError::AlreadyVoted {
                voter: caller.clone(),
            });
        }
        if proposal_id >= self.proposals.len() {
            return Err(VotingError::ProposalNotFound { proposal_id });
        }

        if let Some(voter) = self.voters.get_mut(caller) {
            voter.has_voted = true;
            voter.voted_proposal_id = Some(proposal_id);
        }
        self.proposals[proposal_id].vote_count += 1;
        info!(voter = %caller, proposal_id = %proposal_id, "vote cast");
        self.publish(VotingEvent::Voted {
            voter: caller.clone(),
            proposal_id,
        });
        Ok(())
    }

    // ---- workflow transitions ----

    /// Open proposal registration. Seeds the GENESIS sentinel at ballot
    /// index 0 and announces it before the phase change.
    pub fn start_proposals_registering(&mut self, caller: &Address) -> Result<(), VotingError> {
        self.require_owner(caller)?;
        self.require_status(Operation::StartProposalsRegistering)?;

        self.proposals.push(Proposal::genesis());
        self.publish(VotingEvent::ProposalRegistered { proposal_id: 0 });
        self.advance_status(
            Operation::StartProposalsRegistering,
            WorkflowStatus::ProposalsRegistrationStarted,
        );
        Ok(())
    }

    pub fn end_proposals_registering(&mut self, caller: &Address) -> Result<(), VotingError> {
        self.require_owner(caller)?;
        self.require_status(Operation::EndProposalsRegistering)?;
        self.advance_status(
            Operation::EndProposalsRegistering,
            WorkflowStatus::ProposalsRegistrationEnded,
        );
        Ok(())
    }

    pub fn start_voting_session(&mut self, caller: &Address) -> Result<(), VotingError> {
        self.require_owner(caller)?;
        self.require_status(Operation::StartVotingSession)?;
        self.advance_status(
            Operation::StartVotingSession,
            WorkflowStatus::VotingSessionStarted,
        );
        Ok(())
    }

    pub fn end_voting_session(&mut self, caller: &Address) -> Result<(), VotingError> {
        self.require_owner(caller)?;
        self.require_status(Operation::EndVotingSession)?;
        self.advance_status(
            Operation::EndVotingSession,
            WorkflowStatus::VotingSessionEnded,
        );
        Ok(())
    }

    /// Close the election: compute the winner, fix it forever, enter the
    /// terminal phase. Returns the winning proposal id.
    pub fn tally_votes(&mut self, caller: &Address) -> Result<ProposalId, VotingError> {
        self.require_owner(caller)?;
        self.require_status(Operation::TallyVotes)?;

        let winner = tally::winning_proposal(&self.proposals);
        self.winning_proposal_id = Some(winner);
        info!(
            winning_proposal_id = %winner,
            proposals = %self.proposals.len(),
            "votes tallied"
        );
        self.advance_status(Operation::TallyVotes, WorkflowStatus::VotesTallied);
        Ok(winner)
    }

    // ---- reads ----

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn workflow_status(&self) -> WorkflowStatus {
        self.status
    }

    pub fn proposals_count(&self) -> usize {
        self.proposals.len()
    }

    /// The full ballot in registration order. Empty until proposal
    /// registration has opened.
    pub fn proposals(&self) -> &[Proposal] {
        &self.proposals
    }

    /// `None` until `tally_votes` has run, then fixed forever.
    pub fn winning_proposal_id(&self) -> Option<ProposalId> {
        self.winning_proposal_id
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn registered_voter_count(&self) -> usize {
        self.voters.len()
    }

    /// Registry entry for `address`. Voters only; unknown addresses read as
    /// the all-default record.
    pub fn get_voter(&self, caller: &Address, address: &Address) -> Result<Voter, VotingError> {
        self.require_voter(caller)?;
        Ok(self.voters.get(address).cloned().unwrap_or_default())
    }

    /// One ballot entry by id. Voters only.
    pub fn get_one_proposal(
        &self,
        caller: &Address,
        proposal_id: ProposalId,
    ) -> Result<Proposal, VotingError> {
        self.require_voter(caller)?;
        self.proposals
            .get(proposal_id)
            .cloned()
            .ok_or(VotingError::ProposalNotFound { proposal_id })
    }
}
