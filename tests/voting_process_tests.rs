//! Integration tests for the registration, proposal, and ballot rules
//!
//! Covers the per-call guard chains: who may call, in which phase, with what
//! payload, and what the rejection message says when any link fails. Also
//! checks that accepted writes land in the event log in order, reach any
//! attached sink, and that rejected writes leave no trace.

use std::sync::{Arc, Mutex};

use scrutineer::voting::{
    Address, EventRecord, EventSink, VotingEngine, VotingError, VotingEvent, WorkflowStatus,
    GENESIS_DESCRIPTION, MAX_PROPOSALS_PER_VOTER,
};

fn admin() -> Address {
    Address::new("0xadmin")
}

fn engine_with_voters(names: &[&str]) -> (VotingEngine, Vec<Address>) {
    let mut engine = VotingEngine::new(admin());
    let voters: Vec<Address> = names.iter().copied().map(Address::new).collect();
    for voter in &voters {
        engine.add_voter(&admin(), voter.clone()).unwrap();
    }
    (engine, voters)
}

/// Sink that copies every forwarded record into shared storage, so a test
/// can compare what observers heard against the engine's own log.
struct RecordingSink {
    seen: Arc<Mutex<Vec<EventRecord>>>,
}

impl EventSink for RecordingSink {
    fn publish(&mut self, record: &EventRecord) {
        self.seen.lock().unwrap().push(record.clone());
    }
}

#[test]
fn each_address_registers_exactly_once() {
    let (mut engine, voters) = engine_with_voters(&["0xalice"]);

    let err = engine.add_voter(&admin(), voters[0].clone()).unwrap_err();
    assert_eq!(err.to_string(), "Already registered");
    assert_eq!(
        err,
        VotingError::AlreadyRegistered {
            address: voters[0].clone()
        }
    );

    engine.add_voter(&admin(), Address::new("0xbob")).unwrap();
    assert_eq!(engine.registered_voter_count(), 2);
}

#[test]
fn strangers_cannot_submit_proposals() {
    let (mut engine, _) = engine_with_voters(&["0xalice"]);
    engine.start_proposals_registering(&admin()).unwrap();

    let err = engine
        .add_proposal(&Address::new("0xmallory"), "Free ponies")
        .unwrap_err();
    assert_eq!(err.to_string(), "You're not a voter");
    assert_eq!(engine.proposals_count(), 1);
}

#[test]
fn each_voter_submits_at_most_three_proposals() {
    let (mut engine, voters) = engine_with_voters(&["0xalice", "0xbob"]);
    let alice = &voters[0];
    engine.start_proposals_registering(&admin()).unwrap();

    for n in 1..=MAX_PROPOSALS_PER_VOTER {
        let id = engine.add_proposal(alice, format!("idea {n}")).unwrap();
        assert_eq!(id, n as usize, "ballot ids follow registration order");
    }

    let err = engine.add_proposal(alice, "one too many").unwrap_err();
    assert_eq!(
        err.to_string(),
        "Maximum number of 3 proposals per user reached"
    );
    assert_eq!(
        err,
        VotingError::ProposalQuotaReached {
            voter: alice.clone()
        }
    );

    // The quota is per voter, not shared across the ballot.
    let id = engine.add_proposal(&voters[1], "bob's idea").unwrap();
    assert_eq!(id, 4);
}

#[test]
fn empty_descriptions_are_rejected_verbatim() {
    let (mut engine, voters) = engine_with_voters(&["0xalice"]);
    engine.start_proposals_registering(&admin()).unwrap();

    let err = engine.add_proposal(&voters[0], "").unwrap_err();
    assert_eq!(err, VotingError::EmptyDescription);
    assert_eq!(err.to_string(), "Vous ne pouvez pas ne rien proposer");

    // Only the exactly-empty string is refused. Whitespace passes.
    assert!(engine.add_proposal(&voters[0], " ").is_ok());
}

#[test]
fn proposals_read_back_as_submitted() {
    let (mut engine, voters) = engine_with_voters(&["0xalice"]);
    engine.start_proposals_registering(&admin()).unwrap();

    let id = engine
        .add_proposal(&voters[0], "repave the towpath")
        .unwrap();

    let proposal = engine.get_one_proposal(&voters[0], id).unwrap();
    assert_eq!(proposal.description, "repave the towpath");
    assert_eq!(proposal.vote_count, 0);
}

#[test]
fn each_voter_votes_exactly_once() {
    let (mut engine, voters) = engine_with_voters(&["0xalice", "0xbob"]);
    let alice = &voters[0];
    engine.start_proposals_registering(&admin()).unwrap();
    engine.add_proposal(alice, "only option").unwrap();
    engine.end_proposals_registering(&admin()).unwrap();
    engine.start_voting_session(&admin()).unwrap();

    engine.set_vote(alice, 1).unwrap();
    let err = engine.set_vote(alice, 1).unwrap_err();
    assert_eq!(err.to_string(), "You have already voted");
    assert_eq!(
        err,
        VotingError::AlreadyVoted {
            voter: alice.clone()
        }
    );

    assert_eq!(engine.proposals()[1].vote_count, 1);

    let record = engine.get_voter(alice, alice).unwrap();
    assert!(record.has_voted);
    assert_eq!(record.voted_proposal_id, Some(1));
}

#[test]
fn votes_must_name_a_proposal_on_the_ballot() {
    let (mut engine, voters) = engine_with_voters(&["0xalice", "0xbob"]);
    engine.start_proposals_registering(&admin()).unwrap();
    engine.add_proposal(&voters[0], "the one").unwrap();
    engine.end_proposals_registering(&admin()).unwrap();
    engine.start_voting_session(&admin()).unwrap();

    let err = engine.set_vote(&voters[0], 99).unwrap_err();
    assert_eq!(err, VotingError::ProposalNotFound { proposal_id: 99 });
    assert_eq!(err.to_string(), "Proposal not found");

    // The sentinel at index 0 is a legal target.
    engine.set_vote(&voters[1], 0).unwrap();
    assert_eq!(engine.proposals()[0].vote_count, 1);
    assert_eq!(engine.proposals()[0].description, GENESIS_DESCRIPTION);
}

#[test]
fn registry_and_ballot_reads_are_for_voters_only() {
    let (engine, voters) = engine_with_voters(&["0xalice"]);
    let alice = &voters[0];
    let stranger = Address::new("0xstranger");

    assert_eq!(
        engine.get_voter(&stranger, alice).unwrap_err().to_string(),
        "You're not a voter"
    );
    assert!(engine.get_one_proposal(&stranger, 0).is_err());

    // Unknown addresses read as the zeroed record rather than an error.
    let ghost = engine.get_voter(alice, &Address::new("0xghost")).unwrap();
    assert!(!ghost.is_registered);
    assert!(!ghost.has_voted);

    // An empty ballot has no entry 0 yet.
    let err = engine.get_one_proposal(alice, 0).unwrap_err();
    assert_eq!(err, VotingError::ProposalNotFound { proposal_id: 0 });
}

#[test]
fn accepted_writes_land_in_the_log_in_call_order() {
    let (mut engine, voters) = engine_with_voters(&["0xalice", "0xbob"]);
    let alice = &voters[0];

    engine.start_proposals_registering(&admin()).unwrap();
    engine.add_proposal(alice, "street lighting").unwrap();
    engine.end_proposals_registering(&admin()).unwrap();
    engine.start_voting_session(&admin()).unwrap();
    engine.set_vote(alice, 1).unwrap();
    engine.end_voting_session(&admin()).unwrap();
    engine.tally_votes(&admin()).unwrap();

    let records = engine.events().records();
    assert_eq!(records.len(), 10);
    for (expected_seq, record) in records.iter().enumerate() {
        assert_eq!(record.seq, expected_seq as u64);
    }

    let events: Vec<&VotingEvent> = engine.events().events().collect();
    assert_eq!(
        events[0],
        &VotingEvent::VoterRegistered {
            voter: alice.clone()
        }
    );
    // Opening the ballot announces GENESIS before the phase change.
    assert_eq!(
        events[2],
        &VotingEvent::ProposalRegistered { proposal_id: 0 }
    );
    assert_eq!(
        events[3],
        &VotingEvent::WorkflowStatusChange {
            previous: WorkflowStatus::RegisteringVoters,
            new: WorkflowStatus::ProposalsRegistrationStarted,
        }
    );
    assert_eq!(
        events[7],
        &VotingEvent::Voted {
            voter: alice.clone(),
            proposal_id: 1,
        }
    );
    assert_eq!(
        events[9],
        &VotingEvent::WorkflowStatusChange {
            previous: WorkflowStatus::VotingSessionEnded,
            new: WorkflowStatus::VotesTallied,
        }
    );
}

#[test]
fn rejected_writes_leave_no_trace() {
    let (mut engine, voters) = engine_with_voters(&["0xalice"]);
    let alice = &voters[0];

    // Wrong phase: proposals are not open yet.
    let events_before = engine.events().len();
    let err = engine.add_proposal(alice, "too early").unwrap_err();
    assert_eq!(err.to_string(), "Proposals are not allowed yet");
    assert_eq!(engine.events().len(), events_before);
    assert_eq!(engine.proposals_count(), 0);
    assert_eq!(engine.workflow_status(), WorkflowStatus::RegisteringVoters);

    // Quota rejection leaves the voter's count where it was.
    engine.start_proposals_registering(&admin()).unwrap();
    for n in 0..MAX_PROPOSALS_PER_VOTER {
        engine.add_proposal(alice, format!("idea {n}")).unwrap();
    }
    let count_before = engine.proposals_count();
    let events_before = engine.events().len();
    engine.add_proposal(alice, "rejected").unwrap_err();
    assert_eq!(engine.proposals_count(), count_before);
    assert_eq!(engine.events().len(), events_before);
    let record = engine.get_voter(alice, alice).unwrap();
    assert_eq!(record.proposal_count, MAX_PROPOSALS_PER_VOTER);
}

#[test]
fn sinks_hear_accepted_writes_and_nothing_else() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let mut engine = VotingEngine::new(admin()).with_sink(Box::new(RecordingSink {
        seen: Arc::clone(&seen),
    }));
    let alice = Address::new("0xalice");

    engine.add_voter(&admin(), alice.clone()).unwrap();
    engine.start_proposals_registering(&admin()).unwrap();
    engine.add_proposal(&alice, "bike racks").unwrap();

    // Rejected calls forward nothing to observers.
    engine
        .add_voter(&admin(), Address::new("0xlate"))
        .unwrap_err();
    engine.set_vote(&alice, 1).unwrap_err();

    let forwarded = seen.lock().unwrap();
    assert_eq!(forwarded.len(), 4);
    assert_eq!(forwarded.as_slice(), engine.events().records());
    assert_eq!(
        forwarded[0].event,
        VotingEvent::VoterRegistered { voter: alice }
    );
    assert_eq!(
        forwarded[1].event,
        VotingEvent::ProposalRegistered { proposal_id: 0 }
    );
    assert_eq!(forwarded[3].seq, 3);
}
