//! Scripted elections
//!
//! A scenario file describes a complete election in TOML: who administers
//! it, who votes, what gets proposed, who votes for what. The runner plays
//! the script against a fresh engine in workflow order and reports the
//! outcome. Any rule the engine enforces fails the run with the offending
//! step named in the error chain.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

use crate::voting::{Address, EventRecord, ProposalId, VotingEngine, WorkflowStatus};

/// A complete scripted election.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioFile {
    /// Display name for logs and reports
    pub name: Option<String>,
    /// The owner address driving every transition
    pub admin: String,
    /// Addresses to register, in order
    #[serde(default)]
    pub voters: Vec<String>,
    /// Proposals to submit, in order
    #[serde(default)]
    pub proposals: Vec<ProposalEntry>,
    /// Votes to cast, in order
    #[serde(default)]
    pub votes: Vec<VoteEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalEntry {
    /// Submitting voter
    pub by: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteEntry {
    pub by: String,
    /// Ballot index, with GENESIS holding index 0
    pub proposal_id: ProposalId,
}

impl ScenarioFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: ScenarioFile = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse scenario file {}", path.display()))?;
        scenario.validate()?;
        Ok(scenario)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let toml_content = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.admin.is_empty() {
            bail!("scenario needs a non-empty admin address");
        }
        Ok(())
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("unnamed")
    }
}

/// Outcome of one scripted election.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub name: String,
    pub admin: String,
    pub final_status: WorkflowStatus,
    pub registered_voters: usize,
    pub proposals: Vec<ProposalOutcome>,
    pub winning_proposal_id: ProposalId,
    pub winning_description: String,
    pub events: Vec<EventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProposalOutcome {
    pub proposal_id: ProposalId,
    pub description: String,
    pub vote_count: u32,
}

/// Play a scripted election end to end: register, propose, vote, tally.
/// Returns the report; the engine it ran on is handed back alongside so
/// callers can snapshot it.
pub fn run_scenario(scenario: &ScenarioFile) -> Result<(ScenarioReport, VotingEngine)> {
    scenario.validate()?;

    let admin = Address::new(scenario.admin.clone());
    let mut engine = VotingEngine::new(admin.clone());

    info!(
        scenario = scenario.display_name(),
        voters = scenario.voters.len(),
        proposals = scenario.proposals.len(),
        votes = scenario.votes.len(),
        "running scripted election"
    );

    for voter in &scenario.voters {
        engine
            .add_voter(&admin, Address::new(voter.clone()))
            .with_context(|| format!("registering voter {voter}"))?;
    }
    engine
        .start_proposals_registering(&admin)
        .context("opening proposal registration")?;
    for entry in &scenario.proposals {
        engine
            .add_proposal(&Address::new(entry.by.clone()), entry.description.clone())
            .with_context(|| format!("submitting proposal from {}", entry.by))?;
    }
    engine
        .end_proposals_registering(&admin)
        .context("closing proposal registration")?;
    engine
        .start_voting_session(&admin)
        .context("opening the voting session")?;
    for entry in &scenario.votes {
        engine
            .set_vote(&Address::new(entry.by.clone()), entry.proposal_id)
            .with_context(|| {
                format!(
                    "casting vote from {} for proposal {}",
                    entry.by, entry.proposal_id
                )
            })?;
    }
    engine
        .end_voting_session(&admin)
        .context("closing the voting session")?;
    let winner = engine.tally_votes(&admin).context("tallying votes")?;

    let report = build_report(scenario, &engine, winner);
    info!(
        scenario = scenario.display_name(),
        winning_proposal_id = %winner,
        winning_description = %report.winning_description,
        "scripted election finished"
    );
    Ok((report, engine))
}

fn build_report(
    scenario: &ScenarioFile,
    engine: &VotingEngine,
    winner: ProposalId,
) -> ScenarioReport {
    let proposals = engine
        .proposals()
        .iter()
        .enumerate()
        .map(|(proposal_id, proposal)| ProposalOutcome {
            proposal_id,
            description: proposal.description.clone(),
            vote_count: proposal.vote_count,
        })
        .collect();

    let winning_description = engine
        .proposals()
        .get(winner)
        .map(|proposal| proposal.description.clone())
        .unwrap_or_default();

    ScenarioReport {
        name: scenario.display_name().to_string(),
        admin: engine.owner().as_str().to_string(),
        final_status: engine.workflow_status(),
        registered_voters: engine.registered_voter_count(),
        proposals,
        winning_proposal_id: winner,
        winning_description,
        events: engine.events().records().to_vec(),
    }
}

/// The canonical three-voter walkthrough. Two proposals land at ballot
/// indexes 1 and 2, the votes split 2/1 in favor of index 2.
pub fn demo_scenario() -> ScenarioFile {
    ScenarioFile {
        name: Some("demo".to_string()),
        admin: "admin".to_string(),
        voters: vec![
            "alice".to_string(),
            "bob".to_string(),
            "carol".to_string(),
        ],
        proposals: vec![
            ProposalEntry {
                by: "alice".to_string(),
                description: "Extend the library opening hours".to_string(),
            },
            ProposalEntry {
                by: "bob".to_string(),
                description: "Install solar panels on the gym".to_string(),
            },
        ],
        votes: vec![
            VoteEntry {
                by: "alice".to_string(),
                proposal_id: 2,
            },
            VoteEntry {
                by: "bob".to_string(),
                proposal_id: 2,
            },
            VoteEntry {
                by: "carol".to_string(),
                proposal_id: 1,
            },
        ],
    }
}
