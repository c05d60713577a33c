use super::types::{Proposal, ProposalId};

/// Index of the winning proposal under plurality rules. The ballot is
/// scanned in index order and the running best is replaced only on a
/// strictly greater count, so ties keep the earliest index and an untouched
/// ballot elects the GENESIS sentinel at 0.
pub fn winning_proposal(proposals: &[Proposal]) -> ProposalId {
    let mut winner: ProposalId = 0;
    let mut best_count: u32 = 0;
    for (proposal_id, proposal) in proposals.iter().enumerate() {
        if proposal.vote_count > best_count {
            best_count = proposal.vote_count;
            winner = proposal_id;
        }
    }
    winner
}
