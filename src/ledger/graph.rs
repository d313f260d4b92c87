use std::collections::{HashMap, HashSet};

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Bet, User};

#[derive(Debug, Clone, Serialize)]
pub struct GraphNode {
    pub id: i64,
    pub name: String,
}

/// One edge per bet, resolved or not.
#[derive(Debug, Clone, Serialize)]
pub struct GraphEdge {
    #[serde(rename = "from")]
    pub bettor_id: i64,
    #[serde(rename = "to")]
    pub bettee_id: i64,
    #[serde(rename = "value")]
    pub shots: i32,
    #[serde(rename = "reason")]
    pub description: String,
    pub outcome: Option<String>,
    #[serde(rename = "dateCreated")]
    pub date_created: DateTime<Utc>,
    pub id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub id: i64,
    pub name: String,
    #[serde(rename = "totalShotsOwed")]
    pub total_shots_owed: i64,
    #[serde(rename = "totalShotsOwedTo")]
    pub total_shots_owed_to: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShotGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Build the who-owes-whom graph plus the leaderboard ranking.
///
/// Nodes are emitted in first-seen order across the bet set. The leaderboard
/// running sums count unresolved bets only; any non-empty outcome takes the
/// bet out of both figures. Errors if a bet references a user id missing from
/// `users`.
pub fn build_graph(bets: &[Bet], users: &[User]) -> Result<ShotGraph> {
    let names: HashMap<i64, &str> = users.iter().map(|u| (u.id, u.name.as_str())).collect();

    let mut nodes: Vec<GraphNode> = Vec::new();
    let mut seen: HashSet<i64> = HashSet::new();
    let mut edges: Vec<GraphEdge> = Vec::with_capacity(bets.len());
    let mut shots_owed: HashMap<i64, i64> = HashMap::new();
    let mut shots_owed_to: HashMap<i64, i64> = HashMap::new();

    for bet in bets {
        for party in [bet.bettor_id, bet.bettee_id] {
            if seen.insert(party) {
                let Some(name) = names.get(&party) else {
                    bail!("bet {} references unknown user {}", bet.id, party);
                };
                nodes.push(GraphNode {
                    id: party,
                    name: (*name).to_string(),
                });
            }
        }

        edges.push(GraphEdge {
            bettor_id: bet.bettor_id,
            bettee_id: bet.bettee_id,
            shots: bet.shots,
            description: bet.description.clone(),
            outcome: bet.outcome.clone(),
            date_created: bet.date_created,
            id: bet.id,
        });

        // Resolved bets no longer count toward the running totals.
        if bet.outcome_state().is_resolved() {
            continue;
        }
        *shots_owed.entry(bet.bettor_id).or_insert(0) += i64::from(bet.shots);
        *shots_owed_to.entry(bet.bettee_id).or_insert(0) += i64::from(bet.shots);
    }

    let mut leaderboard: Vec<LeaderboardEntry> = nodes
        .iter()
        .map(|node| LeaderboardEntry {
            id: node.id,
            name: node.name.clone(),
            total_shots_owed: shots_owed.get(&node.id).copied().unwrap_or(0),
            total_shots_owed_to: shots_owed_to.get(&node.id).copied().unwrap_or(0),
        })
        .collect();

    // Stable sort: ties keep first-seen node order.
    leaderboard.sort_by(|a, b| b.total_shots_owed_to.cmp(&a.total_shots_owed_to));

    Ok(ShotGraph {
        nodes,
        edges,
        leaderboard,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
