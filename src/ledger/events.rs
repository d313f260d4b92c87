use std::collections::HashMap;

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use metrics::counter;
use serde::Serialize;

use crate::models::{Bet, Outcome, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    BetCreation,
    BetResolution,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerEvent {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub event_date: DateTime<Utc>,
    pub description: String,
}

/// Translate the bet set into a timeline of discrete events, most recent
/// first.
///
/// Every bet yields one creation event. A settled bet additionally yields a
/// resolution event dated at its parsed outcome timestamp; when that
/// timestamp is unparseable the resolution event is dropped for that bet
/// only and the anomaly is logged. Errors if a bet references a user id
/// missing from `users`.
pub fn build_event_log(bets: &[Bet], users: &[User]) -> Result<Vec<LedgerEvent>> {
    let names: HashMap<i64, &str> = users.iter().map(|u| (u.id, u.name.as_str())).collect();

    let mut events: Vec<LedgerEvent> = Vec::with_capacity(bets.len());

    for bet in bets {
        let (Some(bettor), Some(bettee)) = (names.get(&bet.bettor_id), names.get(&bet.bettee_id))
        else {
            bail!("bet {} references an unknown user", bet.id);
        };

        events.push(LedgerEvent {
            id: bet.id,
            kind: EventKind::BetCreation,
            event_date: bet.date_created,
            description: format!(
                "{bettor} bet {bettee} {} shot(s): {}",
                bet.shots, bet.description
            ),
        });

        match bet.outcome_state() {
            Outcome::Settled(Some(at)) => {
                events.push(LedgerEvent {
                    id: bet.id,
                    kind: EventKind::BetResolution,
                    event_date: at.and_utc(),
                    description: format!("{bettor} called {} shot(s) on {bettee}", bet.shots),
                });
            }
            Outcome::Settled(None) => {
                tracing::warn!(
                    bet_id = bet.id,
                    outcome = ?bet.outcome,
                    "unparseable outcome timestamp, dropping resolution event"
                );
                counter!("outcome_parse_failures_total").increment(1);
            }
            Outcome::Unresolved | Outcome::Void(_) => {}
        }
    }

    events.sort_by(|a, b| b.event_date.cmp(&a.event_date));

    Ok(events)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn make_user(id: i64, name: &str) -> User {
        User {
            id,
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
        }
    }

    fn make_bet(
        id: i64,
        bettor_id: i64,
        bettee_id: i64,
        shots: i32,
        created: DateTime<Utc>,
        outcome: Option<&str>,
    ) -> Bet {
        Bet {
            id,
            date_created: created,
            bettor_id,
            bettee_id,
            shots,
            description: format!("bet {id}"),
            outcome: outcome.map(String::from),
        }
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_creation_event_per_bet() {
        let users = vec![make_user(1, "Alice"), make_user(2, "Bob")];
        let bets = vec![make_bet(1, 1, 2, 3, at(2024, 3, 1, 12, 0), None)];

        let events = build_event_log(&bets, &users).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, EventKind::BetCreation);
        assert_eq!(events[0].description, "Alice bet Bob 3 shot(s): bet 1");
        assert_eq!(events[0].event_date, at(2024, 3, 1, 12, 0));
    }

    #[test]
    fn test_settled_bet_adds_resolution_event() {
        let users = vec![make_user(1, "Alice"), make_user(2, "Bob")];
        let bets = vec![make_bet(
            1,
            1,
            2,
            3,
            at(2023, 12, 25, 9, 30),
            Some("2024-01-01T10:00:00Z"),
        )];

        let events = build_event_log(&bets, &users).unwrap();

        assert_eq!(events.len(), 2);
        // Resolution is newer, so it sorts first
        assert_eq!(events[0].kind, EventKind::BetResolution);
        assert_eq!(events[0].description, "Alice called 3 shot(s) on Bob");
        assert_eq!(events[0].event_date, at(2024, 1, 1, 10, 0));
        assert_eq!(events[1].kind, EventKind::BetCreation);
    }

    #[test]
    fn test_void_outcomes_emit_no_resolution() {
        let users = vec![make_user(1, "Alice"), make_user(2, "Bob")];
        let bets = vec![
            make_bet(1, 1, 2, 3, at(2024, 3, 1, 12, 0), Some("incomplete")),
            make_bet(2, 2, 1, 1, at(2024, 3, 2, 12, 0), Some("expired")),
        ];

        let events = build_event_log(&bets, &users).unwrap();

        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.kind == EventKind::BetCreation));
    }

    #[test]
    fn test_malformed_outcome_drops_resolution_only() {
        let users = vec![make_user(1, "Alice"), make_user(2, "Bob")];
        let bets = vec![
            make_bet(1, 1, 2, 3, at(2024, 3, 1, 12, 0), Some("not a date")),
            make_bet(2, 2, 1, 1, at(2024, 3, 2, 12, 0), Some("2024-03-05T08:00:00Z")),
        ];

        let events = build_event_log(&bets, &users).unwrap();

        // Two creations plus one resolution; the malformed bet degrades quietly
        assert_eq!(events.len(), 3);
        assert_eq!(
            events.iter().filter(|e| e.kind == EventKind::BetResolution).count(),
            1
        );
        assert_eq!(
            events
                .iter()
                .find(|e| e.kind == EventKind::BetResolution)
                .unwrap()
                .id,
            2
        );
    }

    #[test]
    fn test_events_sorted_most_recent_first() {
        let users = vec![make_user(1, "Alice"), make_user(2, "Bob")];
        let bets = vec![
            make_bet(1, 1, 2, 3, at(2024, 1, 1, 0, 0), Some("2024-06-01T10:00:00Z")),
            make_bet(2, 2, 1, 1, at(2024, 3, 1, 0, 0), None),
            make_bet(3, 1, 2, 2, at(2024, 5, 1, 0, 0), None),
        ];

        let events = build_event_log(&bets, &users).unwrap();

        assert_eq!(events.len(), 4);
        for pair in events.windows(2) {
            assert!(pair[0].event_date >= pair[1].event_date);
        }
        assert_eq!(events[0].kind, EventKind::BetResolution);
    }

    #[test]
    fn test_unknown_user_reference_fails() {
        let users = vec![make_user(1, "Alice")];
        let bets = vec![make_bet(1, 1, 99, 3, at(2024, 1, 1, 0, 0), None)];

        assert!(build_event_log(&bets, &users).is_err());
    }

    #[test]
    fn test_empty_input() {
        let events = build_event_log(&[], &[]).unwrap();
        assert!(events.is_empty());
    }

    #[test]
    fn test_wire_shape() {
        let users = vec![make_user(1, "Alice"), make_user(2, "Bob")];
        let bets = vec![make_bet(1, 1, 2, 3, at(2024, 3, 1, 12, 0), None)];

        let events = build_event_log(&bets, &users).unwrap();
        let json = serde_json::to_value(&events).unwrap();

        assert_eq!(json[0]["type"], "bet_creation");
        assert_eq!(json[0]["id"], 1);
        assert!(json[0]["event_date"].is_string());
        assert!(json[0]["description"].is_string());
    }
}
