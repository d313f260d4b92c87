use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bet {
    pub id: i64,
    pub date_created: DateTime<Utc>,
    pub bettor_id: i64,
    pub bettee_id: i64,
    pub shots: i32,
    pub description: String,
    pub outcome: Option<String>,
}

impl Bet {
    /// Tri-state view of the raw outcome column.
    pub fn outcome_state(&self) -> Outcome {
        Outcome::from_raw(self.outcome.as_deref())
    }
}

/// A bet row with both party names joined in, for the per-user summary view.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BetWithNames {
    pub id: i64,
    pub date_created: DateTime<Utc>,
    pub bettor_id: i64,
    pub bettee_id: i64,
    pub shots: i32,
    pub description: String,
    pub outcome: Option<String>,
    pub bettor_name: String,
    pub bettee_name: String,
}

// ---------------------------------------------------------------------------
// Outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoidReason {
    Incomplete,
    Expired,
}

/// Resolution state of a bet, derived by inspecting the stored outcome string.
///
/// The column holds one of three shapes: NULL/empty (unresolved), the literal
/// `incomplete` / `expired` (voided, no payout), or a timestamp string marking
/// when the bet was called. `Settled(None)` means the string was neither empty
/// nor a void literal but its timestamp did not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unresolved,
    Void(VoidReason),
    Settled(Option<NaiveDateTime>),
}

impl Outcome {
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => Outcome::Unresolved,
            Some("incomplete") => Outcome::Void(VoidReason::Incomplete),
            Some("expired") => Outcome::Void(VoidReason::Expired),
            Some(other) => Outcome::Settled(parse_settled_at(other)),
        }
    }

    /// True for any non-empty outcome, parseable or not. The leaderboard's
    /// running sums count only bets where this is false.
    pub fn is_resolved(&self) -> bool {
        !matches!(self, Outcome::Unresolved)
    }
}

/// Settled outcomes carry trailing characters (seconds, offset) beyond minute
/// precision. They are dropped, not parsed: cut the last 4 bytes and match the
/// remainder against `YYYY-MM-DDTHH:MM` exactly.
fn parse_settled_at(raw: &str) -> Option<NaiveDateTime> {
    let cut = raw.len().checked_sub(4)?;
    let head = raw.get(..cut)?;
    NaiveDateTime::parse_from_str(head, "%Y-%m-%dT%H:%M").ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_unresolved_on_missing_or_empty() {
        assert_eq!(Outcome::from_raw(None), Outcome::Unresolved);
        assert_eq!(Outcome::from_raw(Some("")), Outcome::Unresolved);
        assert!(!Outcome::from_raw(None).is_resolved());
    }

    #[test]
    fn test_void_literals() {
        assert_eq!(
            Outcome::from_raw(Some("incomplete")),
            Outcome::Void(VoidReason::Incomplete)
        );
        assert_eq!(
            Outcome::from_raw(Some("expired")),
            Outcome::Void(VoidReason::Expired)
        );
        assert!(Outcome::from_raw(Some("expired")).is_resolved());
    }

    #[test]
    fn test_settled_with_trailing_seconds_and_zone() {
        // ":00Z" is cut, leaving "2024-01-01T10:00"
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(
            Outcome::from_raw(Some("2024-01-01T10:00:00Z")),
            Outcome::Settled(Some(expected))
        );
    }

    #[test]
    fn test_settled_malformed_timestamp() {
        assert_eq!(Outcome::from_raw(Some("bogus")), Outcome::Settled(None));
        // After the cut nothing date-like remains
        assert_eq!(Outcome::from_raw(Some("10:00:00Z")), Outcome::Settled(None));
        // Shorter than the cut itself
        assert_eq!(Outcome::from_raw(Some("abc")), Outcome::Settled(None));
        // Trailing garbage beyond the minute field is rejected, not ignored
        assert_eq!(
            Outcome::from_raw(Some("2024-01-01T10:00xyz0000")),
            Outcome::Settled(None)
        );
    }

    #[test]
    fn test_settled_cut_off_char_boundary() {
        // Multibyte tail the 4-byte cut splits mid-char; must not panic
        assert_eq!(
            Outcome::from_raw(Some("2024-01-01T10:00€€")),
            Outcome::Settled(None)
        );
    }
}
