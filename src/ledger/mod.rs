//! Pure derivations over an in-memory snapshot of the bet ledger.
//!
//! Each function is a stateless transformation: the caller fetches the
//! relevant rows and gets back a plain data structure ready for
//! serialization. Nothing here touches the database.

pub mod balances;
pub mod events;
pub mod graph;

pub use balances::{compute_shot_balances, ShotBalances};
pub use events::{build_event_log, EventKind, LedgerEvent};
pub use graph::{build_graph, GraphEdge, GraphNode, LeaderboardEntry, ShotGraph};
