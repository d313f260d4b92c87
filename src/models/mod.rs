pub mod bet;
pub mod user;

pub use bet::{Bet, BetWithNames, Outcome, VoidReason};
pub use user::User;
