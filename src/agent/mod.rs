//! Session event loop
//!
//! `BattleSession` owns all turn-taking state and runs on a single task;
//! `SessionHandle` is how HTTP handlers and NATS subscribers reach it.

mod handle;
mod session;

pub use handle::{SessionEvent, SessionHandle, SessionSnapshot};
pub use session::BattleSession;
