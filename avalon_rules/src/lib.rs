//! # Avalon Rules
//!
//! The rules crate - roles, role catalogs, seats and their knowledge, proposals,
//! votes, missions and the game state value. This crate is the single source of
//! truth for what is legal in a game and does not contain any decision-agent logic.

pub mod assignment;
pub mod catalog;
pub mod entities;
pub mod error;
pub mod knowledge;
pub mod mission;
pub mod record;
pub mod state;

pub use assignment::*;
pub use catalog::*;
pub use entities::*;
pub use error::*;
pub use knowledge::*;
pub use mission::*;
pub use record::*;
pub use state::*;
