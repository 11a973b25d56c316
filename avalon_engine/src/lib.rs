//! # Avalon Engine
//!
//! Drives a game of Avalon on top of `avalon_rules`. Every decision a seat makes
//! comes from an external decision agent; the engine owns the procedure, repairs
//! or replaces bad decisions, and records what happened.
//!
//! ## Core Components
//!
//! - **agent**: The decision-agent contract, reply parsing and bundled agents
//! - **context_assembler**: Builds the per-seat context each decision is made from
//! - **controller**: Discussion, the proposal/voting loop, missions and the assassin phase
//! - **memory**: Cross-game reflections injected as advisory context
//! - **tournament**: Plays a series of games with shared memory

pub mod agent;
pub mod config;
pub mod context_assembler;
pub mod controller;
pub mod error;
pub mod memory;
pub mod tournament;

pub use agent::*;
pub use config::*;
pub use context_assembler::*;
pub use controller::*;
pub use error::*;
pub use memory::*;
pub use tournament::*;
