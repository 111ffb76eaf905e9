#![no_std]

//! Rules engine for a single-player mines wager.
//!
//! A round debits the bet, then every safe reveal grows the payout
//! multiplier until the player cashes out, clears the board, or declares a
//! mine and loses the stake. Storage and sound are collaborators passed into
//! [`GameEngine`]; the engine itself performs no I/O.

extern crate alloc;

pub use engine::*;
pub use error::*;
pub use history::*;
pub use notify::*;
pub use persist::*;
pub use session::*;
pub use types::*;
pub use view::*;

pub mod multiplier;

mod engine;
mod error;
mod history;
mod notify;
mod persist;
mod session;
mod types;
mod view;
