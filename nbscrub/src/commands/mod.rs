//! Command implementations for the nbscrub CLI.

pub mod scrub;
