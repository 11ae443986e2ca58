//! Editor state and the single authority that mutates it.
//!
//! [`state`] holds the immutable snapshot and its transitions; [`authority`] owns the snapshot
//! together with every resource whose lifetime follows it.

pub mod authority;
pub mod state;
