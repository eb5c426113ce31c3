//! Cross-crate scenario and property tests for ndau.
//!
//! The scenarios drive the EAI engine the way the ledger does: default
//! tables, a fixed block time, and locks in each of their states. Shared
//! fixtures live in [`helpers`].

pub mod helpers;
