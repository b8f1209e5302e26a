//! `todoterm` server library.
//!
//! Exposes the todo collection API for use in tests and embedding.
//! The server keeps every task in memory and serves the four
//! `/todos` routes the client's HTTP gateway talks to.

pub mod api;
pub mod collection;
pub mod config;
