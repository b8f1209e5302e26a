//! `todoterm`: terminal task list backed by a remote todo collection.

pub mod app;
pub mod config;
pub mod editor;
pub mod filter;
pub mod gateway;
pub mod store;
pub mod sync;
pub mod ui;
