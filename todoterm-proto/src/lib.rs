//! Shared wire definitions for the todo collection endpoint.

pub mod task;
