//! Command implementations for the familyhub CLI

pub mod completions;
pub mod context;
pub mod helpers;
pub mod info;
pub mod routes;
pub mod status;
pub mod sync;
pub mod unsync;
pub mod version;
