//! Command-line interface: argument parsing and command dispatch.

pub mod dispatcher;
pub mod main_types;
