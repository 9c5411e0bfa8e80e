//! Inbound adapters that translate external requests into domain service
//! calls while keeping argument parsing and output formatting at the edge.
//!
//! The command line lives under [`cli`].

pub mod cli;
