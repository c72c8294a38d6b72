//! Core splitting services, leaf to root
//!
//! - [`record_parser`] - raw lines to a header and detail records
//! - [`grouping`] - detail records grouped by key in first-seen order
//! - [`partitioning`] - whole groups assigned to output files
//! - [`header_rebuilder`] - per-output record count and control sum
//! - [`output_assembler`] - serialized, deterministically named outputs
//! - [`pipeline`] - all of the above for one in-memory extract

pub mod grouping;
pub mod header_rebuilder;
pub mod output_assembler;
pub mod partitioning;
pub mod pipeline;
pub mod record_parser;
