//! Output assembly: serialization and deterministic naming of partitions
//!
//! - [`assembler`] - totals, rebuilt header and text for each partition
//! - [`naming`] - `{stem}_{suffix}.{ext}` names and the archive name

pub mod assembler;
pub mod naming;

pub use assembler::OutputAssembler;
pub use naming::{OutputNaming, partition_suffix};
