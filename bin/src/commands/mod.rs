//! CLI command implementations.

pub(crate) mod bars;
pub(crate) mod gaps;
pub(crate) mod import;
pub(crate) mod timeframes;
