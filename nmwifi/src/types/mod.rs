//! Constant values shared across the crate.

pub(crate) mod constants;
