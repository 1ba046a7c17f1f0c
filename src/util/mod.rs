//! Shared utilities.

pub(crate) mod lock;
