//! HTTP request handlers.

pub(crate) mod index;
pub(crate) mod package;
