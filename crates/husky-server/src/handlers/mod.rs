//! HTTP request handlers.

pub(crate) mod dispatch;
