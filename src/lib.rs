//! quoteflow
//!
//! A quote notebook with remote synchronization: an in-memory quote
//! collection mirrored to durable key-value storage, plus a sync agent that
//! periodically reconciles it with a remote endpoint and merges differences
//! with remote precedence.

pub mod storage;
pub mod store;
pub mod sync;
pub mod types;
