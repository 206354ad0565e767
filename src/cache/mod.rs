//! Versioned response cache
//!
//! Responses live in named stores ("generations"). The agent writes only
//! to the store named by its version tag and garbage-collects every other
//! store on activation.
//!
//! # Matching
//!
//! | Request | Behavior |
//! |---------|----------|
//! | GET | keyed by URL without fragment; query is significant |
//! | other methods | never match, `put` is rejected |

pub mod disk;
pub mod memory;
pub mod storage;

pub use disk::DiskCacheStorage;
pub use memory::MemoryCacheStorage;
pub use storage::{CacheStorage, RequestKey};
