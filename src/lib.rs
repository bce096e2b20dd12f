#![doc = include_str!("../README.md")]
//! ## Feature flags
#![doc = document_features::document_features!()]
//!

// Public modules
mod common;
mod error;

#[cfg(feature = "async")]
pub mod async_ring;
mod handle;
pub mod ring;

pub use crate::common::{hash_to_slot, StorageNode};
pub use error::{ConfigError, Error, HandleError, Result, RingError};
pub use handle::RingHandle;
pub use ring::{
    Config, KeyMove, Migration, Ring, RingBuilder, RingEntry, SlotArc, DEFAULT_TOTAL_SLOTS,
};
