//! UPI-style payment-handle directory
//!
//! Maps human-readable handles (`name@provider`) to account addresses in a
//! single versioned JSON document, with a one-time migration from the legacy
//! bare-array format.

mod directory;

pub use directory::{
    list, lookup_by_address, normalize_upi_id, register, remove, resolve, search,
};
