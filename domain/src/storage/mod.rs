//! Naming for the per-origin key-value store that owns the log buffer.

mod origin;
mod storage_key;

pub use origin::Origin;
pub use storage_key::StorageKey;
