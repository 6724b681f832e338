//! Bounded most-recently-used store of previously chosen locations.

mod store;

pub use store::{RecentEntry, RecentLocationStore, RecentStoreConfig};
