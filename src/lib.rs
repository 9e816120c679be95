#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

/// A key-value map built on the chaining [`HashTable`].
///
/// This module provides a `HashMap` that wraps the `HashTable` and provides
/// a standard key-value map interface with configurable hashers. Unlike the
/// set adapter, inserting an existing key overwrites the stored value.
pub mod hash_map;

pub mod hash_table;

/// A set built on the chaining [`HashTable`].
///
/// This module provides a `HashSet` whose mutating operations report
/// duplicate insertions and absent removals as [`Error`] statuses.
pub mod hash_set;

pub use hash_map::Entry;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::Error;
pub use hash_table::HashTable;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The default hasher builder used by [`HashSet`] and [`HashMap`].
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The default hasher builder used by [`HashSet`] and [`HashMap`].
        pub type DefaultHashBuilder = std::collections::hash_map::RandomState;
    } else {
        /// Placeholder default hasher builder.
        ///
        /// Without the `foldhash` or `std` features there is no default
        /// hasher; this type is uninhabited and a hasher builder must be
        /// supplied explicitly via `with_hasher`.
        #[derive(Clone, Copy, Debug)]
        pub enum DefaultHashBuilder {}
    }
}
