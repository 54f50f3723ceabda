//! Internal prelude for no_std compatibility.
//!
//! Re-exports the owned string and vector types from either `std` or `alloc`
//! depending on feature flags.

#[cfg(feature = "std")]
#[allow(unused_imports)]
pub use std::{
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};

#[cfg(all(feature = "alloc", not(feature = "std")))]
#[allow(unused_imports)]
pub use alloc::{
    format,
    string::{String, ToString},
    vec,
    vec::Vec,
};
