//! scanfix array utilities
//!
//! Pure, deterministic transformations over sequences:
//! - [`chunk`]: fixed-size partitioning that preserves order
//! - [`uniq`]: first-occurrence deduplication
//! - [`Statistics`]: min / max / average over numeric slices
//!
//! Every function comes in a typed flavour (slices) and, where the input
//! may not be a sequence at all, a dynamic flavour over [`serde_json::Value`].
//!
//! # Example
//!
//! ```rust
//! use scanfix_array::{chunk, uniq};
//!
//! let groups = chunk(&[1, 2, 3, 4, 5, 6, 7, 8], 3).unwrap();
//! assert_eq!(groups, vec![vec![1, 2, 3], vec![4, 5, 6], vec![7, 8]]);
//!
//! assert_eq!(uniq(&[1, 2, 2, 3, 4, 4, 4, 5]), vec![1, 2, 3, 4, 5]);
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod chunk;
mod error;
mod stats;
mod uniq;

pub use chunk::{chunk, chunk_value};
pub use error::ArrayError;
pub use stats::{average, doubled, Statistics};
pub use uniq::{uniq, uniq_value};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
