//! Tap generation for root raised cosine pulse shaping filters.
//!
//! # Example
//!
//! ```
//! use rrcos_rs::prelude::*;
//!
//! // 32 symbols long, roll-off 0.05, 1 MHz symbol rate sampled at 16 MHz.
//! let response = generate(32, 0.05, 1e6, 16e6).unwrap();
//! assert_eq!(response.len(), 32 * 16);
//!
//! for (t, tap) in response.iter().take(4) {
//!     assert!(t < 0.0 && tap.is_finite());
//! }
//! ```

pub mod prelude;
pub mod pulse;
pub mod util;
