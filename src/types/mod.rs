//! Domain types: the [`Error`] value and the [`Outcome`] wrapper.
//!
//! # Examples
//!
//! ```
//! use problem_rail::{Error, Outcome, RailError};
//!
//! fn find_user(id: u64) -> Result<Outcome<String>, RailError> {
//!     if id == 0 {
//!         let err = Error::new("user 0 does not exist")?.as_not_found();
//!         return Ok(Outcome::failure(err));
//!     }
//!     Ok(Outcome::success_with(format!("user-{id}")))
//! }
//!
//! assert!(find_user(0)?.is_failure());
//! assert_eq!(find_user(7)?.value()?, "user-7");
//! # Ok::<(), RailError>(())
//! ```
use smallvec::SmallVec;

pub mod error;
pub mod outcome;

pub use error::Error;
pub use outcome::Outcome;

/// SmallVec-backed collection used for details and traces.
///
/// Uses inline storage for one element; most errors carry at most a single
/// contributing detail.
pub type ErrorVec<E> = SmallVec<[E; 1]>;
