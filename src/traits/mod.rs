//! Extension traits connecting outcomes and plain results to the rendering
//! pipeline.
//!
//! - [`OutcomeExt`]: renders a value-less [`Outcome`](crate::Outcome) with a profile
//! - [`OutcomeValueExt`]: renders an [`Outcome<T>`](crate::Outcome) carrying a value
//! - [`ResultOutcomeExt`]: classifies the error of a `Result` into an outcome
//!
//! # Examples
//!
//! ```
//! use problem_rail::traits::{OutcomeValueExt, ResultOutcomeExt};
//! use problem_rail::profile::DefaultResponseProfile;
//! use problem_rail::Fault;
//!
//! let found: Result<u32, Fault> = Ok(7);
//! let response = found.into_outcome().into_value_response_with(&DefaultResponseProfile::new())?;
//! assert_eq!(response.status().as_u16(), 200);
//!
//! let missing: Result<u32, Fault> = Err(Fault::not_found("no record with id 0")?);
//! let missing = missing.into_outcome();
//! assert_eq!(missing.error().status(), 404);
//! # Ok::<(), problem_rail::RailError>(())
//! ```

pub mod outcome_ext;

pub use outcome_ext::{OutcomeExt, OutcomeValueExt, ResultOutcomeExt};
