//! Convenience re-exports for common usage patterns.
//!
//! ```
//! use problem_rail::prelude::*;
//! ```
//!
//! # What's Included
//!
//! - **Types**: [`Error`], [`Outcome`], [`Fault`], [`ProblemDocument`]
//! - **Rendering**: [`ResponseProfile`], [`DefaultResponseProfile`], [`ResponseTransformer`]
//! - **Traits**: [`OutcomeExt`], [`OutcomeValueExt`], [`ResultOutcomeExt`]
//!
//! # Examples
//!
//! ```
//! use problem_rail::prelude::*;
//!
//! fn delete_account(id: u64) -> RailResult<Outcome> {
//!     if id == 0 {
//!         return Ok(Outcome::failure(Error::new("account 0 is reserved")?.as_forbidden()));
//!     }
//!     Ok(Outcome::success())
//! }
//!
//! let outcome = delete_account(0)?;
//! assert_eq!(outcome.error().status(), 403);
//! # Ok::<(), RailError>(())
//! ```

pub use crate::boundary::ExceptionBoundary;
pub use crate::error::{RailError, RailResult};
pub use crate::fault::{Fault, FaultKind};
pub use crate::mapping::{CurrentRequest, ProblemDocument, RequestInfo};
pub use crate::profile::{DefaultResponseProfile, ResponseProfile, ResponseTransformer};
pub use crate::traits::{OutcomeExt, OutcomeValueExt, ResultOutcomeExt};
pub use crate::types::{Error, Outcome};
