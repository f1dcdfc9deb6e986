//! Async rendering of outcomes.
//!
//! Handlers that produce an [`Outcome`](crate::Outcome) asynchronously can
//! render the eventual outcome without awaiting it first: the futures in this
//! module resolve to the rendered [`ProfileResponse`](crate::profile::ProfileResponse).
//!
//! # Feature Flag
//!
//! Requires the `async` feature to be enabled:
//!
//! ```toml
//! [dependencies]
//! problem-rail = { version = "0.1", features = ["async"] }
//! ```
//!
//! # Examples
//!
//! ```ignore
//! use problem_rail::async_ext::OutcomeValueFutureExt;
//!
//! async fn get_user(id: u64) -> RailResult<ProfileResponse> {
//!     load_user(id).into_value_response().await
//! }
//! ```

mod future_ext;
mod render_future;

pub use future_ext::{OutcomeFutureExt, OutcomeValueFutureExt};
pub use render_future::{RenderFuture, RenderValueFuture};
