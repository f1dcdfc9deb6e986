//! Extension traits for `Future<Output = Outcome<T>>`.
//!
//! Mirror the sync [`OutcomeExt`](crate::traits::OutcomeExt) and
//! [`OutcomeValueExt`](crate::traits::OutcomeValueExt) traits.

use core::future::Future;

use serde::Serialize;

use super::render_future::{ProfileSource, RenderFuture, RenderValueFuture};
use crate::profile::ResponseProfile;
use crate::types::Outcome;

/// Renders the value-less outcome of a future once it resolves.
///
/// # Examples
///
/// ```rust
/// use problem_rail::async_ext::OutcomeFutureExt;
/// use problem_rail::profile::{DefaultResponseProfile, ResponseKind};
/// use problem_rail::{Outcome, RailResult};
///
/// async fn ping() -> Outcome {
///     Outcome::success()
/// }
///
/// async fn handler() -> RailResult<ResponseKind> {
///     let response = ping().into_response_with(&DefaultResponseProfile::new()).await?;
///     Ok(response.kind())
/// }
/// ```
pub trait OutcomeFutureExt: Future<Output = Outcome> + Sized {
    /// Renders with the process-wide profile from [`crate::config`].
    fn into_response(self) -> RenderFuture<'static, Self> {
        RenderFuture::new(self, ProfileSource::Current)
    }

    /// Renders with `profile`.
    fn into_response_with(self, profile: &dyn ResponseProfile) -> RenderFuture<'_, Self> {
        RenderFuture::new(self, ProfileSource::Explicit(profile))
    }
}

impl<F> OutcomeFutureExt for F where F: Future<Output = Outcome> {}

/// Renders the outcome of a future once it resolves, encoding its value as
/// the JSON body.
///
/// # Examples
///
/// ```rust
/// use problem_rail::async_ext::OutcomeValueFutureExt;
/// use problem_rail::profile::DefaultResponseProfile;
/// use problem_rail::{Outcome, RailResult};
///
/// async fn list_ids() -> Outcome<Vec<u32>> {
///     Outcome::success_with(vec![1, 2])
/// }
///
/// async fn handler() -> RailResult<u16> {
///     let response = list_ids().into_value_response_with(&DefaultResponseProfile::new()).await?;
///     Ok(response.status().as_u16())
/// }
/// ```
pub trait OutcomeValueFutureExt<T>: Future<Output = Outcome<T>> + Sized
where
    T: Serialize,
{
    /// Renders with the process-wide profile from [`crate::config`].
    fn into_value_response(self) -> RenderValueFuture<'static, Self> {
        RenderValueFuture::new(self, ProfileSource::Current)
    }

    /// Renders with `profile`.
    fn into_value_response_with(self, profile: &dyn ResponseProfile) -> RenderValueFuture<'_, Self> {
        RenderValueFuture::new(self, ProfileSource::Explicit(profile))
    }
}

impl<F, T> OutcomeValueFutureExt<T> for F
where
    F: Future<Output = Outcome<T>>,
    T: Serialize,
{
}
