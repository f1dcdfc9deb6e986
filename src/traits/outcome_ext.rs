use std::error::Error as StdError;

use serde::Serialize;

use crate::error::RailResult;
use crate::mapping::build_error_from_std;
use crate::profile::{ProfileResponse, ResponseProfile, ResponseTransformer};
use crate::types::Outcome;

/// Renders a value-less outcome.
pub trait OutcomeExt {
    /// Renders with the process-wide profile from [`crate::config`].
    fn into_response(&self) -> RailResult<ProfileResponse>;

    fn into_response_with(&self, profile: &dyn ResponseProfile) -> RailResult<ProfileResponse>;
}

impl OutcomeExt for Outcome {
    #[inline]
    fn into_response(&self) -> RailResult<ProfileResponse> {
        ResponseTransformer.transform_current(self)
    }

    #[inline]
    fn into_response_with(&self, profile: &dyn ResponseProfile) -> RailResult<ProfileResponse> {
        ResponseTransformer.transform(self, profile)
    }
}

/// Renders an outcome whose value is encoded as the JSON body.
pub trait OutcomeValueExt {
    /// Renders with the process-wide profile from [`crate::config`].
    fn into_value_response(&self) -> RailResult<ProfileResponse>;

    fn into_value_response_with(
        &self,
        profile: &dyn ResponseProfile,
    ) -> RailResult<ProfileResponse>;
}

impl<T: Serialize> OutcomeValueExt for Outcome<T> {
    #[inline]
    fn into_value_response(&self) -> RailResult<ProfileResponse> {
        ResponseTransformer.transform_value_current(self)
    }

    #[inline]
    fn into_value_response_with(
        &self,
        profile: &dyn ResponseProfile,
    ) -> RailResult<ProfileResponse> {
        ResponseTransformer.transform_value(self, profile)
    }
}

/// Lifts a `Result` into an [`Outcome`], classifying the error the same way
/// the exception boundary does.
pub trait ResultOutcomeExt<T> {
    fn into_outcome(self) -> Outcome<T>;
}

impl<T, E> ResultOutcomeExt<T> for Result<T, E>
where
    E: StdError + 'static,
{
    fn into_outcome(self) -> Outcome<T> {
        match self {
            Ok(value) => Outcome::success_with(value),
            Err(err) => Outcome::failure(build_error_from_std(&err)),
        }
    }
}
