use serde::Serialize;

use crate::config;
use crate::error::RailResult;
use crate::profile::{
    FailureContext, ProfileResponse, ResponseProfile, SuccessContext, SuccessValueContext,
};
use crate::types::Outcome;

/// Dispatches an outcome to a [`ResponseProfile`] by its state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseTransformer;

impl ResponseTransformer {
    /// Renders an outcome without a value.
    pub fn transform(
        &self,
        outcome: &Outcome,
        profile: &dyn ResponseProfile,
    ) -> RailResult<ProfileResponse> {
        if outcome.is_failure() {
            return profile.render_failure(FailureContext { error: outcome.error() });
        }
        Ok(profile.render_success(SuccessContext { outcome }))
    }

    /// Renders an outcome carrying a value; the value is encoded to JSON first.
    pub fn transform_value<T: Serialize>(
        &self,
        outcome: &Outcome<T>,
        profile: &dyn ResponseProfile,
    ) -> RailResult<ProfileResponse> {
        match outcome.value() {
            Ok(value) => {
                let value = serde_json::to_value(value)?;
                Ok(profile.render_success_value(SuccessValueContext { value }))
            },
            Err(_) => profile.render_failure(FailureContext { error: outcome.error() }),
        }
    }

    /// [`transform`](Self::transform) with the process-wide profile.
    pub fn transform_current(&self, outcome: &Outcome) -> RailResult<ProfileResponse> {
        self.transform(outcome, config::current_profile().as_ref())
    }

    /// [`transform_value`](Self::transform_value) with the process-wide profile.
    pub fn transform_value_current<T: Serialize>(
        &self,
        outcome: &Outcome<T>,
    ) -> RailResult<ProfileResponse> {
        self.transform_value(outcome, config::current_profile().as_ref())
    }
}
