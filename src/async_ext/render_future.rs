//! Futures that render an outcome once it resolves.

use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use futures_core::future::FusedFuture;
use pin_project_lite::pin_project;
use serde::Serialize;

use crate::config;
use crate::error::RailResult;
use crate::profile::{ProfileResponse, ResponseProfile, ResponseTransformer};
use crate::types::Outcome;

/// Which profile a render future uses.
#[derive(Clone, Copy)]
pub(crate) enum ProfileSource<'p> {
    /// The process-wide profile, looked up when the outcome resolves.
    Current,
    Explicit(&'p dyn ResponseProfile),
}

impl ProfileSource<'_> {
    fn render<T, R>(self, outcome: &Outcome<T>, render: R) -> RailResult<ProfileResponse>
    where
        R: FnOnce(&Outcome<T>, &dyn ResponseProfile) -> RailResult<ProfileResponse>,
    {
        match self {
            Self::Current => render(outcome, config::current_profile().as_ref()),
            Self::Explicit(profile) => render(outcome, profile),
        }
    }
}

pin_project! {
    /// Renders the value-less [`Outcome`] produced by the inner future.
    ///
    /// # Cancel Safety
    ///
    /// `RenderFuture` is cancel-safe if the inner future is cancel-safe.
    /// Nothing is rendered until the inner future resolves.
    #[must_use = "futures do nothing unless polled"]
    pub struct RenderFuture<'p, F> {
        #[pin]
        future: F,
        profile: Option<ProfileSource<'p>>,
    }
}

impl<'p, F> RenderFuture<'p, F> {
    #[inline]
    pub(crate) fn new(future: F, profile: ProfileSource<'p>) -> Self {
        Self { future, profile: Some(profile) }
    }
}

impl<F> Future for RenderFuture<'_, F>
where
    F: Future<Output = Outcome>,
{
    type Output = RailResult<ProfileResponse>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        this.future.poll(cx).map(|outcome| {
            let profile = this.profile.take().expect("RenderFuture polled after completion");
            profile.render(&outcome, |outcome, profile| {
                ResponseTransformer.transform(outcome, profile)
            })
        })
    }
}

impl<F> FusedFuture for RenderFuture<'_, F>
where
    F: FusedFuture<Output = Outcome>,
{
    fn is_terminated(&self) -> bool {
        self.profile.is_none() || self.future.is_terminated()
    }
}

pin_project! {
    /// Renders the [`Outcome<T>`] produced by the inner future, encoding its
    /// value as the JSON body.
    #[must_use = "futures do nothing unless polled"]
    pub struct RenderValueFuture<'p, F> {
        #[pin]
        future: F,
        profile: Option<ProfileSource<'p>>,
    }
}

impl<'p, F> RenderValueFuture<'p, F> {
    #[inline]
    pub(crate) fn new(future: F, profile: ProfileSource<'p>) -> Self {
        Self { future, profile: Some(profile) }
    }
}

impl<F, T> Future for RenderValueFuture<'_, F>
where
    F: Future<Output = Outcome<T>>,
    T: Serialize,
{
    type Output = RailResult<ProfileResponse>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        this.future.poll(cx).map(|outcome| {
            let profile = this.profile.take().expect("RenderValueFuture polled after completion");
            profile.render(&outcome, |outcome, profile| {
                ResponseTransformer.transform_value(outcome, profile)
            })
        })
    }
}

impl<F, T> FusedFuture for RenderValueFuture<'_, F>
where
    F: FusedFuture<Output = Outcome<T>>,
    T: Serialize,
{
    fn is_terminated(&self) -> bool {
        self.profile.is_none() || self.future.is_terminated()
    }
}
