//! Two-state outcome returned by business operations.
//!
//! An [`Outcome`] is either a success carrying a value (for `Outcome<()>`,
//! the unit value) and the [`Error::NONE`] sentinel, or a failure carrying a
//! classified [`Error`]. The pairing is checked at construction and never
//! changes afterwards.

use core::any::type_name;

use crate::error::{RailError, RailResult};
use crate::types::Error;

/// Success-or-failure wrapper used instead of letting faults cross internal
/// boundaries.
#[must_use]
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome<T = ()> {
    is_success: bool,
    value: Option<T>,
    error: Error,
}

impl Outcome<()> {
    /// A successful outcome without a value.
    #[inline]
    pub fn success() -> Self {
        Self::from_parts(true, Some(()), Error::NONE)
    }
}

impl<T> Outcome<T> {
    /// Builds an outcome from its raw parts, checking the state invariant.
    ///
    /// # Panics
    ///
    /// Panics when a success carries anything but [`Error::NONE`], when a
    /// success has no value, or when a failure carries [`Error::NONE`].
    pub fn from_parts(is_success: bool, value: Option<T>, error: Error) -> Self {
        if is_success {
            assert!(error.is_none(), "a successful outcome must not carry an error");
            assert!(value.is_some(), "a successful outcome must carry its value");
        } else {
            assert!(!error.is_none(), "a failed outcome must carry an error");
        }

        Self { is_success, value: if is_success { value } else { None }, error }
    }

    #[inline]
    pub fn success_with(value: T) -> Self {
        Self::from_parts(true, Some(value), Error::NONE)
    }

    #[inline]
    pub fn failure(error: Error) -> Self {
        Self::from_parts(false, None, error)
    }

    /// Same as [`Outcome::failure`]; mirrors the `From<Error>` conversion.
    #[inline]
    pub fn from_error(error: Error) -> Self {
        Self::failure(error)
    }

    /// A failure whose error is built from `message` with the default
    /// internal-server classification.
    pub fn failure_message(message: impl Into<String>) -> RailResult<Self> {
        Ok(Self::failure(Error::new(message)?))
    }

    /// Success when `value` is present, otherwise a failure naming the
    /// expected type.
    pub fn from_value(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::success_with(value),
            None => Self::failure(Error::unchecked(format!(
                "expected value of type {} was None",
                type_name::<T>()
            ))),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.is_success
    }

    #[inline]
    pub fn is_failure(&self) -> bool {
        !self.is_success
    }

    /// The carried error; [`Error::NONE`] on success.
    #[inline]
    pub fn error(&self) -> &Error {
        &self.error
    }

    /// The success value, or [`RailError::ValueUnavailable`] on failure.
    pub fn value(&self) -> RailResult<&T> {
        self.value.as_ref().ok_or(RailError::ValueUnavailable)
    }

    /// The success value, or `T::default()` on failure.
    pub fn value_or_default(&self) -> T
    where
        T: Clone + Default,
    {
        self.value.clone().unwrap_or_default()
    }

    /// Maps the success value, leaving failures untouched.
    pub fn map<U, F>(self, f: F) -> Outcome<U>
    where
        F: FnOnce(T) -> U,
    {
        Outcome { is_success: self.is_success, value: self.value.map(f), error: self.error }
    }

    /// Converts into a standard `Result` so `?` can be used on the error.
    pub fn into_result(self) -> Result<T, Error> {
        match self.value {
            Some(value) => Ok(value),
            None => Err(self.error),
        }
    }

    /// Splits into the optional value and the carried error.
    pub(crate) fn into_parts(self) -> (Option<T>, Error) {
        (self.value, self.error)
    }
}

impl<T> From<Error> for Outcome<T> {
    #[inline]
    fn from(error: Error) -> Self {
        Self::failure(error)
    }
}

impl<T> From<Result<T, Error>> for Outcome<T> {
    #[inline]
    fn from(result: Result<T, Error>) -> Self {
        match result {
            Ok(value) => Self::success_with(value),
            Err(error) => Self::failure(error),
        }
    }
}

impl<T> From<Outcome<T>> for Result<T, Error> {
    #[inline]
    fn from(outcome: Outcome<T>) -> Self {
        outcome.into_result()
    }
}
