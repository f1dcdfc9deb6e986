//! Process-wide response profile.
//!
//! The profile is meant to be chosen once at startup with [`setup`], before
//! requests are served. Readers take an `Arc` snapshot, so a concurrent
//! `setup` never exposes a partially built profile. Code that can pass a
//! profile explicitly to [`ResponseTransformer`](crate::profile::ResponseTransformer)
//! should prefer that.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use problem_rail::config;
//! use problem_rail::mapping::CurrentRequest;
//! use problem_rail::profile::DefaultResponseProfile;
//!
//! config::setup(|settings| {
//!     settings.use_profile(DefaultResponseProfile::new().with_accessor(Arc::new(CurrentRequest)));
//! });
//! ```

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use crate::profile::{DefaultResponseProfile, ResponseProfile};

static SETTINGS: LazyLock<RwLock<Arc<ProfileSettings>>> =
    LazyLock::new(|| RwLock::new(Arc::new(ProfileSettings::default())));

/// Settings assembled by [`setup`].
#[derive(Clone)]
pub struct ProfileSettings {
    current_profile: Arc<dyn ResponseProfile>,
}

impl Default for ProfileSettings {
    fn default() -> Self {
        Self { current_profile: Arc::new(DefaultResponseProfile::new()) }
    }
}

impl ProfileSettings {
    /// Replaces the profile used for rendering.
    pub fn use_profile<P>(&mut self, profile: P) -> &mut Self
    where
        P: ResponseProfile + 'static,
    {
        self.current_profile = Arc::new(profile);
        self
    }

    /// Same as [`use_profile`](Self::use_profile) for an already shared profile.
    pub fn use_shared_profile(&mut self, profile: Arc<dyn ResponseProfile>) -> &mut Self {
        self.current_profile = profile;
        self
    }

    pub fn current_profile(&self) -> Arc<dyn ResponseProfile> {
        Arc::clone(&self.current_profile)
    }
}

impl std::fmt::Debug for ProfileSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileSettings").finish_non_exhaustive()
    }
}

/// Builds fresh settings, lets `configure` adjust them, then swaps them in.
pub fn setup<F>(configure: F)
where
    F: FnOnce(&mut ProfileSettings),
{
    let mut settings = ProfileSettings::default();
    configure(&mut settings);
    *SETTINGS.write() = Arc::new(settings);
    tracing::debug!("response profile settings replaced");
}

/// The profile currently installed by [`setup`].
pub fn current_profile() -> Arc<dyn ResponseProfile> {
    SETTINGS.read().current_profile()
}

/// A snapshot of the installed settings.
pub fn settings() -> Arc<ProfileSettings> {
    Arc::clone(&SETTINGS.read())
}
