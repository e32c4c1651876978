//! Data_Bleed Game Engine
//!
//! Platform-agnostic trust and horror-intensity logic for the Data_Bleed
//! interactive narrative. This crate owns no rendering, audio, or asset
//! handling; renderers read the [`EffectProfile`] a [`Playthrough`] produces.

pub mod config;
pub mod constants;
pub mod events;
pub mod intensity;
pub mod narration;
pub mod numbers;
pub mod scheduler;
pub mod session;
pub mod trust;

// Re-export commonly used types
pub use config::{ConfigError, IntensityConfig, NarrationConfig, TrustConfig, TuningConfig};
pub use events::{Observers, SubscriptionId, ThresholdCrossing, TrustEvent, TrustObserver};
pub use intensity::{
    EffectProfile, GlitchTiming, IntensityLevel, IntensityMapper, IntensityScale, TransitionKind,
    compute_animation_interval, compute_animation_interval_gated, compute_filter_strength,
    compute_glitch_timing, compute_level, compute_level_signed, compute_transition,
    corruption_level_for_streak,
};
pub use narration::{DecisionTally, NarrationBranch, select_narration, select_narration_with};
pub use scheduler::{AnimationScheduler, SchedulerState};
pub use session::{Choice, ChoiceOutcome, Playthrough, SceneEntry};
pub use trust::{DecisionEvent, DecisionKind, TrustState, TrustStatus};

/// Trait for abstracting tuning data loading
/// Platform-specific implementations should provide this
pub trait TuningSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the tuning bundle from the platform-specific source
    ///
    /// # Errors
    ///
    /// Returns an error if the tuning data cannot be read or fails validation.
    fn load_tuning(&self) -> Result<TuningConfig, Self::Error>;
}

/// Tuning source backed by the asset compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTuning;

impl TuningSource for StaticTuning {
    type Error = std::convert::Infallible;

    fn load_tuning(&self) -> Result<TuningConfig, Self::Error> {
        Ok(TuningConfig::load_from_static())
    }
}

/// Main game engine for starting playthroughs
pub struct GameEngine<S>
where
    S: TuningSource,
{
    source: S,
}

impl<S> GameEngine<S>
where
    S: TuningSource,
{
    /// Create a new game engine with the provided tuning source
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// Start a fresh playthrough with freshly loaded tuning
    ///
    /// # Errors
    ///
    /// Returns an error if the tuning data cannot be loaded.
    pub fn create_playthrough(&self) -> Result<Playthrough, S::Error> {
        let tuning = self.source.load_tuning()?;
        Ok(Playthrough::new(tuning))
    }
}
