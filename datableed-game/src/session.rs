use serde::{Deserialize, Serialize};

use crate::config::TuningConfig;
use crate::constants::{DEFAULT_FIRST_SCENE, LOG_SCENE_ENTER};
use crate::events::{SubscriptionId, TrustObserver};
use crate::intensity::{EffectProfile, IntensityMapper};
use crate::narration::{DecisionTally, NarrationBranch, select_narration_with};
use crate::trust::TrustState;

/// Player choice at a decision point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Choice {
    Good { label: String, bonus: i32 },
    Bad { label: String },
}

impl Choice {
    #[must_use]
    pub fn good(label: impl Into<String>, bonus: i32) -> Self {
        Self::Good {
            label: label.into(),
            bonus,
        }
    }

    #[must_use]
    pub fn bad(label: impl Into<String>) -> Self {
        Self::Bad {
            label: label.into(),
        }
    }

    #[must_use]
    pub const fn is_good(&self) -> bool {
        matches!(self, Self::Good { .. })
    }
}

/// Result of entering a scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneEntry {
    pub scene_number: u32,
    /// Trust removed by passive decay; zero for the exempt first scene.
    pub decay_applied: i32,
    pub score: i32,
    pub failed: bool,
}

/// Result of resolving a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOutcome {
    pub scene_number: u32,
    /// Bonus added for good choices, trust actually removed for bad ones.
    pub amount: i32,
    pub score: i32,
    pub consecutive_bad: u32,
    pub failed: bool,
}

/// Top-level playthrough controller owning the trust state.
///
/// Collaborators borrow the trust state through this session rather than
/// through any ambient global.
#[derive(Debug)]
pub struct Playthrough {
    trust: TrustState,
    mapper: IntensityMapper,
    tuning: TuningConfig,
    scenes_entered: u32,
    current_scene: Option<u32>,
    tally: DecisionTally,
    consecutive_bad: u32,
}

impl Default for Playthrough {
    fn default() -> Self {
        Self::new(TuningConfig::default_config())
    }
}

impl Playthrough {
    #[must_use]
    pub fn new(tuning: TuningConfig) -> Self {
        let trust = TrustState::with_config(tuning.trust.clone());
        let mapper = IntensityMapper::new(tuning.intensity, tuning.trust.clone());
        Self {
            trust,
            mapper,
            tuning,
            scenes_entered: 0,
            current_scene: None,
            tally: DecisionTally::default(),
            consecutive_bad: 0,
        }
    }

    /// Enter a scene. All but the first scene of a playthrough cost passive decay.
    pub fn enter_scene(&mut self, scene_number: u32) -> SceneEntry {
        let decay_applied = if self.scenes_entered == 0 {
            0
        } else {
            self.trust.apply_passive_decay(scene_number)
        };
        self.scenes_entered = self.scenes_entered.saturating_add(1);
        self.current_scene = Some(scene_number);
        log::debug!(
            "{LOG_SCENE_ENTER} {scene_number} (decay {decay_applied}, score {})",
            self.trust.score()
        );
        SceneEntry {
            scene_number,
            decay_applied,
            score: self.trust.score(),
            failed: self.trust.has_failed(),
        }
    }

    /// Apply a choice in the current scene.
    pub fn choose(&mut self, choice: Choice) -> ChoiceOutcome {
        let scene_number = self.scene_number();
        let amount = match choice {
            Choice::Good { label, bonus } => {
                self.tally.record_good();
                self.consecutive_bad = 0;
                self.trust.apply_good_decision(scene_number, label, bonus)
            }
            Choice::Bad { label } => {
                self.tally.record_risky();
                self.consecutive_bad = self.consecutive_bad.saturating_add(1);
                self.trust.apply_bad_decision(scene_number, label)
            }
        };
        ChoiceOutcome {
            scene_number,
            amount,
            score: self.trust.score(),
            consecutive_bad: self.consecutive_bad,
            failed: self.trust.has_failed(),
        }
    }

    /// Effect parameters for the current moment.
    #[must_use]
    pub fn effects(&self) -> EffectProfile {
        self.mapper.profile(
            self.trust.score(),
            self.scene_number(),
            self.consecutive_bad,
        )
    }

    #[must_use]
    pub const fn narration(&self) -> NarrationBranch {
        select_narration_with(self.trust.score(), self.tally, &self.tuning.narration)
    }

    /// Start the playthrough over: full trust, empty history, no scenes entered.
    pub fn restart(&mut self) {
        self.trust.reset();
        self.scenes_entered = 0;
        self.current_scene = None;
        self.tally = DecisionTally::default();
        self.consecutive_bad = 0;
    }

    pub fn subscribe(&mut self, observer: impl TrustObserver + 'static) -> SubscriptionId {
        self.trust.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.trust.unsubscribe(id)
    }

    #[must_use]
    pub const fn has_failed(&self) -> bool {
        self.trust.has_failed()
    }

    #[must_use]
    pub const fn trust(&self) -> &TrustState {
        &self.trust
    }

    #[must_use]
    pub const fn mapper(&self) -> &IntensityMapper {
        &self.mapper
    }

    #[must_use]
    pub const fn tuning(&self) -> &TuningConfig {
        &self.tuning
    }

    #[must_use]
    pub const fn tally(&self) -> DecisionTally {
        self.tally
    }

    #[must_use]
    pub const fn consecutive_bad(&self) -> u32 {
        self.consecutive_bad
    }

    #[must_use]
    pub const fn scenes_entered(&self) -> u32 {
        self.scenes_entered
    }

    #[must_use]
    pub const fn current_scene(&self) -> Option<u32> {
        self.current_scene
    }

    const fn scene_number(&self) -> u32 {
        match self.current_scene {
            Some(scene) => scene,
            None => DEFAULT_FIRST_SCENE,
        }
    }
}
