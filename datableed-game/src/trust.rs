//! Trust score state machine.
//!
//! A single [`TrustState`] exists per playthrough. It is mutated only through
//! [`TrustState::apply_passive_decay`], [`TrustState::apply_bad_decision`],
//! [`TrustState::apply_good_decision`] and [`TrustState::reset`]; every
//! mutation appends to an append-only history and notifies subscribers.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::TrustConfig;
use crate::constants::{
    LOG_THRESHOLD_CRITICAL, LOG_THRESHOLD_FAILURE, LOG_THRESHOLD_WARNING, LOG_TRUST_BONUS,
    LOG_TRUST_DECAY, LOG_TRUST_PENALTY, LOG_TRUST_RESET, TRUST_SCORE_FLOOR,
};
use crate::events::{Observers, SubscriptionId, ThresholdCrossing, TrustEvent, TrustObserver};
use crate::numbers::floor_fraction_of;

/// Coarse descriptor of a trust score, carried by every score update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustStatus {
    Safe,
    Moderate,
    Warning,
    Critical,
    Failure,
}

impl TrustStatus {
    /// Classify a score against the default thresholds.
    #[must_use]
    pub fn from_score(score: i32) -> Self {
        TrustConfig::default().status_for(score)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "safe",
            Self::Moderate => "moderate",
            Self::Warning => "warning",
            Self::Critical => "critical",
            Self::Failure => "failure",
        }
    }

    /// Severity rank from 0 (safe) to 4 (failure).
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Safe => 0,
            Self::Moderate => 1,
            Self::Warning => 2,
            Self::Critical => 3,
            Self::Failure => 4,
        }
    }
}

impl fmt::Display for TrustStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What caused a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    PassiveDecay,
    BadDecision,
    GoodDecision,
}

/// Immutable record of one score mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionEvent {
    pub scene_number: u32,
    pub kind: DecisionKind,
    pub score_before: i32,
    pub score_after: i32,
    /// Signed change; `score_after == score_before + delta`.
    pub delta: i32,
    /// Free-text description, informational only.
    pub label: String,
}

/// Authoritative trust score and its change history.
#[derive(Debug)]
pub struct TrustState {
    score: i32,
    history: Vec<DecisionEvent>,
    config: TrustConfig,
    observers: Observers,
}

impl Default for TrustState {
    fn default() -> Self {
        Self::new()
    }
}

impl TrustState {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(TrustConfig::default())
    }

    #[must_use]
    pub fn with_config(config: TrustConfig) -> Self {
        Self {
            score: config.starting_score,
            history: Vec::new(),
            config,
            observers: Observers::new(),
        }
    }

    #[must_use]
    pub const fn score(&self) -> i32 {
        self.score
    }

    #[must_use]
    pub const fn status(&self) -> TrustStatus {
        self.config.status_for(self.score)
    }

    #[must_use]
    pub const fn has_failed(&self) -> bool {
        self.score <= self.config.failure_threshold
    }

    #[must_use]
    pub fn history(&self) -> &[DecisionEvent] {
        &self.history
    }

    #[must_use]
    pub const fn config(&self) -> &TrustConfig {
        &self.config
    }

    /// Export the history for analytics or debug logging.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn history_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.history)
    }

    pub fn subscribe(&mut self, observer: impl TrustObserver + 'static) -> SubscriptionId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Flat per-scene decay, floored at zero. Returns `before - after`, which
    /// is always the negated history delta.
    ///
    /// Flooring can raise a score that a negative bonus pushed below zero; the
    /// return value is then negative.
    ///
    /// The first scene of a playthrough is exempt; that rule belongs to the
    /// scene sequencer (see [`crate::Playthrough::enter_scene`]).
    pub fn apply_passive_decay(&mut self, scene_number: u32) -> i32 {
        let before = self.score;
        let after = before
            .saturating_sub(self.config.passive_decay_per_scene)
            .max(TRUST_SCORE_FLOOR);
        log::debug!("{LOG_TRUST_DECAY} scene {scene_number}: {before} -> {after}");
        self.commit(
            scene_number,
            DecisionKind::PassiveDecay,
            after,
            "passive decay".to_string(),
        );
        before.saturating_sub(after)
    }

    /// Proportional penalty computed from the pre-penalty score, floored at
    /// zero. Returns the trust actually removed (`before - after`), which is
    /// negative when flooring lifts a score that was already below zero.
    pub fn apply_bad_decision(&mut self, scene_number: u32, label: impl Into<String>) -> i32 {
        let before = self.score;
        let penalty = floor_fraction_of(before, self.config.bad_decision_penalty_fraction);
        let after = before.saturating_sub(penalty).max(TRUST_SCORE_FLOOR);
        log::debug!("{LOG_TRUST_PENALTY} scene {scene_number}: -{penalty} ({before} -> {after})");
        self.commit(scene_number, DecisionKind::BadDecision, after, label.into());
        before.saturating_sub(after)
    }

    /// Flat, uncapped bonus. Returns the bonus as given.
    pub fn apply_good_decision(
        &mut self,
        scene_number: u32,
        label: impl Into<String>,
        bonus: i32,
    ) -> i32 {
        let before = self.score;
        let after = before.saturating_add(bonus);
        log::debug!("{LOG_TRUST_BONUS} scene {scene_number}: +{bonus} ({before} -> {after})");
        self.commit(scene_number, DecisionKind::GoodDecision, after, label.into());
        bonus
    }

    /// Restore the starting score and clear the history.
    pub fn reset(&mut self) {
        self.score = self.config.starting_score;
        self.history.clear();
        log::debug!("{LOG_TRUST_RESET}: {}", self.score);
        self.emit_update();
    }

    fn commit(&mut self, scene_number: u32, kind: DecisionKind, after: i32, label: String) {
        let before = self.score;
        self.history.push(DecisionEvent {
            scene_number,
            kind,
            score_before: before,
            score_after: after,
            delta: after.saturating_sub(before),
            label,
        });
        self.score = after;
        if let Some(crossing) = self.crossing(before, after) {
            log::info!("{} at score {after}", crossing_log_key(crossing));
            self.observers.emit(&TrustEvent::ThresholdCrossed {
                crossing,
                score: after,
            });
        }
        self.emit_update();
    }

    fn emit_update(&mut self) {
        let event = TrustEvent::ScoreUpdated {
            score: self.score,
            status: self.status(),
        };
        self.observers.emit(&event);
    }

    /// First match wins: a jump across several boundaries reports only the deepest.
    const fn crossing(&self, old: i32, new: i32) -> Option<ThresholdCrossing> {
        let cfg = &self.config;
        if new <= cfg.failure_threshold && old > cfg.failure_threshold {
            Some(ThresholdCrossing::Failure)
        } else if new <= cfg.critical_threshold && old > cfg.critical_threshold {
            Some(ThresholdCrossing::Critical)
        } else if new <= cfg.warning_threshold && old > cfg.warning_threshold {
            Some(ThresholdCrossing::Warning)
        } else {
            None
        }
    }
}

const fn crossing_log_key(crossing: ThresholdCrossing) -> &'static str {
    match crossing {
        ThresholdCrossing::Warning => LOG_THRESHOLD_WARNING,
        ThresholdCrossing::Critical => LOG_THRESHOLD_CRITICAL,
        ThresholdCrossing::Failure => LOG_THRESHOLD_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recording(state: &mut TrustState) -> Rc<RefCell<Vec<TrustEvent>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        state.subscribe(move |event: &TrustEvent| sink.borrow_mut().push(*event));
        log
    }

    fn crossings(events: &[TrustEvent]) -> Vec<ThresholdCrossing> {
        events
            .iter()
            .filter_map(|event| match event {
                TrustEvent::ThresholdCrossed { crossing, .. } => Some(*crossing),
                TrustEvent::ScoreUpdated { .. } => None,
            })
            .collect()
    }

    fn starting_at(score: i32) -> TrustState {
        TrustState::with_config(TrustConfig {
            starting_score: score,
            ..TrustConfig::default()
        })
    }

    #[test]
    fn fresh_state_starts_safe() {
        let state = TrustState::new();
        assert_eq!(state.score(), 100);
        assert!(!state.has_failed());
        assert!(state.history().is_empty());
        assert_eq!(state.status(), TrustStatus::Safe);
    }

    #[test]
    fn passive_decay_steps_down_by_five() {
        let mut state = TrustState::new();
        assert_eq!(state.apply_passive_decay(2), 5);
        assert_eq!(state.score(), 95);
        state.apply_passive_decay(3);
        assert_eq!(state.score(), 90);

        let scenes: Vec<u32> = state.history().iter().map(|e| e.scene_number).collect();
        assert_eq!(scenes, vec![2, 3]);
        assert!(
            state
                .history()
                .iter()
                .all(|e| e.kind == DecisionKind::PassiveDecay && e.delta == -5)
        );
    }

    #[test]
    fn passive_decay_floors_at_zero() {
        let mut state = starting_at(3);
        assert_eq!(state.apply_passive_decay(4), 3);
        assert_eq!(state.score(), 0);
        assert_eq!(state.apply_passive_decay(5), 0);
        assert_eq!(state.score(), 0);
        assert!(state.has_failed());
    }

    #[test]
    fn bad_decision_penalty_is_quarter_of_current_score() {
        let mut state = starting_at(80);
        assert_eq!(state.apply_bad_decision(2, "trusted the stranger"), 20);
        assert_eq!(state.score(), 60);
        let last = state.history().last().expect("event recorded");
        assert_eq!(last.kind, DecisionKind::BadDecision);
        assert_eq!(last.label, "trusted the stranger");
        assert_eq!(last.delta, -20);
    }

    #[test]
    fn repeated_bad_decisions_converge_without_failing() {
        // The design notes list 5, 3, 2, 1 ending at 9; that sequence cannot
        // come from floor(score * 0.25). Applying the formula gives 5, 3, 3, 2
        // and a final score of 7.
        let mut state = starting_at(20);
        let penalties: Vec<i32> = (0..4).map(|_| state.apply_bad_decision(3, "reply")).collect();
        assert_eq!(penalties, vec![5, 3, 3, 2]);
        assert_eq!(state.history()[2].score_after, 9);
        assert_eq!(state.score(), 7);
        assert!(!state.has_failed());

        for _ in 0..50 {
            state.apply_bad_decision(3, "reply");
        }
        assert_eq!(state.score(), 3);
        assert!(!state.has_failed());

        state.apply_passive_decay(4);
        assert_eq!(state.score(), 0);
        assert!(state.has_failed());
    }

    #[test]
    fn good_decision_has_no_ceiling() {
        let mut state = starting_at(95);
        assert_eq!(state.apply_good_decision(2, "blocked the account", 25), 25);
        assert_eq!(state.score(), 120);
    }

    #[test]
    fn negative_bonus_is_applied_arithmetically() {
        let mut state = starting_at(10);
        state.apply_good_decision(2, "misuse", -15);
        assert_eq!(state.score(), -5);
        assert!(state.has_failed());
    }

    #[test]
    fn returned_amounts_match_history_when_flooring_lifts_the_score() {
        let mut state = starting_at(0);
        state.apply_good_decision(2, "misuse", -5);
        assert_eq!(state.score(), -5);

        let removed = state.apply_bad_decision(3, "reply");
        let last = state.history().last().expect("event recorded");
        assert_eq!(state.score(), 0);
        assert_eq!(last.delta, 5);
        assert_eq!(removed, -last.delta);

        state.apply_good_decision(4, "misuse", -5);
        let removed = state.apply_passive_decay(5);
        let last = state.history().last().expect("event recorded");
        assert_eq!(removed, -last.delta);
        assert_eq!(removed, -5);
    }

    #[test]
    fn history_forms_an_unbroken_chain() {
        let mut state = TrustState::new();
        state.apply_bad_decision(1, "shared address");
        state.apply_passive_decay(2);
        state.apply_good_decision(2, "told a parent", 10);
        state.apply_bad_decision(3, "sent photo");
        state.apply_passive_decay(4);

        let history = state.history();
        assert_eq!(history[0].score_before, 100);
        for event in history {
            assert_eq!(event.score_after, event.score_before + event.delta);
        }
        for pair in history.windows(2) {
            assert_eq!(pair[0].score_after, pair[1].score_before);
        }
        assert_eq!(history.last().map(|e| e.score_after), Some(state.score()));
    }

    #[test]
    fn single_jump_fires_only_the_deepest_threshold() {
        let mut state = starting_at(35);
        let events = recording(&mut state);
        state.apply_good_decision(3, "jump", -30);
        assert_eq!(state.score(), 5);
        assert_eq!(crossings(&events.borrow()), vec![ThresholdCrossing::Critical]);
    }

    #[test]
    fn threshold_event_precedes_score_update() {
        let mut state = starting_at(32);
        let events = recording(&mut state);
        state.apply_passive_decay(4);
        assert_eq!(
            *events.borrow(),
            vec![
                TrustEvent::ThresholdCrossed {
                    crossing: ThresholdCrossing::Warning,
                    score: 27,
                },
                TrustEvent::ScoreUpdated {
                    score: 27,
                    status: TrustStatus::Warning,
                },
            ]
        );
    }

    #[test]
    fn crossings_fire_once_per_boundary() {
        let mut state = starting_at(15);
        let events = recording(&mut state);
        for scene in 2..8 {
            state.apply_passive_decay(scene);
        }
        assert_eq!(
            crossings(&events.borrow()),
            vec![ThresholdCrossing::Critical, ThresholdCrossing::Failure]
        );
        let updates = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, TrustEvent::ScoreUpdated { .. }))
            .count();
        assert_eq!(updates, 6);
    }

    #[test]
    fn upward_moves_never_fire_thresholds() {
        let mut state = starting_at(5);
        let events = recording(&mut state);
        state.apply_good_decision(3, "recovered", 60);
        assert!(crossings(&events.borrow()).is_empty());
    }

    #[test]
    fn reset_restores_start_and_notifies() {
        let mut state = TrustState::new();
        state.apply_bad_decision(1, "a");
        state.apply_passive_decay(2);
        let events = recording(&mut state);

        state.reset();
        assert_eq!(state.score(), 100);
        assert!(state.history().is_empty());
        assert_eq!(
            *events.borrow(),
            vec![TrustEvent::ScoreUpdated {
                score: 100,
                status: TrustStatus::Safe,
            }]
        );
    }

    #[test]
    fn floor_holds_for_mixed_sequences() {
        let mut state = TrustState::new();
        for step in 0..200_u32 {
            if step % 3 == 0 {
                state.apply_passive_decay(step);
            } else {
                state.apply_bad_decision(step, "risk");
            }
            assert!(state.score() >= 0);
        }
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn history_json_exports_snake_case_kinds() {
        let mut state = TrustState::new();
        state.apply_bad_decision(1, "opened link");
        let json = state.history_json().expect("serialize");
        assert!(json.contains("\"bad_decision\""));
        assert!(json.contains("opened link"));
    }

    #[test]
    fn status_descriptor_matches_boundaries() {
        assert_eq!(TrustStatus::from_score(0), TrustStatus::Failure);
        assert_eq!(TrustStatus::from_score(10), TrustStatus::Critical);
        assert_eq!(TrustStatus::from_score(11), TrustStatus::Warning);
        assert_eq!(TrustStatus::from_score(31), TrustStatus::Moderate);
        assert_eq!(TrustStatus::from_score(50), TrustStatus::Safe);
        assert_eq!(TrustStatus::Critical.severity(), 3);
        assert_eq!(TrustStatus::Warning.to_string(), "warning");
    }
}
