use std::fmt;

use datableed_game::TrustStatus;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Score above which the balanced policy allows itself a risky reply.
const BALANCED_RISK_FLOOR: i32 = 60;

/// Snapshot handed to a policy at a decision point.
#[derive(Debug, Clone, Copy)]
pub struct DecisionPoint {
    pub scene_number: u32,
    pub prompt_index: u8,
    pub score: i32,
    pub status: TrustStatus,
    pub consecutive_bad: u32,
}

/// Decision returned by a [`PlayerPolicy`]
#[derive(Debug, Clone)]
pub struct PolicyDecision {
    pub good: bool,
    pub rationale: Option<String>,
}

impl PolicyDecision {
    #[must_use]
    pub fn new(good: bool, rationale: Option<String>) -> Self {
        Self { good, rationale }
    }
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Choose between the safe and the risky reply.
    fn decide(&mut self, point: &DecisionPoint) -> PolicyDecision;
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameplayStrategy {
    Cautious,
    Reckless,
    Balanced,
    Impulsive,
}

impl GameplayStrategy {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            GameplayStrategy::Cautious => "Cautious",
            GameplayStrategy::Reckless => "Reckless",
            GameplayStrategy::Balanced => "Balanced",
            GameplayStrategy::Impulsive => "Impulsive",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            GameplayStrategy::Cautious => Box::new(CautiousPolicy),
            GameplayStrategy::Reckless => Box::new(RecklessPolicy),
            GameplayStrategy::Balanced => Box::new(BalancedPolicy),
            GameplayStrategy::Impulsive => Box::new(ImpulsivePolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct CautiousPolicy;
struct RecklessPolicy;
struct BalancedPolicy;

struct ImpulsivePolicy {
    rng: ChaCha20Rng,
}

impl ImpulsivePolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
        }
    }
}

impl PlayerPolicy for CautiousPolicy {
    fn name(&self) -> &'static str {
        "Cautious"
    }

    fn decide(&mut self, _point: &DecisionPoint) -> PolicyDecision {
        PolicyDecision::new(true, Some("always safe".to_string()))
    }
}

impl PlayerPolicy for RecklessPolicy {
    fn name(&self) -> &'static str {
        "Reckless"
    }

    fn decide(&mut self, point: &DecisionPoint) -> PolicyDecision {
        PolicyDecision::new(
            false,
            Some(format!(
                "ignores {} trust, {} risky in a row",
                point.status, point.consecutive_bad
            )),
        )
    }
}

impl PlayerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn decide(&mut self, point: &DecisionPoint) -> PolicyDecision {
        let good = point.score < BALANCED_RISK_FLOOR;
        PolicyDecision::new(good, Some(format!("score {}", point.score)))
    }
}

impl PlayerPolicy for ImpulsivePolicy {
    fn name(&self) -> &'static str {
        "Impulsive"
    }

    fn decide(&mut self, point: &DecisionPoint) -> PolicyDecision {
        let roll: f64 = self.rng.r#gen();
        PolicyDecision::new(
            roll >= 0.5,
            Some(format!(
                "roll {roll:.3} at {}.{}",
                point.scene_number, point.prompt_index
            )),
        )
    }
}
