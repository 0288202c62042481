//! Scheduler decisions and engine output events

use serde::{Deserialize, Serialize};

use crate::types::BatchRecord;

/// Scheduler evaluation phases
///
/// Idle → Evaluating → (NoAction | Intervening) → Idle, once per
/// visibility event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SchedulerPhase {
    /// Between events
    Idle,
    /// Scoring in progress
    Evaluating,
    /// Evaluation completed below threshold or inside cooldown
    NoAction,
    /// Intervention chosen this event
    Intervening,
}

impl SchedulerPhase {
    /// Get ANSI color code for terminal display
    pub fn color_code(&self) -> &'static str {
        match self {
            SchedulerPhase::Idle => "\x1b[90m",        // Gray
            SchedulerPhase::Evaluating => "\x1b[33m",  // Yellow
            SchedulerPhase::NoAction => "\x1b[37m",    // White
            SchedulerPhase::Intervening => "\x1b[32m", // Green
        }
    }
}

impl std::fmt::Display for SchedulerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SchedulerPhase::Idle => "IDLE",
            SchedulerPhase::Evaluating => "EVALUATING",
            SchedulerPhase::NoAction => "NO_ACTION",
            SchedulerPhase::Intervening => "INTERVENING",
        };
        write!(f, "{}", name)
    }
}

/// Kinds of intervention the scheduler can select
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterventionKind {
    /// Mutate an upcoming feed slot to hold a locked reward
    InjectReward,
    /// Haptic pulse (rendered by a collaborator)
    Haptic,
    /// Reward sound (rendered by a collaborator)
    Sound,
    /// Social-proof toast message (rendered by a collaborator)
    SocialProof,
}

impl std::fmt::Display for InterventionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            InterventionKind::InjectReward => "INJECT_REWARD",
            InterventionKind::Haptic => "HAPTIC",
            InterventionKind::Sound => "SOUND",
            InterventionKind::SocialProof => "SOCIAL_PROOF",
        };
        write!(f, "{}", name)
    }
}

/// Transient result of one scheduler evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterventionDecision {
    /// Churn probability that drove the evaluation
    pub churn: f64,
    /// Did the cooldown gate pass?
    pub cooldown_passed: bool,
    /// Chosen intervention kinds; empty when nothing triggered
    pub kinds: Vec<InterventionKind>,
}

impl InterventionDecision {
    /// Decision that takes no action
    pub fn no_action(churn: f64, cooldown_passed: bool) -> Self {
        Self {
            churn,
            cooldown_passed,
            kinds: Vec::new(),
        }
    }

    /// Did this evaluation trigger an intervention?
    pub fn triggered(&self) -> bool {
        !self.kinds.is_empty()
    }
}

/// Events emitted by the engine for I/O collaborators
///
/// This engine renders and plays nothing itself; haptics, audio, and toast
/// rendering subscribe to these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngineEvent {
    /// A new content batch was generated and absorbed into the catalog
    BatchInjected { record: BatchRecord },
    /// The scheduler fired an intervention
    InterventionFired { decision: InterventionDecision },
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_action_decision() {
        let d = InterventionDecision::no_action(0.3, true);
        assert!(!d.triggered());
        assert!(d.kinds.is_empty());
    }

    #[test]
    fn test_triggered_decision() {
        let d = InterventionDecision {
            churn: 0.8,
            cooldown_passed: true,
            kinds: vec![InterventionKind::InjectReward, InterventionKind::Haptic],
        };
        assert!(d.triggered());
    }

    #[test]
    fn test_event_serializes_with_tag() {
        let d = InterventionDecision::no_action(0.1, false);
        let event = EngineEvent::InterventionFired { decision: d };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"INTERVENTION_FIRED\""));
    }
}
