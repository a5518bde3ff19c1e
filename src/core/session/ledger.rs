//! Ordered, id-keyed step collection attached to one response.

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::types::{AgentStep, can_transition};

/// Upsert-only step sequence. First appearance fixes a step's position;
/// later emissions with the same id replace it in place. Nothing is removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepLedger {
    steps: Vec<AgentStep>,
}

impl StepLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_steps(steps: Vec<AgentStep>) -> Self {
        let mut ledger = Self::new();
        for step in steps {
            ledger.upsert(step);
        }
        ledger
    }

    /// Returns the index the step now occupies.
    pub fn upsert(&mut self, step: AgentStep) -> usize {
        match self.steps.iter().position(|s| s.id == step.id) {
            Some(idx) => {
                let current = self.steps[idx].status;
                if !can_transition(current, step.status) {
                    warn!(
                        "Step [{}] moved {} -> {} outside the lifecycle",
                        step.id,
                        current.as_str(),
                        step.status.as_str()
                    );
                }
                self.steps[idx] = step;
                idx
            }
            None => {
                self.steps.push(step);
                self.steps.len() - 1
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<&AgentStep> {
        self.steps.iter().find(|s| s.id == id)
    }

    pub fn steps(&self) -> &[AgentStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn all_terminal(&self) -> bool {
        self.steps.iter().all(|s| s.status.is_terminal())
    }
}
