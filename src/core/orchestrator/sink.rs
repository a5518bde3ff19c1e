use std::sync::Arc;

use crate::core::session::{AgentStep, SessionStore};

/// Receives step emissions synchronously, in emission order.
pub trait StepSink: Send + Sync {
    fn emit(&self, step: AgentStep);
}

impl<F> StepSink for F
where
    F: Fn(AgentStep) + Send + Sync,
{
    fn emit(&self, step: AgentStep) {
        self(step)
    }
}

/// Folds every step into the pending message's ledger, then forwards it.
pub(crate) struct LedgerSink<'a> {
    pub session: &'a SessionStore,
    pub message_id: &'a str,
    pub observer: Option<&'a Arc<dyn StepSink>>,
}

impl StepSink for LedgerSink<'_> {
    fn emit(&self, step: AgentStep) {
        match self.observer {
            Some(observer) => {
                self.session.upsert_step(self.message_id, step.clone());
                observer.emit(step);
            }
            None => {
                self.session.upsert_step(self.message_id, step);
            }
        }
    }
}
