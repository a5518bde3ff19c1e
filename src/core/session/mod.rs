mod ledger;
mod store;
mod types;

pub use ledger::StepLedger;
pub use store::{RunGuard, SessionEvent, SessionStore};
pub use types::{
    AgentKind, AgentStep, Message, MessagePatch, Role, StepStatus, can_transition, generate_id,
    now_millis,
};

#[cfg(test)]
mod tests;
