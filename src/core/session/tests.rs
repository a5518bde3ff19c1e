use crate::core::session::{
    AgentKind, AgentStep, Message, MessagePatch, Role, SessionEvent, SessionStore, StepStatus,
    can_transition,
};

#[test]
fn step_lifecycle_only_moves_forward() {
    assert!(can_transition(StepStatus::Pending, StepStatus::Running));
    assert!(can_transition(StepStatus::Running, StepStatus::Completed));
    assert!(can_transition(StepStatus::Running, StepStatus::Failed));
    assert!(can_transition(StepStatus::Completed, StepStatus::Completed));
    assert!(!can_transition(StepStatus::Completed, StepStatus::Running));
    assert!(!can_transition(StepStatus::Failed, StepStatus::Completed));
    assert!(!can_transition(StepStatus::Running, StepStatus::Pending));
}

#[test]
fn agent_kind_tags_round_trip() {
    for kind in [
        AgentKind::Supervisor,
        AgentKind::SearchWorker,
        AgentKind::RetrievalWorker,
        AgentKind::ChatWorker,
        AgentKind::GenericAgent,
        AgentKind::WorkflowStep,
    ] {
        let json = serde_json::to_string(&kind).unwrap();
        assert_eq!(json, format!("\"{}\"", kind.as_str()));
        assert_eq!(serde_json::from_str::<AgentKind>(&json).unwrap(), kind);
    }
    assert!(serde_json::from_str::<AgentKind>("\"planner\"").is_err());
}

#[test]
fn step_serializes_with_agent_tag_and_omits_missing_output() {
    let step = AgentStep::running("s1", AgentKind::RetrievalWorker, "retrieving");
    let value = serde_json::to_value(&step).unwrap();
    assert_eq!(value["agent"], "rag_agent");
    assert_eq!(value["status"], "running");
    assert!(value.get("output").is_none());
}

#[test]
fn welcome_transcript_starts_with_assistant_message() {
    let store = SessionStore::with_welcome();
    let messages = store.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].role, Role::Assistant);
    assert!(messages[0].steps.is_empty());
    assert!(!messages[0].is_thinking);
}

#[test]
fn upsert_step_merges_into_the_right_message() {
    let store = SessionStore::new();
    let pending = Message::pending_assistant();
    let id = pending.id.clone();
    store.append_message(Message::user("hi"));
    store.append_message(pending);

    let step = AgentStep::running("a", AgentKind::Supervisor, "routing");
    assert!(store.upsert_step(&id, step.clone()));
    assert!(store.upsert_step(&id, step.completed("routed to chat", None)));
    assert!(!store.upsert_step("missing", step));

    let msg = store.message(&id).unwrap();
    assert_eq!(msg.steps.len(), 1);
    assert_eq!(msg.steps.steps()[0].status, StepStatus::Completed);
    assert!(store.messages()[0].steps.is_empty(), "user message gets no steps");
}

#[test]
fn update_message_applies_only_set_fields() {
    let store = SessionStore::new();
    let pending = Message::pending_assistant();
    let id = pending.id.clone();
    store.append_message(pending);

    let updated = store
        .update_message(
            &id,
            MessagePatch {
                content: Some("partial".into()),
                is_thinking: None,
            },
        )
        .unwrap();
    assert_eq!(updated.content, "partial");
    assert!(updated.is_thinking);

    let finished = store.update_message(&id, MessagePatch::finish("done")).unwrap();
    assert_eq!(finished.content, "done");
    assert!(!finished.is_thinking);
    assert!(store.update_message("nope", MessagePatch::finish("x")).is_none());
}

#[test]
fn abandon_message_fails_open_steps_and_clears_thinking() {
    let store = SessionStore::new();
    let pending = Message::pending_assistant();
    let id = pending.id.clone();
    store.append_message(pending);

    let done = AgentStep::running("done", AgentKind::Supervisor, "routing");
    store.upsert_step(&id, done.completed("routed", None));
    store.upsert_step(&id, AgentStep::running("busy", AgentKind::ChatWorker, "replying"));
    store.upsert_step(&id, AgentStep::pending("later", AgentKind::WorkflowStep, "queued"));

    let settled = store.abandon_message(&id, "stopped", "interrupted").unwrap();
    assert_eq!(settled.content, "stopped");
    assert!(!settled.is_thinking);
    let statuses: Vec<_> = settled.steps.steps().iter().map(|s| s.status).collect();
    assert_eq!(
        statuses,
        [StepStatus::Completed, StepStatus::Failed, StepStatus::Failed]
    );
    assert_eq!(settled.steps.get("done").unwrap().description, "routed");
    assert_eq!(settled.steps.get("busy").unwrap().description, "interrupted");
    assert!(settled.steps.all_terminal());
    assert_eq!(store.message(&id).unwrap(), settled);
    assert!(store.abandon_message("nope", "x", "y").is_none());
}

#[test]
fn run_slot_is_exclusive_and_released_on_drop() {
    let store = SessionStore::new();
    let guard = store.try_begin_run().expect("first run claims the slot");
    assert!(store.is_thinking());
    assert!(store.try_begin_run().is_none(), "second run must be rejected");

    drop(guard);
    assert!(!store.is_thinking());
    assert!(store.try_begin_run().is_some());
}

#[test]
fn cancel_run_trips_the_active_token() {
    let store = SessionStore::new();
    assert!(!store.cancel_run(), "nothing to cancel");

    let guard = store.try_begin_run().unwrap();
    let token = guard.cancel_token();
    assert!(!token.is_cancelled());
    assert!(store.cancel_run());
    assert!(token.is_cancelled());
}

#[tokio::test]
async fn subscribers_observe_events_in_order() {
    let store = SessionStore::new();
    let mut rx = store.subscribe();

    let pending = Message::pending_assistant();
    let id = pending.id.clone();
    let guard = store.try_begin_run().unwrap();
    store.append_message(pending);
    store.upsert_step(&id, AgentStep::running("w", AgentKind::WorkflowStep, "step 1"));
    store.update_message(&id, MessagePatch::finish("ok"));
    drop(guard);

    assert!(matches!(rx.recv().await.unwrap(), SessionEvent::RunStarted { .. }));
    assert!(matches!(rx.recv().await.unwrap(), SessionEvent::MessageAppended(_)));
    match rx.recv().await.unwrap() {
        SessionEvent::StepUpserted { message_id, step } => {
            assert_eq!(message_id, id);
            assert_eq!(step.id, "w");
        }
        other => panic!("unexpected event {:?}", other),
    }
    assert!(matches!(rx.recv().await.unwrap(), SessionEvent::MessageUpdated(_)));
    assert!(matches!(rx.recv().await.unwrap(), SessionEvent::RunFinished { .. }));
}
