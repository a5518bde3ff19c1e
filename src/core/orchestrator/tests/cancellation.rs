use super::{GatedBackend, RecordingSink, observer, orchestrator_with, reply, solution};
use crate::core::orchestrator::{CANCELLED_TEXT, RunStatus};
use crate::core::session::{Role, SessionStore, StepStatus};

#[tokio::test]
async fn cancel_marks_running_step_failed_and_skips_remaining_stages() {
    let gate = GatedBackend::new();
    let orchestrator = orchestrator_with(gate.clone());
    let session = SessionStore::new();
    let sink = RecordingSink::new();

    let run = {
        let orchestrator = orchestrator.clone();
        let session = session.clone();
        let sink = observer(&sink);
        tokio::spawn(async move {
            orchestrator
                .submit(&session, &solution("simple_workflow"), "essay", sink)
                .await
        })
    };
    gate.wait_entered().await;
    assert!(orchestrator.cancel(&session));

    let outcome = run.await.unwrap().unwrap();
    assert_eq!(outcome.status, RunStatus::Cancelled);
    assert_eq!(outcome.content, CANCELLED_TEXT);

    let msg = reply(&session, &outcome.message_id);
    assert_eq!(msg.steps.len(), 1, "later stages never start");
    let step = &msg.steps.steps()[0];
    assert_eq!(step.status, StepStatus::Failed);
    assert!(step.description.starts_with("Cancelled:"));
    assert!(!msg.is_thinking);
    assert!(!session.is_thinking());
    assert_eq!(sink.steps().len(), 2);
}

#[tokio::test]
async fn cancel_without_a_run_is_a_no_op() {
    let session = SessionStore::new();
    assert!(!super::instant_orchestrator().cancel(&session));
}

#[tokio::test]
async fn session_accepts_new_runs_after_cancellation() {
    let gate = GatedBackend::new();
    let orchestrator = orchestrator_with(gate.clone());
    let session = SessionStore::new();

    let run = {
        let orchestrator = orchestrator.clone();
        let session = session.clone();
        tokio::spawn(async move {
            orchestrator
                .submit(&session, &solution("default_multi"), "hello there", None)
                .await
        })
    };
    gate.wait_entered().await;
    session.cancel_run();
    run.await.unwrap().unwrap();

    gate.open();
    let outcome = orchestrator
        .submit(&session, &solution("default_multi"), "hello there", None)
        .await
        .unwrap();
    assert_eq!(outcome.status, RunStatus::Completed);
}

#[tokio::test]
async fn dropped_run_closes_its_reply_as_cancelled() {
    let gate = GatedBackend::new();
    let orchestrator = orchestrator_with(gate.clone());
    let session = SessionStore::new();
    let sink = RecordingSink::new();
    let scheme = solution("simple_workflow");

    let run = orchestrator.submit(&session, &scheme, "essay", observer(&sink));
    tokio::select! {
        _ = run => panic!("a gated run cannot finish"),
        _ = gate.wait_entered() => {}
    }

    assert!(!session.is_thinking());
    let messages = session.messages();
    assert_eq!(messages.len(), 2);
    let msg = &messages[1];
    assert_eq!(msg.role, Role::Assistant);
    assert!(!msg.is_thinking, "thinking indicator must be cleared");
    assert_eq!(msg.content, CANCELLED_TEXT);
    assert_eq!(msg.steps.len(), 1);
    let step = &msg.steps.steps()[0];
    assert_eq!(step.status, StepStatus::Failed);
    assert!(step.description.starts_with("Cancelled:"));

    gate.open();
    let outcome = orchestrator
        .submit(&session, &scheme, "essay", None)
        .await
        .unwrap();
    assert_eq!(outcome.status, RunStatus::Completed);
}
