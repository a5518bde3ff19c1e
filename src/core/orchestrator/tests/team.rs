use super::{RecordingSink, instant_orchestrator, observer, reply, solution};
use crate::core::orchestrator::RunStatus;
use crate::core::session::{AgentKind, Role, SessionStore, StepStatus};

#[tokio::test]
async fn search_request_routes_through_supervisor_to_search_worker() {
    let session = SessionStore::new();
    let sink = RecordingSink::new();
    let outcome = instant_orchestrator()
        .submit(
            &session,
            &solution("default_multi"),
            "帮我搜索一下今天的新闻",
            observer(&sink),
        )
        .await
        .unwrap();

    assert_eq!(outcome.status, RunStatus::Completed);
    assert!(outcome.content.contains("search results"));

    let msg = reply(&session, &outcome.message_id);
    let kinds: Vec<(AgentKind, StepStatus)> = msg
        .steps
        .steps()
        .iter()
        .map(|s| (s.agent_kind, s.status))
        .collect();
    assert_eq!(
        kinds,
        vec![
            (AgentKind::Supervisor, StepStatus::Completed),
            (AgentKind::SearchWorker, StepStatus::Completed),
        ]
    );
    assert!(msg.steps.steps()[0].output.is_none(), "routing sets no output");
    assert!(
        msg.steps.steps()[1]
            .output
            .as_deref()
            .unwrap()
            .starts_with("Tool Call: duckduckgo_search")
    );
    assert_eq!(msg.content, outcome.content);
    assert!(!msg.is_thinking);
}

#[tokio::test]
async fn emissions_are_running_then_completed_supervisor_first() {
    let session = SessionStore::new();
    let sink = RecordingSink::new();
    instant_orchestrator()
        .submit(&session, &solution("default_multi"), "hello there", observer(&sink))
        .await
        .unwrap();

    let observed: Vec<(AgentKind, StepStatus)> = sink
        .steps()
        .iter()
        .map(|s| (s.agent_kind, s.status))
        .collect();
    assert_eq!(
        observed,
        vec![
            (AgentKind::Supervisor, StepStatus::Running),
            (AgentKind::Supervisor, StepStatus::Completed),
            (AgentKind::ChatWorker, StepStatus::Running),
            (AgentKind::ChatWorker, StepStatus::Completed),
        ]
    );
    assert_eq!(sink.distinct_ids().len(), 2);
}

#[tokio::test]
async fn knowledge_request_selects_retrieval_worker() {
    let session = SessionStore::new();
    let outcome = instant_orchestrator()
        .submit(
            &session,
            &solution("default_multi"),
            "What does the knowledge base say about onboarding?",
            None,
        )
        .await
        .unwrap();

    let msg = reply(&session, &outcome.message_id);
    assert_eq!(msg.steps.steps()[1].agent_kind, AgentKind::RetrievalWorker);
    assert!(outcome.content.contains("knowledge-base"));
}

#[tokio::test]
async fn routing_description_names_the_chosen_worker() {
    let session = SessionStore::new();
    let outcome = instant_orchestrator()
        .submit(&session, &solution("default_multi"), "hello there", None)
        .await
        .unwrap();
    let msg = reply(&session, &outcome.message_id);
    assert!(msg.steps.steps()[0].description.contains("Chat Agent"));
    assert!(msg.steps.steps()[1].description == "Done");
}

#[tokio::test]
async fn worker_running_label_uses_configured_agent_name() {
    let session = SessionStore::new();
    let sink = RecordingSink::new();
    instant_orchestrator()
        .submit(
            &session,
            &solution("default_multi"),
            "search rust releases",
            observer(&sink),
        )
        .await
        .unwrap();
    let running = &sink.steps()[2];
    assert_eq!(running.status, StepStatus::Running);
    assert_eq!(running.description, "Search Agent is working...");
}

#[tokio::test]
async fn transcript_gets_user_then_assistant_message() {
    let session = SessionStore::with_welcome();
    let outcome = instant_orchestrator()
        .submit(&session, &solution("default_multi"), "  hello there  ", None)
        .await
        .unwrap();

    let messages = session.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages[1].role, Role::User);
    assert_eq!(messages[1].content, "hello there");
    assert!(messages[1].steps.is_empty());
    assert_eq!(messages[2].id, outcome.message_id);
    assert!(messages[2].steps.all_terminal());
    assert!(!session.is_thinking());
}
