use crate::core::config::RoutingConfig;
use crate::core::orchestrator::{Intent, IntentClassifier, KeywordClassifier};
use crate::core::session::AgentKind;

#[test]
fn search_markers_route_to_search() {
    let classifier = KeywordClassifier::default();
    assert_eq!(classifier.classify("帮我搜索一下今天的新闻"), Intent::Search);
    assert_eq!(classifier.classify("查一下天气"), Intent::Search);
    assert_eq!(classifier.classify("最新的模型是什么"), Intent::Search);
    assert_eq!(classifier.classify("What's the LATEST on Rust?"), Intent::Search);
}

#[test]
fn knowledge_markers_route_to_retrieval() {
    let classifier = KeywordClassifier::default();
    assert_eq!(classifier.classify("总结一下这份文档"), Intent::Knowledge);
    assert_eq!(
        classifier.classify("What does the knowledge base say about onboarding?"),
        Intent::Knowledge
    );
    assert_eq!(classifier.classify("use RAG please"), Intent::Knowledge);
}

#[test]
fn search_wins_over_knowledge_regardless_of_position() {
    let classifier = KeywordClassifier::default();
    assert_eq!(
        classifier.classify("in the document, search for pricing"),
        Intent::Search
    );
    assert_eq!(classifier.classify("知识库里搜索一下"), Intent::Search);
}

#[test]
fn no_marker_defaults_to_chat() {
    let classifier = KeywordClassifier::default();
    assert_eq!(classifier.classify("hello there"), Intent::Chat);
    assert_eq!(classifier.classify("你好"), Intent::Chat);
}

#[test]
fn ascii_markers_match_whole_words_only() {
    let classifier = KeywordClassifier::default();
    assert_eq!(classifier.classify("summarize these research papers"), Intent::Chat);
    assert_eq!(classifier.classify("buy a searchlight"), Intent::Chat);
    assert_eq!(classifier.classify("the storage is full"), Intent::Chat);
    assert_eq!(classifier.classify("documentary night"), Intent::Chat);
    assert_eq!(classifier.classify("search: rust 2024"), Intent::Search);
    assert_eq!(classifier.classify("is the RAG index stale?"), Intent::Knowledge);
}

#[test]
fn cjk_markers_match_inside_running_text() {
    let classifier = KeywordClassifier::default();
    assert_eq!(classifier.classify("帮我搜索一下今天的新闻"), Intent::Search);
    assert_eq!(classifier.classify("请看知识库中的说明"), Intent::Knowledge);
}

#[test]
fn custom_markers_replace_defaults() {
    let routing = RoutingConfig {
        search_markers: vec!["  Google ".into(), String::new()],
        knowledge_markers: vec!["wiki".into()],
    };
    let classifier = KeywordClassifier::from_config(&routing);
    assert_eq!(classifier.classify("google it"), Intent::Search);
    assert_eq!(classifier.classify("check the Wiki"), Intent::Knowledge);
    assert_eq!(classifier.classify("search for it"), Intent::Chat);
}

#[test]
fn intents_map_to_worker_kinds() {
    assert_eq!(Intent::Search.worker(), AgentKind::SearchWorker);
    assert_eq!(Intent::Knowledge.worker(), AgentKind::RetrievalWorker);
    assert_eq!(Intent::Chat.worker(), AgentKind::ChatWorker);
}
