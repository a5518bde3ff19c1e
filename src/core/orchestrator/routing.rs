//! Intent classification: a pure function from input text to a routing decision.

use regex::Regex;

use crate::core::config::RoutingConfig;
use crate::core::session::AgentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Needs fresh, external information.
    Search,
    /// Needs the internal knowledge base.
    Knowledge,
    Chat,
}

impl Intent {
    pub fn worker(self) -> AgentKind {
        match self {
            Intent::Search => AgentKind::SearchWorker,
            Intent::Knowledge => AgentKind::RetrievalWorker,
            Intent::Chat => AgentKind::ChatWorker,
        }
    }

    pub fn routing_description(self) -> &'static str {
        match self {
            Intent::Search => "Needs real-time information, routing to Search Agent",
            Intent::Knowledge => "Involves internal knowledge, routing to RAG Agent",
            Intent::Chat => "Looks like general chat, routing to Chat Agent",
        }
    }
}

pub trait IntentClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Intent;
}

/// Marker-token heuristic. Search markers are checked before knowledge
/// markers; the first matching class wins wherever the token sits. ASCII
/// markers match whole words only, so "research" is not a search request;
/// other markers (CJK) match anywhere in the text.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    search_markers: Vec<Marker>,
    knowledge_markers: Vec<Marker>,
}

#[derive(Debug, Clone)]
enum Marker {
    Word(Regex),
    Fragment(String),
}

impl Marker {
    fn compile(raw: &str) -> Option<Self> {
        let marker = raw.trim().to_lowercase();
        if marker.is_empty() {
            return None;
        }
        if marker.is_ascii() {
            let pattern = format!(r"\b{}\b", regex::escape(&marker));
            if let Ok(re) = Regex::new(&pattern) {
                return Some(Marker::Word(re));
            }
        }
        Some(Marker::Fragment(marker))
    }

    fn matches(&self, text: &str) -> bool {
        match self {
            Marker::Word(re) => re.is_match(text),
            Marker::Fragment(fragment) => text.contains(fragment.as_str()),
        }
    }
}

impl KeywordClassifier {
    pub fn new(search_markers: &[String], knowledge_markers: &[String]) -> Self {
        Self {
            search_markers: compile(search_markers),
            knowledge_markers: compile(knowledge_markers),
        }
    }

    pub fn from_config(routing: &RoutingConfig) -> Self {
        Self::new(&routing.search_markers, &routing.knowledge_markers)
    }
}

impl Default for KeywordClassifier {
    fn default() -> Self {
        Self::from_config(&RoutingConfig::default())
    }
}

fn compile(markers: &[String]) -> Vec<Marker> {
    markers.iter().filter_map(|m| Marker::compile(m)).collect()
}

impl IntentClassifier for KeywordClassifier {
    fn classify(&self, text: &str) -> Intent {
        let text = text.to_lowercase();
        if self.search_markers.iter().any(|m| m.matches(&text)) {
            Intent::Search
        } else if self.knowledge_markers.iter().any(|m| m.matches(&text)) {
            Intent::Knowledge
        } else {
            Intent::Chat
        }
    }
}
