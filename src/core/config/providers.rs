//! Model providers and the models each one offers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Ollama,
    Anthropic,
    DeepSeek,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelOption {
    pub id: &'static str,
    pub label: &'static str,
}

const fn model(id: &'static str, label: &'static str) -> ModelOption {
    ModelOption { id, label }
}

const OPENAI_MODELS: &[ModelOption] = &[
    model("gpt-4o", "GPT-4o"),
    model("gpt-4-turbo", "GPT-4 Turbo"),
    model("gpt-3.5-turbo", "GPT-3.5 Turbo"),
];

const ANTHROPIC_MODELS: &[ModelOption] = &[
    model("claude-3-5-sonnet", "Claude 3.5 Sonnet"),
    model("claude-3-opus", "Claude 3 Opus"),
];

const DEEPSEEK_MODELS: &[ModelOption] = &[
    model("deepseek-chat", "DeepSeek V2 Chat"),
    model("deepseek-coder", "DeepSeek Coder"),
];

const OLLAMA_MODELS: &[ModelOption] = &[
    model("llama3:8b", "Llama 3 8B"),
    model("llama3:70b", "Llama 3 70B"),
    model("mistral", "Mistral 7B"),
    model("qwen2.5", "Qwen 2.5"),
];

impl Provider {
    pub const ALL: [Provider; 4] = [
        Provider::OpenAi,
        Provider::Ollama,
        Provider::Anthropic,
        Provider::DeepSeek,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Ollama => "ollama",
            Provider::Anthropic => "anthropic",
            Provider::DeepSeek => "deepseek",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(value))
    }

    pub fn models(self) -> &'static [ModelOption] {
        match self {
            Provider::OpenAi => OPENAI_MODELS,
            Provider::Ollama => OLLAMA_MODELS,
            Provider::Anthropic => ANTHROPIC_MODELS,
            Provider::DeepSeek => DEEPSEEK_MODELS,
        }
    }

    /// Local providers need no API key.
    pub fn requires_api_key(self) -> bool {
        !matches!(self, Provider::Ollama)
    }
}
