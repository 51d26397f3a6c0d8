//! AI chat and analysis on top of a text-completion service.

use crate::error::CompletionError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

pub mod gemini;
pub mod prompts;

pub use gemini::GeminiClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

/// External generative-AI collaborator.
///
/// The system instruction travels separately from the turn history.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(
        &self,
        system_instruction: &str,
        history: &[ChatMessage],
    ) -> Result<String, CompletionError>;
}

pub type DynCompletion = Arc<dyn CompletionService>;

/// Chat personas offered by the dashboard pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Persona {
    Cybersecurity,
    ItOperations,
    DataScience,
}

impl Persona {
    pub fn system_instruction(self) -> &'static str {
        match self {
            Persona::Cybersecurity => prompts::CYBERSECURITY_PERSONA,
            Persona::ItOperations => prompts::IT_OPERATIONS_PERSONA,
            Persona::DataScience => prompts::DATA_SCIENCE_PERSONA,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Persona::Cybersecurity => "cybersecurity",
            Persona::ItOperations => "it-operations",
            Persona::DataScience => "data-science",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cybersecurity" | "cyber" | "security" => Ok(Persona::Cybersecurity),
            "it-operations" | "it" | "itops" | "it-ops" => Ok(Persona::ItOperations),
            "data-science" | "data" | "datascience" => Ok(Persona::DataScience),
            other => Err(format!("unknown persona '{other}'")),
        }
    }
}

/// A chat thread with one persona.
///
/// The history only ever holds completed user/model exchanges.
#[derive(Debug, Clone)]
pub struct Conversation {
    persona: Persona,
    history: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new(persona: Persona) -> Self {
        Self {
            persona,
            history: Vec::new(),
        }
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Send `prompt` with the full history and record the reply.
    ///
    /// On failure the pending user turn is dropped again.
    #[tracing::instrument(skip_all, fields(persona = %self.persona))]
    pub async fn ask(
        &mut self,
        service: &dyn CompletionService,
        prompt: &str,
    ) -> Result<String, CompletionError> {
        self.history.push(ChatMessage::user(prompt));
        match service
            .complete(self.persona.system_instruction(), &self.history)
            .await
        {
            Ok(reply) => {
                self.history.push(ChatMessage::model(reply.clone()));
                Ok(reply)
            }
            Err(e) => {
                self.history.pop();
                tracing::warn!(error = %e, "Chat request failed");
                Err(e)
            }
        }
    }
}
