use crate::generation::{generate_or_fallback, Role, TextGenerator, Turn};
use chrono::{DateTime, Local};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Local>,
}

impl ChatMessage {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            timestamp: Local::now(),
        }
    }

    fn as_turn(&self) -> Turn {
        Turn {
            role: self.role,
            text: self.text.clone(),
        }
    }
}

/// A submission waiting for the generator. `history` holds the turns before
/// `prompt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub prompt: String,
    pub history: Vec<Turn>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    messages: Vec<ChatMessage>,
    busy: bool,
    last_response: Option<String>,
    overlay_visible: bool,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_response(&self) -> Option<&str> {
        self.last_response.as_deref()
    }

    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    pub fn dismiss_overlay(&mut self) {
        self.overlay_visible = false;
    }

    /// Record a user message and mark the session busy. Returns `None` while
    /// a request is already in flight or when `text` is blank.
    pub fn begin(&mut self, text: &str, show_overlay: bool) -> Option<PendingRequest> {
        let prompt = text.trim();
        if self.busy || prompt.is_empty() {
            return None;
        }

        let history = self.messages.iter().map(ChatMessage::as_turn).collect();
        self.messages.push(ChatMessage::new(Role::User, prompt));
        self.busy = true;
        if show_overlay {
            self.overlay_visible = true;
            self.last_response = None;
        }
        info!(chars = prompt.chars().count(), "chat request started");

        Some(PendingRequest {
            prompt: prompt.to_string(),
            history,
        })
    }

    /// Record the reply (or the fallback standing in for it). Always leaves
    /// the session idle.
    pub fn finish(&mut self, reply: impl Into<String>) {
        let reply = reply.into();
        self.messages.push(ChatMessage::new(Role::Model, reply.clone()));
        self.last_response = Some(reply);
        self.busy = false;
    }

    /// `begin`, one generation attempt, `finish`. Returns the displayed
    /// reply, or `None` if the submission was refused.
    pub async fn send(
        &mut self,
        generator: &dyn TextGenerator,
        text: &str,
        fallback: &str,
    ) -> Option<String> {
        let request = self.begin(text, true)?;
        let reply =
            generate_or_fallback(generator, &request.prompt, &request.history, fallback).await;
        self.finish(reply.clone());
        Some(reply)
    }
}
