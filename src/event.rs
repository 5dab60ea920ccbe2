//! Platform-agnostic inbound/outbound types.
//! The core only ever sees these; the Telegram specifics live in `telegram`.

use std::fmt;

use async_trait::async_trait;

/// Opaque handle uniquely naming a conversation participant.
/// Sole key into the conversation store and the completed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UserIdentity(pub u64);

impl fmt::Display for UserIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single inbound platform event, already routed to one user.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub identity: UserIdentity,
    pub kind: EventKind,
}

impl InboundEvent {
    pub fn text(identity: UserIdentity, text: impl Into<String>) -> Self {
        Self {
            identity,
            kind: EventKind::Text(text.into()),
        }
    }

    pub fn contact(identity: UserIdentity, phone_number: impl Into<String>) -> Self {
        Self {
            identity,
            kind: EventKind::Contact {
                phone_number: phone_number.into(),
            },
        }
    }

    pub fn action(identity: UserIdentity, action_id: impl Into<String>) -> Self {
        Self {
            identity,
            kind: EventKind::Action {
                action_id: action_id.into(),
            },
        }
    }
}

/// Closed set of input shapes the machine dispatches on.
/// Button presses arrive as `Action`, never as sniffed text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Text(String),
    Contact { phone_number: String },
    Action { action_id: String },
}

/// One outbound message plus the keyboard to show with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub text: String,
    pub keyboard: Keyboard,
}

impl Prompt {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            keyboard: Keyboard::None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Self {
            text: text.into(),
            keyboard,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Keyboard {
    /// Leave whatever keyboard is currently shown.
    None,
    /// Remove the reply keyboard.
    Remove,
    /// Rows of tap-to-send labels.
    Options(Vec<Vec<String>>),
    /// Single button that shares the user's verified phone number.
    ContactRequest { label: String },
    /// Single inline button that fires `action_id` back at us.
    Confirm { label: String, action_id: String },
}

/// Delivers prompts to users. Implementations log failures and swallow them;
/// a lost prompt is recovered by the user acting again, never by the core.
#[async_trait]
pub trait OutboundSink: Send + Sync {
    async fn send(&self, to: UserIdentity, prompt: Prompt);
}
