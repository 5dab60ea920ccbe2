// Library entry so integration tests and external tools can reference
// internal modules. The binary (`main.rs`) uses the same modules.
pub mod config;
pub mod engine;
pub mod event;
pub mod guard;
pub mod machine;
pub mod membership;
pub mod notify;
pub mod prompts;
pub mod store;
pub mod telegram;

// Convenient re-exports for the types nearly every caller touches.
pub use engine::RegistrationEngine;
pub use event::{EventKind, InboundEvent, Keyboard, Prompt, UserIdentity};
pub use machine::{FlowSettings, Language, RegistrationRecord, RegistrationState};
