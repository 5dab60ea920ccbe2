//! The registration state machine: a pure transition function over
//! (state, record, input). No I/O happens here; the caller persists the
//! returned state/record and performs the instructed sends and checks.

use crate::event::{EventKind, Keyboard, Prompt};
use crate::prompts;

/// Where a conversation currently is. `Idle` means no stored entry; there is
/// no `Complete` variant because completion removes the entry and records the
/// identity in the completed set instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationState {
    #[default]
    Idle,
    Language,
    Name,
    Phone,
    Age,
    EventChoice,
    FollowerCheck,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    Uzbek,
    /// The implicit language when the selection step is disabled.
    #[default]
    English,
}

impl Language {
    /// Any text maps to a language; "uz" anywhere (case-insensitive) picks
    /// Uzbek, everything else falls through to English.
    pub fn from_choice(text: &str) -> Self {
        if text.to_lowercase().contains("uz") {
            Language::Uzbek
        } else {
            Language::English
        }
    }
}

/// Fields collected so far. Mutated exactly once per step passed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationRecord {
    pub language: Language,
    pub full_name: Option<String>,
    pub phone_number: Option<String>,
    pub age: Option<String>,
    pub event_choice: Option<String>,
}

impl RegistrationRecord {
    /// True once every collected field is set. Holds by construction for any
    /// record the machine has walked to the follower check.
    pub fn is_complete(&self) -> bool {
        self.full_name.is_some()
            && self.phone_number.is_some()
            && self.age.is_some()
            && self.event_choice.is_some()
    }
}

/// Flow-wide knobs the transitions depend on.
#[derive(Debug, Clone)]
pub struct FlowSettings {
    /// Whether the conversation opens with the language picker.
    pub ask_language: bool,
    /// Identifier of the gating channel, interpolated into prompts.
    pub channel: String,
}

/// Result of feeding one event into the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub next: RegistrationState,
    pub record: RegistrationRecord,
    pub reply: Option<Prompt>,
    /// The distinguished confirm action was pressed; the caller must query
    /// the membership gate and feed the answer to [`resolve_membership`].
    pub verify: bool,
}

impl Step {
    fn stay(state: RegistrationState, record: RegistrationRecord) -> Self {
        Self {
            next: state,
            record,
            reply: None,
            verify: false,
        }
    }

    fn reprompt(state: RegistrationState, record: RegistrationRecord, reply: Prompt) -> Self {
        Self {
            next: state,
            record,
            reply: Some(reply),
            verify: false,
        }
    }

    fn advance(next: RegistrationState, record: RegistrationRecord, reply: Prompt) -> Self {
        Self {
            next,
            record,
            reply: Some(reply),
            verify: false,
        }
    }
}

/// Outcome of a follower-check confirmation after the gate has answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MembershipResolution {
    /// Gate said yes: the record is final and must be delivered.
    Confirmed(RegistrationRecord),
    /// Gate said no (or failed): stay in place and offer the button again.
    Retry(Prompt),
}

fn membership_prompt(text: String) -> Prompt {
    Prompt::with_keyboard(
        text,
        Keyboard::Confirm {
            label: prompts::CONFIRM_LABEL.to_string(),
            action_id: prompts::CONFIRM_ACTION_ID.to_string(),
        },
    )
}

fn name_prompt(record: &RegistrationRecord) -> Prompt {
    Prompt::with_keyboard(prompts::ask_name(record.language), Keyboard::Remove)
}

/// `/start` alone or with trailing arguments, case-sensitive.
fn is_start_command(text: &str) -> bool {
    text == prompts::START_COMMAND
        || text
            .strip_prefix(prompts::START_COMMAND)
            .is_some_and(|rest| rest.starts_with(' '))
}

/// The transition table. Total over every (state, event kind) pair: inputs a
/// state does not accept leave the record untouched and either re-prompt or
/// stay silent, exactly as listed per state.
pub fn step(
    state: RegistrationState,
    record: &RegistrationRecord,
    kind: &EventKind,
    settings: &FlowSettings,
) -> Step {
    let mut record = record.clone();
    match (state, kind) {
        // Only the start command wakes an idle conversation; other texts,
        // stray contacts, and stale button presses do nothing.
        (RegistrationState::Idle, EventKind::Text(text)) if is_start_command(text) => {
            if settings.ask_language {
                let rows = vec![prompts::LANGUAGE_OPTIONS
                    .iter()
                    .map(|s| s.to_string())
                    .collect()];
                Step::advance(
                    RegistrationState::Language,
                    record,
                    Prompt::with_keyboard(prompts::choose_language(), Keyboard::Options(rows)),
                )
            } else {
                let reply = name_prompt(&record);
                Step::advance(RegistrationState::Name, record, reply)
            }
        }
        (RegistrationState::Idle, _) => Step::stay(state, record),

        // No invalid input exists here: every text maps to a language.
        (RegistrationState::Language, EventKind::Text(text)) => {
            record.language = Language::from_choice(text);
            let reply = name_prompt(&record);
            Step::advance(RegistrationState::Name, record, reply)
        }
        (RegistrationState::Language, _) => Step::stay(state, record),

        (RegistrationState::Name, EventKind::Text(text)) if !text.is_empty() => {
            record.full_name = Some(text.clone());
            let reply = Prompt::with_keyboard(
                prompts::ask_phone(record.language),
                Keyboard::ContactRequest {
                    label: prompts::SHARE_PHONE_LABEL.to_string(),
                },
            );
            Step::advance(RegistrationState::Phone, record, reply)
        }
        (RegistrationState::Name, _) => Step::stay(state, record),

        // Only a structured contact share carries the phone number; typed
        // digits are not accepted as a substitute.
        (RegistrationState::Phone, EventKind::Contact { phone_number }) => {
            record.phone_number = Some(phone_number.clone());
            let reply =
                Prompt::with_keyboard(prompts::ask_age(record.language), Keyboard::Remove);
            Step::advance(RegistrationState::Age, record, reply)
        }
        (RegistrationState::Phone, _) => Step::stay(state, record),

        (RegistrationState::Age, EventKind::Text(text)) => {
            // Syntactic check only: downstream consumers get an opaque
            // digit string, never a parsed integer.
            if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
                record.age = Some(text.clone());
                let rows = vec![prompts::EVENT_CHOICES
                    .iter()
                    .map(|s| s.to_string())
                    .collect()];
                let reply = Prompt::with_keyboard(
                    prompts::choose_event(record.language),
                    Keyboard::Options(rows),
                );
                Step::advance(RegistrationState::EventChoice, record, reply)
            } else {
                let reply = Prompt::plain(prompts::age_must_be_number(record.language));
                Step::reprompt(state, record, reply)
            }
        }
        (RegistrationState::Age, _) => Step::stay(state, record),

        (RegistrationState::EventChoice, EventKind::Text(text)) => {
            if prompts::EVENT_CHOICES.contains(&text.as_str()) {
                record.event_choice = Some(text.clone());
                let reply = membership_prompt(prompts::join_channel(
                    record.language,
                    &settings.channel,
                ));
                Step::advance(RegistrationState::FollowerCheck, record, reply)
            } else {
                let reply = Prompt::plain(prompts::invalid_event(record.language));
                Step::reprompt(state, record, reply)
            }
        }
        (RegistrationState::EventChoice, _) => Step::stay(state, record),

        (RegistrationState::FollowerCheck, EventKind::Action { action_id })
            if action_id == prompts::CONFIRM_ACTION_ID =>
        {
            Step {
                next: state,
                record,
                reply: None,
                verify: true,
            }
        }
        (RegistrationState::FollowerCheck, _) => Step::stay(state, record),
    }
}

/// Apply the gate's answer to a pending follower check. Repeating this with
/// `member = false` any number of times changes nothing.
pub fn resolve_membership(
    record: RegistrationRecord,
    member: bool,
    settings: &FlowSettings,
) -> MembershipResolution {
    if member {
        MembershipResolution::Confirmed(record)
    } else {
        MembershipResolution::Retry(membership_prompt(prompts::not_following(
            record.language,
            &settings.channel,
        )))
    }
}
