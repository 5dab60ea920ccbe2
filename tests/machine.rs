use regflow::event::{EventKind, Keyboard};
use regflow::machine::{
    self, FlowSettings, Language, MembershipResolution, RegistrationRecord, RegistrationState,
};
use regflow::prompts;

fn settings() -> FlowSettings {
    FlowSettings {
        ask_language: true,
        channel: "@testchannel".to_string(),
    }
}

fn settings_without_language() -> FlowSettings {
    FlowSettings {
        ask_language: false,
        channel: "@testchannel".to_string(),
    }
}

fn text(s: &str) -> EventKind {
    EventKind::Text(s.to_string())
}

fn contact(phone: &str) -> EventKind {
    EventKind::Contact {
        phone_number: phone.to_string(),
    }
}

fn action(id: &str) -> EventKind {
    EventKind::Action {
        action_id: id.to_string(),
    }
}

#[test]
fn idle_text_opens_language_picker() {
    let step = machine::step(
        RegistrationState::Idle,
        &RegistrationRecord::default(),
        &text("/start"),
        &settings(),
    );
    assert_eq!(step.next, RegistrationState::Language);
    assert!(!step.verify);
    let reply = step.reply.expect("language prompt expected");
    match reply.keyboard {
        Keyboard::Options(rows) => assert_eq!(rows, vec![vec![
            "🇺🇿 Uzbek".to_string(),
            "🇬🇧 English".to_string(),
        ]]),
        other => panic!("expected language options, got {other:?}"),
    }
}

#[test]
fn idle_text_skips_language_when_disabled() {
    let step = machine::step(
        RegistrationState::Idle,
        &RegistrationRecord::default(),
        &text("/start"),
        &settings_without_language(),
    );
    assert_eq!(step.next, RegistrationState::Name);
    assert_eq!(step.record.language, Language::English);
}

#[test]
fn idle_starts_only_on_the_start_command() {
    for ignored in ["hello", "start", "/started", "/START", ""] {
        let step = machine::step(
            RegistrationState::Idle,
            &RegistrationRecord::default(),
            &text(ignored),
            &settings(),
        );
        assert_eq!(step.next, RegistrationState::Idle, "input {ignored:?}");
        assert!(step.reply.is_none(), "input {ignored:?}");
    }

    // A deep-link payload after the command still counts as a start.
    let step = machine::step(
        RegistrationState::Idle,
        &RegistrationRecord::default(),
        &text("/start ref123"),
        &settings(),
    );
    assert_eq!(step.next, RegistrationState::Language);
}

#[test]
fn idle_ignores_contacts_and_actions() {
    for kind in [contact("998900000000"), action(prompts::CONFIRM_ACTION_ID)] {
        let step = machine::step(
            RegistrationState::Idle,
            &RegistrationRecord::default(),
            &kind,
            &settings(),
        );
        assert_eq!(step.next, RegistrationState::Idle);
        assert!(step.reply.is_none());
        assert_eq!(step.record, RegistrationRecord::default());
    }
}

#[test]
fn every_text_maps_to_a_language() {
    assert_eq!(Language::from_choice("🇺🇿 Uzbek"), Language::Uzbek);
    assert_eq!(Language::from_choice("UZB"), Language::Uzbek);
    assert_eq!(Language::from_choice("🇬🇧 English"), Language::English);
    assert_eq!(Language::from_choice("anything else"), Language::English);
}

#[test]
fn language_choice_advances_to_name() {
    let step = machine::step(
        RegistrationState::Language,
        &RegistrationRecord::default(),
        &text("🇺🇿 Uzbek"),
        &settings(),
    );
    assert_eq!(step.next, RegistrationState::Name);
    assert_eq!(step.record.language, Language::Uzbek);
    let reply = step.reply.expect("name prompt expected");
    assert_eq!(reply.text, prompts::ask_name(Language::Uzbek));
    assert_eq!(reply.keyboard, Keyboard::Remove);
}

#[test]
fn name_sets_only_full_name() {
    let step = machine::step(
        RegistrationState::Name,
        &RegistrationRecord::default(),
        &text("Jane Doe"),
        &settings(),
    );
    assert_eq!(step.next, RegistrationState::Phone);
    assert_eq!(step.record.full_name.as_deref(), Some("Jane Doe"));
    assert_eq!(step.record.phone_number, None);
    assert_eq!(step.record.age, None);
    assert_eq!(step.record.event_choice, None);
    match step.reply.expect("phone prompt expected").keyboard {
        Keyboard::ContactRequest { .. } => {}
        other => panic!("expected contact request keyboard, got {other:?}"),
    }
}

#[test]
fn phone_accepts_contact_share_only() {
    let record = RegistrationRecord {
        full_name: Some("Jane Doe".to_string()),
        ..Default::default()
    };

    // Typed digits are not a verified phone number.
    let typed = machine::step(
        RegistrationState::Phone,
        &record,
        &text("998901112233"),
        &settings(),
    );
    assert_eq!(typed.next, RegistrationState::Phone);
    assert_eq!(typed.record, record);
    assert!(typed.reply.is_none());

    let shared = machine::step(
        RegistrationState::Phone,
        &record,
        &contact("998901112233"),
        &settings(),
    );
    assert_eq!(shared.next, RegistrationState::Age);
    assert_eq!(shared.record.phone_number.as_deref(), Some("998901112233"));
}

#[test]
fn age_rejects_anything_with_a_non_digit() {
    let record = RegistrationRecord::default();
    for bad in ["abc", "12a", "1 2", "-5", "3.5", "twenty", ""] {
        let step = machine::step(RegistrationState::Age, &record, &text(bad), &settings());
        assert_eq!(step.next, RegistrationState::Age, "input {bad:?}");
        assert_eq!(step.record.age, None, "input {bad:?}");
        let reply = step.reply.expect("re-prompt expected");
        assert_eq!(reply.text, prompts::age_must_be_number(Language::English));
    }
}

#[test]
fn age_is_kept_as_an_opaque_digit_string() {
    let step = machine::step(
        RegistrationState::Age,
        &RegistrationRecord::default(),
        &text("007"),
        &settings(),
    );
    assert_eq!(step.next, RegistrationState::EventChoice);
    assert_eq!(step.record.age.as_deref(), Some("007"));
}

#[test]
fn event_choice_is_exact_and_case_sensitive() {
    let record = RegistrationRecord::default();
    for bad in ["event b", "Event B ", " Event B", "Event D", "B"] {
        let step = machine::step(
            RegistrationState::EventChoice,
            &record,
            &text(bad),
            &settings(),
        );
        assert_eq!(step.next, RegistrationState::EventChoice, "input {bad:?}");
        assert_eq!(step.record.event_choice, None, "input {bad:?}");
        let reply = step.reply.expect("re-prompt expected");
        assert_eq!(reply.text, prompts::invalid_event(Language::English));
    }

    let step = machine::step(
        RegistrationState::EventChoice,
        &record,
        &text("Event B"),
        &settings(),
    );
    assert_eq!(step.next, RegistrationState::FollowerCheck);
    assert_eq!(step.record.event_choice.as_deref(), Some("Event B"));
    match step.reply.expect("join prompt expected").keyboard {
        Keyboard::Confirm { action_id, .. } => {
            assert_eq!(action_id, prompts::CONFIRM_ACTION_ID);
        }
        other => panic!("expected confirm keyboard, got {other:?}"),
    }
}

#[test]
fn follower_check_reacts_only_to_the_confirm_action() {
    let record = RegistrationRecord {
        full_name: Some("Jane Doe".to_string()),
        phone_number: Some("998901112233".to_string()),
        age: Some("29".to_string()),
        event_choice: Some("Event B".to_string()),
        ..Default::default()
    };

    for ignored in [text("done"), contact("998900000000"), action("something_else")] {
        let step = machine::step(
            RegistrationState::FollowerCheck,
            &record,
            &ignored,
            &settings(),
        );
        assert_eq!(step.next, RegistrationState::FollowerCheck);
        assert!(!step.verify);
        assert!(step.reply.is_none());
        assert_eq!(step.record, record);
    }

    let step = machine::step(
        RegistrationState::FollowerCheck,
        &record,
        &action(prompts::CONFIRM_ACTION_ID),
        &settings(),
    );
    assert!(step.verify);
    assert_eq!(step.next, RegistrationState::FollowerCheck);
    assert_eq!(step.record, record);
}

#[test]
fn record_completeness_tracks_the_collected_fields() {
    let mut record = RegistrationRecord::default();
    assert!(!record.is_complete());
    record.full_name = Some("Jane Doe".to_string());
    assert!(!record.is_complete());
    record.phone_number = Some("998901112233".to_string());
    assert!(!record.is_complete());
    record.age = Some("29".to_string());
    assert!(!record.is_complete());
    record.event_choice = Some("Event B".to_string());
    assert!(record.is_complete());
}

#[test]
fn membership_retry_is_idempotent() {
    let record = RegistrationRecord {
        full_name: Some("Jane Doe".to_string()),
        ..Default::default()
    };
    for _ in 0..5 {
        match machine::resolve_membership(record.clone(), false, &settings()) {
            MembershipResolution::Retry(prompt) => match prompt.keyboard {
                Keyboard::Confirm { action_id, .. } => {
                    assert_eq!(action_id, prompts::CONFIRM_ACTION_ID);
                }
                other => panic!("expected confirm keyboard, got {other:?}"),
            },
            MembershipResolution::Confirmed(_) => panic!("gate said no"),
        }
    }
}

#[test]
fn membership_confirmation_finalizes_the_record() {
    let record = RegistrationRecord {
        language: Language::Uzbek,
        full_name: Some("Jane Doe".to_string()),
        phone_number: Some("998901112233".to_string()),
        age: Some("29".to_string()),
        event_choice: Some("Event B".to_string()),
    };
    match machine::resolve_membership(record.clone(), true, &settings()) {
        MembershipResolution::Confirmed(finished) => assert_eq!(finished, record),
        MembershipResolution::Retry(_) => panic!("gate said yes"),
    }
}
