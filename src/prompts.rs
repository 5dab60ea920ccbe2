//! Every user-facing string, keyed by the active language.
//! Kept in one place so the machine stays free of literal text.

use crate::machine::Language;

pub const START_COMMAND: &str = "/start";
pub const CONFIRM_ACTION_ID: &str = "check_follower";
pub const CONFIRM_LABEL: &str = "✅ I'm a follower";
pub const SHARE_PHONE_LABEL: &str = "📱 Share phone number";
pub const LANGUAGE_OPTIONS: [&str; 2] = ["🇺🇿 Uzbek", "🇬🇧 English"];

/// The closed set of offered events. Matching is exact and case-sensitive.
pub const EVENT_CHOICES: [&str; 3] = ["Event A", "Event B", "Event C"];

pub const ADMIN_NOTICE: &str = "Admin cannot register. Please contact support if needed.";
pub const ALREADY_REGISTERED_NOTICE: &str = "You are already registered! ✅";

pub fn choose_language() -> String {
    "Please choose your language:\nIltimos tilni tanlang:".to_string()
}

pub fn ask_name(language: Language) -> String {
    match language {
        Language::Uzbek => {
            "Xush kelibsiz! Siz bizning tadbirlarimizga ro'yxatdan o'tishingiz va kelgusi \
             imkoniyatlardan xabardor bo'lishingiz mumkin.\n\nIsm va familiyangizni kiriting"
                .to_string()
        }
        Language::English => {
            "Welcome! You can register for our events and stay informed about upcoming \
             opportunities.\n\nEnter your name and surname:"
                .to_string()
        }
    }
}

pub fn ask_phone(language: Language) -> String {
    match language {
        Language::Uzbek => "Iltimos telefon raqamingizni yuboring:".to_string(),
        Language::English => "Please share your phone number:".to_string(),
    }
}

pub fn ask_age(language: Language) -> String {
    match language {
        Language::Uzbek => "Iltimos yoshingizni kiriting:".to_string(),
        Language::English => "Please enter your age:".to_string(),
    }
}

pub fn age_must_be_number(language: Language) -> String {
    match language {
        Language::Uzbek => "Yosh raqam bo'lishi kerak. Iltimos qayta kiriting:".to_string(),
        Language::English => "Age must be a number. Please enter again:".to_string(),
    }
}

pub fn choose_event(language: Language) -> String {
    match language {
        Language::Uzbek => "Iltimos tadbirni tanlang:".to_string(),
        Language::English => "Please choose an event:".to_string(),
    }
}

pub fn invalid_event(language: Language) -> String {
    match language {
        Language::Uzbek => "Iltimos tugmalardan birini tanlang!".to_string(),
        Language::English => "Please choose a valid event from the buttons!".to_string(),
    }
}

pub fn join_channel(language: Language, channel: &str) -> String {
    match language {
        Language::Uzbek => format!(
            "Iltimos kanalimizga qo'shiling va quyidagi tugmani bosing: {channel}"
        ),
        Language::English => format!(
            "Please join our channel and click the button below: {channel}"
        ),
    }
}

pub fn not_following(language: Language, channel: &str) -> String {
    match language {
        Language::Uzbek => format!(
            "Siz hali kanalga qo'shilmagansiz. Iltimos qo'shiling va qayta urinib ko'ring: {channel}"
        ),
        Language::English => format!(
            "You are not following the channel yet. Please join and try again: {channel}"
        ),
    }
}
