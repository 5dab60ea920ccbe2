//! Telegram adapter: maps updates to core events, renders prompts as
//! keyboards, and implements the gate and notifier on top of the Bot API.
//! Nothing outside this module touches teloxide.

use std::sync::Arc;

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{
    ButtonRequest, CallbackQuery, ChatId, ChatMemberStatus, InlineKeyboardButton,
    InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup, KeyboardRemove, Message, ParseMode,
    Recipient, ReplyMarkup, Update, UserId,
};
use teloxide::utils::html;
use tracing::{info, warn};

use crate::config::Config;
use crate::engine::RegistrationEngine;
use crate::event::{InboundEvent, Keyboard, OutboundSink, Prompt, UserIdentity};
use crate::machine::{FlowSettings, RegistrationRecord};
use crate::membership::MembershipGate;
use crate::notify::CompletionNotifier;

pub struct TelegramPort {
    bot: Bot,
    channel: Recipient,
}

impl TelegramPort {
    pub fn new(bot: Bot, channel: String) -> Self {
        Self {
            bot,
            channel: Recipient::ChannelUsername(channel),
        }
    }
}

/// A user's private chat shares the user's numeric id.
fn chat_of(identity: UserIdentity) -> ChatId {
    ChatId(identity.0 as i64)
}

fn render_keyboard(keyboard: Keyboard) -> Option<ReplyMarkup> {
    match keyboard {
        Keyboard::None => None,
        Keyboard::Remove => Some(ReplyMarkup::KeyboardRemove(KeyboardRemove::new())),
        Keyboard::Options(rows) => {
            let rows = rows.into_iter().map(|row| {
                row.into_iter()
                    .map(KeyboardButton::new)
                    .collect::<Vec<_>>()
            });
            let markup = KeyboardMarkup::new(rows)
                .resize_keyboard(true)
                .one_time_keyboard(true);
            Some(ReplyMarkup::Keyboard(markup))
        }
        Keyboard::ContactRequest { label } => {
            let button = KeyboardButton::new(label).request(ButtonRequest::Contact);
            let markup = KeyboardMarkup::new([[button]])
                .resize_keyboard(true)
                .one_time_keyboard(true);
            Some(ReplyMarkup::Keyboard(markup))
        }
        Keyboard::Confirm { label, action_id } => {
            let markup =
                InlineKeyboardMarkup::new([[InlineKeyboardButton::callback(label, action_id)]]);
            Some(ReplyMarkup::InlineKeyboard(markup))
        }
    }
}

fn completion_summary(record: &RegistrationRecord) -> String {
    debug_assert!(record.is_complete(), "rendering an incomplete record");
    format!(
        "{}\n\n{} {}\n{} +{}\n{} {}\n{} {}",
        html::bold("Registration completed! 🎉"),
        html::bold("👤Name:"),
        html::escape(record.full_name.as_deref().unwrap_or("")),
        html::bold("📞Phone:"),
        html::escape(record.phone_number.as_deref().unwrap_or("")),
        html::bold("🎂Age:"),
        html::escape(record.age.as_deref().unwrap_or("")),
        html::bold("🏫Event:"),
        html::escape(record.event_choice.as_deref().unwrap_or("")),
    )
}

#[async_trait]
impl OutboundSink for TelegramPort {
    async fn send(&self, to: UserIdentity, prompt: Prompt) {
        let mut request = self.bot.send_message(chat_of(to), prompt.text);
        if let Some(markup) = render_keyboard(prompt.keyboard) {
            request = request.reply_markup(markup);
        }
        if let Err(err) = request.await {
            warn!(identity = %to, error = %err, "failed to send prompt");
        }
    }
}

#[async_trait]
impl MembershipGate for TelegramPort {
    // Fail-closed: any Bot API error reads as "not a member".
    async fn is_member(&self, identity: UserIdentity) -> bool {
        match self
            .bot
            .get_chat_member(self.channel.clone(), UserId(identity.0))
            .await
        {
            Ok(member) => matches!(
                member.kind.status(),
                ChatMemberStatus::Owner
                    | ChatMemberStatus::Administrator
                    | ChatMemberStatus::Member
            ),
            Err(err) => {
                warn!(identity = %identity, error = %err, "membership check failed");
                false
            }
        }
    }
}

#[async_trait]
impl CompletionNotifier for TelegramPort {
    async fn deliver(&self, record: &RegistrationRecord, user: UserIdentity, admin: UserIdentity) {
        let summary = completion_summary(record);

        // Two independent best-effort sends; neither suppresses the other.
        let to_user = self
            .bot
            .send_message(chat_of(user), summary.clone())
            .parse_mode(ParseMode::Html)
            .reply_markup(ReplyMarkup::KeyboardRemove(KeyboardRemove::new()))
            .await;
        if let Err(err) = to_user {
            warn!(identity = %user, error = %err, "failed to send confirmation to user");
        }

        let to_admin = self
            .bot
            .send_message(chat_of(admin), summary)
            .parse_mode(ParseMode::Html)
            .await;
        if let Err(err) = to_admin {
            warn!(identity = %admin, error = %err, "failed to forward registration to admin");
        }
    }
}

fn inbound_from_message(msg: &Message) -> Option<InboundEvent> {
    // Registration is a private-chat flow; group chatter never reaches it.
    if !msg.chat.is_private() {
        return None;
    }
    let user = msg.from()?;
    if user.is_bot {
        return None;
    }
    let identity = UserIdentity(user.id.0);
    if let Some(contact) = msg.contact() {
        return Some(InboundEvent::contact(identity, contact.phone_number.clone()));
    }
    msg.text().map(|text| InboundEvent::text(identity, text))
}

async fn on_message(msg: Message, engine: Arc<RegistrationEngine>) -> ResponseResult<()> {
    if let Some(event) = inbound_from_message(&msg) {
        engine.handle(event).await;
    }
    Ok(())
}

async fn on_callback(
    bot: Bot,
    query: CallbackQuery,
    engine: Arc<RegistrationEngine>,
) -> ResponseResult<()> {
    let identity = UserIdentity(query.from.id.0);
    // Answer first so the client stops its spinner even while we work.
    if let Err(err) = bot.answer_callback_query(query.id).await {
        warn!(identity = %identity, error = %err, "failed to answer callback query");
    }
    if let Some(action_id) = query.data {
        engine.handle(InboundEvent::action(identity, action_id)).await;
    }
    Ok(())
}

/// Build the engine around a [`TelegramPort`] and run long polling until
/// interrupted.
pub async fn run(config: Config) -> anyhow::Result<()> {
    let bot = Bot::new(&config.bot_token);
    let port = Arc::new(TelegramPort::new(bot.clone(), config.channel.clone()));
    let settings = FlowSettings {
        ask_language: config.ask_language,
        channel: config.channel,
    };
    let engine = Arc::new(RegistrationEngine::new(
        config.admin,
        settings,
        port.clone() as Arc<dyn MembershipGate>,
        port.clone() as Arc<dyn OutboundSink>,
        port as Arc<dyn CompletionNotifier>,
    ));

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(on_message))
        .branch(Update::filter_callback_query().endpoint(on_callback));

    info!("starting long polling");
    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![engine])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;
    Ok(())
}
