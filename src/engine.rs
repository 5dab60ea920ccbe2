//! Ties the guard, store, machine, gate, and notifier together: one call per
//! inbound event, with same-identity events serialized on the conversation
//! entry's lock and distinct identities running concurrently.

use std::sync::Arc;

use tracing::{debug, info};

use crate::event::{InboundEvent, OutboundSink, Prompt, UserIdentity};
use crate::guard::{self, GuardDecision};
use crate::machine::{self, FlowSettings, MembershipResolution, RegistrationState};
use crate::membership::MembershipGate;
use crate::notify::CompletionNotifier;
use crate::prompts;
use crate::store::{CompletedSet, Conversation, ConversationStore};

pub struct RegistrationEngine {
    store: ConversationStore,
    completed: CompletedSet,
    admin: UserIdentity,
    settings: FlowSettings,
    gate: Arc<dyn MembershipGate>,
    outbound: Arc<dyn OutboundSink>,
    notifier: Arc<dyn CompletionNotifier>,
}

impl RegistrationEngine {
    pub fn new(
        admin: UserIdentity,
        settings: FlowSettings,
        gate: Arc<dyn MembershipGate>,
        outbound: Arc<dyn OutboundSink>,
        notifier: Arc<dyn CompletionNotifier>,
    ) -> Self {
        Self {
            store: ConversationStore::new(),
            completed: CompletedSet::new(),
            admin,
            settings,
            gate,
            outbound,
            notifier,
        }
    }

    /// Handle one inbound event end to end.
    pub async fn handle(&self, event: InboundEvent) {
        let identity = event.identity;

        let entry = self.store.entry(identity).await;
        let mut convo = entry.lock().await;

        // Guard runs under the entry lock so an event queued behind a
        // completing one still sees the finalized registration.
        match guard::check(identity, self.admin, &self.completed).await {
            GuardDecision::RejectAdmin => {
                debug!(%identity, "admin attempted to register");
                self.outbound
                    .send(identity, Prompt::plain(prompts::ADMIN_NOTICE))
                    .await;
                drop(convo);
                drop(entry);
                self.store.discard_if_idle(identity).await;
                return;
            }
            GuardDecision::RejectDuplicate => {
                debug!(%identity, "duplicate registration attempt");
                self.outbound
                    .send(identity, Prompt::plain(prompts::ALREADY_REGISTERED_NOTICE))
                    .await;
                drop(convo);
                drop(entry);
                self.store.discard_if_idle(identity).await;
                return;
            }
            GuardDecision::Proceed => {}
        }

        let step = machine::step(convo.state, &convo.record, &event.kind, &self.settings);
        if step.next != convo.state {
            debug!(%identity, from = ?convo.state, to = ?step.next, "state advanced");
        }
        convo.state = step.next;
        convo.record = step.record;

        if step.verify {
            self.resolve_follower_check(identity, &mut convo).await;
        }

        if let Some(reply) = step.reply {
            self.outbound.send(identity, reply).await;
        }

        let idle = convo.state == RegistrationState::Idle;
        drop(convo);
        drop(entry);
        if idle {
            // A conversation that never started leaves no entry behind.
            self.store.discard_if_idle(identity).await;
        }
    }

    async fn resolve_follower_check(
        &self,
        identity: UserIdentity,
        convo: &mut Conversation,
    ) {
        // Exactly one gate query per confirmation press; the user may retry
        // indefinitely and each retry lands here again.
        let member = self.gate.is_member(identity).await;
        match machine::resolve_membership(convo.record.clone(), member, &self.settings) {
            MembershipResolution::Confirmed(record) => {
                debug_assert!(
                    record.is_complete(),
                    "confirmed a record with unset fields"
                );
                info!(%identity, "registration completed");
                self.notifier.deliver(&record, identity, self.admin).await;
                self.completed.insert(identity).await;
                convo.state = RegistrationState::Idle;
                convo.record = Default::default();
                self.store.clear(identity).await;
            }
            MembershipResolution::Retry(prompt) => {
                debug!(%identity, "membership not confirmed, staying in follower check");
                self.outbound.send(identity, prompt).await;
            }
        }
    }

    /// Test/diagnostic view of a conversation's current state.
    pub async fn current_state(&self, identity: UserIdentity) -> Option<RegistrationState> {
        self.store.current_state(identity).await
    }

    /// Whether this identity holds a finalized registration.
    pub async fn is_registered(&self, identity: UserIdentity) -> bool {
        self.completed.contains(identity).await
    }
}
