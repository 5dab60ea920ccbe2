//! Pre-dispatch identity checks. Runs for every inbound event kind before
//! the state machine is consulted.

use crate::event::UserIdentity;
use crate::store::CompletedSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// The configured administrator tried to register.
    RejectAdmin,
    /// This identity already holds a finalized registration.
    RejectDuplicate,
    Proceed,
}

pub async fn check(
    identity: UserIdentity,
    admin: UserIdentity,
    completed: &CompletedSet,
) -> GuardDecision {
    if identity == admin {
        GuardDecision::RejectAdmin
    } else if completed.contains(identity).await {
        GuardDecision::RejectDuplicate
    } else {
        GuardDecision::Proceed
    }
}
