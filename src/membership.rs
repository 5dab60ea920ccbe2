//! The membership gate: "does this user currently belong to the gating
//! channel?". Deliberately fail-closed — the trait cannot surface an error,
//! so implementations map any transport failure to `false` and log it.

use async_trait::async_trait;

use crate::event::UserIdentity;

#[async_trait]
pub trait MembershipGate: Send + Sync {
    async fn is_member(&self, identity: UserIdentity) -> bool;
}
