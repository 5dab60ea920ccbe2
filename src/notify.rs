//! Final delivery of a completed registration.

use async_trait::async_trait;

use crate::event::UserIdentity;
use crate::machine::RegistrationRecord;

/// Sends the finished record to the registrant and to the administrator.
/// The two sends are independent best-effort operations: one failing must
/// not suppress the other, and neither rolls back completion.
#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    async fn deliver(&self, record: &RegistrationRecord, user: UserIdentity, admin: UserIdentity);
}
