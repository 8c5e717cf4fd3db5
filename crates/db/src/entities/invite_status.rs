//! Invitation lifecycle status, shared by event and group invitations.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status of an invitation.
///
/// `Pending` is the only non-terminal state; `Accepted` and `Denied` admit no
/// further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum InviteStatus {
    /// Invitation is awaiting a response from the invitee.
    #[sea_orm(string_value = "pending")]
    #[default]
    Pending,
    /// Invitation was accepted by the invitee.
    #[sea_orm(string_value = "accepted")]
    Accepted,
    /// Invitation was denied by the invitee.
    #[sea_orm(string_value = "denied")]
    Denied,
}

impl InviteStatus {
    /// Whether this status admits no further transitions.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Accepted | Self::Denied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_states() {
        assert!(!InviteStatus::Pending.is_terminal());
        assert!(InviteStatus::Accepted.is_terminal());
        assert!(InviteStatus::Denied.is_terminal());
    }
}
