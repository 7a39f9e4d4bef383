// Domain entities and the closed wire enums of the ajo contract.
//
// Tagged unions are decoded once, at the codec boundary, into these closed
// enums; downstream code matches exhaustively instead of re-inspecting raw
// object shapes.

use crate::errors::CodecError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Collateral policy of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockType {
    /// Locked collateral required, growing with payout position.
    Progressive,
    /// No collateral required.
    None,
}

/// Unit of the contribution cycle length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    Hours,
    Days,
    Weeks,
    Months,
}

/// Lifecycle of a group. Legal transitions are Created→Active→Completed,
/// plus Created/Active→Defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupState {
    Created,
    Active,
    Completed,
    Defaulted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupVisibility {
    Public,
    Private,
}

/// The twelve activity kinds the contract records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityKind {
    Contribution,
    Payout,
    GroupJoined,
    GroupCreated,
    GroupCompleted,
    GroupLeft,
    Lock,
    Unlock,
    Penalty,
    ReputationGain,
    ReputationLoss,
    Registration,
}

/// Reputation bands over the 0-100+ score range. Boundaries are half-open:
/// [0,25) New, [25,50) Beginner, [50,75) Intermediate, [75,90) Advanced,
/// [90,∞) Expert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReputationTier {
    New,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    UpToDate,
    Pending,
    Late,
}

macro_rules! wire_enum {
    ($ty:ident, $kind:literal, [$($variant:ident => $name:literal),+ $(,)?]) => {
        impl $ty {
            /// Map a tagged-union variant name from the wire to the closed enum.
            pub fn from_variant_name(name: &str) -> Result<Self, CodecError> {
                match name {
                    $($name => Ok($ty::$variant),)+
                    other => Err(CodecError::UnknownVariant {
                        kind: $kind,
                        variant: other.to_string(),
                    }),
                }
            }

            pub fn variant_name(&self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }
        }
    };
}

wire_enum!(LockType, "LockType", [Progressive => "Progressive", None => "None"]);
wire_enum!(TimeUnit, "TimeUnit", [Hours => "Hours", Days => "Days", Weeks => "Weeks", Months => "Months"]);
wire_enum!(GroupState, "GroupState", [Created => "Created", Active => "Active", Completed => "Completed", Defaulted => "Defaulted"]);
wire_enum!(GroupVisibility, "GroupVisibility", [Public => "Public", Private => "Private"]);
wire_enum!(ActivityKind, "ActivityKind", [
    Contribution => "Contribution",
    Payout => "Payout",
    GroupJoined => "GroupJoined",
    GroupCreated => "GroupCreated",
    GroupCompleted => "GroupCompleted",
    GroupLeft => "GroupLeft",
    Lock => "Lock",
    Unlock => "Unlock",
    Penalty => "Penalty",
    ReputationGain => "ReputationGain",
    ReputationLoss => "ReputationLoss",
    Registration => "Registration",
]);

impl GroupState {
    pub fn can_transition_to(&self, next: GroupState) -> bool {
        matches!(
            (self, next),
            (GroupState::Created, GroupState::Active)
                | (GroupState::Active, GroupState::Completed)
                | (GroupState::Created, GroupState::Defaulted)
                | (GroupState::Active, GroupState::Defaulted)
        )
    }
}

/// A savings group as normalized from the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupInfo {
    pub group_id: u64,
    pub name: String,
    pub description: String,
    /// Creator address, padded-hex canonical form.
    pub creator: String,
    pub member_limit: u32,
    pub member_count: u32,
    /// Per-cycle contribution in 6-decimal USDC units.
    pub contribution_amount: u128,
    pub lock_type: LockType,
    pub cycle_duration: u64,
    pub cycle_unit: TimeUnit,
    pub visibility: GroupVisibility,
    pub state: GroupState,
    pub current_cycle: u32,
    pub total_cycles: u32,
    pub min_reputation: u32,
    /// Total contributed into the pool over the group lifetime (USDC units).
    pub total_pool: u128,
    /// Collateral locked across members (USDC units).
    pub locked_funds: u128,
}

impl GroupInfo {
    pub fn requires_lock(&self) -> bool {
        self.lock_type == LockType::Progressive
    }

    /// Contract-side invariants re-checked on decode.
    pub fn check_invariants(&self) -> Result<(), CodecError> {
        if self.member_count > self.member_limit {
            return Err(CodecError::MalformedField {
                field: "member_count",
                reason: format!(
                    "{} members exceeds limit {}",
                    self.member_count, self.member_limit
                ),
            });
        }
        if self.current_cycle > self.total_cycles {
            return Err(CodecError::MalformedField {
                field: "current_cycle",
                reason: format!(
                    "cycle {} past total {}",
                    self.current_cycle, self.total_cycles
                ),
            });
        }
        Ok(())
    }
}

/// A member's record within one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMember {
    /// Member address, padded-hex canonical form.
    pub address: String,
    pub group_id: u64,
    pub locked_amount: u128,
    pub joined_at: u64,
    pub member_index: u32,
    /// Cycle in which this member receives the payout.
    pub payout_cycle: u32,
    pub has_been_paid: bool,
    pub contribution_count: u32,
    pub late_contributions: u32,
    pub missed_contributions: u32,
    pub total_contributed: u128,
    pub total_received: u128,
    pub is_active: bool,
}

impl GroupMember {
    pub fn check_invariants(&self) -> Result<(), CodecError> {
        if self.late_contributions > self.contribution_count {
            return Err(CodecError::MalformedField {
                field: "late_contributions",
                reason: format!(
                    "{} late out of {} total",
                    self.late_contributions, self.contribution_count
                ),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub address: String,
    pub display_name: String,
    pub avatar: String,
    pub is_registered: bool,
    pub total_lock_amount: u128,
    pub created_at: u64,
    pub reputation_score: u32,
    pub total_contributions: u128,
    pub total_earnings: u128,
    pub joined_groups: u32,
    pub created_groups: u32,
    pub completed_cycles: u32,
    pub on_time_payments: u32,
    pub total_payments: u32,
    /// on_time / total, 1.0 when no payments recorded yet.
    pub payment_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserActivity {
    pub id: u64,
    pub actor: String,
    pub kind: ActivityKind,
    pub description: String,
    /// Signed amount in USDC units; negative for outflows and penalties.
    pub amount: i128,
    pub group_id: Option<u64>,
    pub timestamp: u64,
}

/// Aggregate savings statistics for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStatistics {
    pub address: String,
    pub active_groups: u32,
    pub completed_groups: u32,
    pub total_saved: u128,
    pub total_received: u128,
    pub pending_payouts: u128,
}

/// Per (group, user) contribution deadline with accrued penalty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeadlineRecord {
    pub group_id: u64,
    pub user: String,
    pub deadline: u64,
    pub penalty_amount: u128,
    pub time_remaining: i64,
    pub is_overdue: bool,
}

/// An amount produced by estimation (a quote, a fallback table). Distinct
/// from `ConfirmedAmount` so call sites cannot treat it as ground truth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatedAmount(pub u128);

/// An amount read back from chain state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedAmount(pub u128);

impl fmt::Display for EstimatedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "~{}", self.0)
    }
}

impl fmt::Display for ConfirmedAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Where a swap quote came from. Fallback quotes are estimates only and are
/// never presented with the same confidence as an on-chain quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteSource {
    OnChain,
    StaticFallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapQuote {
    pub token_in: String,
    pub token_out: String,
    pub amount_in: u128,
    pub estimated_out: EstimatedAmount,
    pub price_impact_pct: f64,
    pub source: QuoteSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_enums_decode_every_variant() {
        for (name, v) in [("Progressive", LockType::Progressive), ("None", LockType::None)] {
            assert_eq!(LockType::from_variant_name(name).unwrap(), v);
        }
        for (name, v) in [
            ("Hours", TimeUnit::Hours),
            ("Days", TimeUnit::Days),
            ("Weeks", TimeUnit::Weeks),
            ("Months", TimeUnit::Months),
        ] {
            assert_eq!(TimeUnit::from_variant_name(name).unwrap(), v);
        }
        for (name, v) in [
            ("Created", GroupState::Created),
            ("Active", GroupState::Active),
            ("Completed", GroupState::Completed),
            ("Defaulted", GroupState::Defaulted),
        ] {
            assert_eq!(GroupState::from_variant_name(name).unwrap(), v);
        }
        for (name, v) in [
            ("Public", GroupVisibility::Public),
            ("Private", GroupVisibility::Private),
        ] {
            assert_eq!(GroupVisibility::from_variant_name(name).unwrap(), v);
        }
    }

    #[test]
    fn unknown_variant_is_an_error_not_a_default() {
        assert!(matches!(
            TimeUnit::from_variant_name("Fortnights"),
            Err(CodecError::UnknownVariant { kind: "TimeUnit", .. })
        ));
        assert!(matches!(
            GroupState::from_variant_name("Paused"),
            Err(CodecError::UnknownVariant { kind: "GroupState", .. })
        ));
    }

    #[test]
    fn state_transitions() {
        assert!(GroupState::Created.can_transition_to(GroupState::Active));
        assert!(GroupState::Active.can_transition_to(GroupState::Completed));
        assert!(GroupState::Created.can_transition_to(GroupState::Defaulted));
        assert!(GroupState::Active.can_transition_to(GroupState::Defaulted));
        assert!(!GroupState::Created.can_transition_to(GroupState::Completed));
        assert!(!GroupState::Completed.can_transition_to(GroupState::Active));
        assert!(!GroupState::Defaulted.can_transition_to(GroupState::Active));
    }
}
