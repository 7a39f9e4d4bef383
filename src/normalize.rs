// Derived domain state: human-readable cadence labels, statuses, reputation
// tiers, group tags, and deadline math. Pure functions over the closed enums
// in `types`; totality is enforced by exhaustive matches, so an unknown wire
// variant can only fail earlier, at the codec boundary.

use crate::types::{
    GroupInfo, GroupMember, GroupState, GroupVisibility, PaymentStatus, ReputationTier, TimeUnit,
};

/// Human cadence label for a (unit, duration) pair.
pub fn frequency_label(unit: TimeUnit, duration: u64) -> String {
    match (unit, duration) {
        (TimeUnit::Hours, 1) => "Hourly".to_string(),
        (TimeUnit::Hours, n) => format!("Every {} hours", n),
        (TimeUnit::Days, 1) => "Daily".to_string(),
        (TimeUnit::Days, n) => format!("Every {} days", n),
        (TimeUnit::Weeks, 1) => "Weekly".to_string(),
        (TimeUnit::Weeks, 2) => "Bi-weekly".to_string(),
        (TimeUnit::Weeks, n) => format!("Every {} weeks", n),
        (TimeUnit::Months, 1) => "Monthly".to_string(),
        (TimeUnit::Months, n) => format!("Every {} months", n),
    }
}

/// Lower-case status label of the lifecycle state.
pub fn group_status_label(state: GroupState) -> &'static str {
    match state {
        GroupState::Created => "created",
        GroupState::Active => "active",
        GroupState::Completed => "completed",
        GroupState::Defaulted => "defaulted",
    }
}

/// A member is late as soon as anything was missed; otherwise pending until
/// their contribution count catches up with the group's current cycle.
pub fn payment_status(member: &GroupMember, group: &GroupInfo) -> PaymentStatus {
    if member.missed_contributions > 0 {
        PaymentStatus::Late
    } else if member.contribution_count < group.current_cycle {
        PaymentStatus::Pending
    } else {
        PaymentStatus::UpToDate
    }
}

const TIER_BOUNDS: [(ReputationTier, u32); 5] = [
    (ReputationTier::New, 0),
    (ReputationTier::Beginner, 25),
    (ReputationTier::Intermediate, 50),
    (ReputationTier::Advanced, 75),
    (ReputationTier::Expert, 90),
];

pub fn reputation_tier(score: u32) -> ReputationTier {
    let mut tier = ReputationTier::New;
    for (t, min) in TIER_BOUNDS {
        if score >= min {
            tier = t;
        }
    }
    tier
}

/// Percent progress from the current tier floor to the next tier floor,
/// clamped to [0, 100]. Expert has no next tier and reports 100.
pub fn tier_progress(score: u32) -> f64 {
    let tier = reputation_tier(score);
    let idx = TIER_BOUNDS.iter().position(|(t, _)| *t == tier).expect("tier in table");
    if idx + 1 >= TIER_BOUNDS.len() {
        return 100.0;
    }
    let floor = TIER_BOUNDS[idx].1 as f64;
    let next = TIER_BOUNDS[idx + 1].1 as f64;
    (((score as f64 - floor) / (next - floor)) * 100.0).clamp(0.0, 100.0)
}

/// Discovery/filter tags for a group card.
pub fn group_tags(group: &GroupInfo) -> Vec<String> {
    let mut tags = Vec::new();
    if group.requires_lock() {
        tags.push("locked".to_string());
    }
    tags.push(
        match group.visibility {
            GroupVisibility::Public => "public",
            GroupVisibility::Private => "private",
        }
        .to_string(),
    );
    match (group.cycle_unit, group.cycle_duration) {
        (TimeUnit::Weeks, 1) => tags.push("weekly".to_string()),
        (TimeUnit::Weeks, 2) => tags.push("bi-weekly".to_string()),
        (TimeUnit::Months, 1) => tags.push("monthly".to_string()),
        _ => {}
    }
    let size = if group.member_limit <= 5 {
        "small-group"
    } else if group.member_limit <= 15 {
        "medium-group"
    } else {
        "large-group"
    };
    tags.push(size.to_string());
    tags
}

/// Seconds until a deadline; negative once passed.
pub fn time_remaining(deadline: u64, now: u64) -> i64 {
    deadline as i64 - now as i64
}

/// A deadline with zero seconds left counts as overdue.
pub fn is_overdue(remaining: i64) -> bool {
    remaining <= 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GroupVisibility, LockType};

    fn test_group() -> GroupInfo {
        GroupInfo {
            group_id: 1,
            name: "Test".to_string(),
            description: String::new(),
            creator: "0x1".to_string(),
            member_limit: 10,
            member_count: 4,
            contribution_amount: 50_000_000,
            lock_type: LockType::None,
            cycle_duration: 1,
            cycle_unit: TimeUnit::Weeks,
            visibility: GroupVisibility::Public,
            state: GroupState::Active,
            current_cycle: 3,
            total_cycles: 10,
            min_reputation: 0,
            total_pool: 0,
            locked_funds: 0,
        }
    }

    fn test_member() -> GroupMember {
        GroupMember {
            address: "0x2".to_string(),
            group_id: 1,
            locked_amount: 0,
            joined_at: 0,
            member_index: 0,
            payout_cycle: 4,
            has_been_paid: false,
            contribution_count: 3,
            late_contributions: 0,
            missed_contributions: 0,
            total_contributed: 150_000_000,
            total_received: 0,
            is_active: true,
        }
    }

    #[test]
    fn frequency_table() {
        assert_eq!(frequency_label(TimeUnit::Days, 1), "Daily");
        assert_eq!(frequency_label(TimeUnit::Weeks, 1), "Weekly");
        assert_eq!(frequency_label(TimeUnit::Weeks, 2), "Bi-weekly");
        assert_eq!(frequency_label(TimeUnit::Months, 1), "Monthly");
        assert_eq!(frequency_label(TimeUnit::Hours, 6), "Every 6 hours");
        assert_eq!(frequency_label(TimeUnit::Hours, 1), "Hourly");
        assert_eq!(frequency_label(TimeUnit::Days, 3), "Every 3 days");
        assert_eq!(frequency_label(TimeUnit::Weeks, 4), "Every 4 weeks");
        assert_eq!(frequency_label(TimeUnit::Months, 6), "Every 6 months");
    }

    #[test]
    fn status_labels() {
        assert_eq!(group_status_label(GroupState::Created), "created");
        assert_eq!(group_status_label(GroupState::Active), "active");
        assert_eq!(group_status_label(GroupState::Completed), "completed");
        assert_eq!(group_status_label(GroupState::Defaulted), "defaulted");
    }

    #[test]
    fn payment_status_ordering() {
        let group = test_group();
        let mut member = test_member();

        assert_eq!(payment_status(&member, &group), PaymentStatus::UpToDate);

        member.contribution_count = 2; // behind current_cycle 3
        assert_eq!(payment_status(&member, &group), PaymentStatus::Pending);

        // A missed contribution dominates the pending check.
        member.missed_contributions = 1;
        assert_eq!(payment_status(&member, &group), PaymentStatus::Late);
    }

    #[test]
    fn reputation_tier_boundaries() {
        assert_eq!(reputation_tier(0), ReputationTier::New);
        assert_eq!(reputation_tier(24), ReputationTier::New);
        assert_eq!(reputation_tier(25), ReputationTier::Beginner);
        assert_eq!(reputation_tier(49), ReputationTier::Beginner);
        assert_eq!(reputation_tier(50), ReputationTier::Intermediate);
        assert_eq!(reputation_tier(74), ReputationTier::Intermediate);
        assert_eq!(reputation_tier(75), ReputationTier::Advanced);
        assert_eq!(reputation_tier(89), ReputationTier::Advanced);
        assert_eq!(reputation_tier(90), ReputationTier::Expert);
        assert_eq!(reputation_tier(120), ReputationTier::Expert);
    }

    #[test]
    fn tier_progress_values() {
        assert_eq!(tier_progress(0), 0.0);
        assert_eq!(tier_progress(25), 0.0); // fresh Beginner
        assert_eq!(tier_progress(40), 60.0); // (40-25)/(50-25)
        assert_eq!(tier_progress(95), 100.0); // Expert has no next tier
        assert_eq!(tier_progress(90), 100.0);
    }

    #[test]
    fn tags_cover_lock_visibility_cadence_size() {
        let mut group = test_group();
        group.lock_type = LockType::Progressive;
        let tags = group_tags(&group);
        assert_eq!(tags, vec!["locked", "public", "weekly", "medium-group"]);

        group.lock_type = LockType::None;
        group.visibility = GroupVisibility::Private;
        group.cycle_duration = 2;
        group.member_limit = 5;
        assert_eq!(group_tags(&group), vec!["private", "bi-weekly", "small-group"]);

        group.cycle_unit = TimeUnit::Days;
        group.member_limit = 30;
        // Daily cadence has no tag.
        assert_eq!(group_tags(&group), vec!["private", "large-group"]);
    }

    #[test]
    fn deadline_boundary() {
        assert_eq!(time_remaining(100, 90), 10);
        assert!(!is_overdue(1));
        assert!(is_overdue(0));
        assert!(is_overdue(-1));
        assert_eq!(time_remaining(90, 100), -10);
    }
}
