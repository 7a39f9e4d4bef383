// Read-only view of contract state, returned pre-normalized.
//
// The contract has no on-chain index of groups, so discovery is a bounded
// sequential probe over group ids. Per-member reads are batched and tolerate
// partial failure: one bad index never sinks the whole roster.

use crate::address::addresses_equal;
use crate::contract::{AjoContract, ContractCaller};
use crate::normalize;
use crate::types::{
    DeadlineRecord, GroupInfo, GroupMember, GroupVisibility, PaymentStatus, ReputationTier,
    UserActivity, UserProfile,
};
use anyhow::Result;
use futures::future;

/// Roster fetch result: whatever decoded, plus the indices that failed.
#[derive(Debug, Default)]
pub struct MembersFetch {
    pub members: Vec<GroupMember>,
    pub failed_indices: Vec<u32>,
}

/// A group the user belongs to, with the derived fields the UI renders.
#[derive(Debug, Clone)]
pub struct JoinedGroup {
    pub group: GroupInfo,
    pub membership: GroupMember,
    pub frequency: String,
    pub status: &'static str,
    pub payment_status: PaymentStatus,
    pub tags: Vec<String>,
}

/// Profile plus the reputation fields derived client-side.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub profile: UserProfile,
    pub tier: ReputationTier,
    pub tier_progress: f64,
}

/// Fetch one group; the contract's zero-id sentinel maps to None.
pub async fn fetch_group<C: ContractCaller>(
    contract: &AjoContract<C>,
    group_id: u64,
) -> Result<Option<GroupInfo>> {
    contract.get_group_info(group_id).await
}

/// Probe group ids 1..=max_probe in order and keep the public ones.
///
/// The bound is explicit and not a correctness guarantee: groups above
/// max_probe are simply not discovered. Probing is sequential because ids
/// are dense from 1 and the node rate-limits bursts.
pub async fn discover_public_groups<C: ContractCaller>(
    contract: &AjoContract<C>,
    max_probe: u64,
) -> Result<Vec<GroupInfo>> {
    let mut found = Vec::new();
    for id in 1..=max_probe {
        match contract.get_group_info(id).await? {
            Some(group) if group.visibility == GroupVisibility::Public => found.push(group),
            Some(_) => log::debug!("group {id} is private, skipped"),
            None => log::debug!("group {id} does not exist, skipped"),
        }
    }
    log::info!(
        "discovered {} public groups in probe range 1..={}",
        found.len(),
        max_probe
    );
    Ok(found)
}

/// Fetch `member_count` indexed member records concurrently. Failed indices
/// are reported, not fatal.
pub async fn fetch_group_members<C: ContractCaller>(
    contract: &AjoContract<C>,
    group_id: u64,
    member_count: u32,
) -> MembersFetch {
    let futures: Vec<_> = (0..member_count)
        .map(|i| contract.get_group_member(group_id, i))
        .collect();
    let results = future::join_all(futures).await;

    let mut fetch = MembersFetch::default();
    for (index, result) in results.into_iter().enumerate() {
        match result {
            Ok(member) => fetch.members.push(member),
            Err(e) => {
                log::warn!("member {index} of group {group_id} failed to load: {e:#}");
                fetch.failed_indices.push(index as u32);
            }
        }
    }
    fetch
}

/// All groups the user belongs to, with derived fields attached.
pub async fn fetch_user_joined_groups<C: ContractCaller>(
    contract: &AjoContract<C>,
    address: &str,
) -> Result<Vec<JoinedGroup>> {
    let pairs = contract.get_user_joined_groups(address).await?;
    let mut joined = Vec::with_capacity(pairs.len());
    for (group_id, membership) in pairs {
        let group = match contract.get_group_info(group_id).await? {
            Some(g) => g,
            None => {
                // Membership pointing at the zero sentinel means the feed is
                // ahead of group state; skip rather than invent a group.
                log::warn!("joined group {group_id} resolves to the zero sentinel, skipped");
                continue;
            }
        };
        joined.push(JoinedGroup {
            frequency: normalize::frequency_label(group.cycle_unit, group.cycle_duration),
            status: normalize::group_status_label(group.state),
            payment_status: normalize::payment_status(&membership, &group),
            tags: normalize::group_tags(&group),
            group,
            membership,
        });
    }
    Ok(joined)
}

/// Membership test across every canonical address form.
pub fn is_member(members: &[GroupMember], address: &str) -> bool {
    members.iter().any(|m| addresses_equal(&m.address, address))
}

/// Assemble the per-(group, user) deadline record from its three reads.
pub async fn fetch_deadline_record<C: ContractCaller>(
    contract: &AjoContract<C>,
    group_id: u64,
    address: &str,
    now: u64,
) -> Result<DeadlineRecord> {
    let deadline = contract.get_contribution_deadline(group_id, address).await?;
    let penalty_amount = contract.get_missed_deadline_penalty(group_id, address).await?;
    let time_remaining = normalize::time_remaining(deadline, now);
    Ok(DeadlineRecord {
        group_id,
        user: crate::address::normalize_address(address)?.padded_hex,
        deadline,
        penalty_amount,
        time_remaining,
        is_overdue: normalize::is_overdue(time_remaining),
    })
}

pub async fn fetch_profile_view<C: ContractCaller>(
    contract: &AjoContract<C>,
    address: &str,
) -> Result<ProfileView> {
    let profile = contract.get_user_profile_view_data(address).await?;
    Ok(ProfileView {
        tier: normalize::reputation_tier(profile.reputation_score),
        tier_progress: normalize::tier_progress(profile.reputation_score),
        profile,
    })
}

/// Newest-first activity feed, in the contract's own ordering.
pub async fn fetch_user_activities<C: ContractCaller>(
    contract: &AjoContract<C>,
    address: &str,
    limit: u32,
) -> Result<Vec<UserActivity>> {
    contract.get_user_activities(address, limit).await
}
