// Typed bindings for the ajo contract ABI.
//
// Read results arrive as JSON with u256 values split into string-encoded
// (low, high) limbs and enums as single-key tagged maps; everything funnels
// through `codec` before any domain code sees it. Write entry points are
// exposed as pure calldata builders consumed by the transaction flows.

use crate::address::normalize_address;
use crate::codec::{self, U256};
use crate::errors::{CodecError, FlowError, RpcError};
use crate::rpc;
use crate::types::{
    ActivityKind, GroupInfo, GroupMember, GroupState, GroupVisibility, LockType, TimeUnit,
    UserActivity, UserProfile, UserStatistics,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fmt;

/// One invocation inside a wallet transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub to: String,
    pub entry_point: String,
    pub calldata: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TxHash(pub String);

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxStatus {
    Pending,
    Confirmed,
    Rejected(String),
}

/// Read seam to the chain. The production implementation speaks JSON-RPC;
/// tests swap in in-memory fakes.
#[async_trait]
pub trait ContractCaller: Send + Sync {
    async fn call(
        &self,
        to: &str,
        entry_point: &str,
        calldata: &[Value],
    ) -> Result<Value, RpcError>;
}

/// Wallet capability, injected by the embedding application. The connector
/// owns keys and signing; this crate only ever submits calls through it and
/// polls for inclusion.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Currently connected account address, if any.
    fn address(&self) -> Option<String>;

    async fn connect(&self) -> Result<String, FlowError>;
    async fn disconnect(&self);

    async fn send_transaction(&self, calls: &[Call]) -> Result<TxHash, FlowError>;
    async fn transaction_status(&self, hash: &TxHash) -> Result<TxStatus, FlowError>;
}

/// JSON-RPC backed reader.
pub struct RpcCaller {
    pub rpc_url: String,
    pub timeout_ms: u64,
}

impl RpcCaller {
    pub fn new(rpc_url: String, timeout_ms: u64) -> Self {
        Self { rpc_url, timeout_ms }
    }
}

#[async_trait]
impl ContractCaller for RpcCaller {
    async fn call(
        &self,
        to: &str,
        entry_point: &str,
        calldata: &[Value],
    ) -> Result<Value, RpcError> {
        let body = rpc::call_request(to, entry_point, calldata);
        rpc::rpc_post(&self.rpc_url, &body, self.timeout_ms).await
    }
}

// ---- wire helpers ----------------------------------------------------------

/// String-encoded (low, high) limb pair as it appears in read results.
#[derive(Debug, Clone, Deserialize)]
pub struct RawU256 {
    pub low: String,
    pub high: String,
}

impl RawU256 {
    pub fn decode(&self) -> Result<U256, CodecError> {
        let low = parse_felt(&self.low)?
            .to_u128()
            .map_err(|_| CodecError::MalformedLimbPair(format!("low limb {}", self.low)))?;
        let high = parse_felt(&self.high)?
            .to_u128()
            .map_err(|_| CodecError::MalformedLimbPair(format!("high limb {}", self.high)))?;
        Ok(codec::decode_u256(low, high))
    }

    pub fn decode_u128(&self, field: &'static str) -> Result<u128, CodecError> {
        self.decode()?.to_u128().map_err(|_| CodecError::MalformedField {
            field,
            reason: "value exceeds 128 bits".to_string(),
        })
    }
}

/// Parse a single field element, hex with 0x prefix or decimal.
pub fn parse_felt(s: &str) -> Result<U256, CodecError> {
    if s.starts_with("0x") || s.starts_with("0X") {
        U256::from_hex_str(s)
    } else {
        U256::from_dec_str(s)
    }
}

fn felt_u64(s: &str, field: &'static str) -> Result<u64, CodecError> {
    let v = parse_felt(s)?.to_u128().map_err(|_| CodecError::MalformedField {
        field,
        reason: "does not fit in u64".to_string(),
    })?;
    u64::try_from(v).map_err(|_| CodecError::MalformedField {
        field,
        reason: "does not fit in u64".to_string(),
    })
}

fn felt_u32(s: &str, field: &'static str) -> Result<u32, CodecError> {
    u32::try_from(felt_u64(s, field)?).map_err(|_| CodecError::MalformedField {
        field,
        reason: "does not fit in u32".to_string(),
    })
}

fn felt_bool(s: &str) -> Result<bool, CodecError> {
    Ok(!parse_felt(s)?.is_zero())
}

fn felt_text(s: &str, field: &'static str) -> Result<String, CodecError> {
    codec::decode_short_string(parse_felt(s)?).map_err(|_| CodecError::MalformedField {
        field,
        reason: "not a valid packed string".to_string(),
    })
}

fn canonical_address(s: &str) -> Result<String, CodecError> {
    Ok(normalize_address(s)?.padded_hex)
}

fn enum_name(v: &Value) -> Result<&str, CodecError> {
    codec::decode_enum_variant(v).map(|(name, _)| name)
}

/// U256 calldata argument in the wire's limb-pair form.
pub fn u256_arg(value: U256) -> Value {
    let (low, high) = codec::encode_u256(value);
    json!({ "low": low.to_string(), "high": high.to_string() })
}

fn felt_arg(v: impl ToString) -> Value {
    Value::String(v.to_string())
}

// ---- raw read structs ------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawGroupInfo {
    group_id: String,
    name: String,
    description: String,
    creator: String,
    member_limit: String,
    members: String,
    contribution_amount: RawU256,
    lock_type: Value,
    cycle_duration: String,
    cycle_unit: Value,
    visibility: Value,
    state: Value,
    current_cycle: String,
    total_cycles: String,
    min_reputation: String,
    total_pool: RawU256,
    locked_funds: RawU256,
}

#[derive(Debug, Deserialize)]
struct RawGroupMember {
    address: String,
    group_id: String,
    locked_amount: RawU256,
    joined_at: String,
    member_index: String,
    payout_cycle: String,
    has_been_paid: String,
    contribution_count: String,
    late_contributions: String,
    missed_contributions: String,
    total_contributed: RawU256,
    total_received: RawU256,
    is_active: String,
}

#[derive(Debug, Deserialize)]
struct RawUserProfile {
    address: String,
    name: String,
    avatar: String,
    is_registered: String,
    total_lock_amount: RawU256,
    created_at: String,
    reputation_score: String,
    total_contributions: RawU256,
    total_earnings: RawU256,
    joined_groups: String,
    created_groups: String,
    completed_cycles: String,
    on_time_payments: String,
    total_payments: String,
}

#[derive(Debug, Deserialize)]
struct RawActivity {
    id: String,
    user: String,
    activity_type: Value,
    description: String,
    amount: RawU256,
    is_outflow: String,
    group_id: String,
    timestamp: String,
}

#[derive(Debug, Deserialize)]
struct RawStatistics {
    address: String,
    active_groups: String,
    completed_groups: String,
    total_saved: RawU256,
    total_received: RawU256,
    pending_payouts: RawU256,
}

#[derive(Debug, Deserialize)]
struct RawJoinedGroups {
    group_ids: Vec<String>,
    members: Vec<RawGroupMember>,
}

fn group_from_raw(raw: RawGroupInfo) -> Result<GroupInfo, CodecError> {
    let group = GroupInfo {
        group_id: felt_u64(&raw.group_id, "group_id")?,
        name: felt_text(&raw.name, "name")?,
        description: felt_text(&raw.description, "description")?,
        creator: canonical_address(&raw.creator)?,
        member_limit: felt_u32(&raw.member_limit, "member_limit")?,
        member_count: felt_u32(&raw.members, "members")?,
        contribution_amount: raw.contribution_amount.decode_u128("contribution_amount")?,
        lock_type: LockType::from_variant_name(enum_name(&raw.lock_type)?)?,
        cycle_duration: felt_u64(&raw.cycle_duration, "cycle_duration")?,
        cycle_unit: TimeUnit::from_variant_name(enum_name(&raw.cycle_unit)?)?,
        visibility: GroupVisibility::from_variant_name(enum_name(&raw.visibility)?)?,
        state: GroupState::from_variant_name(enum_name(&raw.state)?)?,
        current_cycle: felt_u32(&raw.current_cycle, "current_cycle")?,
        total_cycles: felt_u32(&raw.total_cycles, "total_cycles")?,
        min_reputation: felt_u32(&raw.min_reputation, "min_reputation")?,
        total_pool: raw.total_pool.decode_u128("total_pool")?,
        locked_funds: raw.locked_funds.decode_u128("locked_funds")?,
    };
    group.check_invariants()?;
    Ok(group)
}

fn member_from_raw(raw: RawGroupMember) -> Result<GroupMember, CodecError> {
    let member = GroupMember {
        address: canonical_address(&raw.address)?,
        group_id: felt_u64(&raw.group_id, "group_id")?,
        locked_amount: raw.locked_amount.decode_u128("locked_amount")?,
        joined_at: felt_u64(&raw.joined_at, "joined_at")?,
        member_index: felt_u32(&raw.member_index, "member_index")?,
        payout_cycle: felt_u32(&raw.payout_cycle, "payout_cycle")?,
        has_been_paid: felt_bool(&raw.has_been_paid)?,
        contribution_count: felt_u32(&raw.contribution_count, "contribution_count")?,
        late_contributions: felt_u32(&raw.late_contributions, "late_contributions")?,
        missed_contributions: felt_u32(&raw.missed_contributions, "missed_contributions")?,
        total_contributed: raw.total_contributed.decode_u128("total_contributed")?,
        total_received: raw.total_received.decode_u128("total_received")?,
        is_active: felt_bool(&raw.is_active)?,
    };
    member.check_invariants()?;
    Ok(member)
}

fn profile_from_raw(raw: RawUserProfile) -> Result<UserProfile, CodecError> {
    let on_time = felt_u32(&raw.on_time_payments, "on_time_payments")?;
    let total = felt_u32(&raw.total_payments, "total_payments")?;
    let payment_rate = if total == 0 {
        1.0
    } else {
        on_time as f64 / total as f64
    };
    Ok(UserProfile {
        address: canonical_address(&raw.address)?,
        display_name: felt_text(&raw.name, "name")?,
        avatar: felt_text(&raw.avatar, "avatar")?,
        is_registered: felt_bool(&raw.is_registered)?,
        total_lock_amount: raw.total_lock_amount.decode_u128("total_lock_amount")?,
        created_at: felt_u64(&raw.created_at, "created_at")?,
        reputation_score: felt_u32(&raw.reputation_score, "reputation_score")?,
        total_contributions: raw.total_contributions.decode_u128("total_contributions")?,
        total_earnings: raw.total_earnings.decode_u128("total_earnings")?,
        joined_groups: felt_u32(&raw.joined_groups, "joined_groups")?,
        created_groups: felt_u32(&raw.created_groups, "created_groups")?,
        completed_cycles: felt_u32(&raw.completed_cycles, "completed_cycles")?,
        on_time_payments: on_time,
        total_payments: total,
        payment_rate,
    })
}

fn activity_from_raw(raw: RawActivity) -> Result<UserActivity, CodecError> {
    let magnitude = raw.amount.decode_u128("amount")?;
    let magnitude = i128::try_from(magnitude).map_err(|_| CodecError::MalformedField {
        field: "amount",
        reason: "magnitude exceeds i128".to_string(),
    })?;
    let amount = if felt_bool(&raw.is_outflow)? {
        -magnitude
    } else {
        magnitude
    };
    let group_id = felt_u64(&raw.group_id, "group_id")?;
    Ok(UserActivity {
        id: felt_u64(&raw.id, "id")?,
        actor: canonical_address(&raw.user)?,
        kind: ActivityKind::from_variant_name(enum_name(&raw.activity_type)?)?,
        description: felt_text(&raw.description, "description")?,
        amount,
        group_id: (group_id != 0).then_some(group_id),
        timestamp: felt_u64(&raw.timestamp, "timestamp")?,
    })
}

// ---- contract handle -------------------------------------------------------

/// Handle to one deployed ajo contract, generic over the read transport.
pub struct AjoContract<C: ContractCaller> {
    caller: C,
    pub address: String,
}

impl<C: ContractCaller> AjoContract<C> {
    pub fn new(caller: C, address: String) -> Self {
        Self { caller, address }
    }

    /// The underlying read transport, shared with the swap estimator and
    /// the ERC-20 reads.
    pub fn caller(&self) -> &C {
        &self.caller
    }

    async fn read(&self, entry_point: &str, calldata: Vec<Value>) -> Result<Value> {
        self.caller
            .call(&self.address, entry_point, &calldata)
            .await
            .with_context(|| format!("contract read {entry_point} failed"))
    }

    /// `get_group_info`. A zero group_id in the response is the contract's
    /// non-existence sentinel and maps to None, never to a zero-valued group.
    pub async fn get_group_info(&self, group_id: u64) -> Result<Option<GroupInfo>> {
        let v = self.read("get_group_info", vec![felt_arg(group_id)]).await?;
        let raw: RawGroupInfo = serde_json::from_value(v).context("malformed group info")?;
        if parse_felt(&raw.group_id)?.is_zero() {
            return Ok(None);
        }
        Ok(Some(group_from_raw(raw)?))
    }

    pub async fn get_group_member(&self, group_id: u64, index: u32) -> Result<GroupMember> {
        let v = self
            .read("get_group_member", vec![felt_arg(group_id), felt_arg(index)])
            .await?;
        let raw: RawGroupMember = serde_json::from_value(v).context("malformed group member")?;
        Ok(member_from_raw(raw)?)
    }

    pub async fn get_user_profile(&self, address: &str) -> Result<UserProfile> {
        let addr = normalize_address(address)?;
        let v = self
            .read("get_user_profile", vec![felt_arg(&addr.padded_hex)])
            .await?;
        let raw: RawUserProfile = serde_json::from_value(v).context("malformed user profile")?;
        Ok(profile_from_raw(raw)?)
    }

    /// Richer profile read used by the profile page; same record shape, the
    /// contract just resolves display fields server-side.
    pub async fn get_user_profile_view_data(&self, address: &str) -> Result<UserProfile> {
        let addr = normalize_address(address)?;
        let v = self
            .read("get_user_profile_view_data", vec![felt_arg(&addr.padded_hex)])
            .await?;
        let raw: RawUserProfile = serde_json::from_value(v).context("malformed profile view")?;
        Ok(profile_from_raw(raw)?)
    }

    /// One aggregate read of every (group_id, membership) pair for a user.
    pub async fn get_user_joined_groups(
        &self,
        address: &str,
    ) -> Result<Vec<(u64, GroupMember)>> {
        let addr = normalize_address(address)?;
        let v = self
            .read("get_user_joined_groups", vec![felt_arg(&addr.padded_hex)])
            .await?;
        let raw: RawJoinedGroups = serde_json::from_value(v).context("malformed joined groups")?;
        if raw.group_ids.len() != raw.members.len() {
            return Err(CodecError::MalformedField {
                field: "joined_groups",
                reason: format!(
                    "{} ids but {} member records",
                    raw.group_ids.len(),
                    raw.members.len()
                ),
            }
            .into());
        }
        raw.group_ids
            .iter()
            .zip(raw.members)
            .map(|(id, m)| Ok((felt_u64(id, "group_id")?, member_from_raw(m)?)))
            .collect()
    }

    /// Most-recent-first activity feed, as ordered by the contract.
    pub async fn get_user_activities(
        &self,
        address: &str,
        limit: u32,
    ) -> Result<Vec<UserActivity>> {
        let addr = normalize_address(address)?;
        let v = self
            .read(
                "get_user_activities",
                vec![felt_arg(&addr.padded_hex), felt_arg(limit)],
            )
            .await?;
        let raw: Vec<RawActivity> = serde_json::from_value(v).context("malformed activities")?;
        raw.into_iter()
            .map(|a| activity_from_raw(a).map_err(Into::into))
            .collect()
    }

    pub async fn get_user_statistics(&self, address: &str) -> Result<UserStatistics> {
        let addr = normalize_address(address)?;
        let v = self
            .read("get_user_statistics", vec![felt_arg(&addr.padded_hex)])
            .await?;
        let raw: RawStatistics = serde_json::from_value(v).context("malformed statistics")?;
        Ok(UserStatistics {
            address: canonical_address(&raw.address)?,
            active_groups: felt_u32(&raw.active_groups, "active_groups")?,
            completed_groups: felt_u32(&raw.completed_groups, "completed_groups")?,
            total_saved: raw.total_saved.decode_u128("total_saved")?,
            total_received: raw.total_received.decode_u128("total_received")?,
            pending_payouts: raw.pending_payouts.decode_u128("pending_payouts")?,
        })
    }

    pub async fn get_insurance_pool_balance(&self, group_id: u64) -> Result<u128> {
        let v = self
            .read("get_insurance_pool_balance", vec![felt_arg(group_id)])
            .await?;
        let raw: RawU256 = serde_json::from_value(v).context("malformed pool balance")?;
        Ok(raw.decode_u128("insurance_pool_balance")?)
    }

    pub async fn get_contribution_deadline(&self, group_id: u64, address: &str) -> Result<u64> {
        let addr = normalize_address(address)?;
        let v = self
            .read(
                "get_contribution_deadline",
                vec![felt_arg(group_id), felt_arg(&addr.padded_hex)],
            )
            .await?;
        let s = v.as_str().ok_or(RpcError::InvalidPayload)?;
        Ok(felt_u64(s, "contribution_deadline")?)
    }

    pub async fn get_missed_deadline_penalty(
        &self,
        group_id: u64,
        address: &str,
    ) -> Result<u128> {
        let addr = normalize_address(address)?;
        let v = self
            .read(
                "get_missed_deadline_penalty",
                vec![felt_arg(group_id), felt_arg(&addr.padded_hex)],
            )
            .await?;
        let raw: RawU256 = serde_json::from_value(v).context("malformed penalty")?;
        Ok(raw.decode_u128("missed_deadline_penalty")?)
    }

    /// Seconds until the user's deadline as computed on-chain; clamped at
    /// zero by the contract once passed, so overdue detection belongs to the
    /// client-side `DeadlineRecord` math.
    pub async fn get_time_until_deadline(&self, group_id: u64, address: &str) -> Result<u64> {
        let addr = normalize_address(address)?;
        let v = self
            .read(
                "get_time_until_deadline",
                vec![felt_arg(group_id), felt_arg(&addr.padded_hex)],
            )
            .await?;
        let s = v.as_str().ok_or(RpcError::InvalidPayload)?;
        Ok(felt_u64(s, "time_until_deadline")?)
    }

    pub async fn get_next_payout_recipient(&self, group_id: u64) -> Result<String> {
        let v = self
            .read("get_next_payout_recipient", vec![felt_arg(group_id)])
            .await?;
        let s = v.as_str().ok_or(RpcError::InvalidPayload)?;
        Ok(canonical_address(s)?)
    }

    pub async fn get_payout_order(&self, group_id: u64) -> Result<Vec<String>> {
        let v = self.read("get_payout_order", vec![felt_arg(group_id)]).await?;
        let arr: Vec<String> = serde_json::from_value(v).context("malformed payout order")?;
        arr.iter()
            .map(|s| canonical_address(s).map_err(Into::into))
            .collect()
    }

    pub async fn get_group_locked_funds(&self, group_id: u64) -> Result<u128> {
        let v = self
            .read("get_group_locked_funds", vec![felt_arg(group_id)])
            .await?;
        let raw: RawU256 = serde_json::from_value(v).context("malformed locked funds")?;
        Ok(raw.decode_u128("group_locked_funds")?)
    }
}

// ---- ERC-20 reads used by the flows -----------------------------------------

pub async fn erc20_balance_of<C: ContractCaller>(
    caller: &C,
    token: &str,
    owner: &str,
) -> Result<U256, FlowError> {
    let owner = normalize_address(owner).map_err(FlowError::Codec)?;
    let v = caller
        .call(token, "balance_of", &[felt_arg(&owner.padded_hex)])
        .await?;
    let raw: RawU256 =
        serde_json::from_value(v).map_err(|_| FlowError::Rpc(RpcError::InvalidPayload))?;
    raw.decode().map_err(FlowError::Codec)
}

pub async fn erc20_allowance<C: ContractCaller>(
    caller: &C,
    token: &str,
    owner: &str,
    spender: &str,
) -> Result<U256, FlowError> {
    let owner = normalize_address(owner).map_err(FlowError::Codec)?;
    let spender = normalize_address(spender).map_err(FlowError::Codec)?;
    let v = caller
        .call(
            token,
            "allowance",
            &[felt_arg(&owner.padded_hex), felt_arg(&spender.padded_hex)],
        )
        .await?;
    let raw: RawU256 =
        serde_json::from_value(v).map_err(|_| FlowError::Rpc(RpcError::InvalidPayload))?;
    raw.decode().map_err(FlowError::Codec)
}

// ---- write calldata builders -------------------------------------------------

pub fn approve_call(token: &str, spender: &str, amount: U256) -> Call {
    Call {
        to: token.to_string(),
        entry_point: "approve".to_string(),
        calldata: vec![felt_arg(spender), u256_arg(amount)],
    }
}

/// The one pinned swap layout. No alternative argument orderings are
/// attempted; a rejected swap surfaces as `FlowError::SwapExecution`.
pub fn swap_call(
    router: &str,
    token_in: &str,
    token_out: &str,
    amount_in: U256,
    min_out: U256,
    recipient: &str,
) -> Call {
    let (in_low, in_high) = codec::encode_u256(amount_in);
    let (out_low, out_high) = codec::encode_u256(min_out);
    Call {
        to: router.to_string(),
        entry_point: "swap_exact_tokens_for_tokens".to_string(),
        calldata: vec![
            felt_arg(token_in),
            felt_arg(token_out),
            felt_arg(in_low),
            felt_arg(in_high),
            felt_arg(out_low),
            felt_arg(out_high),
            felt_arg(recipient),
        ],
    }
}

pub fn register_user_call(contract: &str, name: &str, avatar: &str) -> Result<Call, CodecError> {
    Ok(Call {
        to: contract.to_string(),
        entry_point: "register_user".to_string(),
        calldata: vec![
            felt_arg(format!("0x{}", codec::encode_short_string(name)?.to_hex_string())),
            felt_arg(format!("0x{}", codec::encode_short_string(avatar)?.to_hex_string())),
        ],
    })
}

/// Parameters shared by public and private group creation.
#[derive(Debug, Clone)]
pub struct CreateGroupParams {
    pub name: String,
    pub description: String,
    pub member_limit: u32,
    pub contribution_amount: u128,
    pub lock_type: LockType,
    pub cycle_duration: u64,
    pub cycle_unit: TimeUnit,
    pub min_reputation: u32,
}

pub fn create_group_call(
    contract: &str,
    params: &CreateGroupParams,
    visibility: GroupVisibility,
) -> Result<Call, CodecError> {
    let entry_point = match visibility {
        GroupVisibility::Public => "create_public_group",
        GroupVisibility::Private => "create_private_group",
    };
    Ok(Call {
        to: contract.to_string(),
        entry_point: entry_point.to_string(),
        calldata: vec![
            felt_arg(format!(
                "0x{}",
                codec::encode_short_string(&params.name)?.to_hex_string()
            )),
            felt_arg(format!(
                "0x{}",
                codec::encode_short_string(&params.description)?.to_hex_string()
            )),
            felt_arg(params.member_limit),
            u256_arg(U256::from_u128(params.contribution_amount)),
            codec::encode_enum_variant(params.lock_type.variant_name(), json!({})),
            felt_arg(params.cycle_duration),
            codec::encode_enum_variant(params.cycle_unit.variant_name(), json!({})),
            felt_arg(params.min_reputation),
        ],
    })
}

pub fn join_group_call(contract: &str, group_id: u64) -> Call {
    simple_call(contract, "join_group", vec![felt_arg(group_id)])
}

pub fn contribute_call(contract: &str, group_id: u64, amount: U256) -> Call {
    simple_call(
        contract,
        "contribute",
        vec![felt_arg(group_id), u256_arg(amount)],
    )
}

pub fn lock_liquidity_call(contract: &str, group_id: u64, amount: U256) -> Call {
    simple_call(
        contract,
        "lock_liquidity",
        vec![felt_arg(group_id), u256_arg(amount)],
    )
}

pub fn withdraw_locked_call(contract: &str, group_id: u64) -> Call {
    simple_call(contract, "withdraw_locked", vec![felt_arg(group_id)])
}

pub fn activate_group_call(contract: &str, group_id: u64) -> Call {
    simple_call(contract, "activate_group", vec![felt_arg(group_id)])
}

pub fn distribute_payout_call(contract: &str, group_id: u64) -> Call {
    simple_call(contract, "distribute_payout", vec![felt_arg(group_id)])
}

pub fn claim_payout_call(contract: &str, group_id: u64) -> Call {
    simple_call(contract, "claim_payout", vec![felt_arg(group_id)])
}

pub fn track_penalty_call(contract: &str, group_id: u64, user: &str) -> Call {
    simple_call(
        contract,
        "track_missed_deadline_penalty",
        vec![felt_arg(group_id), felt_arg(user)],
    )
}

pub fn apply_penalty_call(contract: &str, group_id: u64, user: &str) -> Call {
    simple_call(
        contract,
        "check_and_apply_deadline_penalty",
        vec![felt_arg(group_id), felt_arg(user)],
    )
}

fn simple_call(contract: &str, entry_point: &str, calldata: Vec<Value>) -> Call {
    Call {
        to: contract.to_string(),
        entry_point: entry_point.to_string(),
        calldata,
    }
}
