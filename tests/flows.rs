// End-to-end exercises of discovery, member batching, and the write flow
// state machine against in-memory fakes of the chain and the wallet.

use ajo::codec;
use ajo::contract::{AjoContract, Call, ContractCaller, TxHash, TxStatus, WalletConnector};
use ajo::errors::{FlowError, RpcError};
use ajo::flow::{FlowAction, FlowConfig, FlowState, TransactionFlow};
use ajo::query;
use ajo::swap::{SwapEstimator, TokenRegistry};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use tokio::time::Duration;

const CONTRACT: &str = "0xc0de";
const USDC: &str = "0xaaa1";
const ETH: &str = "0xbbb2";
const STRK: &str = "0xccc3";
const ROUTER: &str = "0xfeed";
const OWNER: &str = "0xabc";

fn short(text: &str) -> String {
    format!("0x{}", codec::encode_short_string(text).unwrap().to_hex_string())
}

fn u256(v: u128) -> Value {
    json!({ "low": v.to_string(), "high": "0" })
}

fn variant(name: &str) -> Value {
    json!({ name: {} })
}

fn group_json(id: u64, visibility: &str) -> Value {
    json!({
        "group_id": id.to_string(),
        "name": short(&format!("Circle {id}")),
        "description": short("weekly savings"),
        "creator": "0x1a2b",
        "member_limit": "10",
        "members": "4",
        "contribution_amount": u256(50_000_000),
        "lock_type": variant("Progressive"),
        "cycle_duration": "1",
        "cycle_unit": variant("Weeks"),
        "visibility": variant(visibility),
        "state": variant("Active"),
        "current_cycle": "2",
        "total_cycles": "10",
        "min_reputation": "0",
        "total_pool": u256(400_000_000),
        "locked_funds": u256(200_000_000),
    })
}

fn sentinel_group_json() -> Value {
    json!({
        "group_id": "0",
        "name": "0x0",
        "description": "0x0",
        "creator": "0x0",
        "member_limit": "0",
        "members": "0",
        "contribution_amount": u256(0),
        "lock_type": variant("None"),
        "cycle_duration": "0",
        "cycle_unit": variant("Hours"),
        "visibility": variant("Public"),
        "state": variant("Created"),
        "current_cycle": "0",
        "total_cycles": "0",
        "min_reputation": "0",
        "total_pool": u256(0),
        "locked_funds": u256(0),
    })
}

fn member_json(group_id: u64, index: u32) -> Value {
    json!({
        "address": format!("0x{:x}", 0x1000 + index as u64),
        "group_id": group_id.to_string(),
        "locked_amount": u256(0),
        "joined_at": "1700000000",
        "member_index": index.to_string(),
        "payout_cycle": (index + 1).to_string(),
        "has_been_paid": "0",
        "contribution_count": "2",
        "late_contributions": "0",
        "missed_contributions": "0",
        "total_contributed": u256(100_000_000),
        "total_received": u256(0),
        "is_active": "1",
    })
}

/// Fake chain: canned group table, ERC-20 balances/allowances, and an
/// optional quoter answer. Unknown reads fail like a dead node.
struct FakeChain {
    groups: HashMap<u64, Value>,
    balance: u128,
    allowance: u128,
    quote_out: Option<u128>,
    broken_member_indices: Vec<u32>,
}

impl FakeChain {
    fn new() -> Self {
        Self {
            groups: HashMap::new(),
            balance: u128::MAX,
            allowance: 0,
            quote_out: None,
            broken_member_indices: Vec::new(),
        }
    }
}

#[async_trait]
impl ContractCaller for FakeChain {
    async fn call(&self, _to: &str, entry_point: &str, calldata: &[Value]) -> Result<Value, RpcError> {
        match entry_point {
            "get_group_info" => {
                let id: u64 = calldata[0].as_str().unwrap().parse().unwrap();
                Ok(self
                    .groups
                    .get(&id)
                    .cloned()
                    .unwrap_or_else(sentinel_group_json))
            }
            "get_group_member" => {
                let group_id: u64 = calldata[0].as_str().unwrap().parse().unwrap();
                let index: u32 = calldata[1].as_str().unwrap().parse().unwrap();
                if self.broken_member_indices.contains(&index) {
                    return Err(RpcError::Http { status: 500 });
                }
                Ok(member_json(group_id, index))
            }
            "balance_of" => Ok(u256(self.balance)),
            "allowance" => Ok(u256(self.allowance)),
            "quote_exact_in" => match self.quote_out {
                Some(out) => Ok(json!({
                    "amount_out": u256(out),
                    "price_impact_bps": "20",
                })),
                None => Err(RpcError::Http { status: 503 }),
            },
            other => Err(RpcError::Contract {
                code: -32601,
                message: format!("no such entry point {other}"),
            }),
        }
    }
}

/// Fake wallet: hands out sequential hashes and reports each one Pending
/// for a per-wallet number of polls before confirming (or rejecting).
struct FakeWallet {
    pending_polls: u32,
    reject_with: Option<String>,
    next_hash: AtomicU32,
    polls_seen: Mutex<HashMap<String, u32>>,
}

impl FakeWallet {
    fn confirming_after(pending_polls: u32) -> Self {
        Self {
            pending_polls,
            reject_with: None,
            next_hash: AtomicU32::new(1),
            polls_seen: Mutex::new(HashMap::new()),
        }
    }

    fn never_confirming() -> Self {
        Self::confirming_after(u32::MAX)
    }

    fn rejecting(reason: &str) -> Self {
        Self {
            reject_with: Some(reason.to_string()),
            ..Self::confirming_after(0)
        }
    }
}

#[async_trait]
impl WalletConnector for FakeWallet {
    fn address(&self) -> Option<String> {
        Some(OWNER.to_string())
    }

    async fn connect(&self) -> Result<String, FlowError> {
        Ok(OWNER.to_string())
    }

    async fn disconnect(&self) {}

    async fn send_transaction(&self, calls: &[Call]) -> Result<TxHash, FlowError> {
        assert!(!calls.is_empty());
        let n = self.next_hash.fetch_add(1, Ordering::SeqCst);
        Ok(TxHash(format!("0xdeadbeef{n:02}")))
    }

    async fn transaction_status(&self, hash: &TxHash) -> Result<TxStatus, FlowError> {
        if let Some(reason) = &self.reject_with {
            return Ok(TxStatus::Rejected(reason.clone()));
        }
        let mut seen = self.polls_seen.lock().unwrap();
        let count = seen.entry(hash.0.clone()).or_insert(0);
        *count += 1;
        if *count > self.pending_polls {
            Ok(TxStatus::Confirmed)
        } else {
            Ok(TxStatus::Pending)
        }
    }
}

fn fast_config() -> FlowConfig {
    FlowConfig {
        poll_interval: Duration::from_millis(1),
        max_poll_attempts: 5,
    }
}

fn registry() -> TokenRegistry {
    TokenRegistry::new(USDC, ETH, STRK)
}

// ---- discovery and reads ----------------------------------------------------

#[tokio::test]
async fn discovery_skips_sentinels_and_private_groups() {
    let mut chain = FakeChain::new();
    chain.groups.insert(1, group_json(1, "Public"));
    // id 2 is the zero sentinel (absent from the table)
    chain.groups.insert(3, group_json(3, "Public"));
    chain.groups.insert(4, group_json(4, "Private"));

    let contract = AjoContract::new(chain, CONTRACT.to_string());
    let groups = query::discover_public_groups(&contract, 5).await.unwrap();

    let ids: Vec<u64> = groups.iter().map(|g| g.group_id).collect();
    assert_eq!(ids, vec![1, 3]);
}

#[tokio::test]
async fn sentinel_group_reads_as_none() {
    let contract = AjoContract::new(FakeChain::new(), CONTRACT.to_string());
    assert!(query::fetch_group(&contract, 7).await.unwrap().is_none());
}

#[tokio::test]
async fn member_batch_tolerates_partial_failure() {
    let mut chain = FakeChain::new();
    chain.groups.insert(1, group_json(1, "Public"));
    chain.broken_member_indices = vec![1, 3];

    let contract = AjoContract::new(chain, CONTRACT.to_string());
    let fetch = query::fetch_group_members(&contract, 1, 4).await;

    assert_eq!(fetch.members.len(), 2);
    assert_eq!(fetch.failed_indices, vec![1, 3]);
    let indices: Vec<u32> = fetch.members.iter().map(|m| m.member_index).collect();
    assert_eq!(indices, vec![0, 2]);
}

// ---- write flows --------------------------------------------------------------

#[tokio::test]
async fn contribute_in_settlement_token_skips_approval_when_covered() {
    let mut chain = FakeChain::new();
    chain.allowance = 500;
    let contract = AjoContract::new(chain, CONTRACT.to_string());
    let wallet = FakeWallet::confirming_after(0);
    let estimator = SwapEstimator::new(contract.caller(), ROUTER.to_string(), registry());

    let (mut flow, _rx) = TransactionFlow::new(
        &contract,
        &wallet,
        &estimator,
        USDC.to_string(),
        ROUTER.to_string(),
        fast_config(),
    );

    let hashes = flow
        .run(FlowAction::Contribute {
            group_id: 1,
            token_in: USDC.to_string(),
            amount_in: 300,
        })
        .await
        .unwrap();

    assert_eq!(hashes.len(), 1);
    assert_eq!(flow.state(), FlowState::Succeeded);
    assert!(!flow.history().contains(&FlowState::Approving));
    assert!(!flow.history().contains(&FlowState::Swapping));
    assert_eq!(
        flow.history(),
        &[
            FlowState::Idle,
            FlowState::Executing,
            FlowState::AwaitingExecutionConfirmation,
            FlowState::Succeeded,
        ]
    );
}

#[tokio::test]
async fn short_allowance_inserts_approval_leg() {
    let mut chain = FakeChain::new();
    chain.allowance = 100;
    let contract = AjoContract::new(chain, CONTRACT.to_string());
    let wallet = FakeWallet::confirming_after(1);
    let estimator = SwapEstimator::new(contract.caller(), ROUTER.to_string(), registry());

    let (mut flow, _rx) = TransactionFlow::new(
        &contract,
        &wallet,
        &estimator,
        USDC.to_string(),
        ROUTER.to_string(),
        fast_config(),
    );

    let hashes = flow
        .run(FlowAction::Contribute {
            group_id: 1,
            token_in: USDC.to_string(),
            amount_in: 300,
        })
        .await
        .unwrap();

    // approve then contribute
    assert_eq!(hashes.len(), 2);
    assert_eq!(
        flow.history(),
        &[
            FlowState::Idle,
            FlowState::Approving,
            FlowState::AwaitingApprovalConfirmation,
            FlowState::Executing,
            FlowState::AwaitingExecutionConfirmation,
            FlowState::Succeeded,
        ]
    );
}

#[tokio::test]
async fn non_settlement_token_adds_swap_leg() {
    let mut chain = FakeChain::new();
    chain.allowance = u128::MAX;
    chain.quote_out = Some(2_450_000_000);
    let contract = AjoContract::new(chain, CONTRACT.to_string());
    let wallet = FakeWallet::confirming_after(0);
    let estimator = SwapEstimator::new(contract.caller(), ROUTER.to_string(), registry());

    let (mut flow, _rx) = TransactionFlow::new(
        &contract,
        &wallet,
        &estimator,
        USDC.to_string(),
        ROUTER.to_string(),
        fast_config(),
    );

    let hashes = flow
        .run(FlowAction::Contribute {
            group_id: 1,
            token_in: ETH.to_string(),
            amount_in: 10u128.pow(18),
        })
        .await
        .unwrap();

    // swap then contribute (allowance already covered)
    assert_eq!(hashes.len(), 2);
    assert_eq!(
        flow.history(),
        &[
            FlowState::Idle,
            FlowState::Swapping,
            FlowState::AwaitingSwapConfirmation,
            FlowState::Executing,
            FlowState::AwaitingExecutionConfirmation,
            FlowState::Succeeded,
        ]
    );
}

#[tokio::test]
async fn insufficient_balance_fails_before_any_submission() {
    let mut chain = FakeChain::new();
    chain.balance = 100;
    let contract = AjoContract::new(chain, CONTRACT.to_string());
    let wallet = FakeWallet::confirming_after(0);
    let estimator = SwapEstimator::new(contract.caller(), ROUTER.to_string(), registry());

    let (mut flow, _rx) = TransactionFlow::new(
        &contract,
        &wallet,
        &estimator,
        USDC.to_string(),
        ROUTER.to_string(),
        fast_config(),
    );

    let err = flow
        .run(FlowAction::Contribute {
            group_id: 1,
            token_in: USDC.to_string(),
            amount_in: 300,
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "insufficient-balance");
    assert_eq!(flow.state(), FlowState::Failed);
    assert!(flow.submitted().is_empty());
}

#[tokio::test]
async fn poll_budget_exhaustion_is_a_timeout_never_a_success() {
    let mut chain = FakeChain::new();
    chain.allowance = u128::MAX;
    let contract = AjoContract::new(chain, CONTRACT.to_string());
    let wallet = FakeWallet::never_confirming();
    let estimator = SwapEstimator::new(contract.caller(), ROUTER.to_string(), registry());

    let (mut flow, _rx) = TransactionFlow::new(
        &contract,
        &wallet,
        &estimator,
        USDC.to_string(),
        ROUTER.to_string(),
        FlowConfig {
            poll_interval: Duration::from_millis(1),
            max_poll_attempts: 3,
        },
    );

    let err = flow
        .run(FlowAction::JoinGroup { group_id: 1 })
        .await
        .unwrap_err();

    match err {
        FlowError::ConfirmationTimeout { attempts, .. } => assert_eq!(attempts, 3),
        other => panic!("expected timeout, got {other}"),
    }
    assert_eq!(flow.state(), FlowState::Failed);
    assert!(!flow.history().contains(&FlowState::Succeeded));
}

#[tokio::test]
async fn rejected_transaction_fails_with_reason() {
    let mut chain = FakeChain::new();
    chain.allowance = u128::MAX;
    let contract = AjoContract::new(chain, CONTRACT.to_string());
    let wallet = FakeWallet::rejecting("reverted: group not active");
    let estimator = SwapEstimator::new(contract.caller(), ROUTER.to_string(), registry());

    let (mut flow, _rx) = TransactionFlow::new(
        &contract,
        &wallet,
        &estimator,
        USDC.to_string(),
        ROUTER.to_string(),
        fast_config(),
    );

    let err = flow
        .run(FlowAction::ClaimPayout { group_id: 1 })
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "rejected");
    assert!(err.to_string().contains("group not active"));
}

#[tokio::test]
async fn cancel_is_legal_only_from_idle() {
    let chain = FakeChain::new();
    let contract = AjoContract::new(chain, CONTRACT.to_string());
    let wallet = FakeWallet::confirming_after(0);
    let estimator = SwapEstimator::new(contract.caller(), ROUTER.to_string(), registry());

    let (mut flow, _rx) = TransactionFlow::new(
        &contract,
        &wallet,
        &estimator,
        USDC.to_string(),
        ROUTER.to_string(),
        fast_config(),
    );

    flow.cancel().unwrap();
    assert_eq!(flow.state(), FlowState::Failed);

    // Terminal flows cannot be cancelled again.
    let err = flow.cancel().unwrap_err();
    assert_eq!(err.kind(), "submission");
}

#[tokio::test]
async fn state_watcher_sees_the_terminal_state() {
    let mut chain = FakeChain::new();
    chain.allowance = u128::MAX;
    let contract = AjoContract::new(chain, CONTRACT.to_string());
    let wallet = FakeWallet::confirming_after(0);
    let estimator = SwapEstimator::new(contract.caller(), ROUTER.to_string(), registry());

    let (mut flow, rx) = TransactionFlow::new(
        &contract,
        &wallet,
        &estimator,
        USDC.to_string(),
        ROUTER.to_string(),
        fast_config(),
    );

    flow.run(FlowAction::ActivateGroup { group_id: 1 }).await.unwrap();
    assert_eq!(*rx.borrow(), FlowState::Succeeded);
}
