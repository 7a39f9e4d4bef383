// Multi-step write flows driven as an explicit state machine:
//
//   Idle → Approving → AwaitingApprovalConfirmation
//        → (Swapping → AwaitingSwapConfirmation)
//        → Executing → AwaitingExecutionConfirmation
//        → Succeeded | Failed
//
// Approval is skipped when the current allowance already covers the amount,
// and every (re)run re-reads the allowance first, so retrying a failed flow
// never submits a redundant approval. Confirmation is polled at a fixed
// interval with a bounded attempt budget; running out of budget is a
// failure, never an assumed success.

use crate::contract::{
    self, erc20_allowance, erc20_balance_of, AjoContract, Call, ContractCaller, TxHash, TxStatus,
    WalletConnector,
};
use crate::errors::FlowError;
use crate::swap::SwapEstimator;
use crate::types::{EstimatedAmount, GroupVisibility, QuoteSource};
use tokio::sync::watch;
use tokio::time::{sleep, Duration};

/// Observable states of one flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Approving,
    AwaitingApprovalConfirmation,
    Swapping,
    AwaitingSwapConfirmation,
    Executing,
    AwaitingExecutionConfirmation,
    Succeeded,
    Failed,
}

impl FlowState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, FlowState::Succeeded | FlowState::Failed)
    }
}

/// Polling knobs. Defaults: poll every 3 s, give up after 20 attempts.
#[derive(Debug, Clone)]
pub struct FlowConfig {
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(3),
            max_poll_attempts: 20,
        }
    }
}

/// The user action a flow performs.
#[derive(Debug, Clone)]
pub enum FlowAction {
    /// Contribute to a group's current cycle, optionally paying in a
    /// non-settlement token that gets swapped first.
    Contribute { group_id: u64, token_in: String, amount_in: u128 },
    /// Lock collateral, with the same optional swap leg.
    LockCollateral { group_id: u64, token_in: String, amount_in: u128 },
    WithdrawLocked { group_id: u64 },
    ActivateGroup { group_id: u64 },
    DistributePayout { group_id: u64 },
    ClaimPayout { group_id: u64 },
    TrackPenalty { group_id: u64, user: String },
    ApplyPenalty { group_id: u64, user: String },
    JoinGroup { group_id: u64 },
    CreateGroup { params: contract::CreateGroupParams, visibility: GroupVisibility },
    RegisterUser { name: String, avatar: String },
}

/// One in-flight user action. Owned by exactly one caller for exactly one
/// action; dropped (or consumed) on completion. Multiple flows may run
/// concurrently and share nothing but the read-only connection handles.
pub struct TransactionFlow<'a, C: ContractCaller, W: WalletConnector> {
    contract: &'a AjoContract<C>,
    wallet: &'a W,
    estimator: &'a SwapEstimator<'a, C>,
    /// Settlement token (USDC) address.
    settlement_token: String,
    /// Router the swap leg goes through, and the spender approvals target.
    router_address: String,
    config: FlowConfig,
    state: FlowState,
    history: Vec<FlowState>,
    submitted: Vec<TxHash>,
    state_tx: watch::Sender<FlowState>,
}

impl<'a, C: ContractCaller, W: WalletConnector> TransactionFlow<'a, C, W> {
    pub fn new(
        contract: &'a AjoContract<C>,
        wallet: &'a W,
        estimator: &'a SwapEstimator<'a, C>,
        settlement_token: String,
        router_address: String,
        config: FlowConfig,
    ) -> (Self, watch::Receiver<FlowState>) {
        let (state_tx, state_rx) = watch::channel(FlowState::Idle);
        (
            Self {
                contract,
                wallet,
                estimator,
                settlement_token,
                router_address,
                config,
                state: FlowState::Idle,
                history: vec![FlowState::Idle],
                submitted: Vec::new(),
                state_tx,
            },
            state_rx,
        )
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    /// Every state the flow has passed through, in order.
    pub fn history(&self) -> &[FlowState] {
        &self.history
    }

    /// Hashes of every transaction submitted so far, in submission order.
    pub fn submitted(&self) -> &[TxHash] {
        &self.submitted
    }

    /// Abandon the flow. Legal only before anything was submitted; once a
    /// transaction is out, the flow must run to a terminal state because
    /// there is no on-chain cancellation.
    pub fn cancel(&mut self) -> Result<(), FlowError> {
        if self.state != FlowState::Idle {
            return Err(FlowError::Submission(format!(
                "cannot cancel in state {:?}; flows only cancel from Idle",
                self.state
            )));
        }
        self.transition(FlowState::Failed);
        Ok(())
    }

    fn transition(&mut self, next: FlowState) {
        log::debug!("flow state {:?} → {:?}", self.state, next);
        self.state = next;
        self.history.push(next);
        // Receivers may be long gone (UI torn down); that is fine.
        let _ = self.state_tx.send(next);
    }

    fn connected_address(&self) -> Result<String, FlowError> {
        self.wallet
            .address()
            .ok_or_else(|| FlowError::Submission("no wallet connected".to_string()))
    }

    /// Drive the action to a terminal state. Returns the submitted hashes on
    /// success. On error the flow is left in `Failed`; re-running is safe
    /// because allowance is re-read before any approval.
    pub async fn run(&mut self, action: FlowAction) -> Result<Vec<TxHash>, FlowError> {
        match self.run_inner(action).await {
            Ok(()) => {
                self.transition(FlowState::Succeeded);
                Ok(self.submitted.clone())
            }
            Err(e) => {
                log::warn!("flow failed ({}): {e}", e.kind());
                self.transition(FlowState::Failed);
                Err(e)
            }
        }
    }

    async fn run_inner(&mut self, action: FlowAction) -> Result<(), FlowError> {
        let ajo = self.contract.address.clone();
        match action {
            FlowAction::Contribute { group_id, token_in, amount_in } => {
                let amount = self.funded_settlement_amount(&token_in, amount_in).await?;
                self.execute(contract::contribute_call(&ajo, group_id, amount.0.into()))
                    .await
            }
            FlowAction::LockCollateral { group_id, token_in, amount_in } => {
                let amount = self.funded_settlement_amount(&token_in, amount_in).await?;
                self.execute(contract::lock_liquidity_call(&ajo, group_id, amount.0.into()))
                    .await
            }
            FlowAction::WithdrawLocked { group_id } => {
                self.execute(contract::withdraw_locked_call(&ajo, group_id)).await
            }
            FlowAction::ActivateGroup { group_id } => {
                self.execute(contract::activate_group_call(&ajo, group_id)).await
            }
            FlowAction::DistributePayout { group_id } => {
                self.execute(contract::distribute_payout_call(&ajo, group_id)).await
            }
            FlowAction::ClaimPayout { group_id } => {
                self.execute(contract::claim_payout_call(&ajo, group_id)).await
            }
            FlowAction::TrackPenalty { group_id, user } => {
                self.execute(contract::track_penalty_call(&ajo, group_id, &user)).await
            }
            FlowAction::ApplyPenalty { group_id, user } => {
                self.execute(contract::apply_penalty_call(&ajo, group_id, &user)).await
            }
            FlowAction::JoinGroup { group_id } => {
                self.execute(contract::join_group_call(&ajo, group_id)).await
            }
            FlowAction::CreateGroup { params, visibility } => {
                let call = contract::create_group_call(&ajo, &params, visibility)?;
                self.execute(call).await
            }
            FlowAction::RegisterUser { name, avatar } => {
                let call = contract::register_user_call(&ajo, &name, &avatar)?;
                self.execute(call).await
            }
        }
    }

    /// Funding leg shared by contribute and lock: balance check, allowance
    /// check with conditional approval, and the optional swap into the
    /// settlement token. Returns the settlement amount the main call spends,
    /// which is an estimate whenever a swap happened.
    async fn funded_settlement_amount(
        &mut self,
        token_in: &str,
        amount_in: u128,
    ) -> Result<EstimatedAmount, FlowError> {
        let owner = self.connected_address()?;
        let needs_swap = !crate::address::addresses_equal(token_in, &self.settlement_token);
        let spender = if needs_swap {
            self.router_address.clone()
        } else {
            self.contract.address.clone()
        };
        let required = crate::codec::U256::from_u128(amount_in);

        // Doomed transactions are cheaper to refuse client-side.
        let balance = erc20_balance_of(self.estimator_caller(), token_in, &owner).await?;
        if balance < required {
            return Err(FlowError::InsufficientBalance {
                required: required.to_dec_string(),
                available: balance.to_dec_string(),
            });
        }

        // Re-read on every run: a prior attempt's approval may have landed
        // even if the client saw an error.
        let allowance =
            erc20_allowance(self.estimator_caller(), token_in, &owner, &spender).await?;
        if allowance < required {
            self.transition(FlowState::Approving);
            let hash = self
                .submit(contract::approve_call(token_in, &spender, required))
                .await?;
            self.transition(FlowState::AwaitingApprovalConfirmation);
            self.await_confirmation(&hash).await?;
        } else {
            log::debug!(
                "allowance {} already covers {}, skipping approval",
                allowance, required
            );
        }

        if !needs_swap {
            // Settlement-token amounts pass through unestimated; the wrapper
            // still travels as EstimatedAmount to keep one call path.
            return Ok(EstimatedAmount(amount_in));
        }

        let quote = self
            .estimator
            .quote(token_in, &self.settlement_token, amount_in)
            .await?;
        if quote.source == QuoteSource::StaticFallback {
            log::warn!(
                "swap quote is a static-table estimate; execution may settle for less than {}",
                quote.estimated_out
            );
        }
        self.transition(FlowState::Swapping);
        let hash = self
            .submit(contract::swap_call(
                &self.router_address,
                token_in,
                &self.settlement_token,
                required,
                crate::codec::U256::from_u128(quote.estimated_out.0),
                &owner,
            ))
            .await
            .map_err(|e| FlowError::SwapExecution(e.to_string()))?;
        self.transition(FlowState::AwaitingSwapConfirmation);
        self.await_confirmation(&hash)
            .await
            .map_err(|e| match e {
                timeout @ FlowError::ConfirmationTimeout { .. } => timeout,
                other => FlowError::SwapExecution(other.to_string()),
            })?;

        // The post-swap settlement amount is the quote, not an observed
        // balance; downstream keeps the estimate marker.
        Ok(quote.estimated_out)
    }

    async fn execute(&mut self, call: Call) -> Result<(), FlowError> {
        self.transition(FlowState::Executing);
        let hash = self.submit(call).await?;
        self.transition(FlowState::AwaitingExecutionConfirmation);
        self.await_confirmation(&hash).await
    }

    async fn submit(&mut self, call: Call) -> Result<TxHash, FlowError> {
        log::info!("submitting {} to {}", call.entry_point, call.to);
        let hash = self.wallet.send_transaction(std::slice::from_ref(&call)).await?;
        self.submitted.push(hash.clone());
        Ok(hash)
    }

    /// Poll for inclusion at the configured interval until confirmed,
    /// rejected, or out of attempts. The sleep lives inside this future, so
    /// dropping the flow releases the timer with it.
    async fn await_confirmation(&self, hash: &TxHash) -> Result<(), FlowError> {
        for attempt in 1..=self.config.max_poll_attempts {
            sleep(self.config.poll_interval).await;
            match self.wallet.transaction_status(hash).await? {
                TxStatus::Confirmed => {
                    log::debug!("tx {hash} confirmed after {attempt} polls");
                    return Ok(());
                }
                TxStatus::Rejected(reason) => {
                    return Err(FlowError::Rejected { tx_hash: hash.0.clone(), reason });
                }
                TxStatus::Pending => {}
            }
        }
        // The transaction may still land later; report timeout, never success.
        Err(FlowError::ConfirmationTimeout {
            tx_hash: hash.0.clone(),
            attempts: self.config.max_poll_attempts,
        })
    }

    // The estimator shares the flow's read transport.
    fn estimator_caller(&self) -> &C {
        self.estimator.caller()
    }
}
