// Structured error taxonomy for the contract client.
// Every surfaced error carries a kind plus a human message so callers can
// render it without parsing free text.

use thiserror::Error;

/// Errors from the wire codec. Always fatal to the single call that hit
/// them; never coerced into a plausible default and never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("value out of range: {0}")]
    OutOfRange(String),

    #[error("malformed limb pair: {0}")]
    MalformedLimbPair(String),

    #[error("malformed tagged enum: {0}")]
    MalformedEnum(String),

    #[error("unknown {kind} variant '{variant}'")]
    UnknownVariant { kind: &'static str, variant: String },

    #[error("precision loss: {0} has more fractional digits than the token supports")]
    PrecisionLoss(String),

    #[error("unsupported decimal count {0}, expected 6 or 18")]
    UnsupportedDecimals(u32),

    #[error("invalid address '{0}'")]
    InvalidAddress(String),

    #[error("malformed wire field '{field}': {reason}")]
    MalformedField { field: &'static str, reason: String },
}

/// Transport-level RPC failures. Transient variants may be retried a
/// bounded number of times by the transport itself.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("http {status}")]
    Http { status: u16 },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("rpc {code}: {message}")]
    Contract { code: i64, message: String },

    #[error("invalid rpc payload (no result)")]
    InvalidPayload,
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        RpcError::Transport(e.to_string())
    }
}

/// Terminal failure reasons for a transaction flow.
#[derive(Debug, Error)]
pub enum FlowError {
    /// Detected client-side before submission; no transaction was sent.
    #[error("insufficient balance: need {required}, have {available}")]
    InsufficientBalance { required: String, available: String },

    /// Detected client-side before submission; no transaction was sent.
    #[error("insufficient allowance: need {required}, approved {approved}")]
    InsufficientAllowance { required: String, approved: String },

    /// The poll budget ran out. The transaction may still land later; the
    /// caller should re-query state rather than resubmit blindly.
    #[error("transaction {tx_hash} not confirmed after {attempts} polls")]
    ConfirmationTimeout { tx_hash: String, attempts: u32 },

    /// The chain rejected a submitted transaction.
    #[error("transaction {tx_hash} rejected: {reason}")]
    Rejected { tx_hash: String, reason: String },

    /// The swap leg failed on-chain. Advise contributing in the settlement
    /// token directly instead of retrying the conversion.
    #[error("swap execution failed: {0}; contribute the settlement token directly to avoid the swap")]
    SwapExecution(String),

    #[error("transaction submission failed: {0}")]
    Submission(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

impl FlowError {
    /// Short machine-readable kind for callers that bucket failures.
    pub fn kind(&self) -> &'static str {
        match self {
            FlowError::InsufficientBalance { .. } => "insufficient-balance",
            FlowError::InsufficientAllowance { .. } => "insufficient-allowance",
            FlowError::ConfirmationTimeout { .. } => "confirmation-timeout",
            FlowError::Rejected { .. } => "rejected",
            FlowError::SwapExecution(_) => "swap-execution",
            FlowError::Submission(_) => "submission",
            FlowError::Codec(_) => "codec",
            FlowError::Rpc(_) => "rpc",
        }
    }
}
