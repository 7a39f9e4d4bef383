// Best-effort swap quoting. The on-chain quoter is authoritative when it
// answers; when it does not, a static per-pair rate table stands in with a
// flat 5% haircut, and the quote is tagged as a fallback estimate so no
// caller can mistake it for an executable price.

use crate::contract::{parse_felt, ContractCaller, RawU256};
use crate::errors::FlowError;
use crate::types::{EstimatedAmount, QuoteSource, SwapQuote};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;

/// Haircut applied on top of the static nominal rate; fallback quotes can
/// diverge materially from execution price.
const FALLBACK_SLIPPAGE_PCT: f64 = 5.0;

/// Token metadata needed for amount scaling.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub symbol: &'static str,
    pub decimals: u32,
}

/// Known tokens and the static cross rates used when the quoter is down.
/// Rates are nominal units-out per unit-in between symbols.
pub struct TokenRegistry {
    tokens: HashMap<String, TokenInfo>,
    rates: HashMap<(&'static str, &'static str), f64>,
}

impl TokenRegistry {
    /// Registry keyed by the deployed token addresses.
    pub fn new(usdc: &str, eth: &str, strk: &str) -> Self {
        let mut tokens = HashMap::new();
        tokens.insert(canon(usdc), TokenInfo { symbol: "USDC", decimals: 6 });
        tokens.insert(canon(eth), TokenInfo { symbol: "ETH", decimals: 18 });
        tokens.insert(canon(strk), TokenInfo { symbol: "STRK", decimals: 18 });

        let mut rates = HashMap::new();
        for (a, b, r) in [
            ("ETH", "USDC", 2500.0),
            ("USDC", "ETH", 1.0 / 2500.0),
            ("STRK", "USDC", 0.45),
            ("USDC", "STRK", 1.0 / 0.45),
            ("ETH", "STRK", 2500.0 / 0.45),
            ("STRK", "ETH", 0.45 / 2500.0),
        ] {
            rates.insert((a, b), r);
        }
        Self { tokens, rates }
    }

    pub fn token(&self, address: &str) -> Option<&TokenInfo> {
        self.tokens.get(&canon(address))
    }

    fn static_rate(&self, from: &str, to: &str) -> Option<f64> {
        self.rates.get(&(leak(from), leak(to))).copied()
    }
}

// Rate keys are the fixed symbol set above; this just avoids a String key.
fn leak(symbol: &str) -> &'static str {
    match symbol {
        "USDC" => "USDC",
        "ETH" => "ETH",
        "STRK" => "STRK",
        _ => "?",
    }
}

fn canon(address: &str) -> String {
    crate::address::normalize_address(address)
        .map(|f| f.padded_hex)
        .unwrap_or_else(|_| address.to_ascii_lowercase())
}

#[derive(Debug, Deserialize)]
struct RawQuote {
    amount_out: RawU256,
    price_impact_bps: String,
}

/// Swap estimator over an on-chain quoter with a static fallback.
pub struct SwapEstimator<'a, C: ContractCaller> {
    caller: &'a C,
    quoter_address: String,
    registry: TokenRegistry,
}

impl<'a, C: ContractCaller> SwapEstimator<'a, C> {
    pub fn new(caller: &'a C, quoter_address: String, registry: TokenRegistry) -> Self {
        Self { caller, quoter_address, registry }
    }

    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// The read transport the estimator quotes through.
    pub fn caller(&self) -> &'a C {
        self.caller
    }

    /// Quote `amount_in` of `token_in` in terms of `token_out`.
    ///
    /// Identity pairs short-circuit to a 1:1 quote. Otherwise the on-chain
    /// quoter is asked first; any failure falls back to the static table.
    /// The result is always an `EstimatedAmount`.
    pub async fn quote(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: u128,
    ) -> Result<SwapQuote, FlowError> {
        if crate::address::addresses_equal(token_in, token_out) {
            return Ok(SwapQuote {
                token_in: token_in.to_string(),
                token_out: token_out.to_string(),
                amount_in,
                estimated_out: EstimatedAmount(amount_in),
                price_impact_pct: 0.0,
                source: QuoteSource::OnChain,
            });
        }

        match self.quote_on_chain(token_in, token_out, amount_in).await {
            Ok(quote) => Ok(quote),
            Err(e) => {
                log::warn!("on-chain quote failed ({e}); using static fallback rates");
                self.quote_fallback(token_in, token_out, amount_in)
            }
        }
    }

    async fn quote_on_chain(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: u128,
    ) -> Result<SwapQuote, FlowError> {
        let (low, high) = crate::codec::encode_u256(amount_in.into());
        let v = self
            .caller
            .call(
                &self.quoter_address,
                "quote_exact_in",
                &[
                    json!(token_in),
                    json!(token_out),
                    json!(low.to_string()),
                    json!(high.to_string()),
                ],
            )
            .await?;
        let raw: RawQuote = serde_json::from_value(v)
            .map_err(|e| FlowError::SwapExecution(format!("malformed quote: {e}")))?;
        let amount_out = raw.amount_out.decode_u128("amount_out").map_err(FlowError::Codec)?;
        let impact_bps = parse_felt(&raw.price_impact_bps)
            .map_err(FlowError::Codec)?
            .to_u128()
            .map_err(FlowError::Codec)?;
        Ok(SwapQuote {
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            amount_in,
            estimated_out: EstimatedAmount(amount_out),
            price_impact_pct: impact_bps as f64 / 100.0,
            source: QuoteSource::OnChain,
        })
    }

    fn quote_fallback(
        &self,
        token_in: &str,
        token_out: &str,
        amount_in: u128,
    ) -> Result<SwapQuote, FlowError> {
        let info_in = self.registry.token(token_in).ok_or_else(|| {
            FlowError::SwapExecution(format!("unknown input token {token_in}"))
        })?;
        let info_out = self.registry.token(token_out).ok_or_else(|| {
            FlowError::SwapExecution(format!("unknown output token {token_out}"))
        })?;
        let rate = self
            .registry
            .static_rate(info_in.symbol, info_out.symbol)
            .ok_or_else(|| {
                FlowError::SwapExecution(format!(
                    "no static rate for {}→{}",
                    info_in.symbol, info_out.symbol
                ))
            })?;

        // Nominal conversion, rescaled between decimal bases, then the flat
        // haircut. Estimate-grade math: f64 is fine here.
        let human_in = amount_in as f64 / 10f64.powi(info_in.decimals as i32);
        let human_out = human_in * rate * (1.0 - FALLBACK_SLIPPAGE_PCT / 100.0);
        let raw_out = (human_out * 10f64.powi(info_out.decimals as i32)).floor() as u128;

        Ok(SwapQuote {
            token_in: token_in.to_string(),
            token_out: token_out.to_string(),
            amount_in,
            estimated_out: EstimatedAmount(raw_out),
            price_impact_pct: FALLBACK_SLIPPAGE_PCT,
            source: QuoteSource::StaticFallback,
        })
    }
}
