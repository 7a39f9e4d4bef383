// Wire codec for the ajo contract: 256-bit integers as (low, high) 128-bit
// limb pairs, tagged-union enums as single-key maps, short byte strings
// packed into field elements, and fixed-point token amounts.

use crate::errors::CodecError;
use serde_json::{Map, Value};
use std::fmt;

const MASK64: u128 = (1u128 << 64) - 1;

/// Unsigned 256-bit integer stored exactly as the contract transports it:
/// two 128-bit limbs, little-endian by limb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct U256 {
    pub low: u128,
    pub high: u128,
}

impl U256 {
    pub const ZERO: U256 = U256 { low: 0, high: 0 };

    pub fn from_limbs(low: u128, high: u128) -> Self {
        U256 { low, high }
    }

    /// The (low, high) limb pair the contract expects in calldata.
    pub fn limbs(&self) -> (u128, u128) {
        (self.low, self.high)
    }

    pub fn from_u128(v: u128) -> Self {
        U256 { low: v, high: 0 }
    }

    pub fn is_zero(&self) -> bool {
        self.low == 0 && self.high == 0
    }

    /// Narrow to u128, failing if the high limb is populated.
    pub fn to_u128(&self) -> Result<u128, CodecError> {
        if self.high != 0 {
            return Err(CodecError::OutOfRange(format!(
                "{} does not fit in 128 bits",
                self
            )));
        }
        Ok(self.low)
    }

    pub fn checked_add(&self, other: U256) -> Option<U256> {
        let (low, carry) = self.low.overflowing_add(other.low);
        let high = self.high.checked_add(other.high)?;
        let high = high.checked_add(carry as u128)?;
        Some(U256 { low, high })
    }

    /// Multiply by a small factor, None on overflow past 2^256.
    pub fn checked_mul_small(&self, k: u64) -> Option<U256> {
        let (low, carry) = mul_limb(self.low, k);
        let (high, overflow) = mul_limb(self.high, k);
        let high = high.checked_add(carry as u128)?;
        if overflow != 0 {
            return None;
        }
        Some(U256 { low, high })
    }

    /// Long division by a small nonzero divisor. Returns (quotient, remainder).
    pub fn div_rem_small(&self, k: u64) -> (U256, u64) {
        debug_assert!(k != 0);
        let words = [
            (self.high >> 64) as u64,
            (self.high & MASK64) as u64,
            (self.low >> 64) as u64,
            (self.low & MASK64) as u64,
        ];
        let mut q = [0u64; 4];
        let mut rem: u64 = 0;
        for (i, &w) in words.iter().enumerate() {
            let cur = ((rem as u128) << 64) | w as u128;
            q[i] = (cur / k as u128) as u64;
            rem = (cur % k as u128) as u64;
        }
        let quotient = U256 {
            high: ((q[0] as u128) << 64) | q[1] as u128,
            low: ((q[2] as u128) << 64) | q[3] as u128,
        };
        (quotient, rem)
    }

    /// 10^n as a U256. Panics past 10^77 (would exceed 2^256), which no
    /// caller in this crate can reach: decimals are validated to 6 or 18.
    pub fn pow10(n: u32) -> U256 {
        let mut v = U256::from_u128(1);
        for _ in 0..n {
            v = v
                .checked_mul_small(10)
                .unwrap_or_else(|| unreachable!("pow10 overflow"));
        }
        v
    }

    /// Parse a decimal string. Fails with OutOfRange at or past 2^256.
    pub fn from_dec_str(s: &str) -> Result<U256, CodecError> {
        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CodecError::OutOfRange(format!(
                "'{}' is not a nonnegative decimal integer",
                s
            )));
        }
        let mut v = U256::ZERO;
        for b in s.bytes() {
            v = v
                .checked_mul_small(10)
                .and_then(|v| v.checked_add(U256::from_u128((b - b'0') as u128)))
                .ok_or_else(|| CodecError::OutOfRange(format!("'{}' exceeds 2^256", s)))?;
        }
        Ok(v)
    }

    /// Parse hex with or without a 0x prefix, up to 64 digits.
    pub fn from_hex_str(s: &str) -> Result<U256, CodecError> {
        let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
        if digits.is_empty() || digits.len() > 64 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(CodecError::OutOfRange(format!("'{}' is not valid hex", s)));
        }
        let mut v = U256::ZERO;
        for b in digits.bytes() {
            let d = (b as char).to_digit(16).unwrap() as u128;
            // Shift left by one nibble; 64-digit cap means this cannot overflow.
            v = U256 {
                high: (v.high << 4) | (v.low >> 124),
                low: (v.low << 4) | d,
            };
        }
        Ok(v)
    }

    pub fn to_dec_string(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let mut digits = Vec::new();
        let mut v = *self;
        while !v.is_zero() {
            let (q, r) = v.div_rem_small(10);
            digits.push(b'0' + r as u8);
            v = q;
        }
        digits.reverse();
        String::from_utf8(digits).expect("ascii digits")
    }

    /// Lower-case hex without leading zeros, no 0x prefix.
    pub fn to_hex_string(&self) -> String {
        if self.high == 0 {
            format!("{:x}", self.low)
        } else {
            format!("{:x}{:032x}", self.high, self.low)
        }
    }

    /// Lower-case hex zero-padded to 64 digits, no 0x prefix.
    pub fn to_padded_hex(&self) -> String {
        format!("{:032x}{:032x}", self.high, self.low)
    }
}

impl fmt::Display for U256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dec_string())
    }
}

impl PartialOrd for U256 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for U256 {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.high, self.low).cmp(&(other.high, other.low))
    }
}

impl From<u64> for U256 {
    fn from(v: u64) -> Self {
        U256::from_u128(v as u128)
    }
}

impl From<u128> for U256 {
    fn from(v: u128) -> Self {
        U256::from_u128(v)
    }
}

// u128 * u64 -> (u128 result, u64 carry out)
fn mul_limb(a: u128, k: u64) -> (u128, u64) {
    let lo = (a & MASK64) * k as u128;
    let hi = (a >> 64) * k as u128 + (lo >> 64);
    let result = (hi << 64) | (lo & MASK64);
    (result, (hi >> 64) as u64)
}

/// Split a value into the (low, high) limb pair used in calldata.
pub fn encode_u256(value: U256) -> (u128, u128) {
    value.limbs()
}

/// Reassemble a value from its limb pair: high * 2^128 + low.
pub fn decode_u256(low: u128, high: u128) -> U256 {
    U256::from_limbs(low, high)
}

/// Build the single-key tagged map the contract uses for enum arguments.
pub fn encode_enum_variant(name: &str, payload: Value) -> Value {
    let mut map = Map::new();
    map.insert(name.to_string(), payload);
    Value::Object(map)
}

/// Extract the one populated variant from a tagged map.
///
/// A key counts as populated when it is present and not null; the contract
/// always populates exactly one. Zero or several populated keys means the
/// payload is malformed, never a value to guess at.
pub fn decode_enum_variant(tagged: &Value) -> Result<(&str, &Value), CodecError> {
    let map = tagged
        .as_object()
        .ok_or_else(|| CodecError::MalformedEnum(format!("expected object, got {}", tagged)))?;
    let mut populated = map.iter().filter(|(_, v)| !v.is_null());
    let first = populated
        .next()
        .ok_or_else(|| CodecError::MalformedEnum("no populated variant".to_string()))?;
    if let Some((extra, _)) = populated.next() {
        return Err(CodecError::MalformedEnum(format!(
            "multiple populated variants: '{}' and '{}'",
            first.0, extra
        )));
    }
    Ok((first.0.as_str(), first.1))
}

/// Render a raw integer token amount as a decimal string at the given
/// fixed-point scale. Only the scales the contract actually uses (USDC = 6,
/// 18-decimal ERC-20s) are accepted.
pub fn to_fixed_point(raw: U256, decimals: u32) -> Result<String, CodecError> {
    check_decimals(decimals)?;
    // 10^6 and 10^18 both fit in a u64 divisor.
    let divisor = 10u64.pow(decimals);
    let (whole, frac) = raw.div_rem_small(divisor);
    if frac == 0 {
        return Ok(whole.to_dec_string());
    }
    let mut frac_str = format!("{:0width$}", frac, width = decimals as usize);
    while frac_str.ends_with('0') {
        frac_str.pop();
    }
    Ok(format!("{}.{}", whole.to_dec_string(), frac_str))
}

/// Inverse of `to_fixed_point`: recover the raw integer amount from a
/// decimal string with at most `decimals` fractional digits.
pub fn from_fixed_point(text: &str, decimals: u32) -> Result<U256, CodecError> {
    check_decimals(decimals)?;
    let (whole, frac) = match text.split_once('.') {
        Some((w, f)) => (w, f),
        None => (text, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(CodecError::OutOfRange("empty amount".to_string()));
    }
    if frac.len() > decimals as usize {
        return Err(CodecError::PrecisionLoss(text.to_string()));
    }
    let whole_val = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_dec_str(whole)?
    };
    let mut frac_padded = frac.to_string();
    while frac_padded.len() < decimals as usize {
        frac_padded.push('0');
    }
    let frac_val = if frac_padded.is_empty() {
        U256::ZERO
    } else {
        U256::from_dec_str(&frac_padded)?
    };
    let scale = 10u64.pow(decimals);
    whole_val
        .checked_mul_small(scale)
        .and_then(|v| v.checked_add(frac_val))
        .ok_or_else(|| CodecError::OutOfRange(format!("'{}' exceeds 2^256", text)))
}

fn check_decimals(decimals: u32) -> Result<(), CodecError> {
    match decimals {
        6 | 18 => Ok(()),
        other => Err(CodecError::UnsupportedDecimals(other)),
    }
}

/// Decode a short string packed big-endian into a single field element
/// (names, descriptions under 32 bytes arrive this way).
pub fn decode_short_string(value: U256) -> Result<String, CodecError> {
    let mut bytes = Vec::with_capacity(32);
    for limb in [value.high, value.low] {
        bytes.extend_from_slice(&limb.to_be_bytes());
    }
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    String::from_utf8(bytes[start..].to_vec()).map_err(|_| CodecError::MalformedField {
        field: "short_string",
        reason: "not valid UTF-8".to_string(),
    })
}

/// Pack a short ASCII/UTF-8 string (≤ 31 bytes) into a field element.
pub fn encode_short_string(text: &str) -> Result<U256, CodecError> {
    let bytes = text.as_bytes();
    if bytes.len() > 31 {
        return Err(CodecError::OutOfRange(format!(
            "'{}' is longer than 31 bytes",
            text
        )));
    }
    let mut v = U256::ZERO;
    for &b in bytes {
        v = v
            .checked_mul_small(256)
            .and_then(|v| v.checked_add(U256::from_u128(b as u128)))
            .ok_or_else(|| CodecError::OutOfRange(text.to_string()))?;
    }
    Ok(v)
}
