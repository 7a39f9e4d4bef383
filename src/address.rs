// Wallet address reconciliation.
//
// The contract emits addresses as hex field elements, sometimes zero-padded
// to 64 digits and sometimes not, and user input can be hex or decimal.
// Every membership/creator/recipient comparison in this crate goes through
// `addresses_equal`; raw string equality on addresses is a bug.

use crate::codec::U256;
use crate::errors::CodecError;

/// Canonical renderings of one underlying address value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressForms {
    /// 0x-prefixed, zero-padded to 64 hex digits, lower-case.
    pub padded_hex: String,
    /// 0x-prefixed, no leading zeros, lower-case.
    pub hex: String,
    /// Plain decimal rendering.
    pub decimal: String,
    value: U256,
}

impl AddressForms {
    pub fn value(&self) -> U256 {
        self.value
    }

    /// All canonical string forms, for callers that key sets/maps by string.
    pub fn all(&self) -> [&str; 3] {
        [&self.padded_hex, &self.hex, &self.decimal]
    }
}

/// Parse an address in any accepted representation into its canonical forms.
///
/// Accepts 0x-prefixed hex, bare hex containing at least one a-f digit, and
/// decimal. A bare all-digit string is ambiguous between the two bases; the
/// contract only ever emits 0x-prefixed hex, so bare digits are read as
/// decimal (matching what a user would type).
pub fn normalize_address(input: &str) -> Result<AddressForms, CodecError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(CodecError::InvalidAddress(input.to_string()));
    }

    let value = if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
        U256::from_hex_str(trimmed)
    } else if trimmed.bytes().all(|b| b.is_ascii_digit()) {
        U256::from_dec_str(trimmed)
    } else if trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
        U256::from_hex_str(trimmed)
    } else {
        Err(CodecError::InvalidAddress(trimmed.to_string()))
    }
    .map_err(|_| CodecError::InvalidAddress(trimmed.to_string()))?;

    Ok(AddressForms {
        padded_hex: format!("0x{}", value.to_padded_hex()),
        hex: format!("0x{}", value.to_hex_string()),
        decimal: value.to_dec_string(),
        value,
    })
}

/// True iff both inputs parse and denote the same underlying address.
///
/// Equality of the parsed values is exactly intersection of the normalized
/// form sets, since every form is derived from the value alone.
pub fn addresses_equal(a: &str, b: &str) -> bool {
    match (normalize_address(a), normalize_address(b)) {
        (Ok(fa), Ok(fb)) => fa.value == fb.value,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDR_HEX: &str = "0x4a1b2c3d4e5f";
    const ADDR_DEC: &str = "81480566787679"; // same value in decimal

    #[test]
    fn forms_cover_padded_unpadded_and_decimal() {
        let forms = normalize_address(ADDR_HEX).unwrap();
        assert_eq!(forms.hex, "0x4a1b2c3d4e5f");
        assert_eq!(forms.padded_hex.len(), 66);
        assert!(forms.padded_hex.ends_with("4a1b2c3d4e5f"));
        assert_eq!(forms.decimal, ADDR_DEC);
    }

    #[test]
    fn equality_across_representations() {
        let padded = format!(
            "0x{:0>64}",
            ADDR_HEX.trim_start_matches("0x")
        );
        // Reflexive in every form, symmetric across forms.
        for a in [ADDR_HEX, ADDR_DEC, padded.as_str()] {
            for b in [ADDR_HEX, ADDR_DEC, padded.as_str()] {
                assert!(addresses_equal(a, b), "{} should equal {}", a, b);
            }
        }
        // Upper-case hex still matches.
        assert!(addresses_equal("0x4A1B2C3D4E5F", ADDR_HEX));
    }

    #[test]
    fn distinct_addresses_do_not_match() {
        assert!(!addresses_equal(ADDR_HEX, "0x4a1b2c3d4e60"));
        assert!(!addresses_equal(ADDR_HEX, "1"));
    }

    #[test]
    fn invalid_input_is_never_equal() {
        assert!(normalize_address("").is_err());
        assert!(normalize_address("0xnothex").is_err());
        assert!(!addresses_equal("garbage!", "garbage!"));
    }

    #[test]
    fn bare_hex_with_letters_parses_as_hex() {
        assert!(addresses_equal("4a1b2c3d4e5f", ADDR_HEX));
        // All-digit bare strings read as decimal.
        assert!(addresses_equal("100", "0x64"));
    }
}
