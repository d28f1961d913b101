//! Amount precision handling
//!
//! The wire format carries at most [`MAX_WIRE_DECIMALS`] decimal places.
//! Assets with more decimals lose their dust when bridged; assets with fewer
//! pass through unchanged.

use crate::error::{BridgeError, Result};

/// Maximum decimal places representable in a transfer message
pub const MAX_WIRE_DECIMALS: u8 = 8;

fn scale_factor(decimals: u8) -> Option<u128> {
    10u128.checked_pow(decimals.saturating_sub(MAX_WIRE_DECIMALS) as u32)
}

/// Convert a native amount to wire precision, truncating dust
///
/// A scale factor too large for u128 leaves nothing representable and yields 0.
pub fn normalize_amount(amount: u128, decimals: u8) -> u128 {
    match scale_factor(decimals) {
        Some(divisor) => amount / divisor,
        None => 0,
    }
}

/// Convert a wire-precision amount back to native units
pub fn denormalize_amount(amount: u128, decimals: u8) -> Result<u128> {
    if amount == 0 {
        return Ok(0);
    }
    scale_factor(decimals)
        .and_then(|multiplier| amount.checked_mul(multiplier))
        .ok_or_else(|| {
            BridgeError::InvalidAmount(format!(
                "{} at {} decimals overflows u128",
                amount, decimals
            ))
        })
}

/// Round a native amount down to what survives a round trip over the wire
pub fn truncate_amount(amount: u128, decimals: u8) -> Result<u128> {
    denormalize_amount(normalize_amount(amount, decimals), decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eighteen_decimals_truncates_dust() {
        let amount = 1_234_567_891_234_567_891u128;
        assert_eq!(normalize_amount(amount, 18), 123_456_789);
        assert_eq!(
            truncate_amount(amount, 18).unwrap(),
            1_234_567_890_000_000_000
        );
    }

    #[test]
    fn test_eight_decimals_is_noop() {
        assert_eq!(normalize_amount(123_456_789, 8), 123_456_789);
        assert_eq!(truncate_amount(123_456_789, 8).unwrap(), 123_456_789);
    }

    #[test]
    fn test_fewer_decimals_pass_through() {
        assert_eq!(normalize_amount(1_000_001, 6), 1_000_001);
        assert_eq!(denormalize_amount(1_000_001, 6).unwrap(), 1_000_001);
        assert_eq!(truncate_amount(7, 0).unwrap(), 7);
    }

    #[test]
    fn test_truncation_is_multiple_of_scale() {
        for decimals in 8..=24u8 {
            let scale = 10u128.pow((decimals - 8) as u32);
            let amount = 987_654_321_987_654_321_987u128;
            let truncated = truncate_amount(amount, decimals).unwrap();
            assert_eq!(truncated % scale, 0);
            assert!(truncated <= amount);
            assert!(amount - truncated < scale);
        }
    }

    #[test]
    fn test_denormalize_overflow_is_error() {
        assert!(matches!(
            denormalize_amount(u128::MAX, 18),
            Err(BridgeError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_huge_decimals_normalize_to_zero() {
        assert_eq!(normalize_amount(u128::MAX, 255), 0);
        assert_eq!(truncate_amount(u128::MAX, 255).unwrap(), 0);
    }
}
