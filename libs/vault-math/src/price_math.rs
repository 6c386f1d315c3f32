use crate::full_math::mul_div;
use soroban_sdk::{Env, U256};
use vault_types::{BPS, Q96};

/// Spot price (token1 per token0) in Q96 from a Q96 sqrt price
pub fn price_x96_from_sqrt(env: &Env, sqrt_price_x96: u128) -> u128 {
    mul_div(env, sqrt_price_x96, sqrt_price_x96, Q96)
}

/// Relative deviation of `price_x96` from `reference_x96` in basis points (floor)
pub fn deviation_bps(env: &Env, price_x96: u128, reference_x96: u128) -> u128 {
    if reference_x96 == 0 {
        panic!("Division by zero");
    }
    let diff = price_x96.abs_diff(reference_x96);
    mul_div(env, diff, BPS, reference_x96)
}

/// Deviation of a deposit's token proportions from the vault's composition,
/// in basis points against the larger cross product.
/// Compares amount0 * total1 with amount1 * total0; a perfectly proportional
/// deposit scores 0, a single-sided deposit scores 10000.
pub fn ratio_deviation_bps(
    env: &Env,
    amount0: u128,
    amount1: u128,
    total0: u128,
    total1: u128,
) -> u128 {
    let cross0 = U256::from_u128(env, amount0).mul(&U256::from_u128(env, total1));
    let cross1 = U256::from_u128(env, amount1).mul(&U256::from_u128(env, total0));

    let (small, large) = if cross0.gt(&cross1) {
        (cross1, cross0)
    } else {
        (cross0, cross1)
    };

    if !large.gt(&U256::from_u32(env, 0)) {
        return 0;
    }

    let diff = large.sub(&small);
    // diff <= large so the quotient is at most BPS and always fits
    diff.mul(&U256::from_u128(env, BPS))
        .div(&large)
        .to_u128()
        .unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    // === price_x96_from_sqrt tests ===

    #[test]
    fn test_price_from_sqrt_unit() {
        let env = Env::default();
        assert_eq!(price_x96_from_sqrt(&env, Q96), Q96);
    }

    #[test]
    fn test_price_from_sqrt_squares() {
        let env = Env::default();
        // sqrt = 2 -> price = 4
        assert_eq!(price_x96_from_sqrt(&env, Q96 * 2), Q96 * 4);
        // sqrt = 0.5 -> price = 0.25
        assert_eq!(price_x96_from_sqrt(&env, Q96 / 2), Q96 / 4);
    }

    // === deviation_bps tests ===

    #[test]
    fn test_deviation_zero() {
        let env = Env::default();
        assert_eq!(deviation_bps(&env, Q96, Q96), 0);
    }

    #[test]
    fn test_deviation_symmetric_direction() {
        let env = Env::default();
        // 1% above and 1% below score the same (deviation is unsigned)
        assert_eq!(deviation_bps(&env, 101, 100), 100);
        assert_eq!(deviation_bps(&env, 99, 100), 100);
    }

    #[test]
    fn test_deviation_threshold_boundary() {
        let env = Env::default();
        // 0.9% off sits below a 100 bps threshold, 1% reaches it
        assert_eq!(deviation_bps(&env, 1009, 1000), 90);
        assert_eq!(deviation_bps(&env, 1010, 1000), 100);
    }

    #[test]
    #[should_panic(expected = "Division by zero")]
    fn test_deviation_zero_reference() {
        let env = Env::default();
        deviation_bps(&env, Q96, 0);
    }

    // === ratio_deviation_bps tests ===

    #[test]
    fn test_ratio_proportional_deposit() {
        let env = Env::default();
        assert_eq!(ratio_deviation_bps(&env, 1000, 1000, 5000, 5000), 0);
        assert_eq!(ratio_deviation_bps(&env, 100, 300, 1000, 3000), 0);
    }

    #[test]
    fn test_ratio_single_sided_deposit() {
        let env = Env::default();
        assert_eq!(ratio_deviation_bps(&env, 1000, 0, 5000, 5000), BPS);
        assert_eq!(ratio_deviation_bps(&env, 0, 1000, 5000, 5000), BPS);
    }

    #[test]
    fn test_ratio_skewed_deposit() {
        let env = Env::default();
        // (1000, 700) against a balanced vault: |1000 - 700| / 1000 = 30%
        assert_eq!(ratio_deviation_bps(&env, 1000, 700, 5000, 5000), 3000);
        // (1000, 4000) against a balanced vault: 3000/4000 = 75%
        assert_eq!(ratio_deviation_bps(&env, 1000, 4000, 5000, 5000), 7500);
    }

    #[test]
    fn test_ratio_zero_cross_products() {
        let env = Env::default();
        // Nothing to compare against - callers skip the check for empty and
        // single-asset vaults, but the helper itself stays total
        assert_eq!(ratio_deviation_bps(&env, 0, 0, 5000, 5000), 0);
        assert_eq!(ratio_deviation_bps(&env, 1000, 1000, 0, 0), 0);
    }

    #[test]
    fn test_ratio_large_values_no_overflow() {
        let env = Env::default();
        let big = u128::MAX / 2;
        assert_eq!(ratio_deviation_bps(&env, big, big, big, big), 0);
    }
}
