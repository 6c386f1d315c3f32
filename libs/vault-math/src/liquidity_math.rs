use crate::full_math::mul_div;
use soroban_sdk::Env;
use vault_types::Q96;

/// Order two sqrt ratios as (lower, upper)
fn sorted(a: u128, b: u128) -> (u128, u128) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

/// Maximal liquidity fundable by `amount0`/`amount1` for a price range.
/// In-range positions take the smaller of the two single-token liquidities;
/// out-of-range positions are single-sided.
pub fn get_liquidity_for_amounts(
    env: &Env,
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    amount0: u128,
    amount1: u128,
) -> u128 {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_ratio_lower {
        // Current price below range - all token0
        liquidity_for_amount0(env, sqrt_ratio_lower, sqrt_ratio_upper, amount0)
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        let liquidity0 = liquidity_for_amount0(env, sqrt_ratio_x96, sqrt_ratio_upper, amount0);
        let liquidity1 = liquidity_for_amount1(env, sqrt_ratio_lower, sqrt_ratio_x96, amount1);
        liquidity0.min(liquidity1)
    } else {
        // Current price above range - all token1
        liquidity_for_amount1(env, sqrt_ratio_lower, sqrt_ratio_upper, amount1)
    }
}

/// L = amount0 * (sqrt_lower * sqrt_upper / Q96) / (sqrt_upper - sqrt_lower)
fn liquidity_for_amount0(
    env: &Env,
    sqrt_ratio_lower: u128,
    sqrt_ratio_upper: u128,
    amount0: u128,
) -> u128 {
    let intermediate = mul_div(env, sqrt_ratio_lower, sqrt_ratio_upper, Q96);
    mul_div(env, amount0, intermediate, sqrt_ratio_upper - sqrt_ratio_lower)
}

/// L = amount1 * Q96 / (sqrt_upper - sqrt_lower)
fn liquidity_for_amount1(
    env: &Env,
    sqrt_ratio_lower: u128,
    sqrt_ratio_upper: u128,
    amount1: u128,
) -> u128 {
    mul_div(env, amount1, Q96, sqrt_ratio_upper - sqrt_ratio_lower)
}

/// Token amounts a liquidity position represents at the given price (floor)
pub fn get_amounts_for_liquidity(
    env: &Env,
    sqrt_ratio_x96: u128,
    sqrt_ratio_a_x96: u128,
    sqrt_ratio_b_x96: u128,
    liquidity: u128,
) -> (u128, u128) {
    let (sqrt_ratio_lower, sqrt_ratio_upper) = sorted(sqrt_ratio_a_x96, sqrt_ratio_b_x96);

    if sqrt_ratio_x96 <= sqrt_ratio_lower {
        let amount0 = amount0_for_liquidity(env, sqrt_ratio_lower, sqrt_ratio_upper, liquidity);
        (amount0, 0)
    } else if sqrt_ratio_x96 < sqrt_ratio_upper {
        let amount0 = amount0_for_liquidity(env, sqrt_ratio_x96, sqrt_ratio_upper, liquidity);
        let amount1 = amount1_for_liquidity(env, sqrt_ratio_lower, sqrt_ratio_x96, liquidity);
        (amount0, amount1)
    } else {
        let amount1 = amount1_for_liquidity(env, sqrt_ratio_lower, sqrt_ratio_upper, liquidity);
        (0, amount1)
    }
}

/// amount0 = L * Q96 * (sqrt_upper - sqrt_lower) / (sqrt_upper * sqrt_lower)
/// Split into two mul_divs so every intermediate stays inside 256 bits.
fn amount0_for_liquidity(
    env: &Env,
    sqrt_ratio_lower: u128,
    sqrt_ratio_upper: u128,
    liquidity: u128,
) -> u128 {
    let scaled = mul_div(env, liquidity, Q96, sqrt_ratio_upper);
    mul_div(
        env,
        scaled,
        sqrt_ratio_upper - sqrt_ratio_lower,
        sqrt_ratio_lower,
    )
}

/// amount1 = L * (sqrt_upper - sqrt_lower) / Q96
fn amount1_for_liquidity(
    env: &Env,
    sqrt_ratio_lower: u128,
    sqrt_ratio_upper: u128,
    liquidity: u128,
) -> u128 {
    mul_div(env, liquidity, sqrt_ratio_upper - sqrt_ratio_lower, Q96)
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;
    use vault_types::Q96;

    // === get_liquidity_for_amounts tests ===

    #[test]
    fn test_liquidity_in_range() {
        let env = Env::default();
        let sqrt_price = Q96;
        let sqrt_lower = Q96 * 9 / 10;
        let sqrt_upper = Q96 * 11 / 10;

        let liquidity = get_liquidity_for_amounts(
            &env,
            sqrt_price,
            sqrt_lower,
            sqrt_upper,
            1_000_000_000,
            1_000_000_000,
        );
        assert!(liquidity > 0);
    }

    #[test]
    fn test_liquidity_below_range_ignores_token1() {
        let env = Env::default();
        let sqrt_price = Q96 * 8 / 10;
        let sqrt_lower = Q96 * 9 / 10;
        let sqrt_upper = Q96 * 11 / 10;

        let without_token1 =
            get_liquidity_for_amounts(&env, sqrt_price, sqrt_lower, sqrt_upper, 1_000_000_000, 0);
        let with_token1 = get_liquidity_for_amounts(
            &env,
            sqrt_price,
            sqrt_lower,
            sqrt_upper,
            1_000_000_000,
            1_000_000_000,
        );

        assert!(without_token1 > 0);
        assert_eq!(without_token1, with_token1);
    }

    #[test]
    fn test_liquidity_above_range_ignores_token0() {
        let env = Env::default();
        let sqrt_price = Q96 * 12 / 10;
        let sqrt_lower = Q96 * 9 / 10;
        let sqrt_upper = Q96 * 11 / 10;

        let without_token0 =
            get_liquidity_for_amounts(&env, sqrt_price, sqrt_lower, sqrt_upper, 0, 1_000_000_000);
        let with_token0 = get_liquidity_for_amounts(
            &env,
            sqrt_price,
            sqrt_lower,
            sqrt_upper,
            1_000_000_000,
            1_000_000_000,
        );

        assert!(without_token0 > 0);
        assert_eq!(without_token0, with_token0);
    }

    #[test]
    fn test_liquidity_bound_order_independent() {
        let env = Env::default();
        let sqrt_a = Q96 * 9 / 10;
        let sqrt_b = Q96 * 11 / 10;

        let ab = get_liquidity_for_amounts(&env, Q96, sqrt_a, sqrt_b, 1_000_000, 1_000_000);
        let ba = get_liquidity_for_amounts(&env, Q96, sqrt_b, sqrt_a, 1_000_000, 1_000_000);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_narrow_range_more_liquidity() {
        let env = Env::default();
        let amount = 1_000_000_000_000u128;

        let narrow = get_liquidity_for_amounts(
            &env,
            Q96,
            Q96 * 99 / 100,
            Q96 * 101 / 100,
            amount,
            amount,
        );
        let wide =
            get_liquidity_for_amounts(&env, Q96, Q96 * 8 / 10, Q96 * 12 / 10, amount, amount);

        assert!(narrow > wide);
    }

    // === get_amounts_for_liquidity tests ===

    #[test]
    fn test_amounts_in_range() {
        let env = Env::default();
        let (amount0, amount1) = get_amounts_for_liquidity(
            &env,
            Q96,
            Q96 * 9 / 10,
            Q96 * 11 / 10,
            1_000_000_000_000,
        );
        assert!(amount0 > 0);
        assert!(amount1 > 0);
    }

    #[test]
    fn test_amounts_below_range() {
        let env = Env::default();
        let (amount0, amount1) = get_amounts_for_liquidity(
            &env,
            Q96 * 8 / 10,
            Q96 * 9 / 10,
            Q96 * 11 / 10,
            1_000_000_000_000,
        );
        assert!(amount0 > 0);
        assert_eq!(amount1, 0);
    }

    #[test]
    fn test_amounts_above_range() {
        let env = Env::default();
        let (amount0, amount1) = get_amounts_for_liquidity(
            &env,
            Q96 * 12 / 10,
            Q96 * 9 / 10,
            Q96 * 11 / 10,
            1_000_000_000_000,
        );
        assert_eq!(amount0, 0);
        assert!(amount1 > 0);
    }

    #[test]
    fn test_amounts_proportional_to_liquidity() {
        let env = Env::default();
        let sqrt_lower = Q96 * 9 / 10;
        let sqrt_upper = Q96 * 11 / 10;

        let (amount0_1x, amount1_1x) =
            get_amounts_for_liquidity(&env, Q96, sqrt_lower, sqrt_upper, 1_000_000_000);
        let (amount0_2x, amount1_2x) =
            get_amounts_for_liquidity(&env, Q96, sqrt_lower, sqrt_upper, 2_000_000_000);

        // Within a few units of exactly double (floor rounding compounds)
        assert!(amount0_2x.abs_diff(amount0_1x * 2) <= 4);
        assert!(amount1_2x.abs_diff(amount1_1x * 2) <= 4);
    }

    #[test]
    fn test_amounts_large_liquidity_no_wrap() {
        let env = Env::default();
        // Liquidity far beyond 2^32 must not lose high bits in the Q96 scaling
        let liquidity = 1u128 << 90;
        let (amount0, amount1) = get_amounts_for_liquidity(
            &env,
            Q96,
            Q96 * 9 / 10,
            Q96 * 11 / 10,
            liquidity,
        );
        assert!(amount0 > 1u128 << 80);
        assert!(amount1 > 1u128 << 80);
    }

    // === Roundtrip tests ===

    #[test]
    fn test_token1_side_roundtrip() {
        let env = Env::default();
        // Above range only token1 is involved, so the roundtrip is tight
        let sqrt_price = Q96 * 12 / 10;
        let sqrt_lower = Q96 * 9 / 10;
        let sqrt_upper = Q96 * 11 / 10;
        let liquidity = 1_000_000_000_000_000u128;

        let (amount0, amount1) =
            get_amounts_for_liquidity(&env, sqrt_price, sqrt_lower, sqrt_upper, liquidity);
        assert_eq!(amount0, 0);

        let recovered =
            get_liquidity_for_amounts(&env, sqrt_price, sqrt_lower, sqrt_upper, amount0, amount1);
        let diff = liquidity.abs_diff(recovered);
        assert!(diff <= 10, "roundtrip drift {} too large", diff);
    }

    #[test]
    fn test_recovered_liquidity_never_exceeds_amounts() {
        let env = Env::default();
        let sqrt_lower = Q96 * 9 / 10;
        let sqrt_upper = Q96 * 11 / 10;
        let liquidity = 1_000_000_000_000_000u128;

        let (amount0, amount1) =
            get_amounts_for_liquidity(&env, Q96, sqrt_lower, sqrt_upper, liquidity);
        let recovered =
            get_liquidity_for_amounts(&env, Q96, sqrt_lower, sqrt_upper, amount0, amount1);
        let (check0, check1) =
            get_amounts_for_liquidity(&env, Q96, sqrt_lower, sqrt_upper, recovered);

        assert!(check0 <= amount0);
        assert!(check1 <= amount1);
    }
}
