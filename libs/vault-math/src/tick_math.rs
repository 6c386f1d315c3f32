use soroban_sdk::{Env, U256};
use vault_types::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK};

/// sqrt(1.0001^-(2^i)) in Q128, one entry per bit of the tick magnitude
const SQRT_RATIO_STEPS: [u128; 19] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
];

/// 2^128 as U256
fn q128(env: &Env) -> U256 {
    U256::from_u128(env, 1u128 << 64).mul(&U256::from_u128(env, 1u128 << 64))
}

/// Calculate sqrt(1.0001^tick) * 2^96
pub fn get_sqrt_ratio_at_tick(env: &Env, tick: i32) -> u128 {
    if tick < MIN_TICK || tick > MAX_TICK {
        panic!("Tick out of bounds");
    }

    let abs_tick = tick.unsigned_abs();

    // Accumulate the per-bit factors in Q128, for the negative tick
    let mut ratio = q128(env);
    for (bit, step) in SQRT_RATIO_STEPS.iter().enumerate() {
        if abs_tick & (1u32 << bit) != 0 {
            ratio = mul_shift_128(env, &ratio, *step);
        }
    }

    // Invert for positive ticks (factors above encode negative exponents)
    if tick > 0 {
        ratio = u256_max(env).div(&ratio);
    }

    // Q128 -> Q96
    let result = ratio.div(&U256::from_u128(env, 1u128 << 32));

    result
        .to_u128()
        .unwrap_or(u128::MAX)
        .clamp(MIN_SQRT_RATIO, MAX_SQRT_RATIO)
}

/// Largest tick whose sqrt ratio is <= the given sqrt price (binary search)
pub fn get_tick_at_sqrt_ratio(env: &Env, sqrt_price_x96: u128) -> i32 {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        panic!("sqrt price out of bounds");
    }

    let mut low = MIN_TICK;
    let mut high = MAX_TICK;

    while low < high {
        let mid = (low + high + 1) / 2;
        if get_sqrt_ratio_at_tick(env, mid) <= sqrt_price_x96 {
            low = mid;
        } else {
            high = mid - 1;
        }
    }

    low
}

/// Multiply a Q128 value by a u128 factor and shift back down by 128 bits
fn mul_shift_128(env: &Env, x: &U256, y: u128) -> U256 {
    x.mul(&U256::from_u128(env, y)).div(&q128(env))
}

/// 2^256 - 1
fn u256_max(env: &Env) -> U256 {
    let high = U256::from_u128(env, u128::MAX);
    high.mul(&q128(env)).add(&U256::from_u128(env, u128::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;
    use vault_types::Q96;

    #[test]
    fn test_sqrt_ratio_at_tick_zero() {
        let env = Env::default();
        let sqrt_price = get_sqrt_ratio_at_tick(&env, 0);
        let diff = sqrt_price.abs_diff(Q96);
        assert!(diff < Q96 / 1000, "tick 0 should give sqrt_price close to 2^96");
    }

    #[test]
    fn test_sqrt_ratio_sign_of_tick() {
        let env = Env::default();
        assert!(get_sqrt_ratio_at_tick(&env, 100) > Q96);
        assert!(get_sqrt_ratio_at_tick(&env, -100) < Q96);
    }

    #[test]
    fn test_sqrt_ratio_monotonic() {
        let env = Env::default();
        let mut prev = get_sqrt_ratio_at_tick(&env, -10000);
        for tick in (-9999..=10000).step_by(500) {
            let sqrt = get_sqrt_ratio_at_tick(&env, tick);
            assert!(sqrt > prev, "sqrt ratio must increase with tick");
            prev = sqrt;
        }
    }

    #[test]
    fn test_sqrt_ratio_symmetric_product() {
        let env = Env::default();
        // sqrt(1.0001^n) * sqrt(1.0001^-n) = 1, so the Q96 product is ~Q96
        let pos = get_sqrt_ratio_at_tick(&env, 1000);
        let neg = get_sqrt_ratio_at_tick(&env, -1000);
        let product = crate::full_math::mul_div(&env, pos, neg, Q96);
        let diff = product.abs_diff(Q96);
        assert!(diff < Q96 / 100);
    }

    #[test]
    fn test_sqrt_ratio_bounds() {
        let env = Env::default();
        let min_sqrt = get_sqrt_ratio_at_tick(&env, MIN_TICK);
        let max_sqrt = get_sqrt_ratio_at_tick(&env, MAX_TICK);
        assert!(min_sqrt >= MIN_SQRT_RATIO);
        assert!(max_sqrt <= MAX_SQRT_RATIO);
        assert!(min_sqrt < Q96 / 1000);
        assert!(max_sqrt > Q96 * 1000);
    }

    #[test]
    #[should_panic(expected = "Tick out of bounds")]
    fn test_sqrt_ratio_below_min_tick() {
        let env = Env::default();
        get_sqrt_ratio_at_tick(&env, MIN_TICK - 1);
    }

    #[test]
    #[should_panic(expected = "Tick out of bounds")]
    fn test_sqrt_ratio_above_max_tick() {
        let env = Env::default();
        get_sqrt_ratio_at_tick(&env, MAX_TICK + 1);
    }

    #[test]
    fn test_tick_at_sqrt_ratio_q96() {
        let env = Env::default();
        let tick = get_tick_at_sqrt_ratio(&env, Q96);
        assert!(tick.abs() <= 1);
    }

    #[test]
    fn test_tick_at_sqrt_ratio_roundtrip() {
        let env = Env::default();
        for tick in [-100000, -1000, -60, 0, 60, 1000, 100000] {
            let sqrt_price = get_sqrt_ratio_at_tick(&env, tick);
            let recovered = get_tick_at_sqrt_ratio(&env, sqrt_price);
            assert!(
                (recovered - tick).abs() <= 1,
                "tick {} roundtripped to {}",
                tick,
                recovered
            );
        }
    }

    #[test]
    #[should_panic(expected = "sqrt price out of bounds")]
    fn test_tick_at_sqrt_ratio_below_min() {
        let env = Env::default();
        get_tick_at_sqrt_ratio(&env, MIN_SQRT_RATIO - 1);
    }

    #[test]
    #[should_panic(expected = "sqrt price out of bounds")]
    fn test_tick_at_sqrt_ratio_at_max() {
        let env = Env::default();
        // MAX_SQRT_RATIO is exclusive
        get_tick_at_sqrt_ratio(&env, MAX_SQRT_RATIO);
    }
}
