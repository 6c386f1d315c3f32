use soroban_sdk::{Env, U256};

/// Multiply and divide with 256-bit intermediate precision (rounds down)
/// Returns (a * b) / denominator
pub fn mul_div(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    if denominator == 0 {
        panic!("Division by zero");
    }

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let result = product.div(&U256::from_u128(env, denominator));

    u128_from_u256(env, &result)
}

/// Multiply and divide with 256-bit intermediate precision (rounds up)
/// Returns ceil((a * b) / denominator)
pub fn mul_div_rounding_up(env: &Env, a: u128, b: u128, denominator: u128) -> u128 {
    let result = mul_div(env, a, b, denominator);

    let product = U256::from_u128(env, a).mul(&U256::from_u128(env, b));
    let remainder = product.rem_euclid(&U256::from_u128(env, denominator));

    if remainder.gt(&U256::from_u32(env, 0)) {
        result + 1
    } else {
        result
    }
}

/// Unsigned division with rounding up
pub fn div_rounding_up(a: u128, b: u128) -> u128 {
    if b == 0 {
        panic!("Division by zero");
    }
    if a == 0 {
        return 0;
    }
    (a - 1) / b + 1
}

/// Convert U256 to u128, panics if the value does not fit
fn u128_from_u256(env: &Env, value: &U256) -> u128 {
    let max_u128 = U256::from_u128(env, u128::MAX);
    if value.gt(&max_u128) {
        panic!("U256 overflow when converting to u128");
    }
    value.to_u128().unwrap()
}
