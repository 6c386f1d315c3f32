#![no_std]

mod pool;
mod vault;

pub use pool::*;
pub use vault::*;

/// Q96 constant (2^96) for fixed-point math
pub const Q96: u128 = 1 << 96;

/// Minimum tick index
/// Limited by u128 sqrt-price representation (originally -887272 for uint160)
pub const MIN_TICK: i32 = -443636;

/// Maximum tick index
/// Limited by u128 sqrt-price representation (originally 887272 for uint160)
pub const MAX_TICK: i32 = 443636;

/// Minimum sqrt price (at MIN_TICK)
/// sqrt(1.0001^-443636) * 2^96
pub const MIN_SQRT_RATIO: u128 = 18446743374134;

/// Maximum sqrt price (at MAX_TICK), bounded by u128::MAX
pub const MAX_SQRT_RATIO: u128 = 340275971719517849884101479065584693834;

/// Basis-point denominator shared by fee and tolerance configuration
pub const BPS: u128 = 10_000;
