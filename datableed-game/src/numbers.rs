//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Floor `value * fraction` and clamp it to the i32 range, returning 0 for non-finite products.
#[must_use]
pub fn floor_fraction_of(value: i32, fraction: f64) -> i32 {
    let product = f64::from(value) * fraction;
    if !product.is_finite() {
        return 0;
    }
    let min = f64::from(i32::MIN);
    let max = f64::from(i32::MAX);
    cast::<f64, i32>(product.floor().clamp(min, max)).unwrap_or(0)
}
