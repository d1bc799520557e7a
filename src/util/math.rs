use num::{Complex, Num};
use num_traits::{NumCast, ToPrimitive};
use std::f64::consts::PI;

/// Casts a Complex<T> to a Complex<U>. All of the normal caveats with using
/// the `as` keyword apply here for the conversion.
pub fn cast_complex<T, U>(input: &Complex<T>) -> Option<Complex<U>>
where
    T: Clone + Num + NumCast,
    U: Clone + Num + NumCast,
{
    let re = U::from(input.re.clone())?;
    let im = U::from(input.im.clone())?;
    Some(Complex::new(re, im))
}

/// Number of samples per symbol for the given rates.
///
/// The ratio `sampling_rate / symbol_rate` is rounded half to even. Returns
/// `None` if the ratio is not finite, rounds to zero or does not fit in a
/// `usize`.
///
/// # Examples
///
/// ```
/// use rrcos_rs::util::math::oversampling_factor;
///
/// assert_eq!(oversampling_factor(1e6, 16e6), Some(16));
/// assert_eq!(oversampling_factor(2.0, 5.0), Some(2));
/// assert_eq!(oversampling_factor(2.0, 0.5), None);
/// ```
pub fn oversampling_factor(symbol_rate: f64, sampling_rate: f64) -> Option<usize> {
    let ratio = sampling_rate / symbol_rate;
    if !ratio.is_finite() {
        return None;
    }
    match ratio.round_ties_even().to_usize() {
        Some(0) | None => None,
        sps => sps,
    }
}

/// RRC tap at `t = 0`: `1 - alpha + 4 * alpha / pi`.
pub fn rrc_center_tap(alpha: f64) -> f64 {
    1.0 - alpha + (4.0 * alpha / PI)
}

/// RRC tap at `t = +/- T / (4 * alpha)`, the limit of the general formula
/// where both its numerator and denominator vanish.
///
/// Only meaningful for `alpha != 0`.
pub fn rrc_singular_tap(alpha: f64) -> f64 {
    let arg = PI / (4.0 * alpha);
    (alpha / 2.0_f64.sqrt())
        * (((1.0 + 2.0 / PI) * arg.sin()) + ((1.0 - 2.0 / PI) * arg.cos()))
}

/// RRC tap away from the singular points.
///
/// `period` is the symbol period `T` in the same unit as `t`. Returns `None`
/// if the denominator evaluates to exactly zero.
pub fn rrc_general_tap(t: f64, alpha: f64, period: f64) -> Option<f64> {
    let num = (PI * t * (1.0 - alpha) / period).sin()
        + 4.0 * alpha * (t / period) * (PI * t * (1.0 + alpha) / period).cos();
    let x = 4.0 * alpha * t / period;
    let den = PI * t * (1.0 - x * x) / period;
    if den == 0.0 {
        None
    } else {
        Some(num / den)
    }
}
