//! Root raised cosine (RRC) filter tap generation.
//!
//! The RRC impulse response is
//!
//! ```text
//!         sin(pi t (1 - a) / T) + 4 a (t / T) cos(pi t (1 + a) / T)
//! h(t) = -----------------------------------------------------------
//!                  pi t (1 - (4 a t / T)^2) / T
//! ```
//!
//! which is 0/0 at `t = 0` and at `t = +/- T / (4 a)`. At those points the
//! closed form limits are substituted instead.
//!
//! Singular points are detected with exact floating point equality by
//! default. A sample that lands within rounding distance of `T / (4 a)` but
//! not bitwise on it is evaluated with the general formula, which is finite
//! but loses precision there. `SingularityDetection::Tolerance` widens the
//! match when that matters more than reproducing the reference taps.

use crate::util::math::{self, cast_complex};
use crate::util::FilterError;

use num::{Complex, Num, NumCast};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Largest number of taps `validate` accepts. Bounds the two output vectors
/// to 4 GiB combined.
pub const MAX_TAPS: usize = 1 << 28;

/// Parameters of an RRC filter.
///
/// Built without validation; `validate` and the generators check it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Number of symbol periods spanned by the filter.
    pub length_symbols: usize,
    /// Roll-off factor, on the interval [0.0, 1.0].
    pub roll_off: f64,
    /// Symbol rate in Hz.
    pub symbol_rate: f64,
    /// Sampling rate in Hz.
    pub sampling_rate: f64,
}

impl FilterSpec {
    /// Constructs a new `FilterSpec`.
    ///
    /// # Arguments
    ///
    /// * `length_symbols` - Length of the filter in symbols.
    /// * `roll_off` - Roll-off factor, valid values are [0.0, 1.0].
    /// * `symbol_rate` - Symbol rate in Hz.
    /// * `sampling_rate` - Sampling rate in Hz.
    pub fn new(
        length_symbols: usize,
        roll_off: f64,
        symbol_rate: f64,
        sampling_rate: f64,
    ) -> Self {
        FilterSpec {
            length_symbols,
            roll_off,
            symbol_rate,
            sampling_rate,
        }
    }

    /// Checks the parameters and returns the samples per symbol and the
    /// total number of taps.
    ///
    /// # Examples
    ///
    /// ```
    /// use rrcos_rs::pulse::rrc::FilterSpec;
    ///
    /// let spec = FilterSpec::new(32, 0.05, 1e6, 16e6);
    /// assert_eq!(spec.validate(), Ok((16, 512)));
    /// ```
    pub fn validate(&self) -> Result<(usize, usize), FilterError> {
        if self.length_symbols == 0 {
            return Err(FilterError::InvalidLengthError);
        }
        if !(0.0..=1.0).contains(&self.roll_off) {
            return Err(FilterError::InvalidRolloffError);
        }
        for &rate in &[self.symbol_rate, self.sampling_rate] {
            if !(rate > 0.0 && rate.is_finite()) {
                return Err(FilterError::InvalidRateError);
            }
        }
        let sps = math::oversampling_factor(self.symbol_rate, self.sampling_rate)
            .ok_or(FilterError::DegenerateFilterError)?;
        let n_taps = self
            .length_symbols
            .checked_mul(sps)
            .ok_or(FilterError::DegenerateFilterError)?;
        if n_taps > MAX_TAPS {
            return Err(FilterError::InvalidLengthError);
        }
        Ok((sps, n_taps))
    }

    /// Generates the impulse response with the default options.
    pub fn generate(&self) -> Result<ImpulseResponse, FilterError> {
        generate_with(self, &GenerateOptions::default())
    }
}

/// How sample times are matched against the singular points of the RRC
/// formula.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum SingularityDetection {
    /// Bitwise equality. Reproduces the reference taps.
    Exact,
    /// Match when the sample time is within the given distance, in seconds.
    Tolerance(f64),
}

impl Default for SingularityDetection {
    fn default() -> Self {
        SingularityDetection::Exact
    }
}

impl SingularityDetection {
    fn matches(self, t: f64, point: f64) -> bool {
        match self {
            SingularityDetection::Exact => t == point,
            SingularityDetection::Tolerance(tol) => (t - point).abs() <= tol,
        }
    }
}

/// Options for `generate_with`. The default gives the reference output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GenerateOptions {
    pub detection: SingularityDetection,
    /// Evaluate samples on the rayon thread pool. Output is bit-identical to
    /// the sequential evaluation.
    pub parallel: bool,
}

/// Taps of an RRC filter together with the time of each tap.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ImpulseResponse {
    time_indices: Vec<f64>,
    taps: Vec<f64>,
    samples_per_symbol: usize,
}

impl ImpulseResponse {
    /// Time of each tap in seconds, centred on zero.
    pub fn time_indices(&self) -> &[f64] {
        &self.time_indices
    }

    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    pub fn len(&self) -> usize {
        self.taps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taps.is_empty()
    }

    pub fn samples_per_symbol(&self) -> usize {
        self.samples_per_symbol
    }

    /// Index of the tap at `t = 0`, which is `len() / 2` rounded down.
    pub fn center_index(&self) -> usize {
        self.taps.len() / 2
    }

    /// Iterates over `(time, tap)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.time_indices
            .iter()
            .cloned()
            .zip(self.taps.iter().cloned())
    }

    /// Splits the response into its time indices and taps.
    pub fn into_parts(self) -> (Vec<f64>, Vec<f64>) {
        (self.time_indices, self.taps)
    }

    /// Converts the taps to `Complex<T>` with a zero imaginary part, as
    /// expected by complex FIR filters. Returns `None` if any tap cannot be
    /// represented in `T`.
    ///
    /// # Examples
    ///
    /// ```
    /// use rrcos_rs::pulse::rrc::generate;
    /// use num::Complex;
    ///
    /// let response = generate(4, 0.35, 1.0, 4.0).unwrap();
    /// let taps: Vec<Complex<f32>> = response.to_complex_taps().unwrap();
    /// assert_eq!(taps.len(), 16);
    /// ```
    pub fn to_complex_taps<T>(&self) -> Option<Vec<Complex<T>>>
    where
        T: Clone + Num + NumCast,
    {
        self.taps
            .iter()
            .map(|&h| cast_complex(&Complex::new(h, 0.0)))
            .collect()
    }

    /// Returns a copy with the taps scaled to unit energy. A response with
    /// zero energy is returned unchanged.
    pub fn unit_energy(&self) -> ImpulseResponse {
        let energy: f64 = self.taps.iter().map(|h| h * h).sum();
        let norm = energy.sqrt();
        let mut response = self.clone();
        if norm > 0.0 {
            for h in &mut response.taps {
                *h /= norm;
            }
        }
        response
    }
}

/// Per-sample evaluation of the RRC formula for a validated spec.
struct TapEvaluator {
    alpha: f64,
    period: f64,
    delta: f64,
    half: usize,
    singular_time: Option<f64>,
    detection: SingularityDetection,
}

impl TapEvaluator {
    fn sample(&self, x: usize) -> (f64, f64) {
        // Integer centring: for odd N the centre sits half a sample early.
        let offset = x as i64 - self.half as i64;
        let t = offset as f64 * self.delta;
        (t, self.tap(x, t))
    }

    fn tap(&self, x: usize, t: f64) -> f64 {
        if self.detection.matches(t, 0.0) {
            return math::rrc_center_tap(self.alpha);
        }
        if let Some(ts) = self.singular_time {
            if self.detection.matches(t, ts) || self.detection.matches(t, -ts) {
                trace!(index = x, t, "substituting singular RRC limit");
                return math::rrc_singular_tap(self.alpha);
            }
        }
        match math::rrc_general_tap(t, self.alpha, self.period) {
            Some(h) => h,
            None => {
                warn!(index = x, t, "RRC denominator vanished off a singular point");
                match self.singular_time {
                    Some(ts) if t.abs() > ts / 2.0 => math::rrc_singular_tap(self.alpha),
                    _ => math::rrc_center_tap(self.alpha),
                }
            }
        }
    }
}

/// Generates the taps of an RRC filter.
///
/// # Arguments
///
/// * `length_symbols` - Length of the filter in symbols.
/// * `roll_off` - Roll-off factor, valid values are [0.0, 1.0].
/// * `symbol_rate` - Symbol rate in Hz.
/// * `sampling_rate` - Sampling rate in Hz.
///
/// # Examples
///
/// ```
/// use rrcos_rs::pulse::rrc::generate;
///
/// let response = generate(32, 0.05, 1e6, 16e6).unwrap();
/// assert_eq!(response.len(), 512);
/// assert!((response.time_indices()[0] + 1.6e-5).abs() < 1e-12);
///
/// assert!(generate(32, 1.5, 1e6, 16e6).is_err());
/// ```
pub fn generate(
    length_symbols: usize,
    roll_off: f64,
    symbol_rate: f64,
    sampling_rate: f64,
) -> Result<ImpulseResponse, FilterError> {
    FilterSpec::new(length_symbols, roll_off, symbol_rate, sampling_rate).generate()
}

/// Generates the taps of an RRC filter with explicit options.
///
/// # Arguments
///
/// * `spec` - Filter parameters.
/// * `options` - Singularity detection mode and parallel evaluation.
///
/// # Examples
///
/// ```
/// use rrcos_rs::pulse::rrc::*;
///
/// let spec = FilterSpec::new(8, 0.35, 1e6, 8e6);
/// let options = GenerateOptions {
///     detection: SingularityDetection::Tolerance(1e-15),
///     parallel: true,
/// };
/// let response = generate_with(&spec, &options).unwrap();
/// assert_eq!(response.len(), 64);
/// ```
pub fn generate_with(
    spec: &FilterSpec,
    options: &GenerateOptions,
) -> Result<ImpulseResponse, FilterError> {
    if let SingularityDetection::Tolerance(tol) = options.detection {
        if !(tol >= 0.0 && tol.is_finite()) {
            return Err(FilterError::InvalidToleranceError);
        }
    }
    let (sps, n_taps) = spec.validate()?;

    debug!(
        length_symbols = spec.length_symbols,
        roll_off = spec.roll_off,
        sps,
        n_taps,
        parallel = options.parallel,
        "generating RRC taps"
    );

    let alpha = spec.roll_off;
    let period = 1.0 / spec.symbol_rate;
    let evaluator = TapEvaluator {
        alpha,
        period,
        delta: 1.0 / spec.sampling_rate,
        half: n_taps / 2,
        singular_time: if alpha != 0.0 {
            Some(period / (4.0 * alpha))
        } else {
            None
        },
        detection: options.detection,
    };

    let mut time_indices = Vec::with_capacity(n_taps);
    let mut taps = Vec::with_capacity(n_taps);
    if options.parallel {
        (0..n_taps)
            .into_par_iter()
            .map(|x| evaluator.sample(x))
            .unzip_into_vecs(&mut time_indices, &mut taps);
    } else {
        for x in 0..n_taps {
            let (t, h) = evaluator.sample(x);
            time_indices.push(t);
            taps.push(h);
        }
    }

    Ok(ImpulseResponse {
        time_indices,
        taps,
        samples_per_symbol: sps,
    })
}

#[cfg(test)]
mod test {
    use crate::pulse::rrc::*;
    use crate::util::math;
    use assert_approx_eq::assert_approx_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_reference_scenario() {
        let response = generate(32, 0.05, 1_000_000.0, 16_000_000.0).unwrap();
        assert_eq!(response.len(), 512);
        assert_eq!(response.time_indices().len(), 512);
        assert_eq!(response.samples_per_symbol(), 16);
        assert_approx_eq!(response.time_indices()[0], -1.6e-5, 1e-15);
        let center = response.center_index();
        assert_eq!(center, 256);
        assert_eq!(response.time_indices()[center], 0.0);
        assert_approx_eq!(response.taps()[center], 1.013_662, 1e-6);
    }

    #[test]
    fn test_center_tap_every_rolloff() {
        for i in 0..=20 {
            let alpha = i as f64 / 20.0;
            let response = generate(6, alpha, 2400.0, 9600.0).unwrap();
            let center = response.taps()[response.center_index()];
            assert_approx_eq!(center, 1.0 - alpha + 4.0 * alpha / PI, 1e-9);
        }
    }

    #[test]
    fn test_singular_points_hit() {
        // T = 1, delta = 0.25, T / (4 * 0.25) = 1.0 lands on offsets +/- 4.
        let response = generate(4, 0.25, 1.0, 4.0).unwrap();
        let expected = math::rrc_singular_tap(0.25);
        assert_eq!(response.time_indices()[4], -1.0);
        assert_eq!(response.time_indices()[12], 1.0);
        assert_eq!(response.taps()[4], expected);
        assert_eq!(response.taps()[12], expected);
        assert!(response.taps().iter().all(|h| h.is_finite()));
    }

    #[test]
    fn test_vanished_denominator_takes_singular_limit() {
        // 4 a t / T rounds to exactly 1 at offsets +/- 41 although t misses
        // T / (4 a) bitwise.
        let alpha = 16.0 / 164.0;
        let response = generate(32, alpha, 1e6, 16e6).unwrap();
        let period = 1.0 / 1e6;
        let ts = period / (4.0 * alpha);
        let expected = math::rrc_singular_tap(alpha);
        for &i in &[215, 297] {
            let t = response.time_indices()[i];
            assert!(t != ts && t != -ts);
            assert_eq!(math::rrc_general_tap(t, alpha, period), None);
            assert_eq!(response.taps()[i].to_bits(), expected.to_bits());
        }
    }

    #[test]
    fn test_tap_count_limit() {
        let spec = FilterSpec::new(MAX_TAPS / 2, 0.35, 1.0, 2.0);
        assert_eq!(spec.validate(), Ok((2, MAX_TAPS)));
        let spec = FilterSpec::new(MAX_TAPS / 2 + 1, 0.35, 1.0, 2.0);
        assert_eq!(spec.validate(), Err(FilterError::InvalidLengthError));
        assert_eq!(
            generate(MAX_TAPS, 0.35, 1.0, 2.0),
            Err(FilterError::InvalidLengthError)
        );
    }

    #[test]
    fn test_zero_rolloff_is_sinc() {
        let response = generate(8, 0.0, 1.0, 8.0).unwrap();
        for (t, h) in response.iter() {
            if t == 0.0 {
                assert_eq!(h, 1.0);
            } else {
                let x = PI * t;
                assert_approx_eq!(h, x.sin() / x, 1e-12);
            }
        }
    }

    #[test]
    fn test_odd_length_centring() {
        // N = 3 * 3 = 9, N / 2 truncates to 4.
        let response = generate(3, 0.5, 1.0, 3.0).unwrap();
        assert_eq!(response.len(), 9);
        assert_eq!(response.center_index(), 4);
        let step = 1.0 / 3.0;
        assert_approx_eq!(response.time_indices()[0], -4.0 * step);
        assert_approx_eq!(response.time_indices()[8], 4.0 * step);
        assert_eq!(response.time_indices()[4], 0.0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let spec = FilterSpec::new(32, 0.22, 1e6, 16e6);
        let sequential = spec.generate().unwrap();
        let options = GenerateOptions {
            parallel: true,
            ..GenerateOptions::default()
        };
        let parallel = generate_with(&spec, &options).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_tolerance_mode() {
        let spec = FilterSpec::new(4, 0.25, 1.0, 4.0);
        let options = GenerateOptions {
            detection: SingularityDetection::Tolerance(1e-9),
            parallel: false,
        };
        let loose = generate_with(&spec, &options).unwrap();
        assert_eq!(loose, spec.generate().unwrap());

        let options = GenerateOptions {
            detection: SingularityDetection::Tolerance(-1.0),
            parallel: false,
        };
        assert_eq!(
            generate_with(&spec, &options),
            Err(FilterError::InvalidToleranceError)
        );
    }

    #[test]
    fn test_unit_energy() {
        let response = generate(6, 0.35, 1.0, 4.0).unwrap().unit_energy();
        let energy: f64 = response.taps().iter().map(|h| h * h).sum();
        assert_approx_eq!(energy, 1.0, 1e-12);
    }

    #[test]
    fn test_into_parts() {
        let response = generate(2, 0.5, 1.0, 2.0).unwrap();
        let (time_indices, taps) = response.clone().into_parts();
        assert_eq!(&time_indices[..], response.time_indices());
        assert_eq!(&taps[..], response.taps());
    }
}
