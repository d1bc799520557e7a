//! Error types and helper functions shared by the pulse shaping generators.

use std::error;
use std::fmt;

/// Errors raised while validating filter parameters.
///
/// Every variant is an invalid argument supplied by the caller; there is no
/// transient failure mode, so the only recovery is to retry with corrected
/// parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum FilterError {
    InvalidLengthError,
    InvalidRolloffError,
    InvalidRateError,
    DegenerateFilterError,
    InvalidToleranceError,
}

impl FilterError {
    /// Returns true if the error was caused by an invalid argument. This is
    /// the case for every variant.
    pub fn is_invalid_argument(&self) -> bool {
        match *self {
            FilterError::InvalidLengthError
            | FilterError::InvalidRolloffError
            | FilterError::InvalidRateError
            | FilterError::DegenerateFilterError
            | FilterError::InvalidToleranceError => true,
        }
    }
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let desc = match *self {
            FilterError::InvalidLengthError => {
                "Invalid filter length, must span at least one symbol and at most MAX_TAPS taps"
            }
            FilterError::InvalidRolloffError => {
                "Invalid rolloff parameter, must be on interval [0.0, 1.0]"
            }
            FilterError::InvalidRateError => {
                "Invalid rate, symbol and sampling rates must be finite and positive"
            }
            FilterError::DegenerateFilterError => {
                "Degenerate filter, samples per symbol must round to a nonzero size"
            }
            FilterError::InvalidToleranceError => {
                "Invalid singularity tolerance, must be finite and non-negative"
            }
        };
        write!(f, "Invalid argument: {}", desc)
    }
}

impl error::Error for FilterError {
    fn cause(&self) -> Option<&dyn error::Error> {
        None
    }
}

/// Closed form pieces of the pulse shapes and some casting helpers
pub mod math;

#[cfg(test)]
mod test {
    use super::FilterError;

    #[test]
    fn test_display() {
        let err = FilterError::InvalidRolloffError;
        assert_eq!(
            format!("{}", err),
            "Invalid argument: Invalid rolloff parameter, must be on interval [0.0, 1.0]"
        );
        assert!(err.is_invalid_argument());
    }
}
