//! This module provides an easy single import for those using this crate.

pub use crate::pulse::rrc::{
    generate, generate_with, FilterSpec, GenerateOptions, ImpulseResponse,
    SingularityDetection, MAX_TAPS,
};
pub use crate::util::FilterError;
