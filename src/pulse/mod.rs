//! Pulse shaping filter tap generators.
//!
//! Pulse shaping band-limits a stream of symbols before transmission. The
//! usual approach is to upsample the symbols by inserting zeros and run the
//! result through an FIR filter whose taps are the pulse shape. This module
//! only computes those taps; applying them is left to the caller's filter.
//!
//! A root raised cosine filter is used in pairs, one at the transmitter and
//! a matched one at the receiver, so that the cascade is a raised cosine
//! response with no inter-symbol interference at the symbol centres.

pub mod rrc;
