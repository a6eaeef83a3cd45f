//! Error types for constructing and configuring detectors.
//!
//! Per-tick processing never fails. Only construction and reconfiguration
//! can be rejected.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum Error {
    #[error("Unsupported FFT size {0}, expected a power of two between 8 and 4096")]
    UnsupportedFftSize(usize),

    #[error("{name} must be greater than 0")]
    ZeroParameter { name: &'static str },

    #[error("Invalid sample rate {0} Hz")]
    InvalidSampleRate(f32),

    #[error("Invalid tempo band: min={min} BPM, max={max} BPM")]
    InvalidTempoBand { min: f32, max: f32 },

    #[error("Invalid {name}: {value}")]
    InvalidThreshold { name: &'static str, value: f32 },

    #[error("Transform size {transform_size} does not match window size {window_size}")]
    SizeMismatch {
        window_size: usize,
        transform_size: usize,
    },

    #[error("Transform has {actual} power spectrum bins, expected {expected}")]
    SpectrumSizeMismatch { expected: usize, actual: usize },
}

pub type Result<T> = core::result::Result<T, Error>;
