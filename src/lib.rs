//! Real time [onset](https://en.wikipedia.org/wiki/Onset_(audio)) detection and
//! [tempo](https://en.wikipedia.org/wiki/Tempo) estimation from an audio envelope.
//!
//! Both detectors consume one envelope value per tick, for example the RMS level
//! of each hop of 512 samples, and produce a result for every tick:
//! * [`onset::OnsetDetector`] reports whether the envelope rose sharply on this tick.
//! * [`tempo::TempoEstimator`] reports the current tempo in BPM, based on the
//!   autocorrelation of the most recent envelope values.
//!
//! Features
//! * `no_std` compatible, only depends on `alloc`.
//! * No allocations after construction, suitable for real time audio use.
//! * FFT accelerated autocorrelation computation.
//! * Optional [serde](https://serde.rs) support for the configuration types,
//!   enabled with the `serialization` feature.
//!
//! # Examples
//!
//! ```
//! use microbeat::tempo::TempoEstimator;
//!
//! let sample_rate = 44100.0;
//! let hop_size = 512;
//! let mut estimator = TempoEstimator::new(sample_rate, hop_size).unwrap();
//!
//! // An envelope with a beat every 43 ticks, i.e about 120 BPM.
//! let mut bpm = 0.0;
//! for tick in 0..1024 {
//!     let envelope = if tick % 43 == 0 { 1.0 } else { 0.0 };
//!     bpm = estimator.update(envelope);
//! }
//! assert!((bpm - 120.19).abs() < 0.01);
//! ```
#![no_std]

extern crate alloc;
#[cfg(test)]
extern crate std;

pub mod common;
pub mod config;
pub mod error;
pub mod onset;
pub mod tempo;

pub use config::{OnsetConfig, TempoConfig};
pub use error::{Error, Result};
