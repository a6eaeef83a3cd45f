//! Autocorrelation based tempo estimation.
//!
//! Periodicities in the envelope show up as peaks in its autocorrelation. Each
//! tick, the strongest lags within the tempo band vote for a tempo, and the
//! estimate is the most voted tempo among the recent votes. Candidates at half
//! the current estimate vote for the current estimate instead, which keeps the
//! estimate from jumping down an octave.
//!
//! # Examples
//! ```
//! use microbeat::config::TempoConfig;
//! use microbeat::tempo::TempoEstimator;
//!
//! let config = TempoConfig {
//!     window_size: 256,
//!     ..TempoConfig::default()
//! };
//! let mut estimator = TempoEstimator::from_config(config).unwrap();
//! // No estimate until the window is full.
//! for _ in 0..255 {
//!     assert_eq!(estimator.update(0.5), 0.0);
//! }
//! ```

mod estimator;

pub use estimator::TempoEstimator;
