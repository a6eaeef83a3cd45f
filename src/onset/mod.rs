//! Envelope based [onset](https://en.wikipedia.org/wiki/Onset_(audio)) detection.
//!
//! The detector is fed one envelope value per tick, for example the RMS level
//! of each analysis hop, and reports whether an onset fired on that tick.
//! A rise counts as an onset if
//! * the envelope is above a fixed gain threshold,
//! * the rise is more than twice (by default) the average of the recent rises, and
//! * no onset fired during the refractory period.
//!
//! Before any rise has been observed the average rise is zero, so the first
//! rise above the gain threshold always fires.
//!
//! # Examples
//! ```
//! use microbeat::onset::OnsetDetector;
//!
//! let mut detector = OnsetDetector::new();
//! let mut onsets = vec![];
//! for tick in 0..40 {
//!     // Silence, then a sustained note.
//!     let envelope = if tick < 10 { 0.0 } else { 0.8 };
//!     if detector.update(envelope) {
//!         onsets.push(tick);
//!     }
//! }
//! assert_eq!(onsets, [10]);
//! ```

mod detector;

pub use detector::{OnsetDetector, OnsetState};
