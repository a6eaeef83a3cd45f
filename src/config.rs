//! Tuning parameters for the onset detector and the tempo estimator.
//!
//! The defaults work for a `[0, 1]` normalized envelope computed once per
//! 512 sample hop at 44.1 kHz. With the `serialization` feature enabled both
//! configs can be (partially) deserialized, missing fields take their default values.

use crate::common::validate_fft_size;
use crate::error::{Error, Result};

/// Onset detector parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct OnsetConfig {
    /// Envelope values at or below this level never trigger an onset.
    pub gain_threshold: f32,
    /// An onset requires the envelope rise to exceed the average recent
    /// rise times this factor.
    pub diff_margin: f32,
    /// Minimum number of ticks between two onsets.
    pub refractory_ticks: u32,
    /// Number of recent positive rises the average rise is computed over.
    pub history_capacity: usize,
}

impl Default for OnsetConfig {
    fn default() -> Self {
        OnsetConfig {
            gain_threshold: 0.25,
            diff_margin: 2.0,
            refractory_ticks: 12,
            history_capacity: 64,
        }
    }
}

impl OnsetConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.gain_threshold.is_finite() {
            return Err(Error::InvalidThreshold {
                name: "gain_threshold",
                value: self.gain_threshold,
            });
        }
        if !self.diff_margin.is_finite() || self.diff_margin < 0.0 {
            return Err(Error::InvalidThreshold {
                name: "diff_margin",
                value: self.diff_margin,
            });
        }
        if self.history_capacity == 0 {
            return Err(Error::ZeroParameter {
                name: "history_capacity",
            });
        }
        Ok(())
    }
}

/// Tempo estimator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct TempoConfig {
    /// The audio sample rate in Hz.
    pub sample_rate: f32,
    /// The number of audio samples per envelope value.
    pub hop_size: usize,
    /// The number of envelope values to autocorrelate. Must be a supported FFT size.
    pub window_size: usize,
    /// The number of strongest autocorrelation lags considered per tick.
    pub candidate_count: usize,
    /// Candidates at or below this tempo are ignored.
    pub min_bpm: f32,
    /// Candidates at or above this tempo are ignored.
    pub max_bpm: f32,
    /// A candidate whose double is within this distance of the current
    /// estimate is replaced by the current estimate.
    pub octave_margin: f32,
    /// The number of most recent votes the estimate is the mode of.
    pub vote_interval: usize,
    /// The tempo assumed before any estimate exists, used for octave smoothing.
    pub initial_bpm: f32,
    /// Fold out of band candidates into the band by doubling or halving
    /// instead of ignoring them.
    pub fold_octaves: bool,
}

impl Default for TempoConfig {
    fn default() -> Self {
        TempoConfig {
            sample_rate: 44100.0,
            hop_size: 512,
            window_size: 512,
            candidate_count: 6,
            min_bpm: 69.0,
            max_bpm: 180.0,
            octave_margin: 1.5,
            vote_interval: 32,
            initial_bpm: 120.0,
            fold_octaves: false,
        }
    }
}

impl TempoConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.sample_rate.is_finite() && self.sample_rate > 0.0) {
            return Err(Error::InvalidSampleRate(self.sample_rate));
        }
        if self.hop_size == 0 {
            return Err(Error::ZeroParameter { name: "hop_size" });
        }
        validate_fft_size(self.window_size)?;
        if self.candidate_count == 0 {
            return Err(Error::ZeroParameter {
                name: "candidate_count",
            });
        }
        if self.vote_interval == 0 {
            return Err(Error::ZeroParameter {
                name: "vote_interval",
            });
        }
        let band_is_valid = self.min_bpm.is_finite()
            && self.max_bpm.is_finite()
            && self.min_bpm > 0.0
            && self.min_bpm < self.max_bpm;
        if !band_is_valid {
            return Err(Error::InvalidTempoBand {
                min: self.min_bpm,
                max: self.max_bpm,
            });
        }
        // Folding needs the band to span at least one octave.
        if self.fold_octaves && self.max_bpm < 2.0 * self.min_bpm {
            return Err(Error::InvalidTempoBand {
                min: self.min_bpm,
                max: self.max_bpm,
            });
        }
        if !(self.octave_margin.is_finite() && self.octave_margin >= 0.0) {
            return Err(Error::InvalidThreshold {
                name: "octave_margin",
                value: self.octave_margin,
            });
        }
        if !(self.initial_bpm.is_finite() && self.initial_bpm >= 0.0) {
            return Err(Error::InvalidThreshold {
                name: "initial_bpm",
                value: self.initial_bpm,
            });
        }
        Ok(())
    }

    /// The duration in seconds of one envelope tick.
    pub fn hop_duration(&self) -> f32 {
        (self.hop_size as f32) / self.sample_rate
    }

    /// Converts an autocorrelation lag, in ticks, to a tempo in BPM.
    pub fn lag_to_bpm(&self, lag: usize) -> f32 {
        60.0 / (self.hop_duration() * (lag as f32))
    }

    /// True if `bpm` lies strictly inside the tempo band.
    pub fn is_in_band(&self, bpm: f32) -> bool {
        bpm > self.min_bpm && bpm < self.max_bpm
    }

    /// Doubles or halves `bpm` until it lies inside the tempo band.
    /// Returns `None` for non-positive or non-finite tempi.
    pub fn fold_into_band(&self, bpm: f32) -> Option<f32> {
        if !(bpm.is_finite() && bpm > 0.0) {
            return None;
        }
        let mut bpm = bpm;
        while bpm <= self.min_bpm {
            bpm *= 2.0;
        }
        while bpm >= self.max_bpm {
            bpm *= 0.5;
        }
        if self.is_in_band(bpm) {
            Some(bpm)
        } else {
            None
        }
    }
}
