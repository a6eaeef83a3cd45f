use alloc::vec::Vec;
use log::{debug, trace};
use micromath::F32Ext;

use crate::common::{
    AutocorrelationEngine, BoundedHistory, F32ArrayExt, ModeCounter, RealFft, Transform,
};
use crate::config::TempoConfig;
use crate::error::{Error, Result};

/// Lags correlating less than this fraction of the window energy are not
/// periodicities and never become candidates.
const MIN_RELATIVE_CORRELATION: f32 = 1e-3;

/// A tempo used as a vote table key. Ordered by bit pattern, which matches
/// numeric order for the positive tempi stored in it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
struct BpmKey(u32);

impl BpmKey {
    fn new(bpm: f32) -> Self {
        BpmKey(bpm.to_bits())
    }

    fn bpm(self) -> f32 {
        f32::from_bits(self.0)
    }
}

/// Estimates tempo in BPM from an envelope signal, one envelope value per tick.
///
/// Each tick, once the window is full:
/// 1. The window is autocorrelated.
/// 2. The `candidate_count` strongest lags (excluding lag 0) are converted to tempi.
/// 3. Tempi outside the tempo band are dropped (or folded into it, see
///    [`TempoConfig::fold_octaves`]).
/// 4. A tempo at half the current estimate is replaced by the current estimate.
/// 5. Each remaining tempo is a vote. The estimate is the most voted tempo
///    among the `vote_interval` most recent votes.
pub struct TempoEstimator<T: Transform = RealFft> {
    config: TempoConfig,
    history: BoundedHistory<f32>,
    autocorr: AutocorrelationEngine<T>,
    ranked_lags: Vec<usize>,
    votes: ModeCounter<BpmKey>,
    current_bpm: f32,
    tick: u64,
    has_filled_window: bool,
}

impl TempoEstimator<RealFft> {
    /// Creates an estimator with default parameters for a given envelope rate.
    pub fn new(sample_rate: f32, hop_size: usize) -> Result<Self> {
        TempoEstimator::from_config(TempoConfig {
            sample_rate,
            hop_size,
            ..TempoConfig::default()
        })
    }

    pub fn from_config(config: TempoConfig) -> Result<Self> {
        config.validate()?;
        TempoEstimator::from_transform(config, RealFft::new(config.window_size)?)
    }
}

impl<T: Transform> TempoEstimator<T> {
    /// Creates an estimator using a custom transform, whose size must equal
    /// the configured window size.
    pub fn from_transform(config: TempoConfig, transform: T) -> Result<Self> {
        config.validate()?;
        if transform.size() != config.window_size {
            return Err(Error::SizeMismatch {
                window_size: config.window_size,
                transform_size: transform.size(),
            });
        }
        Ok(TempoEstimator {
            config,
            history: BoundedHistory::new(config.window_size),
            autocorr: AutocorrelationEngine::from_transform(transform)?,
            ranked_lags: Vec::with_capacity(config.window_size),
            votes: ModeCounter::new(config.vote_interval),
            current_bpm: config.initial_bpm,
            tick: 0,
            has_filled_window: false,
        })
    }

    pub fn config(&self) -> &TempoConfig {
        &self.config
    }

    /// Processes the next envelope value and returns the current tempo
    /// estimate in BPM. Returns 0 until the window has been filled and at
    /// least one tempo candidate has been observed.
    pub fn update(&mut self, value: f32) -> f32 {
        self.tick += 1;
        self.history.push(value);
        if !self.history.is_full() {
            return 0.0;
        }
        if !self.has_filled_window {
            self.has_filled_window = true;
            debug!(
                "Tempo window of {} ticks filled after {} ticks",
                self.config.window_size, self.tick
            );
        }

        let autocorr = self.autocorr.compute(self.history.iter().copied());
        let energy = autocorr[0];
        // Silence, or a non-finite value in the window. Keep the previous estimate.
        if !energy.is_finite() || energy <= f32::EPSILON {
            return self.estimate();
        }
        // Lag 0 is excluded, index i in the ranking is lag i + 1.
        autocorr[1..].argsort_into(&mut self.ranked_lags);
        let min_correlation = energy * MIN_RELATIVE_CORRELATION;

        for index in self
            .ranked_lags
            .iter()
            .rev()
            .take(self.config.candidate_count)
        {
            let lag = index + 1;
            if autocorr[lag].is_nan() || autocorr[lag] <= min_correlation {
                continue;
            }
            let raw_bpm = self.config.lag_to_bpm(lag);
            let bpm = if self.config.is_in_band(raw_bpm) {
                raw_bpm
            } else if self.config.fold_octaves {
                match self.config.fold_into_band(raw_bpm) {
                    Some(bpm) => bpm,
                    None => continue,
                }
            } else {
                continue;
            };
            let bpm = smooth_candidate(bpm, self.current_bpm, self.config.octave_margin);
            trace!("Tick {}: lag {} votes for {} BPM", self.tick, lag, bpm);
            self.votes.increment(BpmKey::new(bpm));
        }

        if !self.votes.is_empty() {
            let bpm = self.votes.max_key().bpm();
            if bpm != self.current_bpm {
                debug!(
                    "Tempo estimate changed from {} to {} BPM at tick {}",
                    self.current_bpm, bpm, self.tick
                );
            }
            self.current_bpm = bpm;
        }

        self.estimate()
    }

    fn estimate(&self) -> f32 {
        if self.votes.is_empty() {
            0.0
        } else {
            self.current_bpm
        }
    }

    /// The most recent estimate, or the initial tempo if no estimate exists yet.
    pub fn current_bpm(&self) -> f32 {
        self.current_bpm
    }

    /// Applies octave smoothing to a tempo candidate: if twice the candidate
    /// is within `octave_margin` of the current estimate, the current estimate
    /// is returned instead.
    pub fn smooth_candidate(&self, bpm: f32) -> f32 {
        smooth_candidate(bpm, self.current_bpm, self.config.octave_margin)
    }

    /// Converts an autocorrelation lag, in ticks, to a tempo in BPM.
    pub fn bin_to_bpm(&self, lag: usize) -> f32 {
        self.config.lag_to_bpm(lag)
    }

    pub fn hop_size(&self) -> usize {
        self.config.hop_size
    }

    /// Sets the number of audio samples per envelope value.
    /// Votes already cast are kept.
    pub fn set_hop_size(&mut self, hop_size: usize) -> Result<()> {
        if hop_size == 0 {
            return Err(Error::ZeroParameter { name: "hop_size" });
        }
        self.config.hop_size = hop_size;
        Ok(())
    }

    /// True once `window_size` values have been processed.
    pub fn has_filled_window(&self) -> bool {
        self.has_filled_window
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.votes.clear();
        self.current_bpm = self.config.initial_bpm;
        self.tick = 0;
        self.has_filled_window = false;
    }
}

fn smooth_candidate(bpm: f32, current_bpm: f32, margin: f32) -> f32 {
    if F32Ext::abs(2.0 * bpm - current_bpm) < margin {
        current_bpm
    } else {
        bpm
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::TempoEstimator;
    use crate::common::RealFft;
    use crate::config::TempoConfig;
    use crate::error::Error;
    use approx::assert_abs_diff_eq;
    use dev_helpers::signals::impulse_train;

    const SAMPLE_RATE: f32 = 44100.0;
    const HOP_SIZE: usize = 512;

    #[test]
    fn test_returns_zero_until_window_is_full() {
        let mut estimator = TempoEstimator::new(SAMPLE_RATE, HOP_SIZE).unwrap();
        let envelope = impulse_train(120.0, HOP_SIZE, SAMPLE_RATE, 512);
        for value in envelope.iter().take(511) {
            assert_eq!(estimator.update(*value), 0.0);
        }
        assert!(!estimator.has_filled_window());
        estimator.update(envelope[511]);
        assert!(estimator.has_filled_window());
    }

    #[test]
    fn test_converges_to_120_bpm() {
        let mut estimator = TempoEstimator::new(SAMPLE_RATE, HOP_SIZE).unwrap();
        let envelope = impulse_train(120.0, HOP_SIZE, SAMPLE_RATE, 1200);
        let mut bpm = 0.0;
        for (tick, value) in envelope.iter().enumerate() {
            bpm = estimator.update(*value);
            if tick > 600 {
                assert_abs_diff_eq!(bpm, 120.0, epsilon = 2.0);
            }
        }
        assert_abs_diff_eq!(bpm, 120.0, epsilon = 2.0);
        assert_eq!(estimator.current_bpm(), bpm);
    }

    #[test]
    fn test_octave_smoothing() {
        let estimator = TempoEstimator::new(SAMPLE_RATE, HOP_SIZE).unwrap();
        assert_eq!(estimator.current_bpm(), 120.0);
        assert_eq!(estimator.smooth_candidate(60.0), 120.0);
        assert_eq!(estimator.smooth_candidate(59.5), 120.0);
        assert_eq!(estimator.smooth_candidate(58.0), 58.0);
        assert_eq!(estimator.smooth_candidate(120.0), 120.0);
        assert_eq!(estimator.smooth_candidate(90.0), 90.0);
    }

    #[test]
    fn test_silence_keeps_estimate() {
        let mut estimator = TempoEstimator::new(SAMPLE_RATE, HOP_SIZE).unwrap();
        let mut envelope = impulse_train(120.0, HOP_SIZE, SAMPLE_RATE, 1000);
        envelope.resize(1000 + 700, 0.0);
        let estimates: Vec<f32> =
            envelope.iter().map(|value| estimator.update(*value)).collect();

        // Once the window only holds silence, the estimate is frozen.
        let frozen = estimates[1000 + 512];
        assert!(frozen > 0.0);
        for bpm in &estimates[1000 + 512..] {
            assert_eq!(*bpm, frozen);
        }
    }

    #[test]
    fn test_all_silent_input_gives_zero() {
        let mut estimator = TempoEstimator::new(SAMPLE_RATE, HOP_SIZE).unwrap();
        for _ in 0..1000 {
            assert_eq!(estimator.update(0.0), 0.0);
        }
    }

    #[test]
    fn test_out_of_band_tempo_gives_no_estimate() {
        // All periodicities of a 60 BPM pulse are at or below 69 BPM.
        let mut estimator = TempoEstimator::new(SAMPLE_RATE, HOP_SIZE).unwrap();
        for value in impulse_train(60.0, HOP_SIZE, SAMPLE_RATE, 1200) {
            assert_eq!(estimator.update(value), 0.0);
        }
    }

    #[test]
    fn test_out_of_band_window_keeps_estimate() {
        let mut estimator = TempoEstimator::new(SAMPLE_RATE, HOP_SIZE).unwrap();
        let mut envelope = impulse_train(120.0, HOP_SIZE, SAMPLE_RATE, 1000);
        envelope.extend(impulse_train(60.0, HOP_SIZE, SAMPLE_RATE, 1200));
        let estimates: Vec<f32> =
            envelope.iter().map(|value| estimator.update(*value)).collect();

        let before = estimates[999];
        assert_abs_diff_eq!(before, 120.19, epsilon = 0.01);
        // From here on the window only holds 60 BPM pulses, which cast no votes.
        for bpm in &estimates[1000 + 512..] {
            assert_eq!(*bpm, before);
        }
    }

    #[test]
    fn test_non_finite_values_cast_no_votes() {
        for bad_value in [f32::NAN, f32::INFINITY] {
            let mut estimator = TempoEstimator::new(SAMPLE_RATE, HOP_SIZE).unwrap();
            let envelope = impulse_train(120.0, HOP_SIZE, SAMPLE_RATE, 1400);
            let mut bpm = 0.0;
            for value in &envelope[..700] {
                bpm = estimator.update(*value);
            }
            assert_abs_diff_eq!(bpm, 120.19, epsilon = 0.01);

            // The bad value stays in the window for the next 511 ticks.
            assert_eq!(estimator.update(bad_value), bpm);
            for value in &envelope[700..1211] {
                assert_eq!(estimator.update(*value), bpm);
            }
            for value in &envelope[1211..] {
                let estimate = estimator.update(*value);
                assert!(estimate.is_finite());
            }
        }
    }

    #[test]
    fn test_octave_folding() {
        let config = TempoConfig {
            fold_octaves: true,
            ..TempoConfig::default()
        };
        let mut estimator = TempoEstimator::from_config(config).unwrap();
        let mut bpm = 0.0;
        for value in impulse_train(60.0, HOP_SIZE, SAMPLE_RATE, 1200) {
            bpm = estimator.update(value);
        }
        assert!(config.is_in_band(bpm));
    }

    #[test]
    fn test_hop_size() {
        let mut estimator = TempoEstimator::new(SAMPLE_RATE, HOP_SIZE).unwrap();
        assert_eq!(estimator.hop_size(), 512);
        assert_abs_diff_eq!(estimator.bin_to_bpm(43), 120.19, epsilon = 0.01);
        estimator.set_hop_size(256).unwrap();
        assert_eq!(estimator.hop_size(), 256);
        assert_abs_diff_eq!(estimator.bin_to_bpm(86), 120.19, epsilon = 0.01);
        assert_eq!(
            estimator.set_hop_size(0),
            Err(Error::ZeroParameter { name: "hop_size" })
        );
    }

    #[test]
    fn test_reset() {
        let mut estimator = TempoEstimator::new(SAMPLE_RATE, HOP_SIZE).unwrap();
        for value in impulse_train(120.0, HOP_SIZE, SAMPLE_RATE, 700) {
            estimator.update(value);
        }
        estimator.reset();
        assert!(!estimator.has_filled_window());
        assert_eq!(estimator.current_bpm(), 120.0);
        assert_eq!(estimator.update(1.0), 0.0);
    }

    #[test]
    fn test_invalid_construction() {
        assert!(TempoEstimator::new(0.0, HOP_SIZE).is_err());
        assert!(TempoEstimator::new(SAMPLE_RATE, 0).is_err());

        let transform = RealFft::new(256).unwrap();
        let result = TempoEstimator::from_transform(TempoConfig::default(), transform);
        assert_eq!(
            result.err(),
            Some(Error::SizeMismatch {
                window_size: 512,
                transform_size: 256
            })
        );
    }

    #[test]
    fn test_smaller_window() {
        let config = TempoConfig {
            window_size: 256,
            ..TempoConfig::default()
        };
        let mut estimator = TempoEstimator::from_config(config).unwrap();
        let envelope = impulse_train(120.0, HOP_SIZE, SAMPLE_RATE, 800);
        for (tick, value) in envelope.iter().enumerate() {
            let bpm = estimator.update(*value);
            if tick < 255 {
                assert_eq!(bpm, 0.0);
            }
        }
        assert_abs_diff_eq!(estimator.current_bpm(), 120.0, epsilon = 2.0);
    }
}
