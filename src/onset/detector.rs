use log::trace;

use crate::common::BoundedHistory;
use crate::config::OnsetConfig;
use crate::error::Result;

/// Whether the detector can fire on the next tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnsetState {
    /// Not in a refractory period.
    Ready,
    /// An onset fired recently, `remaining` more ticks must pass before
    /// the next one can fire.
    Refractory { remaining: u32 },
}

/// Detects sudden rises in an envelope signal, one envelope value per tick.
///
/// An onset fires when the envelope is above the gain threshold and rises
/// by more than `diff_margin` times the average of the recent positive rises.
/// After firing, no onset can fire for `refractory_ticks` ticks.
pub struct OnsetDetector {
    config: OnsetConfig,
    diff_history: BoundedHistory<f32>,
    last_value: f32,
    average_diff: f32,
    sleep_counter: i64,
    current_state: bool,
    state: OnsetState,
    tick: u64,
}

impl OnsetDetector {
    /// Creates a detector with default parameters.
    pub fn new() -> Self {
        OnsetDetector::with_valid_config(OnsetConfig::default())
    }

    pub fn from_config(config: OnsetConfig) -> Result<Self> {
        config.validate()?;
        Ok(OnsetDetector::with_valid_config(config))
    }

    fn with_valid_config(config: OnsetConfig) -> Self {
        OnsetDetector {
            config,
            diff_history: BoundedHistory::new(config.history_capacity),
            last_value: 0.0,
            average_diff: 0.0,
            sleep_counter: 0,
            current_state: false,
            state: OnsetState::Ready,
            tick: 0,
        }
    }

    pub fn config(&self) -> &OnsetConfig {
        &self.config
    }

    /// Processes the next envelope value. Returns true if an onset fired on this tick.
    pub fn update(&mut self, value: f32) -> bool {
        let diff = value - self.last_value;
        self.last_value = value;

        // The rise is compared to the average of the previous rises, so the
        // first rise above the gain threshold always fires.
        self.current_state = value > self.config.gain_threshold
            && diff > self.average_diff * self.config.diff_margin
            && self.sleep_counter <= 0;

        if diff > 0.0 {
            self.diff_history.push(diff);
            self.average_diff = self.diff_history.mean();
        }

        if self.current_state {
            trace!(
                "Onset at tick {}, value {}, rise {}, average rise {}",
                self.tick,
                value,
                diff,
                self.average_diff
            );
            self.sleep_counter = i64::from(self.config.refractory_ticks);
        }
        self.sleep_counter -= 1;

        self.state = if self.sleep_counter > 0 {
            OnsetState::Refractory {
                remaining: self.sleep_counter as u32,
            }
        } else {
            OnsetState::Ready
        };
        self.tick += 1;

        self.current_state
    }

    /// True if an onset fired on the most recent tick.
    pub fn current_state(&self) -> bool {
        self.current_state
    }

    pub fn state(&self) -> OnsetState {
        self.state
    }

    /// The mean of the recent positive rises.
    pub fn average_diff(&self) -> f32 {
        self.average_diff
    }

    /// The number of processed ticks.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn reset(&mut self) {
        self.diff_history.clear();
        self.last_value = 0.0;
        self.average_diff = 0.0;
        self.sleep_counter = 0;
        self.current_state = false;
        self.state = OnsetState::Ready;
        self.tick = 0;
    }
}

impl Default for OnsetDetector {
    fn default() -> Self {
        OnsetDetector::new()
    }
}
