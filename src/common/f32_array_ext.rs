//! `[f32]` extensions.

use alloc::vec::Vec;
use micromath::F32Ext;

/// `[f32]` extensions.
pub trait F32ArrayExt {
    /// Returns the maximum absolute value.
    fn peak_level(&self) -> f32;
    /// Returns the [root mean square](https://en.wikipedia.org/wiki/Root_mean_square)
    /// level.
    fn rms_level(&self) -> f32;
    /// Fills `indices` with the indices of the values in ascending order of value.
    /// Reuses the allocation of `indices`. The order of equal values is unspecified.
    fn argsort_into(&self, indices: &mut Vec<usize>);
}

impl F32ArrayExt for [f32] {
    fn peak_level(&self) -> f32 {
        let mut max: f32 = 0.0;
        for sample in self.iter() {
            let value = F32Ext::abs(*sample);
            if value > max {
                max = value
            }
        }
        max
    }

    fn rms_level(&self) -> f32 {
        if self.is_empty() {
            return 0.0;
        };
        let mut rms: f32 = 0.;
        for sample in self.iter() {
            rms += sample * sample
        }
        F32Ext::sqrt(rms / (self.len() as f32))
    }

    fn argsort_into(&self, indices: &mut Vec<usize>) {
        indices.clear();
        indices.extend(0..self.len());
        indices.sort_unstable_by(|a, b| self[*a].total_cmp(&self[*b]));
    }
}
