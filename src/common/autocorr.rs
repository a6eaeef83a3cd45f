use alloc::{boxed::Box, vec};

use super::fft::{RealFft, Transform};
use crate::error::{Error, Result};

/// Computes the circular [autocorrelation](https://en.wikipedia.org/wiki/Autocorrelation)
/// of a window using the [Wiener–Khinchin theorem](https://en.wikipedia.org/wiki/Wiener%E2%80%93Khinchin_theorem),
/// i.e by inverse transforming the power spectrum of the window.
///
/// The result has the same length `N` as the transform. Lag 0 holds the
/// energy of the window and is always the largest value. Windows shorter than
/// `N` are zero padded, which avoids circular convolution effects for lags
/// below `N - window.len()`.
pub struct AutocorrelationEngine<T: Transform = RealFft> {
    transform: T,
    spectrum: Box<[f32]>,
}

impl AutocorrelationEngine<RealFft> {
    pub fn new(size: usize) -> Result<Self> {
        AutocorrelationEngine::from_transform(RealFft::new(size)?)
    }
}

impl<T: Transform> AutocorrelationEngine<T> {
    /// Fails if the power spectrum of `transform` does not have
    /// `size / 2 + 1` bins.
    pub fn from_transform(transform: T) -> Result<Self> {
        let bin_count = transform.size() / 2 + 1;
        let power_len = transform.power().len();
        if power_len != bin_count {
            return Err(Error::SpectrumSizeMismatch {
                expected: bin_count,
                actual: power_len,
            });
        }
        Ok(AutocorrelationEngine {
            transform,
            spectrum: vec![0.; bin_count].into_boxed_slice(),
        })
    }

    pub fn size(&self) -> usize {
        self.transform.size()
    }

    pub fn transform(&self) -> &T {
        &self.transform
    }

    /// Computes the autocorrelation of `window`. Values are unnormalized,
    /// lag 0 equals the sum of the squared samples.
    pub fn compute<I>(&mut self, window: I) -> &[f32]
    where
        I: IntoIterator<Item = f32>,
    {
        self.transform.forward(window);
        self.spectrum.copy_from_slice(self.transform.power());
        self.transform.inverse(&self.spectrum);
        self.transform.input()
    }
}

/// Computes the [autocorrelation](https://en.wikipedia.org/wiki/Autocorrelation)
/// of a given buffer using time domain convolution.
pub fn autocorr_conv(window: &[f32], result: &mut [f32]) {
    let window_size = window.len();
    if window_size < result.len() {
        panic!("Result vector must not be longer than the window.");
    }

    for (tau, result) in result.iter_mut().enumerate() {
        let mut sum: f32 = 0.0;
        for j in 0..(window_size - tau) {
            sum += window[j] * window[j + tau];
        }
        *result = sum;
    }
}
