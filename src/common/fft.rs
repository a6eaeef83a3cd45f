use alloc::{boxed::Box, vec};

use super::window_function::{WindowFunction, WindowTable};
use crate::error::{Error, Result};

macro_rules! rfft_dispatch {
    ($buffer:expr, $($size:literal => $func:ident),+ $(,)?) => {{
        let fft_size = $buffer.len();
        match fft_size {
            $($size => {
                let input: &mut [f32; $size] = $buffer
                    .try_into()
                    .map_err(|_| Error::UnsupportedFftSize(fft_size))?;
                Ok(&mut microfft::real::$func(input)[..])
            })+
            _ => Err(Error::UnsupportedFftSize(fft_size)),
        }
    }};
}

/// Performs an in-place real FFT on a given buffer. The returned spectrum has
/// `buffer.len() / 2` bins, with the real valued coefficient at the Nyquist
/// frequency packed into the imaginary part of the DC bin.
pub fn real_fft(buffer: &mut [f32]) -> Result<&mut [microfft::Complex32]> {
    rfft_dispatch!(buffer,
        8 => rfft_8,
        16 => rfft_16,
        32 => rfft_32,
        64 => rfft_64,
        128 => rfft_128,
        256 => rfft_256,
        512 => rfft_512,
        1024 => rfft_1024,
        2048 => rfft_2048,
        4096 => rfft_4096,
    )
}

/// Checks that `size` is a supported FFT size.
pub fn validate_fft_size(size: usize) -> Result<()> {
    if size.is_power_of_two() && (8..=4096).contains(&size) {
        Ok(())
    } else {
        Err(Error::UnsupportedFftSize(size))
    }
}

/// A real valued transform of a fixed size `N`.
pub trait Transform {
    /// The transform size `N`.
    fn size(&self) -> usize;

    /// Transforms up to `N` samples, zero padding if fewer are given.
    fn forward<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = f32>;

    /// The power spectrum `|X_k|^2` of the most recent forward transform,
    /// `N / 2 + 1` bins from DC to Nyquist. The length must not change over
    /// the lifetime of the transform.
    fn power(&self) -> &[f32];

    /// Inverse transforms a real, even spectrum given as `N / 2 + 1` bins.
    /// The result is available through [`input`](Transform::input).
    fn inverse(&mut self, spectrum: &[f32]);

    /// The time domain buffer: the (windowed) forward input, or the result
    /// of the most recent inverse transform.
    fn input(&self) -> &[f32];
}

/// A [`Transform`] backed by [microfft](https://crates.io/crates/microfft).
pub struct RealFft {
    input: Box<[f32]>,
    scratch: Box<[f32]>,
    power: Box<[f32]>,
    window: Option<WindowTable>,
}

impl RealFft {
    pub fn new(size: usize) -> Result<Self> {
        validate_fft_size(size)?;
        Ok(RealFft {
            input: vec![0.; size].into_boxed_slice(),
            scratch: vec![0.; size].into_boxed_slice(),
            power: vec![0.; size / 2 + 1].into_boxed_slice(),
            window: None,
        })
    }

    /// Creates a transform that applies a window function to its forward input.
    pub fn with_window(size: usize, window_function: WindowFunction) -> Result<Self> {
        let mut fft = RealFft::new(size)?;
        fft.window = Some(WindowTable::with_len(window_function, size));
        Ok(fft)
    }

    pub fn window_function(&self) -> Option<WindowFunction> {
        self.window.as_ref().map(|table| table.function())
    }

    /// The center frequency in Hz of a given bin.
    pub fn frequency_for_bin(&self, bin: usize, sample_rate: f32) -> f32 {
        (bin as f32) / (self.input.len() as f32) * sample_rate
    }
}

impl Transform for RealFft {
    fn size(&self) -> usize {
        self.input.len()
    }

    fn forward<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = f32>,
    {
        let mut samples = samples.into_iter();
        for value in self.input.iter_mut() {
            *value = samples.next().unwrap_or(0.);
        }
        if let Some(window) = self.window.as_mut() {
            window.apply(&mut self.input);
        }
        self.scratch.copy_from_slice(&self.input);

        let half = self.power.len() - 1;
        let power = &mut self.power;
        match real_fft(&mut self.scratch[..]) {
            Ok(fft) => {
                // The real valued coefficient at the Nyquist frequency is packed into
                // the imaginary part of the DC bin.
                power[0] = fft[0].re * fft[0].re;
                power[half] = fft[0].im * fft[0].im;
                for (power, z) in power[1..half].iter_mut().zip(fft.iter().skip(1)) {
                    *power = z.norm_sqr();
                }
            }
            // Unreachable, the size is validated on construction.
            Err(_) => power.fill(0.),
        }
    }

    fn power(&self) -> &[f32] {
        &self.power
    }

    fn inverse(&mut self, spectrum: &[f32]) {
        let size = self.input.len();
        let half = size / 2;

        // Mirror the spectrum to get the full length, even sequence.
        for (k, value) in self.scratch.iter_mut().enumerate() {
            let bin = if k <= half { k } else { size - k };
            *value = spectrum.get(bin).copied().unwrap_or(0.);
        }

        // The DFT of a real even sequence is real and even, and equals
        // N times its inverse DFT.
        let scale = 1.0 / (size as f32);
        let input = &mut self.input;
        match real_fft(&mut self.scratch[..]) {
            Ok(ifft) => {
                input[0] = scale * ifft[0].re;
                input[half] = scale * ifft[0].im;
                for n in 1..half {
                    let value = scale * ifft[n].re;
                    input[n] = value;
                    input[size - n] = value;
                }
            }
            Err(_) => input.fill(0.),
        }
    }

    fn input(&self) -> &[f32] {
        &self.input
    }
}

#[cfg(test)]
mod tests {
    use super::{real_fft, validate_fft_size, RealFft, Transform};
    use crate::common::WindowFunction;
    use crate::error::Error;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_unsupported_sizes() {
        assert_eq!(validate_fft_size(12).err(), Some(Error::UnsupportedFftSize(12)));
        assert_eq!(validate_fft_size(4).err(), Some(Error::UnsupportedFftSize(4)));
        assert_eq!(validate_fft_size(8192).err(), Some(Error::UnsupportedFftSize(8192)));
        assert!(RealFft::new(0).is_err());
        assert!(RealFft::new(512).is_ok());

        let mut buffer = [0.0_f32; 24];
        assert!(real_fft(&mut buffer).is_err());
    }

    #[test]
    fn test_power_of_sine() {
        let size = 64;
        let mut fft = RealFft::new(size).unwrap();
        let bin = 5;
        fft.forward((0..size).map(|i| {
            let phase = 2.0 * core::f64::consts::PI * (bin * i) as f64 / size as f64;
            phase.cos() as f32
        }));
        let power = fft.power();
        assert_eq!(power.len(), size / 2 + 1);
        // A unit cosine at bin k has |X_k| = N / 2
        let expected = (size as f32 / 2.0) * (size as f32 / 2.0);
        assert_abs_diff_eq!(power[bin], expected, epsilon = 1e-1);
        for (index, value) in power.iter().enumerate() {
            if index != bin {
                assert!(*value < 1e-3);
            }
        }
    }

    #[test]
    fn test_nyquist_bin() {
        let size = 16;
        let mut fft = RealFft::new(size).unwrap();
        fft.forward((0..size).map(|i| if i % 2 == 0 { 1.0 } else { -1.0 }));
        assert_abs_diff_eq!(fft.power()[size / 2], 256.0, epsilon = 1e-3);
        assert_abs_diff_eq!(fft.power()[0], 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_inverse_of_flat_spectrum_is_impulse() {
        let size = 32;
        let mut fft = RealFft::new(size).unwrap();
        let spectrum = [1.0_f32; 17];
        fft.inverse(&spectrum);
        assert_abs_diff_eq!(fft.input()[0], 1.0, epsilon = 1e-5);
        for value in fft.input().iter().skip(1) {
            assert_abs_diff_eq!(*value, 0.0, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_forward_zero_pads_and_windows() {
        let mut fft = RealFft::with_window(8, WindowFunction::Bartlett).unwrap();
        assert_eq!(fft.window_function(), Some(WindowFunction::Bartlett));
        fft.forward([1.0, 1.0, 1.0, 1.0]);
        let input = fft.input();
        assert_eq!(input[0], 0.0);
        assert!(input[3] > 0.0);
        assert_eq!(&input[4..], &[0.0_f32; 4]);
    }

    #[test]
    fn test_frequency_for_bin() {
        let fft = RealFft::new(512).unwrap();
        assert_abs_diff_eq!(fft.frequency_for_bin(0, 44100.), 0.0);
        assert_abs_diff_eq!(fft.frequency_for_bin(256, 44100.), 22050.0);
    }
}
