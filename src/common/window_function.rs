//! [Window functions](https://en.wikipedia.org/wiki/Window_function).

use alloc::{boxed::Box, vec};
use core::f32::consts::PI;
use micromath::F32Ext;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum WindowFunction {
    /// <https://en.wikipedia.org/wiki/Window_function#Hann_and_Hamming_windows>
    Hann,
    /// <https://en.wikipedia.org/wiki/Window_function#Welch_window>
    Welch,
    /// <https://en.wikipedia.org/wiki/Window_function#Triangular_window>
    Bartlett,
    /// <https://en.wikipedia.org/wiki/Window_function#Blackman_window>
    Blackman { alpha: f32 },
}

/// A window function together with a lookup table of its values for the
/// most recently used buffer length. The table is rebuilt whenever a
/// buffer of a different length is passed to [`apply`](WindowTable::apply).
#[derive(Clone, Debug)]
pub struct WindowTable {
    function: WindowFunction,
    lookup: Box<[f32]>,
}

impl WindowTable {
    pub fn new(function: WindowFunction) -> Self {
        WindowTable {
            function,
            lookup: Box::new([]),
        }
    }

    /// Creates a table that is already populated for a given length.
    pub fn with_len(function: WindowFunction, len: usize) -> Self {
        let mut table = WindowTable::new(function);
        table.rebuild(len);
        table
    }

    pub fn function(&self) -> WindowFunction {
        self.function
    }

    /// The cached window values.
    pub fn lookup(&self) -> &[f32] {
        &self.lookup
    }

    /// Performs point-wise multiplication of a buffer and the window function.
    pub fn apply(&mut self, buffer: &mut [f32]) {
        if self.lookup.len() != buffer.len() {
            self.rebuild(buffer.len());
        }
        for (value, window_value) in buffer.iter_mut().zip(self.lookup.iter()) {
            *value *= window_value;
        }
    }

    fn rebuild(&mut self, len: usize) {
        let mut lookup = vec![1.0_f32; len].into_boxed_slice();
        if len > 1 {
            match self.function {
                WindowFunction::Hann => hann_window(&mut lookup),
                WindowFunction::Welch => welch_window(&mut lookup),
                WindowFunction::Bartlett => bartlett_window(&mut lookup),
                WindowFunction::Blackman { alpha } => blackman_window(&mut lookup, alpha),
            }
        }
        self.lookup = lookup;
    }
}

/// Performs point-wise multiplication of a buffer and the Hann window function.
fn hann_window(buffer: &mut [f32]) {
    // sin(0.5 * pi * x) can be approximated with a
    // max error below 0.001 and exactly matching endpoints on [-1, 1] as
    // ax^5 + bx^3 + cx,
    // where
    // a = pi / 2 - 1.5
    // b = 2.5 - pi
    // c = pi / 2

    let a = 0.5 * (PI / 2. - 1.5);
    let b = 0.5 * (2.5 - PI);
    let c = 0.5 * PI / 2.;
    let d = 0.5;

    // Evaluate window in two halves
    let len = buffer.len();
    let len_is_even = len % 2 == 0;
    let left_half_end_len = if len_is_even { len / 2 } else { len / 2 + 1 };
    let dx = 4. / ((len - 1) as f32);
    let mut x = -1.0;
    for value in buffer.iter_mut().take(left_half_end_len) {
        let x3 = x * x * x;
        let x5 = x3 * x * x;
        *value *= a * x5 + b * x3 + c * x + d;
        x += dx;
    }

    x = if len_is_even { 1.0 - 0.5 * dx } else { 1.0 - dx };
    for value in buffer.iter_mut().skip(left_half_end_len) {
        let x3 = x * x * x;
        let x5 = x3 * x * x;
        *value *= a * x5 + b * x3 + c * x + d;
        x -= dx;
    }
}

/// Performs point-wise multiplication of a buffer and the Welch window function.
fn welch_window(buffer: &mut [f32]) {
    let len = buffer.len();
    let dx = 2. / ((len - 1) as f32);
    let mut x = -1.0;
    for value in buffer.iter_mut() {
        *value *= 1. - x * x;
        x += dx;
    }
}

fn bartlett_window(buffer: &mut [f32]) {
    let n_minus_1 = (buffer.len() - 1) as f32;
    for (i, value) in buffer.iter_mut().enumerate() {
        *value *= 1. - F32Ext::abs(2. * (i as f32) / n_minus_1 - 1.);
    }
}

fn blackman_window(buffer: &mut [f32], alpha: f32) {
    let a0 = (1. - alpha) / 2.;
    let a1 = 0.5;
    let a2 = alpha / 2.;
    let n_minus_1 = (buffer.len() - 1) as f32;
    for (i, value) in buffer.iter_mut().enumerate() {
        let theta = 2. * PI * (i as f32) / n_minus_1;
        *value *= a0 - a1 * F32Ext::cos(theta) + a2 * F32Ext::cos(2. * theta);
    }
}

#[cfg(test)]
mod tests {
    use super::{WindowFunction, WindowTable};
    use approx::assert_abs_diff_eq;

    fn window_of_len(function: WindowFunction, len: usize) -> WindowTable {
        WindowTable::with_len(function, len)
    }

    #[test]
    fn test_hann_window() {
        let table = window_of_len(WindowFunction::Hann, 5);
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (value, expected) in table.lookup().iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*value, *expected, epsilon = 1e-6);
        }

        let table = window_of_len(WindowFunction::Hann, 6);
        let expected = [0.0, 0.345475, 0.904699, 0.904699, 0.345475, 0.0];
        for (value, expected) in table.lookup().iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*value, *expected, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_welch_window() {
        let table = window_of_len(WindowFunction::Welch, 1025);
        assert_abs_diff_eq!(table.lookup()[0], 0., epsilon = 1e-6);
        assert_abs_diff_eq!(table.lookup()[512], 1., epsilon = 1e-4);
        assert_abs_diff_eq!(table.lookup()[1024], 0., epsilon = 1e-3);
    }

    #[test]
    fn test_bartlett_window() {
        let table = window_of_len(WindowFunction::Bartlett, 5);
        let expected = [0.0, 0.5, 1.0, 0.5, 0.0];
        for (value, expected) in table.lookup().iter().zip(expected.iter()) {
            assert_abs_diff_eq!(*value, *expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_blackman_window() {
        let table = window_of_len(WindowFunction::Blackman { alpha: 0.16 }, 9);
        assert_abs_diff_eq!(table.lookup()[0], 0., epsilon = 1e-2);
        assert_abs_diff_eq!(table.lookup()[4], 1., epsilon = 1e-2);
        assert_abs_diff_eq!(table.lookup()[8], 0., epsilon = 1e-2);
    }

    #[test]
    fn test_table_is_rebuilt_per_length() {
        let mut table = WindowTable::new(WindowFunction::Hann);
        let mut short = [1.0_f32; 5];
        table.apply(&mut short);
        assert_eq!(table.lookup().len(), 5);
        assert_abs_diff_eq!(short[2], 1.0, epsilon = 1e-6);

        let mut long = [2.0_f32; 9];
        table.apply(&mut long);
        assert_eq!(table.lookup().len(), 9);
        assert_abs_diff_eq!(long[0], 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(long[4], 2.0, epsilon = 1e-6);
    }

    #[test]
    fn test_degenerate_lengths() {
        let mut table = WindowTable::new(WindowFunction::Blackman { alpha: 0.16 });
        let mut single = [0.7_f32];
        table.apply(&mut single);
        assert_eq!(single[0], 0.7);
        let mut empty: [f32; 0] = [];
        table.apply(&mut empty);
        assert!(table.lookup().is_empty());
    }
}
