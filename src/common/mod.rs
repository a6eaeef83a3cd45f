//! Common algorithms and utilities.

mod autocorr;
mod f32_array_ext;
mod fft;
mod history;
mod vote_counter;
mod window_function;

pub use autocorr::{autocorr_conv, AutocorrelationEngine};
pub use f32_array_ext::F32ArrayExt;
pub use fft::{real_fft, validate_fft_size, RealFft, Transform};
pub use history::BoundedHistory;
pub use vote_counter::{ModeCounter, VoteCounter};
pub use window_function::{WindowFunction, WindowTable};
