//! Test signals, WAV input and a real time envelope handoff used by the
//! tests, benchmarks and demos.

pub mod handoff;
pub mod signals;
pub mod wav;

pub use handoff::{envelope_channel, EnvelopeConsumer, EnvelopeProducer};
pub use wav::{read_wav, rms_envelope, write_wav, WavData};
