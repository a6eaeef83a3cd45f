//! Prints onsets and the tempo estimate of a WAV file.
//!
//! ```text
//! RUST_LOG=debug cargo run --example wav_tempo -- path/to/file.wav
//! ```
//! Without a path, a synthetic 128 BPM click track is analyzed.

use dev_helpers::{read_wav, rms_envelope, signals, WavData};
use microbeat::common::F32ArrayExt;
use microbeat::onset::OnsetDetector;
use microbeat::tempo::TempoEstimator;
use microbeat::TempoConfig;

const HOP_SIZE: usize = 512;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let wav = match std::env::args().nth(1) {
        Some(path) => {
            println!("Reading {}", path);
            read_wav(path)?
        }
        None => {
            println!("No input file given, using a 128 BPM click track");
            WavData {
                sample_rate: 44100,
                samples: signals::click_track(128.0, 44100.0, 44100 * 20),
            }
        }
    };

    let mut envelope = rms_envelope(&wav.samples, HOP_SIZE);
    let max_level = envelope.peak_level();
    if max_level > 0.0 {
        for value in envelope.iter_mut() {
            *value /= max_level;
        }
    }

    let config = TempoConfig {
        sample_rate: wav.sample_rate as f32,
        hop_size: HOP_SIZE,
        ..TempoConfig::default()
    };
    let mut onset_detector = OnsetDetector::new();
    let mut tempo_estimator = TempoEstimator::from_config(config)?;

    let mut onset_count = 0;
    let mut bpm = 0.0;
    for (tick, value) in envelope.iter().enumerate() {
        let seconds = tick as f32 * config.hop_duration();
        if onset_detector.update(*value) {
            onset_count += 1;
            println!("Onset at {:.3} s", seconds);
        }
        let new_bpm = tempo_estimator.update(*value);
        if new_bpm != bpm {
            println!("Tempo {:.2} BPM at {:.3} s", new_bpm, seconds);
            bpm = new_bpm;
        }
    }

    println!();
    println!("{} ticks, {} onsets", envelope.len(), onset_count);
    if bpm > 0.0 {
        println!("Estimated tempo {:.2} BPM", bpm);
    } else {
        println!("No tempo found");
    }
    Ok(())
}
