//! Computes an envelope on a simulated audio thread and estimates tempo and
//! onsets on the main thread, passing envelope values through a lock free queue.

use dev_helpers::{envelope_channel, signals};
use microbeat::common::F32ArrayExt;
use microbeat::onset::OnsetDetector;
use microbeat::tempo::TempoEstimator;
use std::thread;
use std::time::Duration;

const SAMPLE_RATE: f32 = 44100.0;
const HOP_SIZE: usize = 512;
const BPM: f32 = 100.0;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let (mut producer, mut consumer) = envelope_channel(1024);
    let audio = signals::click_track(BPM, SAMPLE_RATE, SAMPLE_RATE as usize * 15);

    // Stands in for an audio callback, one hop at a time, faster than real time.
    let audio_thread = thread::spawn(move || {
        for hop in audio.chunks_exact(HOP_SIZE) {
            producer.push(hop.rms_level());
            thread::sleep(Duration::from_micros(200));
        }
        producer.dropped_count()
    });

    let mut onset_detector = OnsetDetector::new();
    let mut tempo_estimator = TempoEstimator::new(SAMPLE_RATE, HOP_SIZE)?;
    let mut tick = 0;
    let mut bpm = 0.0;
    let mut onset_count = 0;
    let poll_interval_ms = 30;

    loop {
        let is_done = audio_thread.is_finished();
        consumer.drain(|value| {
            if onset_detector.update(value) {
                onset_count += 1;
            }
            bpm = tempo_estimator.update(value);
            tick += 1;
        });
        println!("Tick {}: {} onsets, {:.2} BPM", tick, onset_count, bpm);
        if is_done {
            break;
        }
        thread::sleep(Duration::from_millis(poll_interval_ms));
    }

    let dropped_count = audio_thread.join().map_err(|_| "audio thread panicked")?;
    println!(
        "Click track at {} BPM: estimated {:.2} BPM, {} onsets, {} values dropped",
        BPM, bpm, onset_count, dropped_count
    );
    Ok(())
}
