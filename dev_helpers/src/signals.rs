//! Synthetic envelope signals, one value per tick.

/// An envelope that is 1 on the tick each beat starts on and 0 otherwise.
/// The beat period is `60 / bpm` seconds and a tick lasts
/// `hop_size / sample_rate` seconds, so the period in ticks is usually fractional.
pub fn impulse_train(bpm: f32, hop_size: usize, sample_rate: f32, len: usize) -> Vec<f32> {
    let period = 60.0 * sample_rate / (bpm * hop_size as f32);
    (0..len)
        .map(|tick| if (tick as f32) % period < 1.0 { 1.0 } else { 0.0 })
        .collect()
}

/// An envelope that is `low` before `step_tick` and `high` from then on.
pub fn step(low: f32, high: f32, step_tick: usize, len: usize) -> Vec<f32> {
    (0..len)
        .map(|tick| if tick < step_tick { low } else { high })
        .collect()
}

pub fn constant(value: f32, len: usize) -> Vec<f32> {
    vec![value; len]
}

/// Audio samples of a decaying noise-like click every beat, for running a
/// full audio to envelope to tempo chain.
pub fn click_track(bpm: f32, sample_rate: f32, len: usize) -> Vec<f32> {
    let period = (60.0 * sample_rate / bpm) as usize;
    let click_len = (0.02 * sample_rate) as usize;
    let mut seed: u32 = 0x1234_5678;
    (0..len)
        .map(|index| {
            let offset = index % period.max(1);
            if offset >= click_len {
                return 0.0;
            }
            // xorshift
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let noise = (seed as f32 / u32::MAX as f32) * 2.0 - 1.0;
            noise * (1.0 - offset as f32 / click_len as f32)
        })
        .collect()
}
