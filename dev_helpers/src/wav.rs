use std::path::Path;

/// Mono audio read from a WAV file.
pub struct WavData {
    pub sample_rate: u32,
    pub samples: Vec<f32>,
}

/// Reads a WAV file, down mixing to mono. Integer samples are scaled to [-1, 1].
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<WavData, hound::Error> {
    let mut reader = hound::WavReader::open(path)?;
    let spec = reader.spec();
    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<_, _>>()?,
        hound::SampleFormat::Int => {
            let scale = 1. / ((1_i64 << (spec.bits_per_sample - 1)) as f32);
            reader
                .samples::<i32>()
                .map(|sample| sample.map(|value| value as f32 * scale))
                .collect::<Result<_, _>>()?
        }
    };

    let channel_count = spec.channels.max(1) as usize;
    let samples = interleaved
        .chunks(channel_count)
        .map(|frame| frame.iter().sum::<f32>() / channel_count as f32)
        .collect();
    Ok(WavData {
        sample_rate: spec.sample_rate,
        samples,
    })
}

pub fn write_wav<P: AsRef<Path>>(
    path: P,
    sample_rate: u32,
    channel_count: u16,
    buffer: &[f32],
) -> Result<(), hound::Error> {
    let spec = hound::WavSpec {
        channels: channel_count,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec)?;
    let amplitude = i16::MAX as f32;
    for sample in buffer.iter() {
        let clamped_sample = sample.clamp(-1.0, 1.0);
        writer.write_sample((clamped_sample * amplitude) as i16)?;
    }
    writer.finalize()
}

/// The RMS level of each complete hop of `hop_size` samples, i.e one envelope
/// value per tick.
pub fn rms_envelope(samples: &[f32], hop_size: usize) -> Vec<f32> {
    samples
        .chunks_exact(hop_size.max(1))
        .map(|hop| (hop.iter().map(|sample| sample * sample).sum::<f32>() / hop.len() as f32).sqrt())
        .collect()
}
