//! WAV file glue around `hound`.
//!
//! Reads PCM 16-bit int or 32-bit float, any channel count (channels are
//! averaged to mono). Writes mono PCM 16-bit.

use std::path::Path;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

use crate::error::{ModemError, Result};

/// Load a WAV file as mono f32 samples plus its native sample rate.
pub fn read_mono_pcm(path: &Path) -> Result<(Vec<f32>, u32)> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => reader
            .samples::<i16>()
            .map(|s| s.map(|v| v as f32 / 32768.0))
            .collect::<std::result::Result<_, _>>()?,
        (SampleFormat::Float, 32) => reader
            .samples::<f32>()
            .collect::<std::result::Result<_, _>>()?,
        (format, bits) => {
            return Err(ModemError::UnsupportedFormat(format!(
                "{}-bit {:?}",
                bits, format
            )))
        }
    };

    if interleaved.is_empty() || spec.channels == 0 {
        return Err(ModemError::EmptyAudio);
    }

    let channels = spec.channels as usize;
    let mono = if channels == 1 {
        interleaved
    } else {
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    };

    Ok((mono, spec.sample_rate))
}

/// Write mono f32 samples as PCM 16-bit, clamped to [-1, 1].
pub fn write_mono_pcm(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut writer = WavWriter::create(path, spec)?;
    for &sample in samples {
        let scaled = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
        writer.write_sample(scaled)?;
    }
    writer.finalize()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        let dir = env::temp_dir().join("stegwave-wav-tests");
        fs::create_dir_all(&dir).unwrap();
        dir.join(name)
    }

    #[test]
    fn test_write_read_roundtrip() {
        let path = temp_path("roundtrip.wav");
        let samples: Vec<f32> = (0..2000)
            .map(|i| (i as f32 * 0.05).sin() * 0.8)
            .collect();

        write_mono_pcm(&path, &samples, 44100).unwrap();
        let (loaded, rate) = read_mono_pcm(&path).unwrap();

        assert_eq!(rate, 44100);
        assert_eq!(loaded.len(), samples.len());
        for (a, b) in samples.iter().zip(loaded.iter()) {
            // 16-bit quantisation error only.
            assert!((a - b).abs() < 1.0 / 16384.0);
        }
    }

    #[test]
    fn test_out_of_range_samples_are_clamped() {
        let path = temp_path("clamped.wav");
        write_mono_pcm(&path, &[2.0, -2.0, 0.5], 8000).unwrap();
        let (loaded, _) = read_mono_pcm(&path).unwrap();
        assert!((loaded[0] - 1.0).abs() < 0.01);
        assert!((loaded[1] + 1.0).abs() < 0.01);
    }

    #[test]
    fn test_stereo_is_averaged_to_mono() {
        let path = temp_path("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        // Frames: (8000, 16000), (-4000, -8000)
        for v in [8000i16, 16000, -4000, -8000] {
            writer.write_sample(v).unwrap();
        }
        writer.finalize().unwrap();

        let (mono, rate) = read_mono_pcm(&path).unwrap();
        assert_eq!(rate, 22050);
        assert_eq!(mono.len(), 2);
        assert!((mono[0] - 12000.0 / 32768.0).abs() < 1e-4);
        assert!((mono[1] + 6000.0 / 32768.0).abs() < 1e-4);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = read_mono_pcm(Path::new("/nonexistent/stegwave.wav"));
        assert!(matches!(result, Err(ModemError::Audio(_))));
    }
}
