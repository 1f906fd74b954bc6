use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;
use stegwave_core::{wav, Encoder, SAMPLE_RATE_TX};

/// Encrypt a message and encode it as a BFSK waveform.
///
/// Writes `encoded_signal.wav` (mono, 44.1 kHz, PCM 16-bit) in the current
/// directory. With a cover file the tones are mixed into the cover instead
/// of transmitted clean.
#[derive(Parser)]
#[command(name = "sender", version)]
struct Args {
    /// Message text to transmit
    message: String,

    /// Optional cover WAV to hide the signal in
    cover: Option<PathBuf>,
}

const OUTPUT_PATH: &str = "encoded_signal.wav";

fn load_cover(path: &Path) -> Option<Vec<f32>> {
    match wav::read_mono_pcm(path) {
        Ok((samples, _rate)) if !samples.is_empty() => {
            eprintln!(
                "Cover loaded: {} (mono samples={})",
                path.display(),
                samples.len()
            );
            Some(samples)
        }
        Ok(_) => {
            eprintln!("Warning: cover is empty -> pure BFSK");
            None
        }
        Err(err) => {
            eprintln!("Warning: cover load failed ({}) -> pure BFSK", err);
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let cover = args.cover.as_deref().and_then(load_cover);

    let encoder = Encoder::new(SAMPLE_RATE_TX)?;
    let samples = encoder
        .encode_with_cover(args.message.as_bytes(), cover.as_deref())
        .context("encoding failed")?;

    wav::write_mono_pcm(Path::new(OUTPUT_PATH), &samples, SAMPLE_RATE_TX)
        .with_context(|| format!("failed to write {}", OUTPUT_PATH))?;

    println!("OK: wrote {}", OUTPUT_PATH);
    println!(
        "Duration: {:.1} sec",
        samples.len() as f64 / SAMPLE_RATE_TX as f64
    );
    Ok(())
}
