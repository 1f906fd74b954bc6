use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stegwave_core::frontend::rms;
use stegwave_core::wav;

/// Apply channel damage to a WAV file for link stress testing: additive
/// Gaussian noise at a chosen SNR, optional polarity inversion, optional
/// leading silence.
#[derive(Parser)]
#[command(name = "channelsim", version)]
struct Args {
    /// Input WAV
    input: PathBuf,

    /// Output WAV (PCM 16-bit, input rate)
    output: PathBuf,

    /// Signal-to-noise ratio in dB; above 200 disables the noise
    #[arg(long, default_value_t = 18.0)]
    snr: f64,

    /// Flip the polarity of every sample
    #[arg(long)]
    invert: bool,

    /// Seconds of silence to prepend
    #[arg(long, default_value_t = 0.0)]
    lead_in: f64,

    /// Noise generator seed
    #[arg(long, default_value_t = 123)]
    seed: u64,
}

/// Standard normal sample via Box-Muller.
fn gaussian(rng: &mut StdRng) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (mut samples, sample_rate) = wav::read_mono_pcm(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    if args.invert {
        for s in samples.iter_mut() {
            *s = -*s;
        }
    }

    if args.snr <= 200.0 {
        let signal_rms = rms(&samples) as f64;
        let noise_rms = signal_rms / 10f64.powf(args.snr / 20.0);
        let mut rng = StdRng::seed_from_u64(args.seed);
        for s in samples.iter_mut() {
            let n = (gaussian(&mut rng) * noise_rms) as f32;
            *s = (*s + n).clamp(-1.0, 1.0);
        }
    }

    if args.lead_in > 0.0 {
        let lead = (args.lead_in * sample_rate as f64).round() as usize;
        let mut padded = vec![0.0f32; lead];
        padded.extend_from_slice(&samples);
        samples = padded;
    }

    wav::write_mono_pcm(&args.output, &samples, sample_rate)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    println!(
        "OK: wrote {} (snr={} dB, invert={}, lead_in={} s, seed={})",
        args.output.display(),
        args.snr,
        args.invert,
        args.lead_in,
        args.seed
    );
    Ok(())
}
