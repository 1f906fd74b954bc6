use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use stegwave_core::{wav, Decoder};

/// Recover a message from a recorded BFSK waveform.
///
/// Prints the acquisition report and the decrypted message to stdout.
/// Exits non-zero on any failure: unreadable file, no sync, no magic,
/// bad length, CRC mismatch, or decrypt failure.
#[derive(Parser)]
#[command(name = "receiver", version)]
struct Args {
    /// Recording to decode (any rate; channels are averaged to mono)
    input: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (samples, sample_rate) = wav::read_mono_pcm(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;

    let decoder = Decoder::new(sample_rate)?;
    let decoded = decoder.decode(&samples)?;

    let coarse = decoded.lock.coarse;
    println!(
        "Sync: off={} samples (inv={} score={}/{})",
        coarse.offset, coarse.invert as u8, coarse.score, coarse.pre_bits
    );
    println!(
        "Refined pos={} samples (inv={})",
        decoded.lock.pos,
        decoded.lock.invert as u8
    );
    println!("Decrypted Message:");
    println!("{}", String::from_utf8_lossy(&decoded.plaintext));
    Ok(())
}
