//! Phone-band BFSK audio modem for short encrypted payloads
//!
//! Transmits an AES-256-CTR ciphertext as a self-delimiting audio frame
//! (alternating preamble, "STEG" magic, length, payload, CRC-32) using two
//! tones at 1200/2200 Hz with triple repetition coding. The receiver
//! conditions the recording, acquires bit timing from the preamble, locks the
//! bit grid on the magic marker, and majority-decodes the frame.

pub mod acquisition;
pub mod biquad;
pub mod crc;
pub mod crypto;
pub mod decoder;
pub mod demodulator;
pub mod detector;
pub mod encoder;
pub mod error;
pub mod framing;
pub mod frontend;
pub mod modulator;
pub mod wav;

pub use decoder::{Decoded, Decoder};
pub use encoder::Encoder;
pub use error::{ModemError, Result};

// Link parameters. These are wire-visible: both endpoints must agree
// bit-for-bit or the magic search never locks.
pub const FREQ_0: f64 = 1200.0;
pub const FREQ_1: f64 = 2200.0;
pub const BIT_DURATION: f64 = 0.015;
pub const PREAMBLE_SECONDS: f64 = 1.5;
pub const REP: usize = 3;

/// Sender output rate. The receiver works at whatever rate the file carries.
pub const SAMPLE_RATE_TX: u32 = 44100;

pub const AMPLITUDE: f32 = 0.87;
/// BFSK scale when mixed into a cover signal.
pub const STEGO_STRENGTH: f32 = 0.2;
/// Cover scale when mixing.
pub const COVER_GAIN: f32 = 0.3;

// Receiver search parameters.
pub const SEARCH_SECONDS: f64 = 3.0;
/// Coarse scan step is spb / SEARCH_STEP_FRAC.
pub const SEARCH_STEP_FRAC: usize = 6;
/// Refinement scans +-spb in steps of spb / REFINE_STEPS.
pub const REFINE_STEPS: usize = 24;

/// Minimum samples per bit; below this the I/Q windows are too short to
/// separate the two tones.
pub const MIN_SAMPLES_PER_BIT: usize = 40;

/// Per-rate modem geometry: samples per bit and preamble length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModemParams {
    pub sample_rate: u32,
    pub spb: usize,
    pub pre_bits: usize,
}

impl ModemParams {
    pub fn new(sample_rate: u32) -> Result<Self> {
        let spb = (sample_rate as f64 * BIT_DURATION).round() as usize;
        if spb < MIN_SAMPLES_PER_BIT {
            return Err(ModemError::BitDurationTooSmall { sample_rate, spb });
        }
        let pre_bits = ((PREAMBLE_SECONDS / BIT_DURATION).round() as usize).max(32);
        Ok(Self {
            sample_rate,
            spb,
            pre_bits,
        })
    }

    /// Samples occupied by one repetition-coded data bit.
    pub fn samples_per_coded_bit(&self) -> usize {
        REP * self.spb
    }

    /// Samples occupied by one frame byte on the wire.
    pub fn samples_per_byte(&self) -> usize {
        8 * self.samples_per_coded_bit()
    }
}
