use std::f64::consts::PI;

use crate::{ModemParams, AMPLITUDE, COVER_GAIN, FREQ_0, FREQ_1, REP, STEGO_STRENGTH};

/// BFSK modulator.
///
/// Emits the alternating preamble followed by the frame bytes, MSB first,
/// each data bit repeated `REP` times as separate symbols. Tone phase uses
/// the absolute sample index, so consecutive same-frequency symbols stay
/// phase-continuous; each symbol is shaped by a Hann window to limit
/// spectral splatter through lossy audio paths.
pub struct BfskModulator {
    params: ModemParams,
}

fn hann(n: usize, len: usize) -> f32 {
    if len <= 1 {
        return 1.0;
    }
    (0.5 - 0.5 * (2.0 * PI * n as f64 / (len - 1) as f64).cos()) as f32
}

impl BfskModulator {
    pub fn new(params: ModemParams) -> Self {
        Self { params }
    }

    /// Total output length in samples for a frame of `frame_len` bytes.
    pub fn output_len(&self, frame_len: usize) -> usize {
        (self.params.pre_bits + 8 * frame_len * REP) * self.params.spb
    }

    /// Modulate a frame, optionally mixing the tones into a cover signal.
    pub fn modulate(&self, frame: &[u8], cover: Option<&[f32]>) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.output_len(frame.len()));

        // Preamble 0,1,0,1,... with no repetition coding.
        for b in 0..self.params.pre_bits {
            self.push_symbol(&mut out, b & 1 == 1, cover);
        }

        // Frame bytes MSB first, each bit as REP consecutive symbols.
        for &byte in frame {
            for bitpos in (0..8).rev() {
                let bit = (byte >> bitpos) & 1 == 1;
                for _ in 0..REP {
                    self.push_symbol(&mut out, bit, cover);
                }
            }
        }

        out
    }

    fn push_symbol(&self, out: &mut Vec<f32>, bit: bool, cover: Option<&[f32]>) {
        let freq = if bit { FREQ_1 } else { FREQ_0 };
        let fs = self.params.sample_rate as f64;
        let base = out.len();

        for k in 0..self.params.spb {
            let si = base + k;
            let tone = (2.0 * PI * freq * si as f64 / fs).sin() as f32;
            let sig = AMPLITUDE * hann(k, self.params.spb) * tone;

            let y = match cover {
                Some(c) if !c.is_empty() => COVER_GAIN * c[si % c.len()] + STEGO_STRENGTH * sig,
                _ => sig,
            };
            out.push(y.clamp(-1.0, 1.0));
        }
    }
}
