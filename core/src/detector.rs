use std::f64::consts::PI;

use crate::{ModemParams, FREQ_0, FREQ_1, REP};

/// Coherent I/Q energy detector over one symbol window.
///
/// Correlates the window against in-phase and quadrature sinusoids at both
/// carriers and compares the energies. The basis restarts at n = 0 for every
/// window, so the decision depends only on symbol energy, not on the absolute
/// phase of the received carrier.
pub struct IqDetector {
    spb: usize,
    w0: f64,
    w1: f64,
}

impl IqDetector {
    pub fn new(params: &ModemParams) -> Self {
        let fs = params.sample_rate as f64;
        Self {
            spb: params.spb,
            w0: 2.0 * PI * FREQ_0 / fs,
            w1: 2.0 * PI * FREQ_1 / fs,
        }
    }

    /// Decide one symbol at `start`. Caller guarantees `start + spb` is in
    /// bounds. `invert` flips the decision for polarity-reversed recordings.
    pub fn detect(&self, x: &[f32], start: i64, invert: bool) -> bool {
        let base = start as usize;
        let (mut i0, mut q0) = (0.0f64, 0.0f64);
        let (mut i1, mut q1) = (0.0f64, 0.0f64);

        for n in 0..self.spb {
            let s = x[base + n] as f64;
            let t0 = self.w0 * n as f64;
            let t1 = self.w1 * n as f64;
            i0 += s * t0.cos();
            q0 += s * t0.sin();
            i1 += s * t1.cos();
            q1 += s * t1.sin();
        }

        let p0 = i0 * i0 + q0 * q0;
        let p1 = i1 * i1 + q1 * q1;
        (p1 > p0) ^ invert
    }

    /// Majority-vote one data bit from its `REP` symbol copies at `pos`.
    pub fn decode_coded_bit(&self, x: &[f32], pos: i64, invert: bool) -> bool {
        let mut ones = 0;
        for r in 0..REP {
            if self.detect(x, pos + (r * self.spb) as i64, invert) {
                ones += 1;
            }
        }
        ones > REP / 2
    }

    /// Decode one byte MSB first, advancing `cursor` past it.
    pub fn decode_byte(&self, x: &[f32], cursor: &mut i64, invert: bool) -> u8 {
        let mut value = 0u8;
        for _ in 0..8 {
            let bit = self.decode_coded_bit(x, *cursor, invert);
            value = (value << 1) | bit as u8;
            *cursor += (REP * self.spb) as i64;
        }
        value
    }
}
