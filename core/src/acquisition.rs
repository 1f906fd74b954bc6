//! Two-stage timing acquisition.
//!
//! Stage 1 scans candidate offsets for the alternating preamble, scoring both
//! signal polarities; a match at coarse step spb/6 lands within a fraction of
//! a bit of true alignment. Stage 2 slides +-spb around the estimated frame
//! start until the four magic bytes decode exactly, which locks the bit grid
//! and settles the polarity that the alternating preamble alone cannot (an
//! inverted 0101... is the same pattern half a bit out of phase).

use crate::detector::IqDetector;
use crate::error::{ModemError, Result};
use crate::framing::MAGIC;
use crate::{ModemParams, REFINE_STEPS, REP, SEARCH_SECONDS, SEARCH_STEP_FRAC};

/// Stage-1 result: best preamble alignment over the search window.
#[derive(Debug, Clone, Copy)]
pub struct CoarseSync {
    pub offset: i64,
    pub invert: bool,
    pub score: usize,
    pub pre_bits: usize,
}

/// Stage-2 result: first sample of the frame and the final polarity.
#[derive(Debug, Clone, Copy)]
pub struct FrameLock {
    pub pos: i64,
    pub invert: bool,
    pub coarse: CoarseSync,
}

/// Count preamble bits at `off` that decode to the expected 0,1,0,1,...
/// pattern. Stops early where the window would run past the buffer.
fn score_preamble(
    det: &IqDetector,
    x: &[f32],
    off: i64,
    params: &ModemParams,
    invert: bool,
) -> usize {
    let n = x.len() as i64;
    let spb = params.spb as i64;
    let mut score = 0;
    for b in 0..params.pre_bits {
        let pos = off + b as i64 * spb;
        if pos + spb >= n {
            break;
        }
        let expected = b & 1 == 1;
        if det.detect(x, pos, invert) == expected {
            score += 1;
        }
    }
    score
}

/// Stage 1: coarse preamble search over the first `SEARCH_SECONDS` of audio.
pub fn coarse_search(x: &[f32], params: &ModemParams) -> Result<CoarseSync> {
    let det = IqDetector::new(params);
    let n = x.len() as i64;
    let spb = params.spb as i64;
    let preamble_span = params.pre_bits as i64 * spb;

    let search_max = n.min((SEARCH_SECONDS * params.sample_rate as f64).round() as i64);
    let step = (params.spb / SEARCH_STEP_FRAC).max(1) as i64;
    let good_enough = (0.93 * params.pre_bits as f64) as usize;

    let mut best: Option<CoarseSync> = None;
    let mut off = 0i64;
    while off + preamble_span < search_max {
        for invert in [false, true] {
            let score = score_preamble(&det, x, off, params, invert);
            if best.map_or(true, |b| score > b.score) {
                best = Some(CoarseSync {
                    offset: off,
                    invert,
                    score,
                    pre_bits: params.pre_bits,
                });
            }
        }
        if best.map_or(false, |b| b.score > good_enough) {
            break;
        }
        off += step;
    }

    best.ok_or(ModemError::SyncNotFound)
}

/// Stage 2: slide around the estimated preamble end until the magic decodes.
/// First match wins.
pub fn refine(x: &[f32], params: &ModemParams, coarse: CoarseSync) -> Result<FrameLock> {
    let det = IqDetector::new(params);
    let n = x.len() as i64;
    let spb = params.spb as i64;
    let base = coarse.offset + coarse.pre_bits as i64 * spb;

    let step = (params.spb / REFINE_STEPS).max(1) as i64;
    let magic_span = (MAGIC.len() * 8 * REP * params.spb) as i64;

    let mut delta = -spb;
    while delta <= spb {
        for invert in [false, true] {
            let p = base + delta;
            if p < 0 || p + magic_span >= n {
                continue;
            }

            let mut cursor = p;
            let mut magic = [0u8; 4];
            for byte in &mut magic {
                *byte = det.decode_byte(x, &mut cursor, invert);
            }
            if magic == MAGIC {
                return Ok(FrameLock {
                    pos: p,
                    invert,
                    coarse,
                });
            }
        }
        delta += step;
    }

    Err(ModemError::MagicNotFound {
        score: coarse.score,
        pre_bits: coarse.pre_bits,
    })
}

/// Run both stages against a conditioned buffer.
pub fn acquire(x: &[f32], params: &ModemParams) -> Result<FrameLock> {
    let coarse = coarse_search(x, params)?;
    refine(x, params, coarse)
}
