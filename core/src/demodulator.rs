use crate::acquisition::FrameLock;
use crate::crc::crc32;
use crate::detector::IqDetector;
use crate::error::{ModemError, Result};
use crate::framing::{CRC_LEN, HEADER_LEN, MAGIC, MAX_CIPHERTEXT_LEN};
use crate::ModemParams;

/// Decode and verify the frame at a locked position, returning the
/// ciphertext.
///
/// The magic is re-read as part of the header; refinement already matched it,
/// so disagreement here means the bit cursor drifted and is reported as an
/// internal inconsistency rather than a channel error.
pub fn extract_frame(x: &[f32], params: &ModemParams, lock: &FrameLock) -> Result<Vec<u8>> {
    let det = IqDetector::new(params);
    let n = x.len() as i64;
    let byte_span = params.samples_per_byte() as i64;
    let mut cursor = lock.pos;

    if cursor + HEADER_LEN as i64 * byte_span >= n {
        return Err(ModemError::InsufficientData);
    }

    let mut header = [0u8; HEADER_LEN];
    for byte in &mut header {
        *byte = det.decode_byte(x, &mut cursor, lock.invert);
    }

    if header[..4] != MAGIC {
        let mut got = [0u8; 4];
        got.copy_from_slice(&header[..4]);
        return Err(ModemError::MagicVerifyMismatch(got));
    }

    let len = u32::from_be_bytes([header[4], header[5], header[6], header[7]]);
    if len == 0 || len > MAX_CIPHERTEXT_LEN {
        return Err(ModemError::InvalidLength(len));
    }

    let remaining_bytes = len as i64 + CRC_LEN as i64;
    if cursor + remaining_bytes * byte_span >= n {
        return Err(ModemError::InsufficientData);
    }

    let mut frame = Vec::with_capacity(HEADER_LEN + len as usize);
    frame.extend_from_slice(&header);
    for _ in 0..len {
        frame.push(det.decode_byte(x, &mut cursor, lock.invert));
    }

    let mut crc_bytes = [0u8; CRC_LEN];
    for byte in &mut crc_bytes {
        *byte = det.decode_byte(x, &mut cursor, lock.invert);
    }
    let stored = u32::from_be_bytes(crc_bytes);
    let calculated = crc32(&frame);
    if calculated != stored {
        return Err(ModemError::CrcMismatch { calculated, stored });
    }

    frame.drain(..HEADER_LEN);
    Ok(frame)
}
