use crate::crc::crc32;
use crate::error::{ModemError, Result};

/// Frame layout, big-endian throughout:
///
/// ```text
/// offset 0..4        : magic "STEG"
/// offset 4..8        : ciphertext length (u32 BE)
/// offset 8..8+LEN    : ciphertext
/// offset 8+LEN..+4   : CRC-32 over bytes [0, 8+LEN)
/// ```
pub const MAGIC: [u8; 4] = *b"STEG";
pub const HEADER_LEN: usize = 8;
pub const CRC_LEN: usize = 4;
pub const MAX_CIPHERTEXT_LEN: u32 = 2_000_000;

pub struct FrameEncoder;
pub struct FrameDecoder;

impl FrameEncoder {
    /// Build the wire frame around a ciphertext.
    pub fn encode(ciphertext: &[u8]) -> Result<Vec<u8>> {
        let len = ciphertext.len() as u32;
        if len == 0 || len > MAX_CIPHERTEXT_LEN {
            return Err(ModemError::InvalidLength(len));
        }

        let mut frame = Vec::with_capacity(HEADER_LEN + ciphertext.len() + CRC_LEN);
        frame.extend_from_slice(&MAGIC);
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(ciphertext);

        let crc = crc32(&frame);
        frame.extend_from_slice(&crc.to_be_bytes());
        Ok(frame)
    }
}

impl FrameDecoder {
    /// Validate a complete frame and return its ciphertext.
    pub fn decode(frame: &[u8]) -> Result<Vec<u8>> {
        if frame.len() < HEADER_LEN + 1 + CRC_LEN {
            return Err(ModemError::InsufficientData);
        }
        if frame[..4] != MAGIC {
            let mut got = [0u8; 4];
            got.copy_from_slice(&frame[..4]);
            return Err(ModemError::MagicVerifyMismatch(got));
        }

        let len = u32::from_be_bytes([frame[4], frame[5], frame[6], frame[7]]);
        if len == 0 || len > MAX_CIPHERTEXT_LEN {
            return Err(ModemError::InvalidLength(len));
        }
        let body_end = HEADER_LEN + len as usize;
        if frame.len() < body_end + CRC_LEN {
            return Err(ModemError::InsufficientData);
        }

        let stored = u32::from_be_bytes([
            frame[body_end],
            frame[body_end + 1],
            frame[body_end + 2],
            frame[body_end + 3],
        ]);
        let calculated = crc32(&frame[..body_end]);
        if calculated != stored {
            return Err(ModemError::CrcMismatch { calculated, stored });
        }

        Ok(frame[HEADER_LEN..body_end].to_vec())
    }
}
