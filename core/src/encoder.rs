use crate::crypto;
use crate::error::{ModemError, Result};
use crate::framing::FrameEncoder;
use crate::modulator::BfskModulator;
use crate::{ModemParams, SAMPLE_RATE_TX};

/// Transmit path: message -> AES-256-CTR -> frame -> BFSK samples.
pub struct Encoder {
    params: ModemParams,
    key: [u8; 32],
    iv: [u8; 16],
}

impl Encoder {
    /// Encoder at a given output rate. Senders normally use
    /// [`SAMPLE_RATE_TX`]; other rates mostly matter for loopback testing.
    pub fn new(sample_rate: u32) -> Result<Self> {
        Ok(Self {
            params: ModemParams::new(sample_rate)?,
            key: crypto::DEMO_KEY,
            iv: crypto::DEMO_IV,
        })
    }

    pub fn params(&self) -> ModemParams {
        self.params
    }

    /// Encode a message into a pure BFSK waveform.
    pub fn encode(&self, message: &[u8]) -> Result<Vec<f32>> {
        self.encode_with_cover(message, None)
    }

    /// Encode a message, optionally hiding the tones inside a cover signal.
    pub fn encode_with_cover(&self, message: &[u8], cover: Option<&[f32]>) -> Result<Vec<f32>> {
        if message.is_empty() {
            return Err(ModemError::EmptyMessage);
        }
        let ciphertext = crypto::encrypt(&self.key, &self.iv, message)?;
        let frame = FrameEncoder::encode(&ciphertext)?;
        Ok(BfskModulator::new(self.params).modulate(&frame, cover))
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(SAMPLE_RATE_TX).expect("TX sample rate is valid")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framing::{CRC_LEN, HEADER_LEN};
    use crate::REP;

    #[test]
    fn test_encode_length_matches_frame_size() {
        let encoder = Encoder::default();
        let message = b"hello";
        let samples = encoder.encode(message).unwrap();

        let p = encoder.params();
        let frame_total = HEADER_LEN + message.len() + CRC_LEN;
        assert_eq!(
            samples.len(),
            (p.pre_bits + 8 * frame_total * REP) * p.spb
        );
    }

    #[test]
    fn test_encode_rejects_empty_message() {
        let encoder = Encoder::default();
        match encoder.encode(b"") {
            Err(ModemError::EmptyMessage) => {}
            other => panic!("expected EmptyMessage, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let encoder = Encoder::default();
        let a = encoder.encode(b"same text").unwrap();
        let b = encoder.encode(b"same text").unwrap();
        assert_eq!(a, b);
    }
}
