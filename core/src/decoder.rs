use crate::acquisition::{acquire, FrameLock};
use crate::crypto;
use crate::demodulator::extract_frame;
use crate::error::{ModemError, Result};
use crate::frontend::condition;
use crate::ModemParams;

/// Receive path: PCM -> conditioning -> acquisition -> frame -> plaintext.
pub struct Decoder {
    params: ModemParams,
    key: [u8; 32],
    iv: [u8; 16],
}

/// A recovered message plus the sync decisions that produced it, kept for
/// post-mortem diagnostics.
#[derive(Debug)]
pub struct Decoded {
    pub plaintext: Vec<u8>,
    pub lock: FrameLock,
}

impl Decoder {
    /// Decoder for a recording at the file's native rate.
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

    /// Recover the plaintext from a mono recording.
    pub fn decode(&self, samples: &[f32]) -> Result<Decoded> {
        if samples.is_empty() {
            return Err(ModemError::EmptyAudio);
        }

        let mut x = samples.to_vec();
        condition(&mut x, self.params.sample_rate);

        let lock = acquire(&x, &self.params)?;
        let ciphertext = extract_frame(&x, &self.params, &lock)?;
        let plaintext = crypto::decrypt(&self.key, &self.iv, &ciphertext)?;

        Ok(Decoded { plaintext, lock })
    }
}
