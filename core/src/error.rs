use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModemError {
    #[error("empty message")]
    EmptyMessage,

    #[error("audio input is empty")]
    EmptyAudio,

    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("audio file error: {0}")]
    Audio(#[from] hound::Error),

    #[error("bit duration too small: {spb} samples per bit at {sample_rate} Hz")]
    BitDurationTooSmall { sample_rate: u32, spb: usize },

    #[error("sync not found")]
    SyncNotFound,

    #[error("magic not found near sync (preamble score {score}/{pre_bits})")]
    MagicNotFound { score: usize, pre_bits: usize },

    #[error("invalid payload length {0}")]
    InvalidLength(u32),

    #[error("recording ends before the frame does")]
    InsufficientData,

    #[error("CRC mismatch: calculated {calculated:08X}, stored {stored:08X}")]
    CrcMismatch { calculated: u32, stored: u32 },

    #[error("encryption failed")]
    EncryptFailed,

    #[error("decryption failed")]
    DecryptFailed,

    #[error("magic mismatch after refinement: got {0:02X?}")]
    MagicVerifyMismatch([u8; 4]),
}

pub type Result<T> = std::result::Result<T, ModemError>;
