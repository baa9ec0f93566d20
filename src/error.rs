//! Error types for R24 protocol operations.

use thiserror::Error;

/// Result type alias for R24 operations.
pub type Result<T> = std::result::Result<T, R24Error>;

/// Error types for R24 radar communication.
///
/// None of these are fatal to a session: the receive path reports them and
/// keeps consuming bytes.
#[derive(Error, Debug)]
pub enum R24Error {
    /// Serial port communication error
    #[error("Serial port error: {0}")]
    SerialPort(#[from] serialport::Error),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Second header byte did not follow the first
    #[error("Bad header byte: {value:#04x}")]
    BadHeader {
        /// Byte received in place of the second header byte
        value: u8,
    },

    /// Length high byte above the accepted ceiling
    #[error("Length high byte out of range: {high:#04x}")]
    LengthOutOfRange {
        /// Received length high byte
        high: u8,
    },

    /// Declared payload longer than the decoder accepts
    #[error("Payload too long: {length} bytes (max 32)")]
    PayloadTooLong {
        /// Declared payload length
        length: usize,
    },

    /// Tail bytes did not match
    #[error("Bad tail byte: {value:#04x}")]
    BadTail {
        /// Byte received in place of a tail byte
        value: u8,
    },

    /// Frame checksum validation failed
    #[error("Checksum mismatch: computed {expected:#04x}, received {actual:#04x}")]
    ChecksumMismatch {
        /// Checksum computed over the received bytes
        expected: u8,
        /// Checksum carried by the frame
        actual: u8,
    },

    /// Control word not in the decode table
    #[error("Unknown control word: {0:#04x}")]
    UnknownControl(u8),

    /// Command word not in the family's decode table
    #[error("Unknown command word {command:#04x} for control word {control:#04x}")]
    UnknownCommand {
        /// Control word of the frame
        control: u8,
        /// Unmatched command word
        command: u8,
    },

    /// Decoded index outside of its table
    #[error("Value {value} out of range for {field}")]
    OutOfRange {
        /// Name of the field being decoded or encoded
        field: &'static str,
        /// Offending raw value
        value: u32,
    },

    /// Product info string longer than the buffer cap
    #[error("Product string too long: {length} bytes (max 31)")]
    OversizeString {
        /// Declared string length
        length: usize,
    },

    /// Payload shorter than the fields the command carries
    #[error("Short payload: need {needed} bytes, got {actual}")]
    ShortPayload {
        /// Bytes required by the command layout
        needed: usize,
        /// Bytes actually present
        actual: usize,
    },

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl R24Error {
    /// True for errors raised by the frame decoder itself.
    pub fn is_framing(&self) -> bool {
        matches!(
            self,
            R24Error::BadHeader { .. }
                | R24Error::LengthOutOfRange { .. }
                | R24Error::PayloadTooLong { .. }
                | R24Error::BadTail { .. }
        )
    }
}
