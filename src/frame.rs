//! Wire frames and the byte-at-a-time frame decoder.
//!
//! Frame layout: `53 59 CC SS LL ll [payload...] KK 54 43` where `CC` is the
//! control word, `SS` the command word, `LL ll` the big-endian payload length
//! and `KK` the checksum.

use crate::checksum;
use crate::constants::*;
use crate::error::{R24Error, Result};

/// A validated protocol frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub control: u8,
    pub command: u8,
    pub payload: Vec<u8>,
}

impl Frame {
    /// Create a frame from its parts
    pub fn new(control: u8, command: u8, payload: &[u8]) -> Self {
        Frame {
            control,
            command,
            payload: payload.to_vec(),
        }
    }

    /// Serialize to wire bytes with the checksum filled in
    pub fn to_bytes(&self) -> Vec<u8> {
        let len = self.payload.len() as u16;
        let mut bytes = Vec::with_capacity(FRAME_PREFIX_LEN + self.payload.len() + FRAME_SUFFIX_LEN);
        bytes.extend_from_slice(&[HEADER1, HEADER2, self.control, self.command]);
        bytes.extend_from_slice(&len.to_be_bytes());
        bytes.extend_from_slice(&self.payload);
        bytes.extend_from_slice(&[0x00, TAIL1, TAIL2]);
        let crc_index = bytes.len() - FRAME_SUFFIX_LEN;
        bytes[crc_index] = checksum::checksum(&bytes);
        bytes
    }

    /// Payload byte at `index`, or a short-payload error
    pub fn byte(&self, index: usize) -> Result<u8> {
        self.payload
            .get(index)
            .copied()
            .ok_or(R24Error::ShortPayload {
                needed: index + 1,
                actual: self.payload.len(),
            })
    }

    /// Big-endian u16 starting at payload `index`
    pub fn be_u16(&self, index: usize) -> Result<u16> {
        Ok(u16::from_be_bytes([self.byte(index)?, self.byte(index + 1)?]))
    }

    /// Big-endian u32 starting at payload `index`
    pub fn be_u32(&self, index: usize) -> Result<u32> {
        let bytes = self.payload.get(index..index + 4).ok_or(R24Error::ShortPayload {
            needed: index + 4,
            actual: self.payload.len(),
        })?;
        Ok(u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn from_raw(raw: &[u8]) -> Self {
        Frame {
            control: raw[CONTROL_WORD_INDEX],
            command: raw[COMMAND_WORD_INDEX],
            payload: raw[DATA_INDEX..raw.len() - FRAME_SUFFIX_LEN].to_vec(),
        }
    }
}

/// Decoder states, one per expected byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    Idle,
    SawHeader1,
    ReadControl,
    ReadCommand,
    ReadLenHi,
    ReadLenLo,
    ReadPayload,
    ReadChecksum,
    SawTail1,
    SawTail2,
}

/// Byte-synchronous frame reassembly.
///
/// Feed bytes one at a time with [`FrameDecoder::push`]. Work per byte is
/// constant and the buffer never grows past [`MAX_FRAME_LEN`], because the
/// payload length is capped before any payload byte is stored.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    state: DecodeState,
    buf: [u8; MAX_FRAME_LEN],
    len: usize,
    remaining: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    pub fn new() -> Self {
        FrameDecoder {
            state: DecodeState::Idle,
            buf: [0u8; MAX_FRAME_LEN],
            len: 0,
            remaining: 0,
        }
    }

    /// Current state of the decoder
    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Drop any partial frame and return to idle
    pub fn reset(&mut self) {
        self.state = DecodeState::Idle;
        self.len = 0;
        self.remaining = 0;
    }

    fn store(&mut self, byte: u8) {
        self.buf[self.len] = byte;
        self.len += 1;
    }

    /// Consume one byte.
    ///
    /// Returns `Ok(Some(frame))` when the byte completes a frame whose tail
    /// and checksum check out, `Ok(None)` while a frame is in progress (or
    /// noise is being skipped), and `Err` when a frame is abandoned. The
    /// decoder is already back in [`DecodeState::Idle`] when an error is
    /// returned.
    pub fn push(&mut self, byte: u8) -> Result<Option<Frame>> {
        match self.state {
            DecodeState::Idle => {
                if byte == HEADER1 {
                    self.state = DecodeState::SawHeader1;
                }
            }
            DecodeState::SawHeader1 => {
                if byte == HEADER1 {
                    // Repeated first header byte: the earlier one was noise
                    return Ok(None);
                }
                if byte == HEADER2 {
                    self.len = 0;
                    self.store(HEADER1);
                    self.store(HEADER2);
                    self.state = DecodeState::ReadControl;
                } else {
                    self.reset();
                    return Err(R24Error::BadHeader { value: byte });
                }
            }
            DecodeState::ReadControl => {
                self.store(byte);
                self.state = DecodeState::ReadCommand;
            }
            DecodeState::ReadCommand => {
                self.store(byte);
                self.state = DecodeState::ReadLenHi;
            }
            DecodeState::ReadLenHi => {
                if byte > MAX_LEN_HIGH {
                    self.reset();
                    return Err(R24Error::LengthOutOfRange { high: byte });
                }
                self.remaining = byte as usize * 256;
                self.store(byte);
                self.state = DecodeState::ReadLenLo;
            }
            DecodeState::ReadLenLo => {
                let length = self.remaining + byte as usize;
                if length > MAX_PAYLOAD_LEN {
                    self.reset();
                    return Err(R24Error::PayloadTooLong { length });
                }
                self.remaining = length;
                self.store(byte);
                self.state = if length == 0 {
                    DecodeState::ReadChecksum
                } else {
                    DecodeState::ReadPayload
                };
            }
            DecodeState::ReadPayload => {
                self.store(byte);
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.state = DecodeState::ReadChecksum;
                }
            }
            DecodeState::ReadChecksum => {
                self.store(byte);
                self.state = DecodeState::SawTail1;
            }
            DecodeState::SawTail1 => {
                if byte != TAIL1 {
                    self.reset();
                    return Err(R24Error::BadTail { value: byte });
                }
                self.store(byte);
                self.state = DecodeState::SawTail2;
            }
            DecodeState::SawTail2 => {
                let result = if byte == TAIL2 {
                    self.store(byte);
                    let raw = &self.buf[..self.len];
                    if checksum::verify(raw) {
                        Ok(Some(Frame::from_raw(raw)))
                    } else {
                        Err(R24Error::ChecksumMismatch {
                            expected: checksum::checksum(raw),
                            actual: raw[raw.len() - FRAME_SUFFIX_LEN],
                        })
                    }
                } else {
                    Err(R24Error::BadTail { value: byte })
                };
                self.reset();
                return result;
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(decoder: &mut FrameDecoder, bytes: &[u8]) -> (Vec<Frame>, Vec<R24Error>) {
        let mut frames = Vec::new();
        let mut errors = Vec::new();
        for &b in bytes {
            match decoder.push(b) {
                Ok(Some(frame)) => frames.push(frame),
                Ok(None) => {}
                Err(e) => errors.push(e),
            }
        }
        (frames, errors)
    }

    #[test]
    fn encodes_query_template() {
        let bytes = Frame::new(0x08, 0x80, &[0x0F]).to_bytes();
        assert_eq!(bytes, vec![0x53, 0x59, 0x08, 0x80, 0x00, 0x01, 0x0F, 0x44, 0x54, 0x43]);
    }

    #[test]
    fn decodes_encoded_frame() {
        let frame = Frame::new(0x08, 0x01, &[10, 2, 30, 4, 12]);
        let mut decoder = FrameDecoder::new();
        let (frames, errors) = feed(&mut decoder, &frame.to_bytes());
        assert!(errors.is_empty());
        assert_eq!(frames, vec![frame]);
        assert_eq!(decoder.state(), DecodeState::Idle);
    }

    #[test]
    fn resynchronizes_after_noise() {
        let frame = Frame::new(0x80, 0x81, &[0x01]);
        let mut input = vec![0x00, 0x53, 0x11, 0xFF, 0x54, 0x43, 0x53];
        input.extend(frame.to_bytes());
        let mut decoder = FrameDecoder::new();
        let (frames, errors) = feed(&mut decoder, &input);
        assert_eq!(frames, vec![frame]);
        // Only the stray 0x53 followed by 0x11 is reported
        assert_eq!(errors.len(), 1);
        assert!(errors.iter().all(R24Error::is_framing));
    }

    #[test]
    fn rejects_corrupted_checksum() {
        let mut bytes = Frame::new(0x05, 0x87, &[0x02]).to_bytes();
        bytes[7] = bytes[7].wrapping_add(1);
        let mut decoder = FrameDecoder::new();
        let (frames, errors) = feed(&mut decoder, &bytes);
        assert!(frames.is_empty());
        assert!(matches!(errors[..], [R24Error::ChecksumMismatch { .. }]));
        assert_eq!(decoder.state(), DecodeState::Idle);
    }

    #[test]
    fn aborts_on_length_high_byte() {
        let mut decoder = FrameDecoder::new();
        let (frames, errors) = feed(&mut decoder, &[0x53, 0x59, 0x08, 0x80, 0x06]);
        assert!(frames.is_empty());
        assert!(matches!(errors[..], [R24Error::LengthOutOfRange { high: 0x06 }]));
        assert_eq!(decoder.state(), DecodeState::Idle);
    }

    #[test]
    fn aborts_on_oversize_length() {
        let mut decoder = FrameDecoder::new();
        let (_, errors) = feed(&mut decoder, &[0x53, 0x59, 0x08, 0x80, 0x00, 0x21]);
        assert!(matches!(errors[..], [R24Error::PayloadTooLong { length: 33 }]));

        // A nonzero high byte always overflows the 32 byte ceiling
        let (_, errors) = feed(&mut decoder, &[0x53, 0x59, 0x08, 0x80, 0x01, 0x00]);
        assert!(matches!(errors[..], [R24Error::PayloadTooLong { length: 256 }]));
    }

    #[test]
    fn accepts_largest_payload() {
        let frame = Frame::new(0x02, 0xA1, &[b'x'; MAX_PAYLOAD_LEN]);
        let mut decoder = FrameDecoder::new();
        let (frames, errors) = feed(&mut decoder, &frame.to_bytes());
        assert!(errors.is_empty());
        assert_eq!(frames[0].payload.len(), MAX_PAYLOAD_LEN);
    }

    #[test]
    fn zero_length_payload_skips_payload_state() {
        let frame = Frame::new(0x01, 0x02, &[]);
        let bytes = frame.to_bytes();
        let mut decoder = FrameDecoder::new();
        for &b in &bytes[..6] {
            assert!(decoder.push(b).unwrap().is_none());
        }
        assert_eq!(decoder.state(), DecodeState::ReadChecksum);
        let (frames, errors) = feed(&mut decoder, &bytes[6..]);
        assert!(errors.is_empty());
        assert_eq!(frames, vec![frame]);
    }

    #[test]
    fn tail_mismatch_discards_frame() {
        let mut bytes = Frame::new(0x80, 0x01, &[0x01]).to_bytes();
        bytes[8] = 0x00;
        let mut decoder = FrameDecoder::new();
        let (frames, errors) = feed(&mut decoder, &bytes);
        assert!(frames.is_empty());
        assert!(matches!(errors[0], R24Error::BadTail { value: 0x00 }));

        let mut bytes = Frame::new(0x80, 0x01, &[0x01]).to_bytes();
        bytes[9] = 0x44;
        let (frames, errors) = feed(&mut decoder, &bytes);
        assert!(frames.is_empty());
        assert!(matches!(errors[..], [R24Error::BadTail { value: 0x44 }]));
        assert_eq!(decoder.state(), DecodeState::Idle);
    }

    #[test]
    fn back_to_back_frames() {
        let a = Frame::new(0x07, 0x81, &[0x01, 0x2C]);
        let b = Frame::new(0x07, 0x84, &[0x00, 0xFA]);
        let mut input = a.to_bytes();
        input.extend(b.to_bytes());
        let mut decoder = FrameDecoder::new();
        let (frames, errors) = feed(&mut decoder, &input);
        assert!(errors.is_empty());
        assert_eq!(frames, vec![a, b]);
    }

    #[test]
    fn field_accessors_check_bounds() {
        let frame = Frame::new(0x08, 0x8C, &[0x00, 0x00, 0x01, 0x02]);
        assert_eq!(frame.be_u32(0).unwrap(), 0x0102);
        assert_eq!(frame.be_u16(2).unwrap(), 0x0102);
        assert!(matches!(
            frame.be_u32(1),
            Err(R24Error::ShortPayload { needed: 5, actual: 4 })
        ));
        assert!(frame.byte(4).is_err());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn payload() -> impl Strategy<Value = Vec<u8>> {
            proptest::collection::vec(any::<u8>(), 0..=MAX_PAYLOAD_LEN)
        }

        proptest! {
            #[test]
            fn encoded_frames_decode_unchanged(control: u8, command: u8, payload in payload()) {
                let frame = Frame::new(control, command, &payload);
                let (frames, errors) = feed(&mut FrameDecoder::new(), &frame.to_bytes());
                prop_assert!(errors.is_empty());
                prop_assert_eq!(frames, vec![frame]);
            }

            #[test]
            fn wrong_checksum_is_never_accepted(
                control: u8,
                command: u8,
                payload in payload(),
                corruption in 1..=255u8,
            ) {
                let mut bytes = Frame::new(control, command, &payload).to_bytes();
                let slot = bytes.len() - FRAME_SUFFIX_LEN;
                bytes[slot] = bytes[slot].wrapping_add(corruption);
                let mut decoder = FrameDecoder::new();
                let (frames, errors) = feed(&mut decoder, &bytes);
                prop_assert!(frames.is_empty());
                let is_single_checksum_mismatch =
                    matches!(errors.as_slice(), [R24Error::ChecksumMismatch { .. }]);
                prop_assert!(is_single_checksum_mismatch);
                prop_assert_eq!(decoder.state(), DecodeState::Idle);
            }

            #[test]
            fn arbitrary_input_never_panics(bytes in proptest::collection::vec(any::<u8>(), 0..512)) {
                let mut decoder = FrameDecoder::new();
                for frame in feed(&mut decoder, &bytes).0 {
                    prop_assert!(frame.payload.len() <= MAX_PAYLOAD_LEN);
                }
            }
        }
    }
}
