//! Frame checksum: the low byte of the sum of every byte before the
//! checksum slot.

use crate::constants::FRAME_SUFFIX_LEN;

/// Calculate the checksum of a complete frame.
///
/// The last three bytes (checksum slot and tail) are excluded, so the
/// frame may carry any value in its checksum slot when this is called.
pub fn checksum(frame: &[u8]) -> u8 {
    let end = frame.len().saturating_sub(FRAME_SUFFIX_LEN);
    frame[..end].iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Check the checksum slot of a complete frame against its contents.
pub fn verify(frame: &[u8]) -> bool {
    if frame.len() < FRAME_SUFFIX_LEN {
        return false;
    }
    frame[frame.len() - FRAME_SUFFIX_LEN] == checksum(frame)
}
