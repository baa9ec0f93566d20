//! Protocol constants for R24 radar communication.
//!
//! This module defines the fixed bytes of the UART frame format, the
//! control words that select a decode family, and the serial port defaults.

/// First frame header byte
pub const HEADER1: u8 = 0x53;

/// Second frame header byte
pub const HEADER2: u8 = 0x59;

/// First frame tail byte
pub const TAIL1: u8 = 0x54;

/// Second frame tail byte
pub const TAIL2: u8 = 0x43;

/// Offset of the control word inside a frame
pub const CONTROL_WORD_INDEX: usize = 2;

/// Offset of the command word inside a frame
pub const COMMAND_WORD_INDEX: usize = 3;

/// Offset of the first payload byte inside a frame
pub const DATA_INDEX: usize = 6;

/// Header, control, command and two length bytes
pub const FRAME_PREFIX_LEN: usize = 6;

/// Checksum byte plus the two tail bytes
pub const FRAME_SUFFIX_LEN: usize = 3;

/// Largest payload the decoder accepts (largest reply the module sends)
pub const MAX_PAYLOAD_LEN: usize = 32;

/// Largest length-high byte accepted before the low byte is read
pub const MAX_LEN_HIGH: u8 = 4;

/// Largest complete frame the decoder ever buffers
pub const MAX_FRAME_LEN: usize = FRAME_PREFIX_LEN + MAX_PAYLOAD_LEN + FRAME_SUFFIX_LEN;

/// Product info strings must be strictly shorter than this
pub const PRODUCT_STRING_MAX_LEN: usize = 32;

/// Placeholder data byte carried by every query frame
pub const QUERY_DATA_BYTE: u8 = 0x0F;

/// System functions (heartbeat, reset)
pub const CTRL_SYSTEM: u8 = 0x01;

/// Product information
pub const CTRL_PRODUCT: u8 = 0x02;

/// Working status
pub const CTRL_WORK_STATUS: u8 = 0x05;

/// Detection range settings
pub const CTRL_DETECTION_RANGE: u8 = 0x07;

/// Open (underlying) radar information
pub const CTRL_OPEN_INFO: u8 = 0x08;

/// Human presence information
pub const CTRL_HUMAN: u8 = 0x80;

/// Baud rate (115200 bps, 8N1)
pub const BAUD_RATE: u32 = 115_200;

/// Serial read timeout in milliseconds
pub const READ_TIMEOUT_MS: u64 = 10;

/// Interval between poll steps in milliseconds
pub const POLL_INTERVAL_MS: u64 = 8000;

/// Sleep between transport drains inside the blocking driver loop
pub const IDLE_SLEEP_MS: u64 = 5;
