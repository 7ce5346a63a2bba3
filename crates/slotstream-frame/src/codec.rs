use bytes::{Bytes, BytesMut};

use crate::command::Command;
use crate::error::{FrameError, Result};

/// Frame header: marker (1) + new (1) + checksum (2) + remaining (3) +
/// seq (1) + command (2) + five separators = 15 bytes.
pub const HEADER_LEN: usize = 15;

/// Marker byte opening every frame.
pub const MARKER: u8 = b'#';

/// Header field separator.
pub const SEPARATOR: u8 = b'|';

/// Largest value the three-digit remaining-chunk field can carry.
pub const MAX_REMAINING: u16 = 999;

/// Largest value the single-digit sequence field can carry.
pub const MAX_SEQ: u8 = 9;

/// Byte-wise XOR over a complete logical message.
///
/// Computed once by the sender over the whole serialized message and
/// attached to the first chunk only; the receiver recomputes it over the
/// reassembled bytes.
pub fn xor_checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, byte| acc ^ byte)
}

/// One on-wire frame: fixed-width text header plus opaque payload bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// First chunk of a new logical message.
    pub first: bool,
    /// XOR checksum of the whole logical message. Nonzero only on the
    /// first chunk of a Data message.
    pub checksum: u8,
    /// Chunks still to follow after this one; the final chunk carries 0.
    pub remaining: u16,
    /// Sender frame counter, wrapping 9 -> 0.
    pub seq: u8,
    /// Command kind.
    pub command: Command,
    /// Opaque payload bytes; may be empty.
    pub payload: Bytes,
}

impl Frame {
    /// Build a content-free control frame (Poll, Ack, Reset).
    pub fn control(command: Command, seq: u8) -> Self {
        Self {
            first: true,
            checksum: 0,
            remaining: 0,
            seq,
            command,
            payload: Bytes::new(),
        }
    }

    /// Encode into the wire layout.
    ///
    /// Width discipline is mandatory: 1/2/3/1/2 digits, zero-padded,
    /// lowercase hex for the checksum.
    pub fn encode(&self) -> Result<Bytes> {
        if self.remaining > MAX_REMAINING {
            return Err(FrameError::RemainingOutOfRange(self.remaining));
        }
        if self.seq > MAX_SEQ {
            return Err(FrameError::SequenceOutOfRange(self.seq));
        }

        let header = format!(
            "#{}|{:02x}|{:03}|{}|{:02}|",
            u8::from(self.first),
            self.checksum,
            self.remaining,
            self.seq,
            self.command.code(),
        );
        debug_assert_eq!(header.len(), HEADER_LEN);

        let mut buf = BytesMut::with_capacity(HEADER_LEN + self.payload.len());
        buf.extend_from_slice(header.as_bytes());
        buf.extend_from_slice(&self.payload);
        Ok(buf.freeze())
    }

    /// Decode a candidate buffer.
    ///
    /// Parsing is positional, so payload bytes may contain the separator
    /// or marker. Anything that does not match the full pattern — short
    /// buffer, wrong marker or separators, non-digit fields, invalid hex,
    /// unknown command — yields `None`, which callers treat as "no frame
    /// this tick".
    pub fn decode(buf: &[u8]) -> Option<Self> {
        if buf.len() < HEADER_LEN || buf[0] != MARKER {
            return None;
        }
        if buf[2] != SEPARATOR
            || buf[5] != SEPARATOR
            || buf[9] != SEPARATOR
            || buf[11] != SEPARATOR
            || buf[14] != SEPARATOR
        {
            return None;
        }

        let first = match buf[1] {
            b'0' => false,
            b'1' => true,
            _ => return None,
        };
        let checksum = hex_digit(buf[3])? * 16 + hex_digit(buf[4])?;
        let remaining = u16::from(digit(buf[6])?) * 100
            + u16::from(digit(buf[7])?) * 10
            + u16::from(digit(buf[8])?);
        let seq = digit(buf[10])?;
        let command = Command::from_code(digit(buf[12])? * 10 + digit(buf[13])?)?;
        let payload = Bytes::copy_from_slice(&buf[HEADER_LEN..]);

        Some(Self {
            first,
            checksum,
            remaining,
            seq,
            command,
            payload,
        })
    }
}

fn digit(byte: u8) -> Option<u8> {
    byte.is_ascii_digit().then(|| byte - b'0')
}

fn hex_digit(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|value| value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_frame(payload: &'static [u8]) -> Frame {
        Frame {
            first: true,
            checksum: xor_checksum(payload),
            remaining: 0,
            seq: 0,
            command: Command::Data,
            payload: Bytes::from_static(payload),
        }
    }

    #[test]
    fn encode_matches_wire_layout() {
        let frame = Frame {
            first: true,
            checksum: 0xa0,
            remaining: 9,
            seq: 3,
            command: Command::Data,
            payload: Bytes::from_static(b"hi"),
        };
        assert_eq!(frame.encode().unwrap().as_ref(), b"#1|a0|009|3|03|hi");
    }

    #[test]
    fn checksum_is_lowercase_hex() {
        let frame = Frame {
            checksum: 0xab,
            ..data_frame(b"")
        };
        let wire = frame.encode().unwrap();
        assert_eq!(&wire[3..5], b"ab");
    }

    #[test]
    fn encode_decode_roundtrip() {
        let frame = Frame {
            first: false,
            checksum: 0,
            remaining: 42,
            seq: 7,
            command: Command::Data,
            payload: Bytes::from_static(b"chunk bytes"),
        };
        let wire = frame.encode().unwrap();
        assert_eq!(Frame::decode(&wire).unwrap(), frame);
    }

    #[test]
    fn payload_may_contain_marker_and_separator() {
        let frame = data_frame(b"a|b#c||#");
        let wire = frame.encode().unwrap();
        let decoded = Frame::decode(&wire).unwrap();
        assert_eq!(decoded.payload.as_ref(), b"a|b#c||#");
    }

    #[test]
    fn empty_payload_roundtrip() {
        let frame = data_frame(b"");
        let wire = frame.encode().unwrap();
        assert_eq!(wire.len(), HEADER_LEN);
        let decoded = Frame::decode(&wire).unwrap();
        assert!(decoded.payload.is_empty());
    }

    #[test]
    fn control_frame_shape() {
        let frame = Frame::control(Command::Poll, 4);
        assert!(frame.first);
        assert_eq!(frame.checksum, 0);
        assert_eq!(frame.remaining, 0);
        assert!(frame.payload.is_empty());
        assert_eq!(frame.encode().unwrap().as_ref(), b"#1|00|000|4|01|");
    }

    #[test]
    fn remaining_over_field_width_rejected() {
        let frame = Frame {
            remaining: 1000,
            ..data_frame(b"x")
        };
        assert!(matches!(
            frame.encode(),
            Err(FrameError::RemainingOutOfRange(1000))
        ));
    }

    #[test]
    fn seq_over_field_width_rejected() {
        let frame = Frame {
            seq: 10,
            ..data_frame(b"x")
        };
        assert!(matches!(
            frame.encode(),
            Err(FrameError::SequenceOutOfRange(10))
        ));
    }

    #[test]
    fn decode_short_buffer() {
        assert_eq!(Frame::decode(b""), None);
        assert_eq!(Frame::decode(b"#1|00|000|4|0"), None);
    }

    #[test]
    fn decode_wrong_marker() {
        assert_eq!(Frame::decode(b"!1|00|000|4|01|"), None);
    }

    #[test]
    fn decode_wrong_separator() {
        assert_eq!(Frame::decode(b"#1|00|000|4,01|"), None);
        assert_eq!(Frame::decode(b"#1-00|000|4|01|"), None);
    }

    #[test]
    fn decode_bad_new_flag() {
        assert_eq!(Frame::decode(b"#2|00|000|4|01|"), None);
        assert_eq!(Frame::decode(b"#x|00|000|4|01|"), None);
    }

    #[test]
    fn decode_bad_checksum_hex() {
        assert_eq!(Frame::decode(b"#1|zz|000|4|01|"), None);
    }

    #[test]
    fn decode_accepts_uppercase_hex() {
        let frame = Frame::decode(b"#1|AB|000|4|03|x").unwrap();
        assert_eq!(frame.checksum, 0xab);
    }

    #[test]
    fn decode_non_digit_remaining() {
        assert_eq!(Frame::decode(b"#1|00|0a0|4|01|"), None);
    }

    #[test]
    fn decode_unknown_command() {
        assert_eq!(Frame::decode(b"#1|00|000|4|04|"), None);
        assert_eq!(Frame::decode(b"#1|00|000|4|99|"), None);
    }

    #[test]
    fn decode_garbage() {
        assert_eq!(Frame::decode(b"not a frame at all, just text"), None);
    }

    #[test]
    fn xor_checksum_known_values() {
        assert_eq!(xor_checksum(b""), 0);
        assert_eq!(xor_checksum(b"\x01\x02\x04"), 0x07);
        assert_eq!(xor_checksum(b"aa"), 0);
        let payload = b"1234567890";
        let folded = payload.iter().fold(0u8, |acc, b| acc ^ b);
        assert_eq!(xor_checksum(payload), folded);
    }

    #[test]
    fn checksum_folds_across_chunk_boundaries() {
        let message = b"abcdefgh";
        let whole = xor_checksum(message);
        let split = xor_checksum(&message[..4]) ^ xor_checksum(&message[4..]);
        assert_eq!(whole, split);
    }
}
