//! Fixed-width text framing for the slotstream poll/response protocol.
//!
//! Every frame is a marker byte, five `|`-separated header fields with
//! mandatory widths, and an opaque payload:
//!
//! ```text
//! #<new>|<cksum>|<remaining>|<seq>|<cmd>|<payload>
//! ```
//!
//! - `new` (1 digit): 1 on the first chunk of a logical message
//! - `cksum` (2 hex digits): XOR of the whole message, first chunk only
//! - `remaining` (3 digits): chunks still to follow, 0 on the last
//! - `seq` (1 digit): sender frame counter, wrapping 9 -> 0
//! - `cmd` (2 digits): Reset / Poll / Ack / Data
//!
//! This crate is pure data transformation; no I/O and no protocol state
//! live here.

pub mod codec;
pub mod command;
pub mod error;

pub use codec::{xor_checksum, Frame, HEADER_LEN, MAX_REMAINING, MAX_SEQ};
pub use command::Command;
pub use error::{FrameError, Result};
