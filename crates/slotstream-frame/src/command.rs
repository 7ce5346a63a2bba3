//! Command kinds carried in the two-digit `cmd` header field.

/// What a frame means to the protocol.
///
/// Reset, Poll and Ack are content-free control frames; only Data frames
/// carry message chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Drop queues and pending state on the receiving side.
    Reset,
    /// Controller-to-worker solicitation for queued data or an Ack.
    Poll,
    /// Worker-to-controller "nothing to send, still alive".
    Ack,
    /// One chunk of a logical message.
    Data,
}

impl Command {
    /// Wire code for this command.
    pub fn code(self) -> u8 {
        match self {
            Command::Reset => 0,
            Command::Poll => 1,
            Command::Ack => 2,
            Command::Data => 3,
        }
    }

    /// Parse a wire code. Unknown codes are not commands.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Command::Reset),
            1 => Some(Command::Poll),
            2 => Some(Command::Ack),
            3 => Some(Command::Data),
            _ => None,
        }
    }

    /// Human-readable name for logs.
    pub fn name(self) -> &'static str {
        match self {
            Command::Reset => "RESET",
            Command::Poll => "POLL",
            Command::Ack => "ACK",
            Command::Data => "DATA",
        }
    }
}
