use core::fmt;

/// A structural reason a candidate frame was rejected by the [`framer`](crate::framer).
///
/// These never reach the caller directly — the framer swallows them and
/// emits the candidate bytes as a `NonRtcm` event instead. They exist so the
/// unit tests (and an optional debug hook) can assert *why* a candidate was
/// rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// The six bits following the sync byte were not all zero.
    ReservedBitsNonZero,
    /// The 10-bit length field was zero.
    ZeroLength,
    /// `CRC-24Q(leader || payload)` did not match the trailing three bytes.
    InvalidChecksum { expected: u32, computed: u32 },
    /// The byte source ended before a complete candidate frame was read.
    Truncated,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::ReservedBitsNonZero => f.write_str("reserved bits after sync are non-zero"),
            FrameError::ZeroLength => f.write_str("frame payload length is zero"),
            FrameError::InvalidChecksum { expected, computed } => write!(
                f,
                "CRC-24Q mismatch: expected 0x{expected:06x}, computed 0x{computed:06x}"
            ),
            FrameError::Truncated => f.write_str("byte source ended mid-frame"),
        }
    }
}

impl std::error::Error for FrameError {}

/// Content errors raised while decoding a validated frame's payload.
///
/// Unlike [`FrameError`], these are attached to the emitted [`Message`](crate::dispatcher::Message)
/// rather than swallowed — the frame was structurally valid, but its content
/// could not be fully decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MsmError {
    /// Message type is not one of the 14 MSM4/MSM7 types.
    NotAnMsm { message_type: u16 },
    /// `nSat * nSig` exceeded 64 bits.
    CellMaskTooLong { sat_sig_bits: u32 },
    /// Fewer bits remained than the fixed 169-bit header plus the cell mask require.
    HeaderOverrun { expected_bits: usize, available_bits: usize },
    /// Fewer bits remained than the satellite cell block requires.
    SatelliteOverrun { expected_bits: usize, available_bits: usize },
    /// Fewer complete signal cells were present than the overrun rule requires.
    SignalOverrun { wanted_cells: usize, got_cells: usize },
}

impl fmt::Display for MsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MsmError::NotAnMsm { message_type } => {
                write!(f, "message type {message_type} is not an MSM4 or an MSM7")
            },
            MsmError::CellMaskTooLong { sat_sig_bits } => write!(
                f,
                "GetMSMHeader: cellMask is {sat_sig_bits} bits - expected <= 64"
            ),
            MsmError::HeaderOverrun { expected_bits, available_bits } => write!(
                f,
                "bitstream too short for MSM header: want {expected_bits} bits, have {available_bits}"
            ),
            MsmError::SatelliteOverrun { expected_bits, available_bits } => write!(
                f,
                "bitstream too short for satellite data: want {expected_bits} bits, have {available_bits}"
            ),
            MsmError::SignalOverrun { wanted_cells, got_cells } => write!(
                f,
                "overrun - want {wanted_cells} cells, got {got_cells}"
            ),
        }
    }
}

impl std::error::Error for MsmError {}

/// Range errors raised by the [timestamp resolver](crate::time).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeError {
    /// A GPS/Galileo/BeiDou timestamp exceeded 604 799 999 ms.
    TimestampOutOfRange { timestamp: u32 },
    /// A GLONASS day-of-week field exceeded 6.
    IllegalGlonassDay { day: u8 },
    /// A GLONASS millisecond-of-day field was >= 86 400 000.
    GlonassMillisecondsOutOfRange { milliseconds: u32 },
}

impl fmt::Display for TimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeError::TimestampOutOfRange { timestamp } => {
                write!(f, "timestamp out of range: {timestamp}")
            },
            TimeError::IllegalGlonassDay { day } => write!(f, "illegal Glonass day: {day}"),
            TimeError::GlonassMillisecondsOutOfRange { milliseconds } => {
                write!(f, "Glonass milliseconds out of range: {milliseconds}")
            },
        }
    }
}

impl std::error::Error for TimeError {}

/// Structured cause behind a [`Message`](crate::dispatcher::Message)'s `error` string.
///
/// `Message::error` carries a bare string for this; `error_detail` adds a
/// matchable enum alongside it (the string remains, formatted from this
/// value) so callers can branch on the cause instead of parsing text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Msm(MsmError),
    Time(TimeError),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Msm(e) => e.fmt(f),
            DecodeError::Time(e) => e.fmt(f),
        }
    }
}

impl std::error::Error for DecodeError {}

impl From<MsmError> for DecodeError {
    fn from(e: MsmError) -> Self {
        DecodeError::Msm(e)
    }
}

impl From<TimeError> for DecodeError {
    fn from(e: TimeError) -> Self {
        DecodeError::Time(e)
    }
}
