//! GNSS constellation identity, derived from an MSM message type.

use crate::constants::{MSM4_MESSAGE_TYPES, MSM7_MESSAGE_TYPES};

/// The constellation an MSM message reports on. Ordering of the message-type
/// tables in `constants.rs` (GPS, GLONASS, Galileo, SBAS, QZSS, BeiDou,
/// NavIC) determines which variant a message type maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constellation {
    Gps,
    Glonass,
    Galileo,
    Sbas,
    Qzss,
    Beidou,
    Navic,
}

impl Constellation {
    /// Maps an MSM4 or MSM7 message type to its constellation. Returns
    /// `None` for a type that is not in either MSM table.
    pub fn from_message_type(message_type: u16) -> Option<Self> {
        let index = MSM4_MESSAGE_TYPES
            .iter()
            .position(|&t| t == message_type)
            .or_else(|| MSM7_MESSAGE_TYPES.iter().position(|&t| t == message_type))?;

        Some(match index {
            0 => Constellation::Gps,
            1 => Constellation::Glonass,
            2 => Constellation::Galileo,
            3 => Constellation::Sbas,
            4 => Constellation::Qzss,
            5 => Constellation::Beidou,
            6 => Constellation::Navic,
            _ => unreachable!("MSM message type tables have exactly 7 entries"),
        })
    }
}
