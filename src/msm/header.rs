//! MSM header decoding.

use crate::bits::get_u64;
use crate::constants::{
    MESSAGE_TYPE_BITS, MSM4_MESSAGE_TYPES, MSM7_MESSAGE_TYPES, MSM_HEADER_FIXED_BITS,
    RTCM_CRC_LEN, RTCM_LEADER_LEN,
};
use crate::error::MsmError;

/// A decoded MSM header: the fixed fields common to MSM4 and MSM7 messages,
/// plus the expanded satellite/signal/cell masks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsmHeader {
    pub message_type: u16,
    pub station_id: u16,
    pub timestamp: u32,
    pub multiple_message: bool,
    pub issue_of_data_station: u8,
    pub session_transmission_time: u8,
    pub clock_steering_indicator: u8,
    pub external_clock_indicator: u8,
    pub divergence_free_smoothing: bool,
    pub smoothing_interval: u8,
    pub satellite_mask: u64,
    pub signal_mask: u32,
    /// Ascending satellite IDs (1..=64) whose satellite_mask bit is set.
    pub satellites: Vec<u8>,
    /// Ascending signal IDs (1..=32) whose signal_mask bit is set.
    pub signals: Vec<u8>,
    /// `satellites.len()` rows by `signals.len()` columns, row-major;
    /// `cells[i][j]` is true iff satellite i reports signal j.
    pub cells: Vec<Vec<bool>>,
    pub num_signal_cells: usize,
}

impl MsmHeader {
    pub fn num_satellites(&self) -> usize {
        self.satellites.len()
    }

    pub fn num_signals(&self) -> usize {
        self.signals.len()
    }
}

/// Decodes an MSM header starting right after the 12-bit message type, which
/// this function re-reads from `frame` to validate and record.
///
/// `frame` must be a complete, CRC-validated RTCM3 frame (leader + payload +
/// trailer) — bit offsets are measured from byte 0 of the frame, leader
/// included. Returns the header and the bit offset at which satellite
/// cells begin.
pub fn decode_header(frame: &[u8]) -> Result<(MsmHeader, usize), MsmError> {
    let total_bits = frame.len() * 8;
    let payload_bit_end = total_bits.saturating_sub(RTCM_CRC_LEN * 8);

    let message_type = get_u64(frame, RTCM_LEADER_LEN * 8, MESSAGE_TYPE_BITS) as u16;
    if !MSM4_MESSAGE_TYPES.contains(&message_type) && !MSM7_MESSAGE_TYPES.contains(&message_type) {
        return Err(MsmError::NotAnMsm { message_type });
    }

    let mut pos = RTCM_LEADER_LEN * 8 + MESSAGE_TYPE_BITS;
    let fixed_bits_after_type = MSM_HEADER_FIXED_BITS - MESSAGE_TYPE_BITS;
    require_bits(payload_bit_end, pos, fixed_bits_after_type)?;

    let station_id = get_u64(frame, pos, 12) as u16;
    pos += 12;
    let timestamp = get_u64(frame, pos, 30) as u32;
    pos += 30;
    let multiple_message = get_u64(frame, pos, 1) != 0;
    pos += 1;
    let issue_of_data_station = get_u64(frame, pos, 3) as u8;
    pos += 3;
    let session_transmission_time = get_u64(frame, pos, 7) as u8;
    pos += 7;
    let clock_steering_indicator = get_u64(frame, pos, 2) as u8;
    pos += 2;
    let external_clock_indicator = get_u64(frame, pos, 2) as u8;
    pos += 2;
    let divergence_free_smoothing = get_u64(frame, pos, 1) != 0;
    pos += 1;
    let smoothing_interval = get_u64(frame, pos, 3) as u8;
    pos += 3;
    let satellite_mask = get_u64(frame, pos, 64);
    pos += 64;
    let signal_mask = get_u64(frame, pos, 32) as u32;
    pos += 32;

    let satellites = expand_mask(satellite_mask, 64);
    let signals = expand_mask(u64::from(signal_mask), 32);

    let nsat = satellites.len();
    let nsig = signals.len();
    let sat_sig_bits = nsat.checked_mul(nsig).unwrap_or(usize::MAX);
    if sat_sig_bits > 64 {
        return Err(MsmError::CellMaskTooLong {
            sat_sig_bits: sat_sig_bits as u32,
        });
    }

    require_bits(payload_bit_end, pos, sat_sig_bits)?;

    let cell_mask = if sat_sig_bits == 0 {
        0
    } else {
        get_u64(frame, pos, sat_sig_bits)
    };
    pos += sat_sig_bits;

    let mut cells = vec![vec![false; nsig]; nsat];
    let mut num_signal_cells = 0;
    for row in 0..nsat {
        for col in 0..nsig {
            let k = row * nsig + col;
            let bit = (cell_mask >> (sat_sig_bits - 1 - k)) & 1 != 0;
            cells[row][col] = bit;
            if bit {
                num_signal_cells += 1;
            }
        }
    }

    let header = MsmHeader {
        message_type,
        station_id,
        timestamp,
        multiple_message,
        issue_of_data_station,
        session_transmission_time,
        clock_steering_indicator,
        external_clock_indicator,
        divergence_free_smoothing,
        smoothing_interval,
        satellite_mask,
        signal_mask,
        satellites,
        signals,
        cells,
        num_signal_cells,
    };

    Ok((header, pos))
}

fn require_bits(payload_bit_end: usize, pos: usize, needed: usize) -> Result<(), MsmError> {
    let available = payload_bit_end.saturating_sub(pos);
    if available < needed {
        return Err(MsmError::HeaderOverrun {
            expected_bits: needed,
            available_bits: available,
        });
    }
    Ok(())
}

/// Expands a bitmask into ascending 1-based IDs: bit `width-1` (the first
/// bit transmitted) is ID 1, bit 0 (the last bit transmitted) is ID `width`.
fn expand_mask(mask: u64, width: u32) -> Vec<u8> {
    (0..width)
        .filter(|i| mask & (1u64 << (width - 1 - i)) != 0)
        .map(|i| (i + 1) as u8)
        .collect()
}
