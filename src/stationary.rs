//! Type-1005/1006 stationary reference station decoders.
//!
//! Straightforward bit extraction, no arithmetic reconstruction. Included so
//! the dispatcher knows their exact widths and can skip them cleanly.

use crate::bits::{get_i64, get_u64};
use crate::constants::{MESSAGE_TYPE_BITS, RTCM_LEADER_LEN};

/// Message 1005: Stationary RTK Reference Station ARP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stationary1005 {
    pub station_id: u16,
    pub itrf_realisation_year: u8,
    pub gps_indicator: bool,
    pub glonass_indicator: bool,
    pub galileo_indicator: bool,
    pub reference_station: bool,
    /// 0.0001 m units.
    pub antenna_ref_x: i64,
    pub oscillator: bool,
    pub antenna_ref_y: i64,
    pub quarter_cycle: u8,
    pub antenna_ref_z: i64,
}

/// Message 1006: same as 1005 plus antenna height.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stationary1006 {
    pub base: Stationary1005,
    /// 0.0001 m units.
    pub antenna_height: u16,
}

pub fn decode_1005(frame: &[u8]) -> Stationary1005 {
    let mut pos = RTCM_LEADER_LEN * 8 + MESSAGE_TYPE_BITS;
    let station_id = get_u64(frame, pos, 12) as u16;
    pos += 12;
    let itrf_realisation_year = get_u64(frame, pos, 6) as u8;
    pos += 6;
    let gps_indicator = get_u64(frame, pos, 1) != 0;
    pos += 1;
    let glonass_indicator = get_u64(frame, pos, 1) != 0;
    pos += 1;
    let galileo_indicator = get_u64(frame, pos, 1) != 0;
    pos += 1;
    let reference_station = get_u64(frame, pos, 1) != 0;
    pos += 1;
    let antenna_ref_x = get_i64(frame, pos, 38);
    pos += 38;
    let oscillator = get_u64(frame, pos, 1) != 0;
    pos += 1;
    pos += 1; // reserved
    let antenna_ref_y = get_i64(frame, pos, 38);
    pos += 38;
    let quarter_cycle = get_u64(frame, pos, 2) as u8;
    pos += 2;
    let antenna_ref_z = get_i64(frame, pos, 38);

    Stationary1005 {
        station_id,
        itrf_realisation_year,
        gps_indicator,
        glonass_indicator,
        galileo_indicator,
        reference_station,
        antenna_ref_x,
        oscillator,
        antenna_ref_y,
        quarter_cycle,
        antenna_ref_z,
    }
}

/// Bit width of the 1005 body, not counting the 12-bit message type (the
/// message's *total* declared width of 152 bits includes that type field).
const STATIONARY_1005_BODY_BITS: usize = 140;

pub fn decode_1006(frame: &[u8]) -> Stationary1006 {
    let base = decode_1005(frame);
    let antenna_height_pos = RTCM_LEADER_LEN * 8 + MESSAGE_TYPE_BITS + STATIONARY_1005_BODY_BITS;
    let antenna_height = get_u64(frame, antenna_height_pos, 16) as u16;
    Stationary1006 { base, antenna_height }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::bits::set_bits;
    use crate::constants::{RTCM_CRC_LEN, RTCM_SYNC_CHAR};
    use crate::crc24q::Crc24q;

    fn build_frame(message_type: u16, body_bits: usize, set: impl FnOnce(&mut [u8])) -> Vec<u8> {
        let payload_bits = MESSAGE_TYPE_BITS + body_bits;
        let payload_bytes = payload_bits.div_ceil(8);
        let mut frame = vec![0u8; RTCM_LEADER_LEN + payload_bytes + RTCM_CRC_LEN];
        frame[0] = RTCM_SYNC_CHAR;
        let len = payload_bytes as u16;
        frame[1] = ((len >> 8) & 0x03) as u8;
        frame[2] = (len & 0xff) as u8;
        set_bits(&mut frame, 24, 12, u64::from(message_type));
        set(&mut frame);

        let payload_end = RTCM_LEADER_LEN + payload_bytes;
        let mut calc = Crc24q::new();
        calc.update(&frame[..payload_end]);
        let (hi, mid, lo) = calc.result_bytes();
        frame[payload_end] = hi;
        frame[payload_end + 1] = mid;
        frame[payload_end + 2] = lo;
        frame
    }

    #[test]
    fn decodes_1005_fields() {
        let frame = build_frame(1005, STATIONARY_1005_BODY_BITS, |f| {
            set_bits(f, 36, 12, 4095); // station_id
            set_bits(f, 48, 6, 16); // itrf year
            set_bits(f, 54, 1, 1); // gps indicator
            set_bits(f, 57, 1, 1); // reference_station
            set_bits(f, 58, 38, (-123_456_789i64) as u64 & ((1 << 38) - 1));
            set_bits(f, 136, 2, 2); // quarter_cycle
        });

        let parsed = decode_1005(&frame);
        assert_eq!(parsed.station_id, 4095);
        assert_eq!(parsed.itrf_realisation_year, 16);
        assert!(parsed.gps_indicator);
        assert!(parsed.reference_station);
        assert_eq!(parsed.antenna_ref_x, -123_456_789);
        assert_eq!(parsed.quarter_cycle, 2);
    }

    #[test]
    fn decodes_1006_antenna_height_after_1005_body() {
        let frame = build_frame(1006, STATIONARY_1005_BODY_BITS + 16, |f| {
            set_bits(f, 36, 12, 10);
            set_bits(f, 36 + STATIONARY_1005_BODY_BITS, 16, 12345);
        });

        let parsed = decode_1006(&frame);
        assert_eq!(parsed.base.station_id, 10);
        assert_eq!(parsed.antenna_height, 12345);
    }
}
