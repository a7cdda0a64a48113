//! Satellite cell decoding.
//!
//! Column-major: every satellite's range_whole_ms is read before any
//! satellite's extended_info, and so on, not cell-by-cell.

use crate::bits::{get_i64, get_u64};
use crate::constants::sentinel;
use crate::error::MsmError;
use crate::msm::header::MsmHeader;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msm4SatelliteCell {
    pub satellite_id: u8,
    pub range_whole_ms: u8,
    pub range_fractional_ms: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msm7SatelliteCell {
    pub satellite_id: u8,
    pub range_whole_ms: u8,
    pub extended_info: u8,
    pub range_fractional_ms: u16,
    pub phase_range_rate: i16,
}

impl Msm4SatelliteCell {
    pub fn range_is_invalid(&self) -> bool {
        self.range_whole_ms == sentinel::RANGE_WHOLE_MS
    }
}

impl Msm7SatelliteCell {
    pub fn range_is_invalid(&self) -> bool {
        self.range_whole_ms == sentinel::RANGE_WHOLE_MS
    }

    pub fn phase_range_rate_is_invalid(&self) -> bool {
        i32::from(self.phase_range_rate) == sentinel::PHASE_RANGE_RATE_MSM7
    }
}

fn check_overrun(available_bits: usize, expected_bits: usize) -> Result<(), MsmError> {
    if available_bits < expected_bits {
        return Err(MsmError::SatelliteOverrun {
            expected_bits,
            available_bits,
        });
    }
    Ok(())
}

/// Decodes `header.num_satellites()` MSM4 satellite cells (18 bits each,
/// column-major) starting at `pos`. Returns the cells and the bit offset at
/// which signal cells begin.
pub fn decode_msm4_satellites(
    frame: &[u8],
    pos: usize,
    header: &MsmHeader,
    payload_bit_end: usize,
) -> Result<(Vec<Msm4SatelliteCell>, usize), MsmError> {
    let nsat = header.num_satellites();
    let expected_bits = 18 * nsat;
    check_overrun(payload_bit_end.saturating_sub(pos), expected_bits)?;

    let mut p = pos;
    let mut range_whole = Vec::with_capacity(nsat);
    for _ in 0..nsat {
        range_whole.push(get_u64(frame, p, 8) as u8);
        p += 8;
    }
    let mut range_fractional = Vec::with_capacity(nsat);
    for _ in 0..nsat {
        range_fractional.push(get_u64(frame, p, 10) as u16);
        p += 10;
    }

    let cells = (0..nsat)
        .map(|i| Msm4SatelliteCell {
            satellite_id: header.satellites[i],
            range_whole_ms: range_whole[i],
            range_fractional_ms: range_fractional[i],
        })
        .collect();

    Ok((cells, p))
}

/// Decodes `header.num_satellites()` MSM7 satellite cells (36 bits each,
/// column-major) starting at `pos`. Returns the cells and the bit offset at
/// which signal cells begin.
pub fn decode_msm7_satellites(
    frame: &[u8],
    pos: usize,
    header: &MsmHeader,
    payload_bit_end: usize,
) -> Result<(Vec<Msm7SatelliteCell>, usize), MsmError> {
    let nsat = header.num_satellites();
    let expected_bits = 36 * nsat;
    check_overrun(payload_bit_end.saturating_sub(pos), expected_bits)?;

    let mut p = pos;
    let mut range_whole = Vec::with_capacity(nsat);
    for _ in 0..nsat {
        range_whole.push(get_u64(frame, p, 8) as u8);
        p += 8;
    }
    let mut extended_info = Vec::with_capacity(nsat);
    for _ in 0..nsat {
        extended_info.push(get_u64(frame, p, 4) as u8);
        p += 4;
    }
    let mut range_fractional = Vec::with_capacity(nsat);
    for _ in 0..nsat {
        range_fractional.push(get_u64(frame, p, 10) as u16);
        p += 10;
    }
    let mut phase_range_rate = Vec::with_capacity(nsat);
    for _ in 0..nsat {
        phase_range_rate.push(get_i64(frame, p, 14) as i16);
        p += 14;
    }

    let cells = (0..nsat)
        .map(|i| Msm7SatelliteCell {
            satellite_id: header.satellites[i],
            range_whole_ms: range_whole[i],
            extended_info: extended_info[i],
            range_fractional_ms: range_fractional[i],
            phase_range_rate: phase_range_rate[i],
        })
        .collect();

    Ok((cells, p))
}
