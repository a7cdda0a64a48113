//! Signal cell decoding and range/phase reconstruction.

use crate::bits::{get_i64, get_u64};
use crate::constants::{sentinel, ONE_LIGHT_MS};
use crate::error::MsmError;
use crate::msm::header::MsmHeader;
use crate::msm::satellite::{Msm4SatelliteCell, Msm7SatelliteCell};
use crate::observation::Observation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msm4SignalCell {
    pub satellite_index: usize,
    pub signal_id: u8,
    pub range_delta: i32,
    pub phase_range_delta: i32,
    pub lock_time_indicator: u8,
    pub half_cycle_ambiguity: bool,
    pub carrier_to_noise: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Msm7SignalCell {
    pub satellite_index: usize,
    pub signal_id: u8,
    pub range_delta: i32,
    pub phase_range_delta: i32,
    pub lock_time_indicator: u16,
    pub half_cycle_ambiguity: bool,
    pub carrier_to_noise: u16,
    pub phase_range_rate_delta: i32,
}

/// Cell coordinates, in row-major order, for every `true` entry of
/// `header.cells`. This is the order signal cells are read in and the order
/// they're matched back against `(satellite_index, signal_id)`.
fn flagged_cells(header: &MsmHeader) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity(header.num_signal_cells);
    for (row, cols) in header.cells.iter().enumerate() {
        for (col, &flagged) in cols.iter().enumerate() {
            if flagged {
                out.push((row, col));
            }
        }
    }
    out
}

/// Determines how many complete signal cells (each `cell_bits` wide) fit in
/// the remaining payload, honouring a unified `multiple_message` overrun
/// rule shared by MSM4 and MSM7: require every flagged cell when `false`,
/// at least one complete cell when `true`.
fn resolve_cell_count(
    header: &MsmHeader,
    available_bits: usize,
    cell_bits: usize,
) -> Result<usize, MsmError> {
    let max_present = available_bits / cell_bits;
    let present = max_present.min(header.num_signal_cells);

    if header.multiple_message {
        if present == 0 {
            return Err(MsmError::SignalOverrun {
                wanted_cells: 1,
                got_cells: 0,
            });
        }
    } else if present < header.num_signal_cells {
        return Err(MsmError::SignalOverrun {
            wanted_cells: header.num_signal_cells,
            got_cells: present,
        });
    }

    Ok(present)
}

pub fn decode_msm4_signals(
    frame: &[u8],
    pos: usize,
    header: &MsmHeader,
    payload_bit_end: usize,
) -> Result<(Vec<Msm4SignalCell>, usize), MsmError> {
    const CELL_BITS: usize = 15 + 22 + 4 + 1 + 6;
    let coords = flagged_cells(header);
    let n = resolve_cell_count(header, payload_bit_end.saturating_sub(pos), CELL_BITS)?;

    let mut p = pos;
    let range_delta = read_signed_column(frame, &mut p, 15, n);
    let phase_range_delta = read_signed_column(frame, &mut p, 22, n);
    let lock_time = read_unsigned_column(frame, &mut p, 4, n);
    let half_cycle = read_unsigned_column(frame, &mut p, 1, n);
    let carrier_to_noise = read_unsigned_column(frame, &mut p, 6, n);

    let cells = (0..n)
        .map(|k| {
            let (row, col) = coords[k];
            Msm4SignalCell {
                satellite_index: row,
                signal_id: header.signals[col],
                range_delta: range_delta[k],
                phase_range_delta: phase_range_delta[k],
                lock_time_indicator: lock_time[k] as u8,
                half_cycle_ambiguity: half_cycle[k] != 0,
                carrier_to_noise: carrier_to_noise[k] as u8,
            }
        })
        .collect();

    Ok((cells, p))
}

pub fn decode_msm7_signals(
    frame: &[u8],
    pos: usize,
    header: &MsmHeader,
    payload_bit_end: usize,
) -> Result<(Vec<Msm7SignalCell>, usize), MsmError> {
    const CELL_BITS: usize = 20 + 24 + 10 + 1 + 10 + 15;
    let coords = flagged_cells(header);
    let n = resolve_cell_count(header, payload_bit_end.saturating_sub(pos), CELL_BITS)?;

    let mut p = pos;
    let range_delta = read_signed_column(frame, &mut p, 20, n);
    let phase_range_delta = read_signed_column(frame, &mut p, 24, n);
    let lock_time = read_unsigned_column(frame, &mut p, 10, n);
    let half_cycle = read_unsigned_column(frame, &mut p, 1, n);
    let carrier_to_noise = read_unsigned_column(frame, &mut p, 10, n);
    let phase_range_rate_delta = read_signed_column(frame, &mut p, 15, n);

    let cells = (0..n)
        .map(|k| {
            let (row, col) = coords[k];
            Msm7SignalCell {
                satellite_index: row,
                signal_id: header.signals[col],
                range_delta: range_delta[k],
                phase_range_delta: phase_range_delta[k],
                lock_time_indicator: lock_time[k] as u16,
                half_cycle_ambiguity: half_cycle[k] != 0,
                carrier_to_noise: carrier_to_noise[k] as u16,
                phase_range_rate_delta: phase_range_rate_delta[k],
            }
        })
        .collect();

    Ok((cells, p))
}

fn read_signed_column(frame: &[u8], pos: &mut usize, width: usize, n: usize) -> Vec<i32> {
    (0..n)
        .map(|_| {
            let v = get_i64(frame, *pos, width) as i32;
            *pos += width;
            v
        })
        .collect()
}

fn read_unsigned_column(frame: &[u8], pos: &mut usize, width: usize, n: usize) -> Vec<u32> {
    (0..n)
        .map(|_| {
            let v = get_u64(frame, *pos, width) as u32;
            *pos += width;
            v
        })
        .collect()
}

/// Reconstructs a pseudorange in metres from a satellite's coarse range and
/// a signal's fine delta.
///
/// `range_delta` and `delta_sentinel` must already be normalised to the
/// MSM7 20-bit resolution (an MSM4 delta is shifted left 5 bits, sign
/// preserved, before calling this).
fn reconstruct_range_metres(range_whole_ms: u8, range_fractional_ms: u16, range_delta: i32, delta_sentinel: i32) -> Observation<f64> {
    if range_whole_ms == sentinel::RANGE_WHOLE_MS {
        return Observation::Valid(0.0);
    }

    let effective_delta = if range_delta == delta_sentinel { 0 } else { range_delta };
    let aggregate = (i64::from(range_whole_ms) << 29) + (i64::from(range_fractional_ms) << 19) + i64::from(effective_delta);
    Observation::Valid((aggregate as f64 / 2f64.powi(29)) * ONE_LIGHT_MS)
}

/// Reconstructs a carrier phase range in cycles, given the signal's
/// wavelength in metres (0 / unknown wavelengths yield `Invalid`).
fn reconstruct_phase_range_cycles(
    range_whole_ms: u8,
    range_fractional_ms: u16,
    phase_range_delta: i32,
    delta_sentinel: i32,
    wavelength_metres: f64,
) -> Observation<f64> {
    if range_whole_ms == sentinel::RANGE_WHOLE_MS || wavelength_metres == 0.0 {
        return Observation::Valid(0.0);
    }

    let effective_delta = if phase_range_delta == delta_sentinel { 0 } else { phase_range_delta };
    let aggregate = (i64::from(range_whole_ms) << 33) + (i64::from(range_fractional_ms) << 23) + i64::from(effective_delta);
    // 41-bit aggregate, whole-ms count in the top 8 bits (bit 33 up): divide
    // by 2^33 to recover milliseconds, matching the range path's (<<29)/2^29.
    let phase_range_ms = aggregate as f64 / 2f64.powi(33);
    Observation::Valid((phase_range_ms * ONE_LIGHT_MS) / wavelength_metres)
}

/// Reconstructs MSM7 phase range rate (mm/s) and Doppler (Hz).
fn reconstruct_phase_range_rate(
    sat_phase_range_rate: i16,
    signal_phase_range_rate_delta: i32,
    wavelength_metres: f64,
) -> Observation<(f64, f64)> {
    if i32::from(sat_phase_range_rate) == sentinel::PHASE_RANGE_RATE_MSM7 {
        return Observation::Invalid;
    }

    let effective_delta = if signal_phase_range_rate_delta == sentinel::PHASE_RANGE_RATE_DELTA_MSM7 {
        0
    } else {
        signal_phase_range_rate_delta
    };

    let mm_per_s = (i64::from(sat_phase_range_rate) * 10_000 + i64::from(effective_delta)) as f64 / 10_000.0;
    if wavelength_metres == 0.0 {
        return Observation::Valid((mm_per_s, 0.0));
    }
    let doppler_hz = -mm_per_s / wavelength_metres;
    Observation::Valid((mm_per_s, doppler_hz))
}

/// A fully reconstructed MSM4 observation for one signal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Msm4Observation {
    pub satellite_id: u8,
    pub signal_id: u8,
    pub wavelength_metres: f64,
    pub wavelength_known: bool,
    pub range_metres: Observation<f64>,
    pub phase_range_cycles: Observation<f64>,
}

/// A fully reconstructed MSM7 observation for one signal cell, including
/// phase-range-rate/Doppler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Msm7Observation {
    pub satellite_id: u8,
    pub signal_id: u8,
    pub wavelength_metres: f64,
    pub wavelength_known: bool,
    pub range_metres: Observation<f64>,
    pub phase_range_cycles: Observation<f64>,
    pub phase_range_rate_mm_s: Observation<f64>,
    pub doppler_hz: Observation<f64>,
}

pub fn reconstruct_msm4(
    satellites: &[Msm4SatelliteCell],
    signals: &[Msm4SignalCell],
    wavelength_of: impl Fn(u8, u8) -> (f64, bool),
) -> Vec<Msm4Observation> {
    signals
        .iter()
        .map(|signal| {
            let sat = &satellites[signal.satellite_index];
            let (wavelength_metres, wavelength_known) = wavelength_of(sat.satellite_id, signal.signal_id);

            // MSM4 deltas are normalised to MSM7's 20/24-bit resolution by a
            // sign-preserving left shift before combining with the coarse value.
            let normalised_range_delta = signal.range_delta << 5;
            let normalised_phase_delta = signal.phase_range_delta << 2;

            Msm4Observation {
                satellite_id: sat.satellite_id,
                signal_id: signal.signal_id,
                wavelength_metres,
                wavelength_known,
                range_metres: reconstruct_range_metres(
                    sat.range_whole_ms,
                    sat.range_fractional_ms,
                    normalised_range_delta,
                    sentinel::RANGE_DELTA_MSM4 << 5,
                ),
                phase_range_cycles: reconstruct_phase_range_cycles(
                    sat.range_whole_ms,
                    sat.range_fractional_ms,
                    normalised_phase_delta,
                    sentinel::PHASE_RANGE_DELTA_MSM4 << 2,
                    wavelength_metres,
                ),
            }
        })
        .collect()
}

pub fn reconstruct_msm7(
    satellites: &[Msm7SatelliteCell],
    signals: &[Msm7SignalCell],
    wavelength_of: impl Fn(u8, u8) -> (f64, bool),
) -> Vec<Msm7Observation> {
    signals
        .iter()
        .map(|signal| {
            let sat = &satellites[signal.satellite_index];
            let (wavelength_metres, wavelength_known) = wavelength_of(sat.satellite_id, signal.signal_id);

            let range_metres = reconstruct_range_metres(
                sat.range_whole_ms,
                sat.range_fractional_ms,
                signal.range_delta,
                sentinel::RANGE_DELTA_MSM7,
            );
            let phase_range_cycles = reconstruct_phase_range_cycles(
                sat.range_whole_ms,
                sat.range_fractional_ms,
                signal.phase_range_delta,
                sentinel::PHASE_RANGE_DELTA_MSM7,
                wavelength_metres,
            );
            let rate = reconstruct_phase_range_rate(sat.phase_range_rate, signal.phase_range_rate_delta, wavelength_metres);
            let (phase_range_rate_mm_s, doppler_hz) = match rate {
                Observation::Valid((mm_s, hz)) => (Observation::Valid(mm_s), Observation::Valid(hz)),
                Observation::Invalid => (Observation::Invalid, Observation::Invalid),
            };

            Msm7Observation {
                satellite_id: sat.satellite_id,
                signal_id: signal.signal_id,
                wavelength_metres,
                wavelength_known,
                range_metres,
                phase_range_cycles,
                phase_range_rate_mm_s,
                doppler_hz,
            }
        })
        .collect()
}
