//! Multiple Signal Message (MSM) decoding: header, satellite cells, signal
//! cells, and range/phase reconstruction.

pub mod header;
pub mod satellite;
pub mod signal;

use crate::constants::RTCM_CRC_LEN;
use crate::error::MsmError;
use crate::wavelength;
use header::MsmHeader;
use satellite::{Msm4SatelliteCell, Msm7SatelliteCell};
use signal::{Msm4Observation, Msm4SignalCell, Msm7Observation, Msm7SignalCell};

/// A fully decoded MSM4 message body.
#[derive(Debug, Clone, PartialEq)]
pub struct Msm4Body {
    pub header: MsmHeader,
    pub satellites: Vec<Msm4SatelliteCell>,
    pub signals: Vec<Msm4SignalCell>,
    pub observations: Vec<Msm4Observation>,
}

/// A fully decoded MSM7 message body.
#[derive(Debug, Clone, PartialEq)]
pub struct Msm7Body {
    pub header: MsmHeader,
    pub satellites: Vec<Msm7SatelliteCell>,
    pub signals: Vec<Msm7SignalCell>,
    pub observations: Vec<Msm7Observation>,
}

fn payload_bit_end(frame: &[u8]) -> usize {
    (frame.len() * 8).saturating_sub(RTCM_CRC_LEN * 8)
}

fn wavelength_of(message_type: u16) -> impl Fn(u8, u8) -> (f64, bool) {
    move |_satellite_id, signal_id| match crate::constellation::Constellation::from_message_type(message_type) {
        Some(constellation) => wavelength::lookup(constellation, signal_id),
        None => (0.0, false),
    }
}

/// Runs the full MSM4 pipeline: HeaderParse -> SatelliteParse -> SignalParse
/// -> Reconstruct.
pub fn decode_msm4(frame: &[u8]) -> Result<Msm4Body, MsmError> {
    let end = payload_bit_end(frame);
    let (header, after_header) = header::decode_header(frame)?;
    let (satellites, after_satellites) = satellite::decode_msm4_satellites(frame, after_header, &header, end)?;
    let (signals, _after_signals) = signal::decode_msm4_signals(frame, after_satellites, &header, end)?;
    let observations = signal::reconstruct_msm4(&satellites, &signals, wavelength_of(header.message_type));

    Ok(Msm4Body {
        header,
        satellites,
        signals,
        observations,
    })
}

/// Runs the full MSM7 pipeline: HeaderParse -> SatelliteParse -> SignalParse
/// -> Reconstruct.
pub fn decode_msm7(frame: &[u8]) -> Result<Msm7Body, MsmError> {
    let end = payload_bit_end(frame);
    let (header, after_header) = header::decode_header(frame)?;
    let (satellites, after_satellites) = satellite::decode_msm7_satellites(frame, after_header, &header, end)?;
    let (signals, _after_signals) = signal::decode_msm7_signals(frame, after_satellites, &header, end)?;
    let observations = signal::reconstruct_msm7(&satellites, &signals, wavelength_of(header.message_type));

    Ok(Msm7Body {
        header,
        satellites,
        signals,
        observations,
    })
}
