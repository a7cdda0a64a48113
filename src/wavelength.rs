//! Signal wavelength lookup: `(constellation, signal_id) -> metres`.
//!
//! Per-signal carrier frequencies are fixed by each GNSS's interface
//! control document; GLONASS is the one FDMA exception (frequency depends
//! on the satellite's frequency channel, not just the signal type) which
//! this table does not model — GLONASS entries use the nominal channel-0
//! frequency. Unknown `(constellation, signal_id)` pairs return `(0.0,
//! false)` rather than failing the decode: the caller flags the observation
//! instead.

use crate::constellation::Constellation;

/// Speed of light, metres per second.
const SPEED_OF_LIGHT: f64 = 299_792_458.0;

fn wavelength_for_frequency_hz(freq_hz: f64) -> f64 {
    SPEED_OF_LIGHT / freq_hz
}

/// Looks up the carrier wavelength in metres for `(constellation,
/// signal_id)`. Returns `(wavelength_metres, true)` for a known signal, or
/// `(0.0, false)` for one this table has no entry for.
pub fn lookup(constellation: Constellation, signal_id: u8) -> (f64, bool) {
    let freq_hz = match (constellation, signal_id) {
        // GPS: L1 C/A and L1C (2, 3), L2P/L2C (16, 17, 19), L5 (22, 24).
        (Constellation::Gps, 2 | 3) => 1_575.42e6,
        (Constellation::Gps, 16 | 17 | 19) => 1_227.60e6,
        (Constellation::Gps, 22 | 24) => 1_176.45e6,

        // GLONASS: nominal channel-0 L1/L2 frequencies (FDMA channel offset
        // not modelled here).
        (Constellation::Glonass, 2 | 3) => 1_602.00e6,
        (Constellation::Glonass, 8 | 9) => 1_246.00e6,

        // Galileo: E1 (2, 3, 4), E5a (22, 24), E5b (17, 19), E6 (8, 9, 10).
        (Constellation::Galileo, 2 | 3 | 4) => 1_575.42e6,
        (Constellation::Galileo, 22 | 24) => 1_176.45e6,
        (Constellation::Galileo, 17 | 19) => 1_207.14e6,
        (Constellation::Galileo, 8 | 9 | 10) => 1_278.75e6,

        // BeiDou: B1I (2, 3), B2I (8, 9), B3I (22, 24).
        (Constellation::Beidou, 2 | 3) => 1_561.098e6,
        (Constellation::Beidou, 8 | 9) => 1_207.14e6,
        (Constellation::Beidou, 22 | 24) => 1_268.52e6,

        // QZSS and SBAS share GPS L1/L5 bands.
        (Constellation::Qzss | Constellation::Sbas, 2 | 3) => 1_575.42e6,
        (Constellation::Qzss, 22 | 24) => 1_176.45e6,

        // NavIC: L5 and S-band.
        (Constellation::Navic, 22 | 24) => 1_176.45e6,
        (Constellation::Navic, 8 | 9) => 2_492.028e6,

        _ => return (0.0, false),
    };

    (wavelength_for_frequency_hz(freq_hz), true)
}
