//! Sentinel-free wrapper for reconstructed measurements.
//!
//! The wire format marks "no measurement" with magic bit patterns (0xFF,
//! -8192, and friends). Once a value has been recognised as one of those
//! sentinels it is wrapped as `Invalid` so later arithmetic can't mistake it
//! for a real number; the bit-exact sentinel values matter only at the
//! parse boundary, in `constants::sentinel` and the decoders that read it.

/// Either a valid reconstructed value, or an explicit marker that the wire
/// data carried a sentinel meaning "not available".
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Observation<T> {
    Valid(T),
    Invalid,
}

impl<T> Observation<T> {
    pub fn is_valid(&self) -> bool {
        matches!(self, Observation::Valid(_))
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Observation::Valid(v) => Some(v),
            Observation::Invalid => None,
        }
    }
}
