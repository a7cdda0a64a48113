//! RTCM v3 differential GNSS correction stream decoder.
//!
//! Decodes a raw byte stream — possibly interleaved with non-RTCM bytes, as
//! encountered attaching mid-stream to a live serial feed — into a sequence
//! of framed, CRC-validated RTCM3 messages, and extracts structured
//! observation data for stationary reference station (1005/1006) and
//! Multiple Signal Message (MSM4/MSM7) message types.
//!
//! The crate is organised leaf-first, mirroring the dependency order of the
//! pipeline: bit extraction and CRC-24Q at the bottom, the frame
//! synchroniser above that, MSM header/satellite/signal decoding above that,
//! and the [`dispatcher`] tying a validated frame to its decoder and the
//! per-session [`time::TimestampResolver`].
//!
//! ```no_run
//! use rtcm3::framer::{Event, Framer};
//! use rtcm3::dispatcher;
//! use rtcm3::time::TimestampResolver;
//! use chrono::Utc;
//!
//! let bytes: Vec<u8> = std::fs::read("corrections.bin").unwrap();
//! let mut framer = Framer::new(bytes.into_iter());
//! let mut resolver = TimestampResolver::new(Utc::now());
//!
//! loop {
//!     match framer.next_event() {
//!         Event::Frame(frame) => {
//!             let message = dispatcher::dispatch(&frame, &mut resolver);
//!             println!("{:?}", message.body);
//!         },
//!         Event::NonRtcm(_) => continue,
//!         Event::End => break,
//!     }
//! }
//! ```

pub mod bits;
pub mod constants;
pub mod constellation;
pub mod crc24q;
pub mod dispatcher;
pub mod error;
pub mod framer;
pub mod msm;
pub mod observation;
pub mod source;
pub mod stationary;
pub mod time;
pub mod wavelength;

pub use crate::constellation::Constellation;
pub use crate::dispatcher::{dispatch, Body, Message};
pub use crate::error::{DecodeError, FrameError, MsmError, TimeError};
pub use crate::framer::{Event, Framer};
pub use crate::observation::Observation;
pub use crate::time::TimestampResolver;
