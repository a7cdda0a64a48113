//! Routes a validated frame to its decoder and assembles a [`Message`].

use chrono::{DateTime, Utc};

use crate::bits::get_u64;
use crate::constants::{
    MESSAGE_TYPE_BITS, MSM4_MESSAGE_TYPES, MSM7_MESSAGE_TYPES, NON_RTCM_MESSAGE_TYPE, RTCM_LEADER_LEN,
};
use crate::constellation::Constellation;
use crate::error::DecodeError;
use crate::msm::{self, Msm4Body, Msm7Body};
use crate::stationary::{self, Stationary1005, Stationary1006};
use crate::time::TimestampResolver;

/// The decoded payload of a [`Message`], tagged by what the dispatcher
/// routed the frame to.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    None,
    Stationary1005(Stationary1005),
    Stationary1006(Stationary1006),
    Msm4(Msm4Body),
    Msm7(Msm7Body),
    /// A syntactically valid frame whose message type the dispatcher does
    /// not decode further.
    Unknown,
    /// Not a frame at all -- a non-RTCM byte run, passed through verbatim.
    NonRtcm,
}

/// A single dispatched message: a validated frame's decode result plus the
/// raw bytes it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub message_type: i32,
    pub raw_frame: Vec<u8>,
    pub timestamp: Option<u32>,
    pub sent_at: Option<DateTime<Utc>>,
    pub start_of_week: Option<DateTime<Utc>>,
    pub error: Option<String>,
    /// Structured cause behind `error`, for callers that want to match on it
    /// rather than parse the string. `None` whenever `error` is `None`.
    pub error_detail: Option<DecodeError>,
    pub body: Body,
}

impl Message {
    fn unknown(raw_frame: Vec<u8>, message_type: u16) -> Self {
        Message {
            message_type: i32::from(message_type),
            raw_frame,
            timestamp: None,
            sent_at: None,
            start_of_week: None,
            error: None,
            error_detail: None,
            body: Body::Unknown,
        }
    }

    /// Builds the `Message` for a [`crate::framer::Event::NonRtcm`] byte run.
    pub fn non_rtcm(raw_bytes: Vec<u8>) -> Self {
        Message {
            message_type: NON_RTCM_MESSAGE_TYPE,
            raw_frame: raw_bytes,
            timestamp: None,
            sent_at: None,
            start_of_week: None,
            error: None,
            error_detail: None,
            body: Body::NonRtcm,
        }
    }
}

/// Dispatches a validated RTCM3 frame to its decoder, invoking the
/// timestamp resolver for MSM messages.
///
/// `frame` must already be CRC-validated (e.g. a [`crate::framer::Event::Frame`]
/// payload).
pub fn dispatch(frame: &[u8], resolver: &mut TimestampResolver) -> Message {
    let message_type = get_u64(frame, RTCM_LEADER_LEN * 8, MESSAGE_TYPE_BITS) as u16;

    match message_type {
        1005 => Message {
            message_type: i32::from(message_type),
            raw_frame: frame.to_vec(),
            timestamp: None,
            sent_at: None,
            start_of_week: None,
            error: None,
            error_detail: None,
            body: Body::Stationary1005(stationary::decode_1005(frame)),
        },
        1006 => Message {
            message_type: i32::from(message_type),
            raw_frame: frame.to_vec(),
            timestamp: None,
            sent_at: None,
            start_of_week: None,
            error: None,
            error_detail: None,
            body: Body::Stationary1006(stationary::decode_1006(frame)),
        },
        t if MSM4_MESSAGE_TYPES.contains(&t) => dispatch_msm4(frame, t, resolver),
        t if MSM7_MESSAGE_TYPES.contains(&t) => dispatch_msm7(frame, t, resolver),
        t => Message::unknown(frame.to_vec(), t),
    }
}

fn dispatch_msm4(frame: &[u8], message_type: u16, resolver: &mut TimestampResolver) -> Message {
    match msm::decode_msm4(frame) {
        Ok(body) => {
            let timestamp = body.header.timestamp;
            let (sent_at, start_of_week, error, error_detail) = resolve_msm_time(message_type, timestamp, resolver);
            Message {
                message_type: i32::from(message_type),
                raw_frame: frame.to_vec(),
                timestamp: Some(timestamp),
                sent_at,
                start_of_week,
                error,
                error_detail,
                body: Body::Msm4(body),
            }
        },
        Err(e) => Message {
            message_type: i32::from(message_type),
            raw_frame: frame.to_vec(),
            timestamp: None,
            sent_at: None,
            start_of_week: None,
            error: Some(DecodeError::from(e.clone()).to_string()),
            error_detail: Some(DecodeError::from(e)),
            body: Body::Unknown,
        },
    }
}

fn dispatch_msm7(frame: &[u8], message_type: u16, resolver: &mut TimestampResolver) -> Message {
    match msm::decode_msm7(frame) {
        Ok(body) => {
            let timestamp = body.header.timestamp;
            let (sent_at, start_of_week, error, error_detail) = resolve_msm_time(message_type, timestamp, resolver);
            Message {
                message_type: i32::from(message_type),
                raw_frame: frame.to_vec(),
                timestamp: Some(timestamp),
                sent_at,
                start_of_week,
                error,
                error_detail,
                body: Body::Msm7(body),
            }
        },
        Err(e) => Message {
            message_type: i32::from(message_type),
            raw_frame: frame.to_vec(),
            timestamp: None,
            sent_at: None,
            start_of_week: None,
            error: Some(DecodeError::from(e.clone()).to_string()),
            error_detail: Some(DecodeError::from(e)),
            body: Body::Unknown,
        },
    }
}

/// Resolves `sent_at`/`start_of_week` for an MSM message. SBAS, QZSS and
/// NavIC are not named in the timestamp resolver's four tracked
/// constellations; they carry a GPS-epoch week-relative timestamp in
/// practice, so this routes them through the GPS resolver rather than
/// leaving them unresolved.
#[allow(clippy::type_complexity)]
fn resolve_msm_time(
    message_type: u16,
    timestamp: u32,
    resolver: &mut TimestampResolver,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>, Option<String>, Option<DecodeError>) {
    let constellation = Constellation::from_message_type(message_type);
    let result = match constellation {
        Some(Constellation::Gps | Constellation::Sbas | Constellation::Qzss | Constellation::Navic) => {
            resolver.resolve_gps(timestamp).map(|t| (t, resolver.start_of_gps_week()))
        },
        Some(Constellation::Galileo) => resolver
            .resolve_galileo(timestamp)
            .map(|t| (t, resolver.start_of_galileo_week())),
        Some(Constellation::Beidou) => {
            let sent_at = resolver.resolve_beidou(timestamp);
            sent_at.map(|t| (t, t - chrono::Duration::milliseconds(i64::from(timestamp))))
        },
        Some(Constellation::Glonass) => {
            let sent_at = resolver.resolve_glonass(timestamp);
            sent_at.map(|t| (t, resolver.start_of_glonass_week()))
        },
        None => {
            return (
                None,
                None,
                Some(format!("message type {message_type} is not an MSM4 or an MSM7")),
                None,
            )
        },
    };

    match result {
        Ok((sent_at, start_of_week)) => (Some(sent_at), Some(start_of_week), None, None),
        Err(e) => {
            let detail = DecodeError::from(e);
            (None, None, Some(detail.to_string()), Some(detail))
        },
    }
}
