//! Frame synchroniser and CRC-validated demuxer.
//!
//! Turns a raw byte stream into a sequence of [`Event`]s: complete,
//! CRC-valid RTCM frames, and the non-RTCM byte runs between them. Every
//! byte read from the source is accounted for in exactly one event, in
//! order.

use crate::constants::{RTCM_CRC_LEN, RTCM_LEADER_LEN, RTCM_LENGTH_MASK, RTCM_SYNC_CHAR};
use crate::crc24q::Crc24q;
use crate::source::{ByteSource, PushbackByteSource};
use crate::bits::get_u64;

/// One event yielded by [`Framer::next_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A complete, CRC-valid RTCM3 frame: leader + payload + CRC trailer.
    Frame(Vec<u8>),
    /// A byte run that is not part of a valid RTCM3 frame.
    NonRtcm(Vec<u8>),
    /// The byte source is exhausted; no further events will be produced.
    End,
}

/// Streaming, single-threaded, synchronous frame synchroniser.
pub struct Framer<S> {
    source: PushbackByteSource<S>,
    ended: bool,
}

impl<S: ByteSource> Framer<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: PushbackByteSource::new(source),
            ended: false,
        }
    }

    /// Reads and classifies the next event from the byte source.
    ///
    /// Algorithm:
    /// 1. Scan for a sync byte, accumulating any skipped bytes.
    /// 2. Read the rest of the 3-byte leader plus the first two payload
    ///    bytes (enough to know the 12-bit message type and validate the
    ///    reserved bits / length field).
    /// 3. Reject incidental sync bytes (non-zero reserved bits, zero length).
    /// 4. Read the remainder of the payload and the 3-byte CRC trailer.
    /// 5. Validate CRC-24Q; emit `Frame` on match, `NonRtcm` otherwise.
    pub fn next_event(&mut self) -> Event {
        if self.ended {
            return Event::End;
        }

        let mut skipped = Vec::new();
        loop {
            match self.source.next() {
                None => {
                    self.ended = true;
                    return if skipped.is_empty() {
                        Event::End
                    } else {
                        Event::NonRtcm(skipped)
                    };
                },
                Some(b) if b == RTCM_SYNC_CHAR => {
                    if skipped.is_empty() {
                        break;
                    }
                    self.source.push_back(b);
                    return Event::NonRtcm(skipped);
                },
                Some(b) => skipped.push(b),
            }
        }

        // Phase 2: sync byte plus four more bytes (remaining leader + first
        // two payload bytes, which cover the 12-bit message type).
        let mut candidate = Vec::with_capacity(RTCM_LEADER_LEN + RTCM_CRC_LEN);
        candidate.push(RTCM_SYNC_CHAR);
        for _ in 0..4 {
            match self.source.next() {
                None => {
                    self.ended = true;
                    return Event::NonRtcm(candidate);
                },
                Some(b) => candidate.push(b),
            }
        }

        // Phase 3: validate the leader.
        let reserved = get_u64(&candidate, 8, 6);
        let length = get_u64(&candidate, 14, 10) as u16 & RTCM_LENGTH_MASK;
        if reserved != 0 || length == 0 {
            return Event::NonRtcm(candidate);
        }

        // Phase 4: read the rest of the payload and the CRC trailer.
        let total_len = RTCM_LEADER_LEN + length as usize + RTCM_CRC_LEN;
        while candidate.len() < total_len {
            match self.source.next() {
                None => {
                    self.ended = true;
                    return Event::NonRtcm(candidate);
                },
                Some(b) => candidate.push(b),
            }
        }

        // Phase 5: CRC-24Q over leader + payload, compared to the trailer.
        let payload_end = RTCM_LEADER_LEN + length as usize;
        let computed = Crc24q::of(&candidate[..payload_end]);
        let trailer = get_u64(&candidate, payload_end * 8, RTCM_CRC_LEN * 8) as u32;

        if computed == trailer {
            Event::Frame(candidate)
        } else {
            Event::NonRtcm(candidate)
        }
    }
}
