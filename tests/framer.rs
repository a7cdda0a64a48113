//! Integration tests for the frame synchroniser: framing round-trip, byte
//! accountability, and CRC enforcement.

mod support;

use rtcm3::framer::{Event, Framer};

/// Junk bytes followed by a valid frame yield `NonRtcm` then `Frame`, in
/// order, with every byte accounted for.
#[test]
fn junk_then_frame_accounts_for_every_byte() {
    let frame = support::build_frame(12 + 8, |buf| {
        support::set_bits(buf, 24, 12, 1005);
        support::set_bits(buf, 36, 8, 0xAB);
    });

    let junk = b"some junk".to_vec();
    let mut stream = junk.clone();
    stream.extend(&frame);

    let mut framer = Framer::new(stream.clone().into_iter());

    let mut collected = Vec::new();
    loop {
        match framer.next_event() {
            Event::Frame(f) => collected.push(f),
            Event::NonRtcm(n) => collected.extend(std::iter::once(n)),
            Event::End => break,
        }
    }

    assert_eq!(collected.len(), 2);
    assert_eq!(collected[0], junk);
    assert_eq!(collected[1], frame);

    // Byte accountability: concatenation of every event equals the input.
    let reassembled: Vec<u8> = collected.into_iter().flatten().collect();
    assert_eq!(reassembled, stream);
}

/// Flipping any single bit in a valid frame turns it into a `NonRtcm`
/// event, never a `Frame`.
#[test]
fn any_single_bit_flip_breaks_the_crc() {
    let frame = support::build_frame(12 + 16, |buf| {
        support::set_bits(buf, 24, 12, 1077);
        support::set_bits(buf, 36, 16, 0x1234);
    });

    for bit in 0..frame.len() * 8 {
        let mut corrupted = frame.clone();
        corrupted[bit / 8] ^= 1 << (7 - (bit % 8));
        if corrupted == frame {
            continue;
        }

        let mut framer = Framer::new(corrupted.into_iter());
        match framer.next_event() {
            Event::Frame(_) => panic!("bit {bit} flip should have broken the CRC"),
            Event::NonRtcm(_) => {},
            Event::End => panic!("expected an event, got End"),
        }
    }
}

/// Two consecutive valid frames with no bytes between them both decode,
/// and nothing is lost, duplicated, or reordered.
#[test]
fn two_frames_back_to_back() {
    let a = support::build_frame(12 + 8, |buf| {
        support::set_bits(buf, 24, 12, 1005);
        support::set_bits(buf, 36, 8, 1);
    });
    let b = support::build_frame(12 + 8, |buf| {
        support::set_bits(buf, 24, 12, 1006);
        support::set_bits(buf, 36, 8, 2);
    });

    let mut stream = a.clone();
    stream.extend(&b);

    let mut framer = Framer::new(stream.into_iter());
    assert_eq!(framer.next_event(), Event::Frame(a));
    assert_eq!(framer.next_event(), Event::Frame(b));
    assert_eq!(framer.next_event(), Event::End);
}

/// Byte accountability holds even when the stream ends mid frame (a
/// truncated candidate is emitted as `NonRtcm`, not dropped).
#[test]
fn truncated_trailing_frame_is_accounted_for() {
    let mut frame = support::build_frame(12 + 24, |buf| {
        support::set_bits(buf, 24, 12, 1077);
    });
    frame.truncate(frame.len() - 2);

    let mut framer = Framer::new(frame.clone().into_iter());
    assert_eq!(framer.next_event(), Event::NonRtcm(frame));
    assert_eq!(framer.next_event(), Event::End);
}
