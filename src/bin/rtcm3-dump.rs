//! Thin demo binary: reads an RTCM3 byte stream from a file (or stdin) and
//! prints each decoded message as it arrives.
//!
//! This exists to exercise the library end-to-end, not to be a real
//! operator-facing tool -- serial port handling, config files, and
//! human-readable formatting are named collaborators the core spec leaves
//! external. One positional path argument (`-` for stdin) and one flag
//! (`--json`) are all the surface this needs.

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::Parser;
use serde_json::json;

use rtcm3::dispatcher::{self, Body};
use rtcm3::framer::{Event, Framer};
use rtcm3::time::TimestampResolver;

/// Decode an RTCM3 correction stream and print each message.
#[derive(Parser, Debug)]
#[command(name = "rtcm3-dump", version, about)]
struct Args {
    /// Input file to read, or `-` for stdin.
    input: PathBuf,

    /// Emit one JSON object per line instead of a human-readable summary.
    #[arg(long)]
    json: bool,
}

fn main() -> io::Result<()> {
    let args = Args::parse();

    let mut bytes = Vec::new();
    if args.input.as_os_str() == "-" {
        io::stdin().lock().read_to_end(&mut bytes)?;
    } else {
        File::open(&args.input)?.read_to_end(&mut bytes)?;
    }

    let mut framer = Framer::new(bytes.into_iter());
    let mut resolver = TimestampResolver::new(chrono::Utc::now());
    let mut non_rtcm_bytes = 0usize;

    loop {
        match framer.next_event() {
            Event::Frame(frame) => {
                let message = dispatcher::dispatch(&frame, &mut resolver);
                if args.json {
                    println!("{}", summarize_json(&message));
                } else {
                    println!("{}", summarize_text(&message));
                }
            },
            Event::NonRtcm(bytes) => non_rtcm_bytes += bytes.len(),
            Event::End => break,
        }
    }

    if non_rtcm_bytes > 0 && !args.json {
        eprintln!("skipped {non_rtcm_bytes} non-RTCM bytes");
    }

    Ok(())
}

fn summarize_text(message: &dispatcher::Message) -> String {
    let body = match &message.body {
        Body::None => "none".to_string(),
        Body::Stationary1005(s) => format!("1005 station={}", s.station_id),
        Body::Stationary1006(s) => format!("1006 station={}", s.base.station_id),
        Body::Msm4(m) => format!(
            "MSM4 station={} satellites={} observations={}",
            m.header.station_id,
            m.header.num_satellites(),
            m.observations.len()
        ),
        Body::Msm7(m) => format!(
            "MSM7 station={} satellites={} observations={}",
            m.header.station_id,
            m.header.num_satellites(),
            m.observations.len()
        ),
        Body::Unknown => "unknown".to_string(),
        Body::NonRtcm => "non-rtcm".to_string(),
    };

    match &message.error {
        Some(err) => format!("type={} {body} error={err}", message.message_type),
        None => format!("type={} {body}", message.message_type),
    }
}

fn summarize_json(message: &dispatcher::Message) -> serde_json::Value {
    json!({
        "message_type": message.message_type,
        "timestamp": message.timestamp,
        "sent_at": message.sent_at.map(|t| t.to_rfc3339()),
        "error": message.error,
        "bytes": message.raw_frame.len(),
    })
}
