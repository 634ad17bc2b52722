//! Example: drive an LCS trace session on a simulated frame clock.
//!
//! Run with:
//! `cargo run --example playback`

use std::time::Duration;

use lcs_trace::{Event, Mode, Session};

fn main() {
    let mut session = Session::builder()
        .with_mode(Mode::Memoized)
        .with_speed(4.0)
        .build();

    let len = match session.visualize("ABCB", "BDCAB") {
        Ok(len) => len,
        Err(err) => {
            eprintln!("rejected: {err}");
            return;
        }
    };
    println!("loaded {len} events");

    let frame = Duration::from_millis(16);
    let mut clock = Duration::ZERO;
    while session.playback().is_playing() {
        clock += frame;
        if !session.tick(frame) {
            continue;
        }
        // Only report values landing in the memo table.
        let Some(event) = session.playback().current() else {
            continue;
        };
        if let Event::Transfer { to, .. } = event {
            if to.is_cell() {
                println!("{:>7.2}s  {event}", clock.as_secs_f64());
            }
        }
    }

    let snap = session.snapshot();
    println!("call tree nodes: {}", snap.tree.nodes.len());
    println!("LCS length: {}", snap.lcs_length.unwrap_or_default());
    if let Some(bt) = snap.backtrack {
        println!("LCS: {}", bt.sequence);
    }

    // Step back to the middle of the trace and look around.
    session.playback_mut().seek((len / 2) as f64);
    let mid = session.snapshot();
    println!(
        "at step {}: line {:?}, comparing {:?}",
        mid.index, mid.code_line, mid.comparison
    );
}
