//! Wall-clock reads for the portal host.

use std::cell::Cell;

thread_local! {
    static LAST_STAMP_MS: Cell<u64> = const { Cell::new(0) };
}

#[cfg(target_arch = "wasm32")]
fn wall_clock_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
fn wall_clock_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0.0, |elapsed| elapsed.as_millis() as f64)
}

/// Milliseconds since the unix epoch. Clocks set before 1970 read as `0`.
pub fn unix_time_ms_now() -> u64 {
    let ms = wall_clock_ms();
    if ms.is_finite() && ms > 0.0 {
        ms as u64
    } else {
        0
    }
}

fn stamp_after(previous: u64, now: u64) -> u64 {
    if now > previous {
        now
    } else {
        previous.saturating_add(1)
    }
}

/// Like [`unix_time_ms_now`], but never returns the same value twice on this thread.
pub fn next_monotonic_timestamp_ms() -> u64 {
    LAST_STAMP_MS.with(|last| {
        let stamp = stamp_after(last.get(), unix_time_ms_now());
        last.set(stamp);
        stamp
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn stamps_follow_the_clock_when_it_moves_forward() {
        assert_eq!(stamp_after(100, 250), 250);
    }

    #[test]
    fn stamps_step_past_a_stalled_or_rewound_clock() {
        assert_eq!(stamp_after(100, 100), 101);
        assert_eq!(stamp_after(100, 40), 101);
    }

    #[test]
    fn back_to_back_stamps_differ() {
        let stamps: Vec<u64> = (0..50).map(|_| next_monotonic_timestamp_ms()).collect();
        assert!(stamps.windows(2).all(|pair| pair[1] > pair[0]));
        assert!(stamps[0] > 0);
    }
}
