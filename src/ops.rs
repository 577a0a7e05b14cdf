//! Synchronous sequence operators over the fixed reading dataset.
//!
//! The inputs here are finite in-memory sequences, so these transformations
//! are plain iterator adapters rather than push-stream pipelines. Only the
//! debounce step needs the callback layer in [`Stream`](crate::Stream).

use crate::reading::{Reading, TimedReading};
use std::slice;

/// Hour labels attached by the expansion step, in emission order.
pub const HOURLY_LABELS: [&str; 3] = ["9 AM", "12 PM", "3 PM"];

/// Formats each reading as `"<celsius>°C"`, preserving count and order.
pub fn format_celsius(readings: &[Reading]) -> impl Iterator<Item = String> + '_ {
    readings.iter().map(|reading| format!("{}°C", reading.celsius))
}

/// Keeps readings strictly warmer than `threshold`, formatted as
/// `"<city>: <celsius>°C"`, in original order.
pub fn warmer_than(readings: &[Reading], threshold: i32) -> impl Iterator<Item = String> + '_ {
    readings
        .iter()
        .filter(move |reading| reading.celsius > threshold)
        .map(|reading| format!("{}: {}°C", reading.city, reading.celsius))
}

/// Expands every reading into one [`TimedReading`] per hour label, grouped by
/// source reading. Output length is three times the input length.
pub fn expand_hourly(readings: &[Reading]) -> impl Iterator<Item = TimedReading> + '_ {
    readings.iter().flat_map(|reading| {
        HOURLY_LABELS.into_iter().map(move |hour| TimedReading {
            reading: reading.clone(),
            hour,
        })
    })
}

/// Merges two sequences by alternating between them, then draining whichever
/// is longer. Relative order within each input is preserved; the cross-input
/// order is an implementation detail callers must not rely on.
pub fn interleave<'a, T>(a: &'a [T], b: &'a [T]) -> Interleave<'a, T> {
    Interleave {
        a: a.iter(),
        b: b.iter(),
        from_a: true,
    }
}

pub struct Interleave<'a, T> {
    a: slice::Iter<'a, T>,
    b: slice::Iter<'a, T>,
    from_a: bool,
}

impl<'a, T> Iterator for Interleave<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let item = if self.from_a {
            self.a.next().or_else(|| self.b.next())
        } else {
            self.b.next().or_else(|| self.a.next())
        };
        self.from_a = !self.from_a;
        item
    }
}

/// Pairs temperatures with time labels index by index, formatted as
/// `"<time>: <temp>°C"`, stopping at the shorter input.
pub fn zip_with_times<'a>(
    temps: &'a [i32],
    times: &'a [&'a str],
) -> impl Iterator<Item = String> + 'a {
    temps
        .iter()
        .zip(times.iter())
        .map(|(temp, time)| format!("{}: {}°C", time, temp))
}
