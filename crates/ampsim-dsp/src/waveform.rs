//! Time-domain synthesis -- direct sinusoidal superposition of the output
//! components.
//!
//! No inverse FFT; component counts are tiny (at most eleven), so each
//! sample is just a DC term plus a handful of `sin` evaluations. RMS
//! magnitudes are converted to peak (`rms * sqrt(2)`) before superposing.

use std::f64::consts::{PI, SQRT_2};

use crate::response::OutputComponent;

/// Periods of the fundamental covered by the default trace.
pub const DEFAULT_CYCLES: usize = 5;

/// Samples in the default trace.
pub const DEFAULT_SAMPLES: usize = 5000;

/// Output voltage at a single instant: DC plus every component's sinusoid.
pub fn value_at(dc: f64, components: &[OutputComponent], t: f64) -> f64 {
    let mut v = dc;
    for c in components {
        let peak = c.voltage_rms * SQRT_2;
        v += peak * (2.0 * PI * c.frequency_hz * t + c.phase_rad).sin();
    }
    v
}

/// Reconstruct the output waveform over five fundamental periods at 5000
/// points. Returns `(times, values)` of equal length.
pub fn synthesize(dc: f64, components: &[OutputComponent]) -> (Vec<f64>, Vec<f64>) {
    synthesize_with(dc, components, DEFAULT_CYCLES, DEFAULT_SAMPLES)
}

/// Reconstruct over `cycles` fundamental periods at `samples` points, both
/// endpoints included.
///
/// The fundamental is `components[0]`. An empty component list is not
/// produced by the aggregator, but if supplied the trace degrades to one
/// second of pure DC. A non-positive fundamental frequency falls back to a
/// one-second period, so the trace still covers `cycles` seconds.
pub fn synthesize_with(
    dc: f64,
    components: &[OutputComponent],
    cycles: usize,
    samples: usize,
) -> (Vec<f64>, Vec<f64>) {
    let span = match components.first() {
        Some(c) => {
            let period = if c.frequency_hz > 0.0 {
                1.0 / c.frequency_hz
            } else {
                1.0
            };
            cycles as f64 * period
        }
        None => 1.0,
    };

    let step = if samples > 1 {
        span / (samples - 1) as f64
    } else {
        0.0
    };

    let mut times = Vec::with_capacity(samples);
    let mut values = Vec::with_capacity(samples);
    for k in 0..samples {
        let t = k as f64 * step;
        times.push(t);
        values.push(value_at(dc, components, t));
    }
    (times, values)
}
