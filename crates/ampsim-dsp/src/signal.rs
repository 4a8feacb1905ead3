//! Input signal description -- DC offset, fundamental, and harmonics.
//!
//! All amplitudes are RMS volts and all phases are radians by the time they
//! reach this crate. The conversions a front end needs (peak -> RMS,
//! degrees -> radians) live here as constructors so every caller normalizes
//! the same way.

use std::f64::consts::SQRT_2;

/// Hard cap on harmonic count accepted into a signal description.
pub const MAX_HARMONICS: usize = 10;

/// One sinusoidal term of the input signal (the fundamental or a harmonic).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyComponent {
    /// Frequency in Hz, > 0.
    pub frequency_hz: f64,
    /// RMS amplitude in volts, >= 0.
    pub amplitude_rms: f64,
    /// Phase in radians.
    pub phase_rad: f64,
}

impl FrequencyComponent {
    pub fn new(frequency_hz: f64, amplitude_rms: f64, phase_rad: f64) -> Self {
        Self {
            frequency_hz,
            amplitude_rms,
            phase_rad,
        }
    }

    /// Build from a peak amplitude: rms = peak / sqrt(2).
    pub fn from_peak(frequency_hz: f64, amplitude_peak: f64, phase_rad: f64) -> Self {
        Self::new(frequency_hz, amplitude_peak / SQRT_2, phase_rad)
    }
}

/// Full periodic input: DC offset + fundamental + up to ten harmonics.
///
/// Harmonic order is preserved through the response engine but does not
/// affect the aggregate figures. Harmonic frequencies are not required to be
/// integer multiples of the fundamental, or even distinct.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalSpec {
    pub dc: f64,
    pub fundamental: FrequencyComponent,
    pub harmonics: Vec<FrequencyComponent>,
}

impl SignalSpec {
    pub fn new(dc: f64, fundamental: FrequencyComponent) -> Self {
        Self {
            dc,
            fundamental,
            harmonics: Vec::new(),
        }
    }

    /// Append a harmonic. Returns false (and leaves the spec unchanged) once
    /// MAX_HARMONICS are present.
    pub fn add_harmonic(&mut self, component: FrequencyComponent) -> bool {
        if self.harmonics.len() >= MAX_HARMONICS {
            return false;
        }
        self.harmonics.push(component);
        true
    }

    /// Fundamental first, then harmonics in insertion order.
    pub fn components(&self) -> impl Iterator<Item = &FrequencyComponent> {
        std::iter::once(&self.fundamental).chain(self.harmonics.iter())
    }
}
