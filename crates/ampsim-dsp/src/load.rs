//! Load-network solver -- output voltage and current phasors per frequency.
//!
//! The amplifier output drives one of four fixed terminations:
//!
//!   SeriesRc       R and C in series; output voltage measured across R
//!   ResistiveOnly  R alone (any stored capacitance is ignored)
//!   Short          output clamped to zero, no voltage, no current
//!   Open           full amplifier voltage at the terminal, zero current
//!
//! Degenerate impedances (R = 0 in the resistive branch, omega*C = 0 in the
//! RC branch) are absorbed by substituting a huge sentinel impedance, which
//! keeps the current numerically near zero instead of dividing by zero.

use num_complex::Complex64;

use crate::transfer;

/// Sentinel impedance (ohms) substituted for zero denominators.
const Z_SENTINEL: f64 = 1e30;

/// Termination connected at the amplifier's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    SeriesRc,
    ResistiveOnly,
    Short,
    Open,
}

/// Load description. Negative values are rejected by the front end before
/// construction; this crate never sees them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadSpec {
    /// Series resistance in ohms, >= 0.
    pub resistance_ohm: f64,
    /// Series capacitance in farads, >= 0. Ignored for ResistiveOnly,
    /// Short, and Open.
    pub capacitance_farad: f64,
    pub mode: LoadMode,
}

impl LoadSpec {
    pub fn new(resistance_ohm: f64, capacitance_farad: f64, mode: LoadMode) -> Self {
        Self {
            resistance_ohm,
            capacitance_farad,
            mode,
        }
    }

    /// Capacitance entered in microfarads, as the reference front end takes it.
    pub fn with_capacitance_uf(resistance_ohm: f64, capacitance_uf: f64, mode: LoadMode) -> Self {
        Self::new(resistance_ohm, capacitance_uf * 1e-6, mode)
    }
}

/// Solve one frequency component: returns `(v_out, i_out)` phasors at the
/// load, RMS convention.
///
/// `v_out` is measured across the resistor (SeriesRc/ResistiveOnly), at the
/// open terminal (Open), or is zero (Short). Never fails; see the module
/// docs for how degenerate impedances are absorbed.
pub fn solve(
    omega: f64,
    amplitude_rms: f64,
    phase_rad: f64,
    load: &LoadSpec,
) -> (Complex64, Complex64) {
    let j = Complex64::i();

    // Unloaded amplifier output phasor.
    let v_in = amplitude_rms * (j * phase_rad).exp();
    let v_amp = transfer::gain(omega) * v_in;

    let zero = Complex64::new(0.0, 0.0);
    let z_r = Complex64::new(load.resistance_ohm, 0.0);

    // Pure resistive divider. With R = 0 the sentinel keeps the current
    // near zero and v_out = i * 0 lands at zero anyway.
    let resistive = |v_amp: Complex64| {
        let z_total = if load.resistance_ohm > 0.0 {
            z_r
        } else {
            Complex64::new(Z_SENTINEL, 0.0)
        };
        let i = v_amp / z_total;
        (i * z_r, i)
    };

    match load.mode {
        // The short clamps the amplifier output outright.
        LoadMode::Short => (zero, zero),

        // Full voltage at the terminal, but nothing to draw current.
        LoadMode::Open => (v_amp, zero),

        LoadMode::ResistiveOnly => resistive(v_amp),

        LoadMode::SeriesRc if load.capacitance_farad <= 0.0 => resistive(v_amp),

        LoadMode::SeriesRc => {
            let wc = omega * load.capacitance_farad;
            let z_c = if wc > 0.0 {
                1.0 / (j * wc)
            } else {
                Complex64::new(Z_SENTINEL, 0.0)
            };
            let z_total = z_r + z_c;
            if z_total.re == 0.0 && z_total.im == 0.0 {
                return (zero, zero);
            }
            let i = v_amp / z_total;
            (i * z_r, i)
        }
    }
}
