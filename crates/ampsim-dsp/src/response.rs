//! Harmonic aggregation -- per-component load solve plus RMS/power/THD sums.
//!
//! Each frequency component of the input is pushed through the amplifier and
//! load independently, then the per-component phasors are reduced to the
//! four aggregate figures. Quadratic summing is exact here: distinct-frequency
//! sinusoids are orthogonal over a full period, so cross terms time-average
//! to zero and per-component sums are the whole story.

use num_complex::Complex64;
use std::f64::consts::PI;

use crate::load::{self, LoadMode, LoadSpec};
use crate::signal::SignalSpec;

/// One frequency component of the output, polar form, RMS convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputComponent {
    pub frequency_hz: f64,
    pub voltage_rms: f64,
    pub phase_rad: f64,
}

/// Aggregate figures plus the per-component breakdown, input order preserved
/// (fundamental first). A plain value object, recomputed in full per call.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    /// Total output RMS voltage, quadratic sum over components.
    pub vrms_total: f64,
    /// Total output RMS current, quadratic sum over components.
    pub irms_total: f64,
    /// Real power delivered to the load, watts.
    pub real_power_w: f64,
    /// THD as a ratio (non-fundamental RMS / fundamental RMS), not percent.
    pub thd_ratio: f64,
    pub components: Vec<OutputComponent>,
}

/// Solve every component of `signal` against `load` and aggregate.
pub fn aggregate(signal: &SignalSpec, load: &LoadSpec) -> SimulationResult {
    let mut components = Vec::with_capacity(1 + signal.harmonics.len());
    let mut currents = Vec::with_capacity(1 + signal.harmonics.len());

    for input in signal.components() {
        let omega = 2.0 * PI * input.frequency_hz;
        let (v, i) = load::solve(omega, input.amplitude_rms, input.phase_rad, load);
        components.push(OutputComponent {
            frequency_hz: input.frequency_hz,
            voltage_rms: v.norm(),
            phase_rad: v.arg(),
        });
        currents.push(i);
    }

    match load.mode {
        // Every per-component phasor is already zero; the figures follow.
        LoadMode::Short => SimulationResult {
            vrms_total: 0.0,
            irms_total: 0.0,
            real_power_w: 0.0,
            thd_ratio: 0.0,
            components,
        },

        // Voltage exists at the open terminal even though nothing flows.
        LoadMode::Open => SimulationResult {
            vrms_total: quadratic_sum(&components),
            irms_total: 0.0,
            real_power_w: 0.0,
            thd_ratio: thd(&components),
            components,
        },

        LoadMode::ResistiveOnly | LoadMode::SeriesRc => {
            let irms_total = currents
                .iter()
                .map(|i| i.norm_sqr())
                .sum::<f64>()
                .sqrt();

            // Standard phasor real power, summed per component. Cross terms
            // between different frequencies vanish under time-averaging.
            let real_power_w = components
                .iter()
                .zip(currents.iter())
                .map(|(c, i)| {
                    let v = Complex64::from_polar(c.voltage_rms, c.phase_rad);
                    (v * i.conj()).re
                })
                .sum();

            SimulationResult {
                vrms_total: quadratic_sum(&components),
                irms_total,
                real_power_w,
                thd_ratio: thd(&components),
                components,
            }
        }
    }
}

/// sqrt(sum v_k^2) over all components.
fn quadratic_sum(components: &[OutputComponent]) -> f64 {
    components
        .iter()
        .map(|c| c.voltage_rms * c.voltage_rms)
        .sum::<f64>()
        .sqrt()
}

/// Non-fundamental RMS over fundamental RMS; 0 when the fundamental is 0.
fn thd(components: &[OutputComponent]) -> f64 {
    let fundamental = components[0].voltage_rms;
    if fundamental <= 0.0 {
        return 0.0;
    }
    quadratic_sum(&components[1..]) / fundamental
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::FrequencyComponent;

    fn bare_fundamental() -> SignalSpec {
        SignalSpec::new(0.0, FrequencyComponent::new(60.0, 10.0, 0.0))
    }

    fn with_harmonics() -> SignalSpec {
        let mut signal = bare_fundamental();
        signal.add_harmonic(FrequencyComponent::new(120.0, 3.0, 0.4));
        signal.add_harmonic(FrequencyComponent::new(180.0, 1.0, -1.1));
        signal
    }

    #[test]
    fn test_resistive_1k_scenario() {
        // Pure 1 kOhm resistor: i = v / R exactly, and a lone fundamental
        // means zero THD.
        let load = LoadSpec::new(1000.0, 0.0, LoadMode::ResistiveOnly);
        let result = aggregate(&bare_fundamental(), &load);

        assert!(result.vrms_total > 0.0, "amplifier gain is nonzero at 60 Hz");
        assert!(
            (result.irms_total - result.vrms_total / 1000.0).abs() < 1e-12,
            "pure resistor: irms must be vrms/R, got {} vs {}",
            result.irms_total,
            result.vrms_total / 1000.0
        );
        assert_eq!(result.thd_ratio, 0.0, "no harmonics, no distortion");
        assert_eq!(result.components.len(), 1);

        // P = Vrms^2 / R for a resistor.
        let expected_p = result.vrms_total * result.vrms_total / 1000.0;
        assert!(
            (result.real_power_w - expected_p).abs() / expected_p < 1e-12,
            "resistive power should be V^2/R: {} vs {expected_p}",
            result.real_power_w
        );
    }

    #[test]
    fn test_short_circuit_zeros_everything() {
        let load = LoadSpec::new(1000.0, 47e-6, LoadMode::Short);
        let result = aggregate(&with_harmonics(), &load);

        assert_eq!(result.vrms_total, 0.0);
        assert_eq!(result.irms_total, 0.0);
        assert_eq!(result.real_power_w, 0.0);
        assert_eq!(result.thd_ratio, 0.0);
        assert_eq!(result.components.len(), 3, "components are still reported");
        for c in &result.components {
            assert_eq!(c.voltage_rms, 0.0, "shorted component at {} Hz", c.frequency_hz);
        }
    }

    #[test]
    fn test_open_circuit_keeps_voltage() {
        let load = LoadSpec::new(1000.0, 47e-6, LoadMode::Open);
        let result = aggregate(&with_harmonics(), &load);

        assert_eq!(result.irms_total, 0.0, "open terminal draws no current");
        assert_eq!(result.real_power_w, 0.0, "no current, no power");
        assert!(result.vrms_total > 0.0, "voltage still present when open");
        assert!(result.thd_ratio > 0.0, "harmonics still show up in THD");
    }

    #[test]
    fn test_rms_superposition_law() {
        let load = LoadSpec::new(470.0, 2.2e-6, LoadMode::SeriesRc);
        let result = aggregate(&with_harmonics(), &load);

        let sum_sq: f64 = result
            .components
            .iter()
            .map(|c| c.voltage_rms * c.voltage_rms)
            .sum();
        assert!(
            (result.vrms_total * result.vrms_total - sum_sq).abs() < 1e-9,
            "vrms^2 must equal the component quadratic sum"
        );
    }

    #[test]
    fn test_component_order_mirrors_input() {
        let load = LoadSpec::new(470.0, 2.2e-6, LoadMode::SeriesRc);
        let result = aggregate(&with_harmonics(), &load);

        let freqs: Vec<f64> = result.components.iter().map(|c| c.frequency_hz).collect();
        assert_eq!(freqs, vec![60.0, 120.0, 180.0]);
    }

    #[test]
    fn test_zero_fundamental_forces_zero_thd() {
        let mut signal = SignalSpec::new(0.0, FrequencyComponent::new(60.0, 0.0, 0.0));
        signal.add_harmonic(FrequencyComponent::new(120.0, 3.0, 0.0));
        let load = LoadSpec::new(1000.0, 0.0, LoadMode::ResistiveOnly);

        let result = aggregate(&signal, &load);
        assert_eq!(
            result.thd_ratio, 0.0,
            "THD is defined as 0 when the fundamental vanishes"
        );
        assert!(result.vrms_total > 0.0, "the harmonic still carries energy");
    }

    #[test]
    fn test_power_is_positive_into_rc_load() {
        // A series RC only dissipates in R, so real power must be positive
        // whenever current flows.
        let load = LoadSpec::new(470.0, 2.2e-6, LoadMode::SeriesRc);
        let result = aggregate(&with_harmonics(), &load);
        assert!(
            result.real_power_w > 0.0,
            "dissipative load, positive power: {}",
            result.real_power_w
        );
    }
}
