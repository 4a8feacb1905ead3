/// Response Bench — amplifier steady-state response validation CLI.
///
/// Builds a signal/load description from flags, runs the response engine,
/// and reports the aggregate figures or exports the reconstructed waveform.
///
/// Usage:
///   response-bench gain [--freq F]
///   response-bench respond [signal/load flags]
///   response-bench waveform [signal/load flags] [--cycles N] [--samples N] [--csv FILE]
///   response-bench render [signal/load flags] [--duration D] [--output FILE]
///
/// Signal/load flags:
///   --dc V             DC offset in volts (default 0)
///   --freq F           fundamental frequency in Hz (default 60)
///   --amplitude A      fundamental RMS amplitude in volts (default 1)
///   --peak A           fundamental peak amplitude (overrides --amplitude)
///   --phase DEG        fundamental phase in degrees (default 0)
///   --harmonic F:A:DEG extra component (RMS amplitude), repeatable up to 10
///   --r OHMS           load resistance (default 1000)
///   --cap-uf UF        load capacitance in microfarads (default 0)
///   --mode MODE        rc | r | short | open (default r)

use std::f64::consts::PI;

use ampsim_dsp::load::{LoadMode, LoadSpec};
use ampsim_dsp::response::{self, SimulationResult};
use ampsim_dsp::signal::{FrequencyComponent, SignalSpec};
use ampsim_dsp::transfer;
use ampsim_dsp::waveform;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "gain" => cmd_gain(&args[2..]),
        "respond" => cmd_respond(&args[2..]),
        "waveform" => cmd_waveform(&args[2..]),
        "render" => cmd_render(&args[2..]),
        _ => {
            eprintln!("Unknown subcommand: {}", args[1]);
            print_usage();
        }
    }
}

fn print_usage() {
    eprintln!("Response Bench — amplifier steady-state response validation");
    eprintln!();
    eprintln!("Subcommands:");
    eprintln!("  gain        Evaluate the transfer model at a single frequency");
    eprintln!("  respond     Aggregate figures (Vrms, Irms, power, THD) + components");
    eprintln!("  waveform    Reconstructed output waveform -> CSV");
    eprintln!("  render      Reconstructed output waveform -> 24-bit mono WAV");
}

// ─── Flag parsing ────────────────────────────────────────────────────────────

fn parse_flag(args: &[String], flag: &str, default: f64) -> f64 {
    parse_flag_opt(args, flag).unwrap_or(default)
}

fn parse_flag_opt(args: &[String], flag: &str) -> Option<f64> {
    for i in 0..args.len().saturating_sub(1) {
        if args[i] == flag {
            return args[i + 1].parse().ok();
        }
    }
    None
}

fn parse_flag_str<'a>(args: &'a [String], flag: &str, default: &'a str) -> &'a str {
    for i in 0..args.len().saturating_sub(1) {
        if args[i] == flag {
            return &args[i + 1];
        }
    }
    default
}

fn collect_flag<'a>(args: &'a [String], flag: &str) -> Vec<&'a str> {
    let mut values = Vec::new();
    for i in 0..args.len().saturating_sub(1) {
        if args[i] == flag {
            values.push(args[i + 1].as_str());
        }
    }
    values
}

fn fail(message: &str) -> ! {
    eprintln!("error: {message}");
    std::process::exit(2);
}

// ─── Signal / load construction ──────────────────────────────────────────────

/// `F:A:DEG` -> component with RMS amplitude and degree phase.
fn parse_harmonic(spec: &str) -> Option<FrequencyComponent> {
    let mut parts = spec.split(':');
    let f: f64 = parts.next()?.parse().ok()?;
    let a: f64 = parts.next()?.parse().ok()?;
    let deg: f64 = parts.next()?.parse().ok()?;
    if parts.next().is_some() || f <= 0.0 || a < 0.0 {
        return None;
    }
    Some(FrequencyComponent::new(f, a, deg.to_radians()))
}

fn parse_signal(args: &[String]) -> SignalSpec {
    let dc = parse_flag(args, "--dc", 0.0);
    let freq = parse_flag(args, "--freq", 60.0);
    let phase_rad = parse_flag(args, "--phase", 0.0).to_radians();
    if freq <= 0.0 {
        fail("--freq must be > 0");
    }

    let fundamental = match parse_flag_opt(args, "--peak") {
        Some(peak) if peak >= 0.0 => FrequencyComponent::from_peak(freq, peak, phase_rad),
        Some(_) => fail("--peak must be >= 0"),
        None => {
            let amplitude = parse_flag(args, "--amplitude", 1.0);
            if amplitude < 0.0 {
                fail("--amplitude must be >= 0");
            }
            FrequencyComponent::new(freq, amplitude, phase_rad)
        }
    };

    let mut signal = SignalSpec::new(dc, fundamental);
    for spec in collect_flag(args, "--harmonic") {
        let Some(component) = parse_harmonic(spec) else {
            fail(&format!("bad --harmonic '{spec}', expected F:A:DEG with F > 0, A >= 0"));
        };
        if !signal.add_harmonic(component) {
            fail("too many harmonics (max 10)");
        }
    }
    signal
}

fn parse_load(args: &[String]) -> LoadSpec {
    let r = parse_flag(args, "--r", 1000.0);
    let cap_uf = parse_flag(args, "--cap-uf", 0.0);
    if r < 0.0 {
        fail("--r must be >= 0");
    }
    if cap_uf < 0.0 {
        fail("--cap-uf must be >= 0");
    }
    let mode = match parse_flag_str(args, "--mode", "r") {
        "rc" => LoadMode::SeriesRc,
        "r" => LoadMode::ResistiveOnly,
        "short" => LoadMode::Short,
        "open" => LoadMode::Open,
        other => fail(&format!("unknown --mode '{other}', expected rc|r|short|open")),
    };
    LoadSpec::with_capacitance_uf(r, cap_uf, mode)
}

fn mode_name(mode: LoadMode) -> &'static str {
    match mode {
        LoadMode::SeriesRc => "series RC",
        LoadMode::ResistiveOnly => "resistive",
        LoadMode::Short => "short",
        LoadMode::Open => "open",
    }
}

// ─── Gain evaluation ─────────────────────────────────────────────────────────

fn cmd_gain(args: &[String]) {
    let freq = parse_flag(args, "--freq", 60.0);
    if freq <= 0.0 {
        fail("--freq must be > 0");
    }
    let omega = 2.0 * PI * freq;
    let h = transfer::gain(omega);

    let band = if omega < transfer::LOW_BAND_EDGE {
        "low"
    } else if omega < transfer::HIGH_BAND_EDGE {
        "mid"
    } else {
        "high"
    };

    println!("Transfer model evaluation");
    println!("  Frequency:   {freq:.3} Hz ({omega:.3} rad/s, {band} band)");
    println!("  |H|:         {:.4}x ({:.2} dB)", h.norm(), 20.0 * h.norm().log10());
    println!("  Phase:       {:.2}°", h.arg().to_degrees());
}

// ─── Aggregate response ──────────────────────────────────────────────────────

fn print_result(load: &LoadSpec, result: &SimulationResult) {
    println!("Steady-state response");
    println!("  Mode:        {}", mode_name(load.mode));
    println!("  R:           {:.1} Ω", load.resistance_ohm);
    println!("  C:           {:.3} µF", load.capacitance_farad * 1e6);
    println!();
    println!("  Vrms total:  {:.4} V", result.vrms_total);
    println!("  Irms total:  {:.6} A", result.irms_total);
    println!("  Real power:  {:.4} W", result.real_power_w);
    println!("  THD:         {:.2} %", result.thd_ratio * 100.0);
    println!();
    println!("  {:>10}  {:>12}  {:>10}", "f (Hz)", "Vrms (V)", "phase (°)");
    println!("  {:-<10}  {:-<12}  {:-<10}", "", "", "");
    for c in &result.components {
        println!(
            "  {:>10.2}  {:>12.6}  {:>10.2}",
            c.frequency_hz,
            c.voltage_rms,
            c.phase_rad.to_degrees()
        );
    }
}

fn cmd_respond(args: &[String]) {
    let signal = parse_signal(args);
    let load = parse_load(args);
    let result = response::aggregate(&signal, &load);
    print_result(&load, &result);
}

// ─── Waveform CSV export ─────────────────────────────────────────────────────

fn cmd_waveform(args: &[String]) {
    let signal = parse_signal(args);
    let load = parse_load(args);
    let cycles = parse_flag(args, "--cycles", waveform::DEFAULT_CYCLES as f64) as usize;
    let samples = parse_flag(args, "--samples", waveform::DEFAULT_SAMPLES as f64) as usize;
    let csv_path = parse_flag_str(args, "--csv", "");
    if cycles == 0 || samples < 2 {
        fail("--cycles must be >= 1 and --samples >= 2");
    }

    let result = response::aggregate(&signal, &load);
    let (times, values) = waveform::synthesize_with(signal.dc, &result.components, cycles, samples);

    let mut csv_lines = Vec::with_capacity(values.len() + 1);
    csv_lines.push("time_s,vout_v".to_string());
    for (t, v) in times.iter().zip(values.iter()) {
        csv_lines.push(format!("{t:.9},{v:.9}"));
    }

    let peak = values.iter().map(|v| v.abs()).fold(0.0f64, f64::max);
    println!("Waveform reconstruction");
    println!("  Components:  {}", result.components.len());
    println!("  Span:        {:.6} s ({cycles} fundamental periods)", times[times.len() - 1]);
    println!("  Samples:     {}", values.len());
    println!("  Peak |v|:    {peak:.4} V");

    if !csv_path.is_empty() {
        std::fs::write(csv_path, csv_lines.join("\n") + "\n").expect("Failed to write CSV");
        println!("\nCSV written to {csv_path}");
    }
}

// ─── WAV render ──────────────────────────────────────────────────────────────

fn cmd_render(args: &[String]) {
    let signal = parse_signal(args);
    let load = parse_load(args);
    let duration = parse_flag(args, "--duration", 1.0);
    let sample_rate = parse_flag(args, "--sample-rate", 44100.0);
    let output_path = parse_flag_str(args, "--output", "/tmp/response_render.wav");
    if duration <= 0.0 {
        fail("--duration must be > 0");
    }
    if sample_rate <= 0.0 {
        fail("--sample-rate must be > 0");
    }

    let result = response::aggregate(&signal, &load);

    let n_samples = (sample_rate * duration) as usize;
    let mut samples = Vec::with_capacity(n_samples);
    for i in 0..n_samples {
        let t = i as f64 / sample_rate;
        samples.push(waveform::value_at(signal.dc, &result.components, t));
    }

    let peak = samples.iter().map(|x| x.abs()).fold(0.0f64, f64::max);

    // Normalize to -3 dBFS if needed
    let scale = if peak > 0.7 { 0.7 / peak } else { 1.0 };

    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: sample_rate as u32,
        bits_per_sample: 24,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer =
        hound::WavWriter::create(output_path, spec).expect("Failed to create WAV file");

    let max_val = (1 << 23) - 1;
    for sample in &samples {
        let scaled = (sample * scale * max_val as f64).round() as i32;
        writer.write_sample(scaled.clamp(-max_val, max_val)).unwrap();
    }
    writer.finalize().unwrap();

    println!("Render complete");
    println!("  Duration:    {duration:.2} s at {sample_rate:.0} Hz");
    println!("  Vrms total:  {:.4} V", result.vrms_total);
    println!("  Peak:        {peak:.4} V (scale {scale:.4})");
    println!("  Output:      {output_path}");
}
