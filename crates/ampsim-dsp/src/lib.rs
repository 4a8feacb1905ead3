//! Ampsim DSP library — steady-state amplifier response modules.
//!
//! Pure frequency-domain math with no I/O or UI dependencies. A validated
//! signal/load description goes in, aggregate figures and a reconstructed
//! output waveform come out.

// Input-side value types
pub mod load;
pub mod signal;

// Frequency-domain response engine
pub mod response;
pub mod transfer;

// Output-side reconstruction
pub mod waveform;
