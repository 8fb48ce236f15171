//! Background music loop
//!
//! A short pentatonic phrase rendered into a sample buffer that the browser
//! loops for the whole round. Pure so it can be tested off the browser.

use std::f32::consts::TAU;

/// Note length in seconds
pub const NOTE_SECS: f32 = 0.25;

/// MIDI note numbers of the loop (C major pentatonic, two bars)
const PHRASE: [u8; 16] = [
    60, 64, 67, 69, 67, 64, 62, 64, //
    60, 62, 64, 67, 69, 72, 69, 67,
];

/// Bass note under each group of four melody notes
const BASS: [u8; 4] = [48, 45, 41, 43];

/// Fraction of each note spent fading in and out (avoids clicks)
const EDGE: f32 = 0.05;

/// Length of one loop in seconds
pub fn loop_secs() -> f32 {
    PHRASE.len() as f32 * NOTE_SECS
}

/// Frequency of a MIDI note
#[inline]
pub fn midi_to_hz(note: u8) -> f32 {
    440.0 * 2f32.powf((note as f32 - 69.0) / 12.0)
}

/// Note envelope at `t` seconds into a note of `len` seconds
fn envelope(t: f32, len: f32) -> f32 {
    let edge = len * EDGE;
    if t < edge {
        t / edge
    } else if t > len - edge {
        ((len - t) / edge).max(0.0)
    } else {
        // Gentle decay so notes don't blur together
        1.0 - 0.4 * (t - edge) / (len - 2.0 * edge)
    }
}

/// Render one loop as mono samples in [-1, 1]
pub fn render_loop(sample_rate: f32) -> Vec<f32> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return Vec::new();
    }
    let note_len = (NOTE_SECS * sample_rate).round() as usize;
    let mut samples = Vec::with_capacity(note_len * PHRASE.len());

    for (i, &note) in PHRASE.iter().enumerate() {
        let lead = midi_to_hz(note);
        let bass = midi_to_hz(BASS[i / 4 % BASS.len()]);
        for n in 0..note_len {
            let t = n as f32 / sample_rate;
            let env = envelope(t, NOTE_SECS);
            // Soft triangle-ish lead from two sine partials, sine bass
            let lead_wave = (TAU * lead * t).sin() + 0.2 * (TAU * 3.0 * lead * t).sin();
            let bass_wave = (TAU * bass * t).sin();
            samples.push((0.45 * lead_wave + 0.3 * bass_wave) * env);
        }
    }
    samples
}
