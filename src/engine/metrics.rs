use serde::{Deserialize, Serialize};

/// Floor for elapsed minutes so a session measured at t≈0 never divides by zero.
const MIN_ELAPSED_MINUTES: f64 = 1e-9;

/// Characters per word in the standard WPM convention.
const CHARS_PER_WORD: f64 = 5.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub total_typed: usize,
    pub correct_chars: usize,
    pub accuracy: f64,
    pub wpm: f64,
}

impl Metrics {
    pub fn error_rate(&self) -> f64 {
        (1.0 - self.accuracy).max(0.0)
    }
}

/// Display state of a single target character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharState {
    Correct,
    Incorrect,
    Pending,
}

/// Count positions where `typed` matches `target`. Characters typed past the
/// end of the target never count as correct.
pub fn compute_correct_chars(target: &str, typed: &str) -> usize {
    typed
        .chars()
        .zip(target.chars())
        .filter(|(typed_ch, target_ch)| typed_ch == target_ch)
        .count()
}

/// Recompute speed and accuracy from scratch for the current input.
pub fn compute_metrics(target: &str, typed: &str, elapsed_secs: f64) -> Metrics {
    let total_typed = typed.chars().count();
    let correct_chars = compute_correct_chars(target, typed);
    let accuracy = if total_typed > 0 {
        correct_chars as f64 / total_typed as f64
    } else {
        0.0
    };
    let minutes = (elapsed_secs / 60.0).max(MIN_ELAPSED_MINUTES);
    let wpm = (correct_chars as f64 / CHARS_PER_WORD) / minutes;

    Metrics {
        total_typed,
        correct_chars,
        accuracy,
        wpm,
    }
}

/// Classify every target character against the typed input.
pub fn char_states(target: &str, typed: &str) -> Vec<CharState> {
    let mut typed_chars = typed.chars();
    target
        .chars()
        .map(|target_ch| match typed_chars.next() {
            Some(ch) if ch == target_ch => CharState::Correct,
            Some(_) => CharState::Incorrect,
            None => CharState::Pending,
        })
        .collect()
}
