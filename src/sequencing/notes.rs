#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
Pitches
=======

A song can only use the thirteen chromatic steps from A4 up to A5, plus a
rest. The set is fixed and ordered:

  REST, A4, A4S, B4, C4, C4S, D4, D4S, E4, F4, F4S, G4, G4S, A5

Naming Convention:
- Letter + octave digit, as written in song files: A4, C4, G4
- A trailing S marks a sharp: A4S (A#4), F4S (F#4)
- REST is silence and always sits at position 0

The octave digits follow the song format, not scientific pitch: "C4" here is
the C three semitones *above* A4, so the whole set climbs monotonically from
A4 to A5.

Tuning
------
Equal temperament relative to A = 440 Hz. With n the 1-based position among
the non-rest pitches (A4 = 1):

  frequency = 440 * 2^((n - 1) / 12)

  A4  = 440.00 Hz
  C4  = 523.25 Hz
  A5  = 880.00 Hz  (one octave, exactly double)
*/

/// Reference pitch A4 in Hz.
pub const REFERENCE_FREQUENCY: f64 = 440.0;

/// A pitch from the fixed song alphabet. `Rest` is silence.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pitch {
    Rest,
    A4,
    A4S,
    B4,
    C4,
    C4S,
    D4,
    D4S,
    E4,
    F4,
    F4S,
    G4,
    G4S,
    A5,
}

impl Pitch {
    pub const COUNT: usize = 14;

    /// Every pitch in ordinal order, `Rest` first.
    pub const ALL: [Pitch; Pitch::COUNT] = [
        Pitch::Rest,
        Pitch::A4,
        Pitch::A4S,
        Pitch::B4,
        Pitch::C4,
        Pitch::C4S,
        Pitch::D4,
        Pitch::D4S,
        Pitch::E4,
        Pitch::F4,
        Pitch::F4S,
        Pitch::G4,
        Pitch::G4S,
        Pitch::A5,
    ];

    /// Position in `ALL`. `Rest` is 0, `A4` is 1.
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    pub const fn is_rest(self) -> bool {
        matches!(self, Pitch::Rest)
    }

    /// Identifier as written in song files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Pitch::Rest => "REST",
            Pitch::A4 => "A4",
            Pitch::A4S => "A4S",
            Pitch::B4 => "B4",
            Pitch::C4 => "C4",
            Pitch::C4S => "C4S",
            Pitch::D4 => "D4",
            Pitch::D4S => "D4S",
            Pitch::E4 => "E4",
            Pitch::F4 => "F4",
            Pitch::F4S => "F4S",
            Pitch::G4 => "G4",
            Pitch::G4S => "G4S",
            Pitch::A5 => "A5",
        }
    }

    /// Equal-tempered frequency in Hz, or `None` for `Rest`.
    pub fn frequency(self) -> Option<f64> {
        if self.is_rest() {
            return None;
        }
        let half_steps_from_a = (self.ordinal() - 1) as f64;
        Some(REFERENCE_FREQUENCY * 2.0_f64.powf(half_steps_from_a / 12.0))
    }

    /// Comma-separated list of valid identifiers, for diagnostics.
    pub fn valid_names() -> String {
        let names: Vec<&str> = Pitch::ALL.iter().map(|p| p.as_str()).collect();
        format!("[{}]", names.join(", "))
    }
}

impl std::fmt::Display for Pitch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for a token that names no pitch. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid note")]
pub struct UnknownPitch(pub String);

impl std::str::FromStr for Pitch {
    type Err = UnknownPitch;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pitch::ALL
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownPitch(s.to_string()))
    }
}
