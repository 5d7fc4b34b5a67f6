#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Milliseconds of play time per second of measure length.
///
/// Deliberately 1500 rather than 1000: every note is held half again as long
/// as its fraction of a measure implies. Songs are written against this tempo.
pub const MS_PER_MEASURE_SECOND: u32 = 1500;

/// Note length as a fraction of one measure.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Duration {
    Whole,
    Half,
    Quarter,
    Eighth,
}

impl Duration {
    pub const ALL: [Duration; 4] = [
        Duration::Whole,
        Duration::Half,
        Duration::Quarter,
        Duration::Eighth,
    ];

    /// Fraction of a measure: 1, 1/2, 1/4, 1/8
    pub const fn fraction(self) -> f32 {
        match self {
            Duration::Whole => 1.0,
            Duration::Half => 0.5,
            Duration::Quarter => 0.25,
            Duration::Eighth => 0.125,
        }
    }

    /// Length code used in song files ("1", "2", "4", "8")
    pub const fn code(self) -> &'static str {
        match self {
            Duration::Whole => "1",
            Duration::Half => "2",
            Duration::Quarter => "4",
            Duration::Eighth => "8",
        }
    }

    /// Parse a length code. Anything but the four literal codes is rejected.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "1" => Some(Duration::Whole),
            "2" => Some(Duration::Half),
            "4" => Some(Duration::Quarter),
            "8" => Some(Duration::Eighth),
            _ => None,
        }
    }

    /// Nominal play time in whole milliseconds (truncated).
    /// Formula: fraction * measure_length_secs * 1500
    pub fn time_ms(self, measure_length_secs: u32) -> u64 {
        (self.fraction() * measure_length_secs as f32 * MS_PER_MEASURE_SECOND as f32) as u64
    }

    pub fn valid_codes() -> String {
        let codes: Vec<&str> = Duration::ALL.iter().map(|d| d.code()).collect();
        format!("[{}]", codes.join(", "))
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Duration::Whole => "WHOLE",
            Duration::Half => "HALF",
            Duration::Quarter => "QUARTER",
            Duration::Eighth => "EIGHTH",
        };
        f.write_str(name)
    }
}
