use crate::error::ConfigError;
use std::ops::Range;
use std::time::Duration;

/// how the operands of a problem are disclosed to the player
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealMode {
    /// printed on the LCD
    Text,
    /// counted blinks of the blue LED
    Blink,
    /// counted buzzes of the speaker
    Tone,
}

/// half-open range operands are drawn from; always starts at 1 or more so
/// that division can never see a zero divisor
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperandRange {
    lo: u32,
    hi: u32,
}

impl OperandRange {
    pub fn new(lo: u32, hi: u32) -> Result<Self, ConfigError> {
        if lo == 0 {
            return Err(ConfigError::ZeroOperand(lo));
        }
        if lo >= hi {
            return Err(ConfigError::EmptyRange(lo, hi));
        }
        Ok(OperandRange { lo, hi })
    }

    /// only for the built-in table, which is known good
    const fn fixed(lo: u32, hi: u32) -> Self {
        OperandRange { lo, hi }
    }

    pub fn as_range(&self) -> Range<u32> {
        self.lo..self.hi
    }

    pub fn contains(&self, n: u32) -> bool {
        self.as_range().contains(&n)
    }
}

/// operand ranges for each operator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OperandRanges {
    pub add: OperandRange,
    pub sub: OperandRange,
    pub mul: OperandRange,
    pub div: OperandRange,
}

impl OperandRanges {
    /// the same range for every operator
    pub fn uniform(range: OperandRange) -> Self {
        OperandRanges {
            add: range.clone(),
            sub: range.clone(),
            mul: range.clone(),
            div: range,
        }
    }
}

/// difficulty level, chosen once per session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DifficultyTier {
    Easy,
    Medium,
    Hard,
}

impl DifficultyTier {
    pub const ALL: [DifficultyTier; 3] = [Self::Easy, Self::Medium, Self::Hard];

    /// tiers are numbered 1-3 on the keypad
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(Self::Easy),
            2 => Some(Self::Medium),
            3 => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn number(&self) -> u8 {
        match self {
            Self::Easy => 1,
            Self::Medium => 2,
            Self::Hard => 3,
        }
    }

    pub fn timeout(&self) -> Duration {
        match self {
            Self::Easy => Duration::from_secs(20),
            Self::Medium => Duration::from_secs(15),
            Self::Hard => Duration::from_secs(10),
        }
    }

    pub fn reveal_mode(&self) -> RevealMode {
        match self {
            Self::Easy => RevealMode::Text,
            Self::Medium => RevealMode::Blink,
            Self::Hard => RevealMode::Tone,
        }
    }

    /// Easy keeps multiplication small enough to do in your head; the
    /// counted tiers stay below ten so a blink/buzz train stays countable.
    pub fn operand_ranges(&self) -> OperandRanges {
        match self {
            Self::Easy => OperandRanges {
                add: OperandRange::fixed(1, 100),
                sub: OperandRange::fixed(1, 100),
                mul: OperandRange::fixed(1, 20),
                div: OperandRange::fixed(1, 100),
            },
            Self::Medium | Self::Hard => OperandRanges::uniform(OperandRange::fixed(1, 10)),
        }
    }
}
