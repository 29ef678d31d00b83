use crate::error::BridgeError;
use crate::tier::DifficultyTier;
use crossterm::event::{poll, read, Event, KeyCode, KeyModifiers};
use crossterm::terminal;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::Duration;

/// the 4x4 membrane keypad, as wired on the device
pub const KEYPAD_LAYOUT: [[char; 4]; 4] = [
    ['1', '2', '3', 'A'],
    ['4', '5', '6', 'B'],
    ['7', '8', '9', 'C'],
    ['*', '0', '#', 'D'],
];

/// map of characters typed at the terminal to the keypad key they stand for
const TERMINAL_KEYMAP: [(char, char); 20] = [
    ('0', '0'),
    ('1', '1'),
    ('2', '2'),
    ('3', '3'),
    ('4', '4'),
    ('5', '5'),
    ('6', '6'),
    ('7', '7'),
    ('8', '8'),
    ('9', '9'),
    ('a', 'A'),
    ('b', 'B'),
    ('c', 'C'),
    ('d', 'D'),
    ('A', 'A'),
    ('B', 'B'),
    ('C', 'C'),
    ('D', 'D'),
    ('*', '*'),
    ('#', '#'),
];

/// how far one press of `[` or `]` turns the brightness knob
const KNOB_STEP: u8 = 32;

/// one key event from the keypad
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Digit(u8),
    Submit,
    Delete,
    Stop,
    /// a dedicated tier button; keypads without one use digits 1-3
    TierSelect(DifficultyTier),
    Unused(char),
}

impl Key {
    /// translate a keypad character; `None` if it isn't on the keypad
    pub fn from_keypad(c: char) -> Option<Key> {
        match c {
            '0'..='9' => c.to_digit(10).map(|d| Key::Digit(d as u8)),
            '#' => Some(Key::Submit),
            'D' => Some(Key::Delete),
            '*' => Some(Key::Stop),
            'A' | 'B' | 'C' => Some(Key::Unused(c)),
            _ => None,
        }
    }

    /// the tier this key picks while choosing a difficulty
    pub fn tier(&self) -> Option<DifficultyTier> {
        match self {
            Key::TierSelect(tier) => Some(*tier),
            Key::Digit(d) => DifficultyTier::from_number(*d),
            _ => None,
        }
    }
}

/// the IR presence sensor
pub trait PresenceSensor {
    fn is_triggered(&mut self) -> Result<bool, BridgeError>;
}

/// reads keypresses, at most one per call
pub trait Keypad {
    fn poll_key(&mut self) -> Result<Option<Key>, BridgeError>;

    /// throw away keys pressed while nobody was polling
    fn flush(&mut self) -> Result<(), BridgeError>;
}

/// the potentiometer scaling LED brightness
pub trait BrightnessKnob {
    /// 0-255
    fn level(&mut self) -> u8;
}

/// keypad, presence sensor and knob simulated from the terminal keyboard,
/// using crossterm in raw mode
pub struct ConsoleInput {
    keys: VecDeque<Key>,
    keymap: HashMap<char, char>,
    waved: bool,
    knob: u8,
    quit: bool,
}

impl ConsoleInput {
    pub fn new() -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(ConsoleInput {
            keys: VecDeque::new(),
            keymap: HashMap::from(TERMINAL_KEYMAP),
            waved: false,
            knob: u8::MAX,
            quit: false,
        })
    }

    /// Esc or ctrl-c was pressed
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    fn read_terminal(&mut self) -> Result<(), io::Error> {
        while poll(Duration::from_millis(0))? {
            match read()? {
                Event::Key(evt) => match evt.code {
                    KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.quit = true
                    }
                    KeyCode::Char(' ') => self.waved = true,
                    KeyCode::Char('[') => self.knob = self.knob.saturating_sub(KNOB_STEP),
                    KeyCode::Char(']') => self.knob = self.knob.saturating_add(KNOB_STEP),
                    KeyCode::Char(c) => match self.keymap.get(&c).and_then(|k| Key::from_keypad(*k)) {
                        Some(key) => self.keys.push_back(key),
                        None => log::warn!("can't map {:?} to a keypad key", c),
                    },
                    KeyCode::Enter => self.keys.push_back(Key::Submit),
                    KeyCode::Backspace => self.keys.push_back(Key::Delete),
                    KeyCode::Esc => self.quit = true,
                    other => log::warn!("unknown key event received: {:?}", other),
                },
                Event::Resize(..) => {}
                other => log::debug!("ignoring terminal event {:?}", other),
            }
        }
        Ok(())
    }
}

impl Drop for ConsoleInput {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl PresenceSensor for ConsoleInput {
    /// a wave (space bar) reads as one triggered poll
    fn is_triggered(&mut self) -> Result<bool, BridgeError> {
        self.read_terminal()?;
        Ok(std::mem::take(&mut self.waved))
    }
}

impl Keypad for ConsoleInput {
    fn poll_key(&mut self) -> Result<Option<Key>, BridgeError> {
        self.read_terminal()?;
        Ok(self.keys.pop_front())
    }

    fn flush(&mut self) -> Result<(), BridgeError> {
        self.read_terminal()?;
        if !self.keys.is_empty() {
            log::debug!("dropping {} buffered keys", self.keys.len());
            self.keys.clear();
        }
        Ok(())
    }
}

impl BrightnessKnob for ConsoleInput {
    fn level(&mut self) -> u8 {
        self.knob
    }
}

/// scripted sensors for testing: each poll consumes one entry, and an
/// exhausted script reads as nobody there and no key pressed
#[derive(Clone, Debug)]
pub struct ScriptedInput {
    presence: VecDeque<bool>,
    keys: VecDeque<Option<Key>>,
    buffered: VecDeque<Key>,
    knob: u8,
}

impl Default for ScriptedInput {
    fn default() -> Self {
        ScriptedInput {
            presence: VecDeque::new(),
            keys: VecDeque::new(),
            buffered: VecDeque::new(),
            knob: u8::MAX,
        }
    }
}

impl ScriptedInput {
    pub fn new() -> Self {
        ScriptedInput::default()
    }

    pub fn with_knob(mut self, level: u8) -> Self {
        self.knob = level;
        self
    }

    /// one poll where someone waves at the sensor
    pub fn wave(mut self) -> Self {
        self.frame(true, None);
        self
    }

    /// one poll with a key press
    pub fn press(mut self, key: Key) -> Self {
        self.frame(false, Some(key));
        self
    }

    /// one poll per keypad character
    pub fn type_keys(mut self, keys: &str) -> Self {
        for key in keys.chars().filter_map(Key::from_keypad) {
            self.frame(false, Some(key));
        }
        self
    }

    /// `n` polls with nothing happening
    pub fn idle(mut self, n: usize) -> Self {
        for _ in 0..n {
            self.frame(false, None);
        }
        self
    }

    /// keys already sitting in the keypad buffer; handed out ahead of the
    /// script until read or flushed
    pub fn buffer_keys(mut self, keys: &str) -> Self {
        self.buffered.extend(keys.chars().filter_map(Key::from_keypad));
        self
    }

    pub fn frame(&mut self, presence: bool, key: Option<Key>) {
        self.presence.push_back(presence);
        self.keys.push_back(key);
    }

    pub fn is_exhausted(&self) -> bool {
        self.presence.is_empty() && self.keys.is_empty() && self.buffered.is_empty()
    }
}

impl PresenceSensor for ScriptedInput {
    fn is_triggered(&mut self) -> Result<bool, BridgeError> {
        Ok(self.presence.pop_front().unwrap_or(false))
    }
}

impl Keypad for ScriptedInput {
    fn poll_key(&mut self) -> Result<Option<Key>, BridgeError> {
        let scripted = self.keys.pop_front().flatten();
        match self.buffered.pop_front() {
            Some(key) => {
                self.buffered.extend(scripted);
                Ok(Some(key))
            }
            None => Ok(scripted),
        }
    }

    fn flush(&mut self) -> Result<(), BridgeError> {
        self.buffered.clear();
        Ok(())
    }
}

impl BrightnessKnob for ScriptedInput {
    fn level(&mut self) -> u8 {
        self.knob
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keypad_layout_all_mapped() {
        for row in KEYPAD_LAYOUT {
            for c in row {
                assert!(Key::from_keypad(c).is_some(), "{} unmapped", c);
            }
        }
    }

    #[test]
    fn test_keypad_roles() {
        assert_eq!(Key::from_keypad('7'), Some(Key::Digit(7)));
        assert_eq!(Key::from_keypad('#'), Some(Key::Submit));
        assert_eq!(Key::from_keypad('D'), Some(Key::Delete));
        assert_eq!(Key::from_keypad('*'), Some(Key::Stop));
        assert_eq!(Key::from_keypad('B'), Some(Key::Unused('B')));
        assert_eq!(Key::from_keypad('x'), None);
    }

    #[test]
    fn test_tier_keys() {
        assert_eq!(Key::Digit(1).tier(), Some(DifficultyTier::Easy));
        assert_eq!(Key::Digit(2).tier(), Some(DifficultyTier::Medium));
        assert_eq!(Key::Digit(3).tier(), Some(DifficultyTier::Hard));
        assert_eq!(Key::Digit(4).tier(), None);
        assert_eq!(Key::Digit(0).tier(), None);
        assert_eq!(
            Key::TierSelect(DifficultyTier::Hard).tier(),
            Some(DifficultyTier::Hard)
        );
        assert_eq!(Key::Submit.tier(), None);
    }

    #[test]
    fn test_terminal_keymap_lands_on_keypad() {
        for (typed, keypad) in TERMINAL_KEYMAP {
            assert!(Key::from_keypad(keypad).is_some(), "{} -> {}", typed, keypad);
        }
    }

    #[test]
    fn test_scripted_input() -> Result<(), BridgeError> {
        let mut s = ScriptedInput::new().wave().type_keys("1#").idle(1);
        assert!(s.is_triggered()?);
        assert_eq!(s.poll_key()?, None);
        assert!(!s.is_triggered()?);
        assert_eq!(s.poll_key()?, Some(Key::Digit(1)));
        assert!(!s.is_triggered()?);
        assert_eq!(s.poll_key()?, Some(Key::Submit));
        assert!(!s.is_triggered()?);
        assert_eq!(s.poll_key()?, None);
        assert!(s.is_exhausted());
        assert!(!s.is_triggered()?);
        assert_eq!(s.poll_key()?, None);
        Ok(())
    }

    #[test]
    fn test_buffered_keys_come_first_and_flush() -> Result<(), BridgeError> {
        let mut s = ScriptedInput::new().buffer_keys("12").type_keys("#");
        assert_eq!(s.poll_key()?, Some(Key::Digit(1)));
        s.flush()?;
        // the scripted key pressed meanwhile went into the buffer too
        assert_eq!(s.poll_key()?, None);
        assert!(s.is_exhausted());

        let mut s = ScriptedInput::new().buffer_keys("7");
        assert_eq!(s.poll_key()?, Some(Key::Digit(7)));
        assert_eq!(s.poll_key()?, None);
        Ok(())
    }
}
