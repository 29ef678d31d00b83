use crate::error::BridgeError;
use beep::beep;
use std::time::{Duration, Instant};

/// Makes beeps. `play_tone` must not block: the tone stops by itself after
/// `duration_ms`, or earlier on `stop`.
pub trait ToneIndicator {
    fn play_tone(&mut self, frequency_hz: u16, duration_ms: u32) -> Result<(), BridgeError>;

    fn stop(&mut self) -> Result<(), BridgeError>;

    /// end a timed tone whose time is up; the poll loop calls this every
    /// iteration
    fn service(&mut self) -> Result<(), BridgeError> {
        Ok(())
    }
}

/// drives the speaker at a frequency; 0 silences it
pub type Speaker = fn(u16) -> Result<(), BridgeError>;

fn pc_speaker(frequency_hz: u16) -> Result<(), BridgeError> {
    beep(frequency_hz).map_err(|e| BridgeError::Tone(e.to_string()))
}

/// PC speaker via the beep crate. Most terminals have no tone device, so
/// the first failure is logged and the speaker goes quiet for good; the
/// game carries on silently.
pub struct SimpleBeep {
    speaker: Speaker,
    until: Option<Instant>,
    broken: bool,
}

impl SimpleBeep {
    pub fn new() -> Self {
        SimpleBeep::with_speaker(pc_speaker)
    }

    pub fn with_speaker(speaker: Speaker) -> Self {
        SimpleBeep {
            speaker,
            until: None,
            broken: false,
        }
    }

    pub fn is_beeping(&self) -> bool {
        self.until.is_some()
    }

    /// the speaker failed once and is no longer driven
    pub fn is_broken(&self) -> bool {
        self.broken
    }

    fn drive(&mut self, frequency_hz: u16) {
        if self.broken {
            return;
        }
        if let Err(e) = (self.speaker)(frequency_hz) {
            log::warn!("no speaker, carrying on without sound: {}", e);
            self.broken = true;
            self.until = None;
        }
    }
}

impl Default for SimpleBeep {
    fn default() -> Self {
        SimpleBeep::new()
    }
}

impl ToneIndicator for SimpleBeep {
    fn play_tone(&mut self, frequency_hz: u16, duration_ms: u32) -> Result<(), BridgeError> {
        self.drive(frequency_hz);
        if !self.broken {
            self.until = Some(Instant::now() + Duration::from_millis(u64::from(duration_ms)));
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BridgeError> {
        self.drive(0);
        self.until = None;
        Ok(())
    }

    fn service(&mut self) -> Result<(), BridgeError> {
        match self.until {
            Some(t) if Instant::now() >= t => self.stop(),
            _ => Ok(()),
        }
    }
}

pub struct Mute {}
impl Mute {
    pub fn new() -> Self {
        Mute {}
    }
}
impl Default for Mute {
    fn default() -> Self {
        Mute::new()
    }
}
impl ToneIndicator for Mute {
    fn play_tone(&mut self, _frequency_hz: u16, _duration_ms: u32) -> Result<(), BridgeError> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BridgeError> {
        Ok(())
    }
}

/// one call made to a `ToneLog`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToneCall {
    Play(u16, u32),
    Stop,
}

/// silent ToneIndicator that remembers what it was asked to do, for testing
#[derive(Clone, Debug, Default)]
pub struct ToneLog {
    calls: Vec<ToneCall>,
}

impl ToneLog {
    pub fn new() -> Self {
        ToneLog::default()
    }

    pub fn calls(&self) -> &[ToneCall] {
        &self.calls
    }

    /// frequencies played, in order
    pub fn played(&self) -> Vec<u16> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                ToneCall::Play(f, _) => Some(*f),
                ToneCall::Stop => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl ToneIndicator for ToneLog {
    fn play_tone(&mut self, frequency_hz: u16, duration_ms: u32) -> Result<(), BridgeError> {
        self.calls.push(ToneCall::Play(frequency_hz, duration_ms));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), BridgeError> {
        self.calls.push(ToneCall::Stop);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_tone_log_records() -> Result<(), BridgeError> {
        let mut t = ToneLog::new();
        t.play_tone(1000, 250)?;
        t.stop()?;
        t.play_tone(500, 800)?;
        assert_eq!(
            t.calls(),
            &[ToneCall::Play(1000, 250), ToneCall::Stop, ToneCall::Play(500, 800)]
        );
        assert_eq!(t.played(), vec![1000, 500]);
        Ok(())
    }

    #[test]
    fn test_mute_is_silent() -> Result<(), BridgeError> {
        let mut m = Mute::new();
        m.play_tone(3000, 1000)?;
        m.service()?;
        m.stop()
    }

    #[test]
    fn test_simple_beep_starts_quiet() {
        let b = SimpleBeep::new();
        assert!(!b.is_beeping());
        assert!(!b.is_broken());
    }

    static SPEAKER_CALLS: AtomicUsize = AtomicUsize::new(0);

    fn no_tty(_frequency_hz: u16) -> Result<(), BridgeError> {
        SPEAKER_CALLS.fetch_add(1, Ordering::SeqCst);
        Err(BridgeError::Tone("ENOTTY: Not a typewriter".to_string()))
    }

    #[test]
    fn test_missing_speaker_goes_quiet() -> Result<(), BridgeError> {
        let mut b = SimpleBeep::with_speaker(no_tty);
        b.play_tone(3000, 1000)?;
        assert!(b.is_broken());
        assert!(!b.is_beeping());
        // given up on; never driven again
        b.play_tone(1000, 300)?;
        b.service()?;
        b.stop()?;
        assert_eq!(SPEAKER_CALLS.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[test]
    fn test_working_speaker_times_out() -> Result<(), BridgeError> {
        let mut b = SimpleBeep::with_speaker(|_| Ok(()));
        b.play_tone(1000, 0)?;
        assert!(b.is_beeping());
        b.service()?;
        assert!(!b.is_beeping());
        assert!(!b.is_broken());
        Ok(())
    }
}
