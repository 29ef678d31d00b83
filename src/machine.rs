use crate::bridge::PeripheralBridge;
use crate::buffer::InputBuffer;
use crate::countdown::{Countdown, CountdownEvent};
use crate::error::BridgeError;
use crate::input::Key;
use crate::light::Rgb;
use crate::problem::{Problem, ProblemGenerator};
use crate::reveal;
use crate::storage::{PersistentCounter, ScoreStore};
use crate::tier::{DifficultyTier, RevealMode};
use rand::Rng;
use std::time::{Duration, Instant};

pub const QUESTIONS_PER_SESSION: u8 = 10;

// (frequency Hz, duration ms)
const GREETING_TONE: (u16, u32) = (3000, 1000);
const KEY_CLICK: (u16, u32) = (1000, 300);
const CORRECT_TONE: (u16, u32) = (4500, 800);
const INCORRECT_TONE: (u16, u32) = (500, 800);

pub const GREETING_HOLD: Duration = Duration::from_millis(1000);
pub const FEEDBACK_HOLD: Duration = Duration::from_millis(1000);
pub const SCORE_HOLD: Duration = Duration::from_millis(1500);
pub const TOTAL_HOLD: Duration = Duration::from_millis(3000);
pub const FAREWELL_HOLD: Duration = Duration::from_millis(2000);

/// stands in for a hidden operand on the LCD
const MASK: char = '█';

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// waiting for someone to wave at the sensor
    Idle,
    DifficultySelect,
    Question,
    Feedback,
    SessionSummary,
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// one run of questions at a fixed tier
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    tier: Option<DifficultyTier>,
    questions_remaining: u8,
    current_problem: Option<Problem>,
    input: InputBuffer,
    score: u8,
}

impl Session {
    fn start(tier: DifficultyTier) -> Self {
        Session {
            tier: Some(tier),
            questions_remaining: QUESTIONS_PER_SESSION,
            ..Session::default()
        }
    }

    pub fn tier(&self) -> Option<DifficultyTier> {
        self.tier
    }

    pub fn questions_remaining(&self) -> u8 {
        self.questions_remaining
    }

    pub fn current_problem(&self) -> Option<&Problem> {
        self.current_problem.as_ref()
    }

    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    pub fn score(&self) -> u8 {
        self.score
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SummaryStage {
    Score,
    Total,
}

/// The game. Owns everything with game state in it; borrows the hardware
/// through a `PeripheralBridge` for the duration of each call. Feed it
/// presence and key events and call `tick` every poll; nothing here waits
/// except the counted reveal of the Medium and Hard tiers.
pub struct SessionStateMachine<C: PersistentCounter, R: Rng> {
    state: SessionState,
    session: Session,
    countdown: Countdown,
    /// timed screens: greeting, feedback, summary, farewell
    hold: Countdown,
    summary_stage: SummaryStage,
    store: ScoreStore<C>,
    generator: ProblemGenerator<R>,
    /// LCD column where the typed answer starts
    field_start: usize,
    last_outcome: Option<Outcome>,
    last_total: Option<u32>,
}

impl<C: PersistentCounter, R: Rng> SessionStateMachine<C, R> {
    pub fn new(counter: C, rng: R) -> Self {
        SessionStateMachine {
            state: SessionState::Idle,
            session: Session::default(),
            countdown: Countdown::new(),
            hold: Countdown::new(),
            summary_stage: SummaryStage::Score,
            store: ScoreStore::new(counter),
            generator: ProblemGenerator::new(rng),
            field_start: 0,
            last_outcome: None,
            last_total: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn per_session_score(&self) -> u8 {
        self.session.score
    }

    pub fn questions_remaining(&self) -> u8 {
        self.session.questions_remaining
    }

    pub fn current_problem(&self) -> Option<&Problem> {
        self.session.current_problem.as_ref()
    }

    /// how the last graded question went
    pub fn last_outcome(&self) -> Option<Outcome> {
        self.last_outcome
    }

    /// cumulative score worked out at the end of the last session
    pub fn last_total(&self) -> Option<u32> {
        self.last_total
    }

    /// what's in persistent storage right now
    pub fn cumulative_score(&mut self) -> u32 {
        self.store.load()
    }

    /// time left on the current question
    pub fn time_remaining(&self, now: Instant) -> Duration {
        self.countdown.remaining(now)
    }

    pub fn on_presence(&mut self, io: &mut dyn PeripheralBridge) -> Result<(), BridgeError> {
        match self.state {
            SessionState::Idle => self.greet(io),
            _ => Ok(()),
        }
    }

    /// Stop is honoured in every state; anything a state has no use for is
    /// dropped.
    pub fn on_key(&mut self, key: Key, io: &mut dyn PeripheralBridge) -> Result<(), BridgeError> {
        if key == Key::Stop {
            return self.stop(io);
        }
        match (self.state, key) {
            (SessionState::DifficultySelect, key) => match key.tier() {
                Some(tier) => self.start_session(tier, io),
                None => Ok(()),
            },
            (SessionState::Question, Key::Digit(d)) => self.type_digit(d, io),
            (SessionState::Question, Key::Delete) => self.delete_digit(io),
            (SessionState::Question, Key::Submit) => self.grade(io),
            _ => Ok(()),
        }
    }

    /// advance timers; call every poll, key or no key
    pub fn tick(&mut self, io: &mut dyn PeripheralBridge) -> Result<(), BridgeError> {
        let now = io.clock().now();
        match self.state {
            SessionState::Idle => Ok(()),
            SessionState::DifficultySelect => {
                if self.hold_expired(now) {
                    io.light().set(Rgb::OFF)?;
                    io.display().show_text("Difficulty \n  1-E 2-M 3-H")?;
                }
                Ok(())
            }
            SessionState::Question => match self.countdown.tick(now) {
                Some(CountdownEvent::Second(s)) => show_timer(s, io),
                Some(CountdownEvent::Expired) => {
                    log::info!("time up");
                    self.grade(io)
                }
                None => Ok(()),
            },
            SessionState::Feedback => {
                if !self.hold_expired(now) {
                    return Ok(());
                }
                io.light().set(Rgb::OFF)?;
                io.display().clear()?;
                if self.session.questions_remaining > 0 {
                    self.next_question(io)
                } else {
                    self.summarise(io)
                }
            }
            SessionState::SessionSummary => {
                if !self.hold_expired(now) {
                    return Ok(());
                }
                match self.summary_stage {
                    SummaryStage::Score => {
                        let total = self.last_total.unwrap_or(0);
                        io.display().show_text(&format!("Total Score\n{}", total))?;
                        self.summary_stage = SummaryStage::Total;
                        self.hold.start(TOTAL_HOLD, now);
                        Ok(())
                    }
                    SummaryStage::Total => self.go_idle(io),
                }
            }
            SessionState::Stopped => {
                if self.hold_expired(now) {
                    self.go_idle(io)?;
                }
                Ok(())
            }
        }
    }

    fn transition(&mut self, to: SessionState) {
        log::info!("{:?} -> {:?}", self.state, to);
        self.state = to;
    }

    fn hold_expired(&mut self, now: Instant) -> bool {
        self.hold.tick(now) == Some(CountdownEvent::Expired)
    }

    fn greet(&mut self, io: &mut dyn PeripheralBridge) -> Result<(), BridgeError> {
        self.session = Session::default();
        let level = io.knob().level();
        io.display().set_backlight(true)?;
        io.display().show_text("Hello!")?;
        io.light().set(Rgb::green(level))?;
        io.tone().play_tone(GREETING_TONE.0, GREETING_TONE.1)?;
        self.hold.start(GREETING_HOLD, io.clock().now());
        self.transition(SessionState::DifficultySelect);
        Ok(())
    }

    fn start_session(
        &mut self,
        tier: DifficultyTier,
        io: &mut dyn PeripheralBridge,
    ) -> Result<(), BridgeError> {
        log::info!("starting {:?} session", tier);
        self.hold.cancel();
        io.light().set(Rgb::OFF)?;
        self.session = Session::start(tier);
        self.next_question(io)
    }

    fn next_question(&mut self, io: &mut dyn PeripheralBridge) -> Result<(), BridgeError> {
        let tier = match self.session.tier {
            Some(tier) => tier,
            None => return Ok(()),
        };
        let problem = self.generator.generate(tier);
        self.session.current_problem = Some(problem);
        self.session.input.clear();

        io.display().clear()?;
        let mode = tier.reveal_mode();
        reveal::reveal(&problem, mode, io)?;
        if mode != RevealMode::Text {
            // keys mashed during the reveal were never seen by the game
            io.keypad().flush()?;
        }
        let question = match mode {
            RevealMode::Text => problem.to_string(),
            RevealMode::Blink | RevealMode::Tone => {
                format!("{m}{}{m}=", problem.operator().symbol(), m = MASK)
            }
        };
        io.display().show_text(&question)?;
        self.field_start = question.chars().count();

        // the clock starts once the player has seen (or heard) the question
        let now = io.clock().now();
        self.countdown.start(tier.timeout(), now);
        self.transition(SessionState::Question);
        match self.countdown.tick(now) {
            Some(CountdownEvent::Second(s)) => show_timer(s, io),
            _ => Ok(()),
        }
    }

    fn type_digit(&mut self, digit: u8, io: &mut dyn PeripheralBridge) -> Result<(), BridgeError> {
        if !self.session.input.push(digit) {
            return Ok(());
        }
        let position = self.field_start + self.session.input.len() - 1;
        io.display().show_digit_at(position, digit)?;
        io.tone().play_tone(KEY_CLICK.0, KEY_CLICK.1)
    }

    fn delete_digit(&mut self, io: &mut dyn PeripheralBridge) -> Result<(), BridgeError> {
        if self.session.input.pop_last().is_none() {
            return Ok(());
        }
        io.display()
            .clear_display_field(self.field_start + self.session.input.len())
    }

    /// An empty answer is simply wrong. The problem is dropped here, so a
    /// second grade of the same question can't happen.
    fn grade(&mut self, io: &mut dyn PeripheralBridge) -> Result<(), BridgeError> {
        self.countdown.cancel();
        let problem = self.session.current_problem.take();
        let typed = self.session.input.value();
        let outcome = match problem {
            Some(p) if typed == Some(p.answer()) => Outcome::Correct,
            _ => Outcome::Incorrect,
        };
        if outcome == Outcome::Correct {
            self.session.score += 1;
        }
        self.session.questions_remaining = self.session.questions_remaining.saturating_sub(1);
        self.session.input.clear();
        self.last_outcome = Some(outcome);
        log::info!(
            "{:?}: typed {:?} for {:?}, score {}, {} left",
            outcome,
            typed,
            problem.map(|p| p.answer()),
            self.session.score,
            self.session.questions_remaining
        );

        let level = io.knob().level();
        let (text, colour, (hz, ms)) = match outcome {
            Outcome::Correct => ("Correct! :)", Rgb::green(level), CORRECT_TONE),
            Outcome::Incorrect => ("Incorrect! :(", Rgb::red(level), INCORRECT_TONE),
        };
        io.tone().play_tone(hz, ms)?;
        io.display().show_text(text)?;
        io.light().set(colour)?;
        self.hold.start(FEEDBACK_HOLD, io.clock().now());
        self.transition(SessionState::Feedback);
        Ok(())
    }

    /// the score is banked as soon as the session is over
    fn summarise(&mut self, io: &mut dyn PeripheralBridge) -> Result<(), BridgeError> {
        let score = u32::from(self.session.score);
        let total = match self.store.add_and_save(score) {
            Ok(total) => total,
            Err(e) => {
                log::error!("could not save score: {}", e);
                self.store.load().saturating_add(score)
            }
        };
        self.last_total = Some(total);
        log::info!(
            "session over: {}/{}, total {}",
            score,
            QUESTIONS_PER_SESSION,
            total
        );
        io.display().clear()?;
        io.display().show_text_at(
            5,
            0,
            &format!("Score:{}/{}", score, QUESTIONS_PER_SESSION),
        )?;
        self.summary_stage = SummaryStage::Score;
        self.hold.start(SCORE_HOLD, io.clock().now());
        self.transition(SessionState::SessionSummary);
        Ok(())
    }

    fn stop(&mut self, io: &mut dyn PeripheralBridge) -> Result<(), BridgeError> {
        if matches!(self.state, SessionState::Idle | SessionState::Stopped) {
            return Ok(());
        }
        self.countdown.cancel();
        self.session = Session::default();
        io.tone().stop()?;
        io.display().show_text("      Good\n      Bye!")?;
        io.light().set(Rgb::red(u8::MAX))?;
        self.hold.start(FAREWELL_HOLD, io.clock().now());
        self.transition(SessionState::Stopped);
        Ok(())
    }

    fn go_idle(&mut self, io: &mut dyn PeripheralBridge) -> Result<(), BridgeError> {
        self.session = Session::default();
        self.countdown.cancel();
        self.hold.cancel();
        io.light().set(Rgb::OFF)?;
        io.display().clear()?;
        io.display().set_backlight(false)?;
        self.transition(SessionState::Idle);
        Ok(())
    }
}

/// seconds left as HH:MM:SS on the bottom row
fn show_timer(seconds: u32, io: &mut dyn PeripheralBridge) -> Result<(), BridgeError> {
    let text = format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    );
    io.display().show_text_at(0, 1, &text)
}
