//! The capability bundle handed to the game each poll. The game borrows
//! these for the length of a call and never keeps hold of them.
use crate::clock::{Clock, ManualClock, SpinClock};
use crate::display::{Display, DummyDisplay, TermPanel};
use crate::input::{BrightnessKnob, ConsoleInput, Keypad, PresenceSensor, ScriptedInput};
use crate::light::{DummyLight, LightIndicator};
use crate::sound::{ToneIndicator, ToneLog};
use std::io;

pub trait PeripheralBridge {
    fn presence(&mut self) -> &mut dyn PresenceSensor;
    fn keypad(&mut self) -> &mut dyn Keypad;
    fn knob(&mut self) -> &mut dyn BrightnessKnob;
    fn display(&mut self) -> &mut dyn Display;
    fn light(&mut self) -> &mut dyn LightIndicator;
    fn tone(&mut self) -> &mut dyn ToneIndicator;
    fn clock(&mut self) -> &mut dyn Clock;

    /// the host wants the poll loop to end
    fn quit_requested(&self) -> bool {
        false
    }
}

/// the whole device simulated in a terminal
pub struct Console {
    panel: TermPanel,
    input: ConsoleInput,
    sound: Box<dyn ToneIndicator>,
    clock: SpinClock,
}

impl Console {
    pub fn new(sound: Box<dyn ToneIndicator>) -> Result<Self, io::Error> {
        let input = ConsoleInput::new()?;
        let panel = TermPanel::new()?;
        Ok(Console {
            panel,
            input,
            sound,
            clock: SpinClock::new(),
        })
    }
}

impl PeripheralBridge for Console {
    fn presence(&mut self) -> &mut dyn PresenceSensor {
        &mut self.input
    }

    fn keypad(&mut self) -> &mut dyn Keypad {
        &mut self.input
    }

    fn knob(&mut self) -> &mut dyn BrightnessKnob {
        &mut self.input
    }

    fn display(&mut self) -> &mut dyn Display {
        &mut self.panel
    }

    fn light(&mut self) -> &mut dyn LightIndicator {
        &mut self.panel
    }

    fn tone(&mut self) -> &mut dyn ToneIndicator {
        self.sound.as_mut()
    }

    fn clock(&mut self) -> &mut dyn Clock {
        &mut self.clock
    }

    fn quit_requested(&self) -> bool {
        self.input.quit_requested()
    }
}

/// every collaborator replaced by an in-memory recorder, on virtual time;
/// fields are public so tests can script inputs and inspect outputs
#[derive(Default)]
pub struct DummyBridge {
    pub input: ScriptedInput,
    pub display: DummyDisplay,
    pub light: DummyLight,
    pub tone: ToneLog,
    pub clock: ManualClock,
}

impl DummyBridge {
    pub fn new() -> Self {
        DummyBridge::default()
    }

    pub fn with_input(input: ScriptedInput) -> Self {
        DummyBridge {
            input,
            ..DummyBridge::default()
        }
    }
}

impl PeripheralBridge for DummyBridge {
    fn presence(&mut self) -> &mut dyn PresenceSensor {
        &mut self.input
    }

    fn keypad(&mut self) -> &mut dyn Keypad {
        &mut self.input
    }

    fn knob(&mut self) -> &mut dyn BrightnessKnob {
        &mut self.input
    }

    fn display(&mut self) -> &mut dyn Display {
        &mut self.display
    }

    fn light(&mut self) -> &mut dyn LightIndicator {
        &mut self.light
    }

    fn tone(&mut self) -> &mut dyn ToneIndicator {
        &mut self.tone
    }

    fn clock(&mut self) -> &mut dyn Clock {
        &mut self.clock
    }
}
