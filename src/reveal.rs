//! Counted presentation of operands for the Medium (blink) and Hard (buzz)
//! tiers. These are deliberately blocking: the device has nothing else to
//! do while the player counts, and every wait is bounded.
use crate::bridge::PeripheralBridge;
use crate::error::BridgeError;
use crate::light::Rgb;
use crate::problem::Problem;
use crate::tier::RevealMode;
use std::time::Duration;

/// how long the "look/listen" caption stays up
pub const CAPTION_HOLD: Duration = Duration::from_millis(2000);
/// one counted unit: on, then off
pub const UNIT_ON: Duration = Duration::from_millis(250);
pub const UNIT_OFF: Duration = Duration::from_millis(250);
/// pause after each operand
pub const OPERAND_GAP: Duration = Duration::from_millis(1000);

pub const REVEAL_TONE_HZ: u16 = 1000;

/// Present both operands. `Text` has nothing to present up front; the
/// question line shows them.
pub fn reveal(
    problem: &Problem,
    mode: RevealMode,
    io: &mut dyn PeripheralBridge,
) -> Result<(), BridgeError> {
    let caption = match mode {
        RevealMode::Text => return Ok(()),
        RevealMode::Blink => "Look carefully!",
        RevealMode::Tone => "Listen carefully!",
    };
    io.display().show_text(caption)?;
    io.clock().delay(CAPTION_HOLD);
    io.display().clear()?;
    for operand in [problem.operand1(), problem.operand2()] {
        for _ in 0..operand {
            pulse(mode, io)?;
        }
        io.clock().delay(OPERAND_GAP);
    }
    Ok(())
}

fn pulse(mode: RevealMode, io: &mut dyn PeripheralBridge) -> Result<(), BridgeError> {
    match mode {
        RevealMode::Blink => {
            io.light().set(Rgb::BLUE)?;
            io.clock().delay(UNIT_ON);
            io.light().set(Rgb::OFF)?;
        }
        RevealMode::Tone => {
            io.tone().play_tone(REVEAL_TONE_HZ, UNIT_ON.as_millis() as u32)?;
            io.clock().delay(UNIT_ON);
            io.tone().stop()?;
        }
        RevealMode::Text => return Ok(()),
    }
    io.clock().delay(UNIT_OFF);
    Ok(())
}

/// total time `reveal` blocks for
pub fn reveal_duration(problem: &Problem, mode: RevealMode) -> Duration {
    if mode == RevealMode::Text {
        return Duration::ZERO;
    }
    let units = problem.operand1() + problem.operand2();
    CAPTION_HOLD + (UNIT_ON + UNIT_OFF) * units + OPERAND_GAP * 2
}
