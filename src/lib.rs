//! # SpeedMath
//!
//! Timed mental-arithmetic quiz for a small board with an IR presence
//! sensor, a 4x4 keypad, a 16x2 LCD, an RGB LED, a speaker, a brightness
//! knob and a little EEPROM.
//!
//! ## Design
//!
//! * one thread, polled: nothing blocks the loop except the counted reveal
//!   of the Medium/Hard tiers, which is bounded
//! * abstract every peripheral behind a trait so the game doesn't need to
//!   know how the display, LED or speaker work; starting with a TUI
//!   in-console host
//! * all timing from a monotonic clock, so a countdown fires exactly once
//!   however irregularly it is polled
//! * one state enum instead of a handful of flags
//!
//! Model
//!
//! Host
//!  |-- bridge: presence, keypad, knob, display, light, tone, clock
//!  |-- machine(counter, rng)
//!  |    |-- session: tier, questions left, problem, typed digits, score
//!  |    |-- countdown (question timer) and hold (timed screens)
//!  |    |-- score store (counter)
//!  |    `-- problem generator (rng)
//!  `-- poll loop
//!       |-- presence = bridge.presence().is_triggered()
//!       |-- key = bridge.keypad().poll_key()
//!       |-- machine.tick(bridge)
//!       |-- machine.on_presence(bridge) / machine.on_key(key, bridge)
//!       `-- sleep(period)
pub mod bridge;
pub mod buffer;
pub mod clock;
pub mod countdown;
pub mod display;
pub mod error;
pub mod input;
pub mod light;
pub mod machine;
pub mod poll;
pub mod problem;
pub mod reveal;
pub mod sound;
pub mod storage;
pub mod tier;
