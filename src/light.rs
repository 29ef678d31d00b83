use crate::error::BridgeError;

/// colour of the RGB LED, each channel a PWM duty cycle 0-255
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const OFF: Rgb = Rgb(0, 0, 0);
    pub const BLUE: Rgb = Rgb(0, 0, 255);

    pub fn green(level: u8) -> Self {
        Rgb(0, level, 0)
    }

    pub fn red(level: u8) -> Self {
        Rgb(level, 0, 0)
    }

    pub fn is_off(&self) -> bool {
        *self == Rgb::OFF
    }
}

/// the RGB LED
pub trait LightIndicator {
    fn set_color(&mut self, r: u8, g: u8, b: u8) -> Result<(), BridgeError>;

    fn set(&mut self, colour: Rgb) -> Result<(), BridgeError> {
        self.set_color(colour.0, colour.1, colour.2)
    }
}

/// records every colour written, for testing
#[derive(Clone, Debug, Default)]
pub struct DummyLight {
    history: Vec<Rgb>,
}

impl DummyLight {
    pub fn new() -> Self {
        DummyLight::default()
    }

    pub fn current(&self) -> Rgb {
        self.history.last().copied().unwrap_or_default()
    }

    pub fn history(&self) -> &[Rgb] {
        &self.history
    }

    /// how many times the LED went from dark to `colour`
    pub fn flashes_of(&self, colour: Rgb) -> usize {
        let mut prev = Rgb::OFF;
        let mut count = 0;
        for c in &self.history {
            if *c == colour && prev != colour {
                count += 1;
            }
            prev = *c;
        }
        count
    }
}

impl LightIndicator for DummyLight {
    fn set_color(&mut self, r: u8, g: u8, b: u8) -> Result<(), BridgeError> {
        self.history.push(Rgb(r, g, b));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_starts_off() {
        assert!(DummyLight::new().current().is_off());
    }

    #[test]
    fn test_flash_counting() -> Result<(), BridgeError> {
        let mut l = DummyLight::new();
        for _ in 0..3 {
            l.set(Rgb::BLUE)?;
            l.set(Rgb::OFF)?;
        }
        l.set(Rgb::green(10))?;
        assert_eq!(l.flashes_of(Rgb::BLUE), 3);
        assert_eq!(l.current(), Rgb(0, 10, 0));
        Ok(())
    }
}
