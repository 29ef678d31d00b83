use crate::error::BridgeError;
use crate::light::{LightIndicator, Rgb};
use std::io;
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::text::{Span, Spans};
use tui::widgets::{Block, Borders, Paragraph};
use tui::Terminal;

/// character LCD geometry
pub const LCD_COLS: usize = 16;
pub const LCD_ROWS: usize = 2;

/// Display is used by the game to put characters on the LCD. Positions are
/// columns on the top row, where the answer being typed lives; the game
/// never needs to know how the characters are rendered.
pub trait Display {
    /// replace the whole screen; a '\n' moves to the next row
    fn show_text(&mut self, text: &str) -> Result<(), BridgeError>;

    /// write `text` starting at (col, row), leaving everything else alone
    fn show_text_at(&mut self, col: usize, row: usize, text: &str) -> Result<(), BridgeError>;

    fn show_digit_at(&mut self, position: usize, digit: u8) -> Result<(), BridgeError>;

    fn clear_display_field(&mut self, position: usize) -> Result<(), BridgeError>;

    fn set_backlight(&mut self, on: bool) -> Result<(), BridgeError>;

    fn clear(&mut self) -> Result<(), BridgeError> {
        self.show_text("")
    }
}

/// character cells of a 16x2 LCD; writes past the edge are dropped
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LcdBuffer {
    cells: [[char; LCD_COLS]; LCD_ROWS],
    backlight: bool,
}

impl Default for LcdBuffer {
    fn default() -> Self {
        LcdBuffer {
            cells: [[' '; LCD_COLS]; LCD_ROWS],
            backlight: false,
        }
    }
}

impl LcdBuffer {
    pub fn new() -> Self {
        LcdBuffer::default()
    }

    pub fn clear(&mut self) {
        self.cells = [[' '; LCD_COLS]; LCD_ROWS];
    }

    pub fn put(&mut self, col: usize, row: usize, c: char) {
        if row < LCD_ROWS && col < LCD_COLS {
            self.cells[row][col] = c;
        }
    }

    pub fn write_at(&mut self, col: usize, row: usize, text: &str) {
        for (i, c) in text.chars().enumerate() {
            self.put(col + i, row, c);
        }
    }

    pub fn show_text(&mut self, text: &str) {
        self.clear();
        for (row, line) in text.split('\n').enumerate() {
            self.write_at(0, row, line);
        }
    }

    pub fn set_backlight(&mut self, on: bool) {
        self.backlight = on;
    }

    pub fn backlight(&self) -> bool {
        self.backlight
    }

    /// one row, exactly LCD_COLS characters wide
    pub fn row(&self, row: usize) -> String {
        self.cells
            .get(row)
            .map(|r| r.iter().collect())
            .unwrap_or_default()
    }

    /// both rows with trailing blanks removed, joined by '\n'
    pub fn text(&self) -> String {
        (0..LCD_ROWS)
            .map(|r| self.row(r).trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn digit_char(digit: u8) -> char {
    char::from_digit(u32::from(digit), 10).unwrap_or('?')
}

/// 16x2 LCD plus the RGB LED, rendered in a terminal with TUI and crossterm
pub struct TermPanel {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    lcd: LcdBuffer,
    led: Rgb,
}

impl TermPanel {
    pub fn new() -> Result<TermPanel, io::Error> {
        let backend = CrosstermBackend::new(io::stdout());
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        terminal.hide_cursor()?;
        let mut panel = TermPanel {
            terminal,
            lcd: LcdBuffer::new(),
            led: Rgb::OFF,
        };
        panel.render()?;
        Ok(panel)
    }

    fn render(&mut self) -> Result<(), io::Error> {
        let lcd = &self.lcd;
        let led = self.led;
        self.terminal.draw(|f| {
            let screen = f.size();
            let lcd_area = Rect::new(0, 0, 2 + LCD_COLS as u16, 2 + LCD_ROWS as u16);
            let led_area = Rect::new(lcd_area.width + 1, 0, 7, 3);
            let legend_area = Rect::new(0, lcd_area.height, 64, 2);

            let backlight = if lcd.backlight() {
                Color::Rgb(150, 200, 60)
            } else {
                Color::Rgb(40, 60, 20)
            };
            let rows: Vec<Spans> = (0..LCD_ROWS).map(|r| Spans::from(lcd.row(r))).collect();
            let lcd_widget = Paragraph::new(rows)
                .block(Block::default().title("SpeedMath").borders(Borders::ALL))
                .style(Style::default().fg(Color::Black).bg(backlight));
            f.render_widget(lcd_widget, lcd_area.intersection(screen));

            let led_widget = Paragraph::new(Spans::from(Span::styled(
                "  ●  ",
                Style::default().fg(Color::Rgb(led.0, led.1, led.2)),
            )))
            .block(Block::default().title("LED").borders(Borders::ALL));
            f.render_widget(led_widget, led_area.intersection(screen));

            let legend = Paragraph::new(vec![
                Spans::from("space: wave   0-9: digit   #/enter: submit   D/bksp: delete"),
                Spans::from("*: stop   [ ]: brightness knob   esc: quit"),
            ]);
            f.render_widget(legend, legend_area.intersection(screen));
        })?;
        Ok(())
    }
}

impl Drop for TermPanel {
    fn drop(&mut self) {
        let _ = self.terminal.show_cursor();
    }
}

impl Display for TermPanel {
    fn show_text(&mut self, text: &str) -> Result<(), BridgeError> {
        self.lcd.show_text(text);
        Ok(self.render()?)
    }

    fn show_text_at(&mut self, col: usize, row: usize, text: &str) -> Result<(), BridgeError> {
        self.lcd.write_at(col, row, text);
        Ok(self.render()?)
    }

    fn show_digit_at(&mut self, position: usize, digit: u8) -> Result<(), BridgeError> {
        self.lcd.put(position, 0, digit_char(digit));
        Ok(self.render()?)
    }

    fn clear_display_field(&mut self, position: usize) -> Result<(), BridgeError> {
        self.lcd.put(position, 0, ' ');
        Ok(self.render()?)
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), BridgeError> {
        self.lcd.set_backlight(on);
        Ok(self.render()?)
    }
}

impl LightIndicator for TermPanel {
    fn set_color(&mut self, r: u8, g: u8, b: u8) -> Result<(), BridgeError> {
        self.led = Rgb(r, g, b);
        Ok(self.render()?)
    }
}

/// useful for testing: keeps the LCD contents in memory, plus every screen
/// that was shown
#[derive(Clone, Debug, Default)]
pub struct DummyDisplay {
    lcd: LcdBuffer,
    history: Vec<String>,
}

impl DummyDisplay {
    pub fn new() -> Self {
        DummyDisplay::default()
    }

    pub fn lcd(&self) -> &LcdBuffer {
        &self.lcd
    }

    pub fn text(&self) -> String {
        self.lcd.text()
    }

    /// whether `needle` appeared on any screen so far
    pub fn has_shown(&self, needle: &str) -> bool {
        self.history.iter().any(|s| s.contains(needle))
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    fn snapshot(&mut self) {
        self.history.push(self.lcd.text());
    }
}

impl Display for DummyDisplay {
    fn show_text(&mut self, text: &str) -> Result<(), BridgeError> {
        self.lcd.show_text(text);
        self.snapshot();
        Ok(())
    }

    fn show_text_at(&mut self, col: usize, row: usize, text: &str) -> Result<(), BridgeError> {
        self.lcd.write_at(col, row, text);
        self.snapshot();
        Ok(())
    }

    fn show_digit_at(&mut self, position: usize, digit: u8) -> Result<(), BridgeError> {
        self.lcd.put(position, 0, digit_char(digit));
        self.snapshot();
        Ok(())
    }

    fn clear_display_field(&mut self, position: usize) -> Result<(), BridgeError> {
        self.lcd.put(position, 0, ' ');
        self.snapshot();
        Ok(())
    }

    fn set_backlight(&mut self, on: bool) -> Result<(), BridgeError> {
        self.lcd.set_backlight(on);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_text_two_rows() {
        let mut l = LcdBuffer::new();
        l.show_text("Difficulty \n  1-E 2-M 3-H");
        assert_eq!(l.row(0), "Difficulty      ");
        assert_eq!(l.text(), "Difficulty\n  1-E 2-M 3-H");
    }

    #[test]
    fn test_write_past_edge_is_dropped() {
        let mut l = LcdBuffer::new();
        l.write_at(14, 0, "abcd");
        l.put(0, 5, 'x');
        assert_eq!(l.row(0), "              ab");
        assert_eq!(l.row(5), "");
    }

    #[test]
    fn test_show_text_replaces_screen() {
        let mut l = LcdBuffer::new();
        l.write_at(0, 1, "00:00:20");
        l.show_text("Hello!");
        assert_eq!(l.text(), "Hello!\n");
    }

    #[test]
    fn test_dummy_digit_field() -> Result<(), BridgeError> {
        let mut d = DummyDisplay::new();
        d.show_text("7+5=")?;
        d.show_digit_at(4, 1)?;
        d.show_digit_at(5, 2)?;
        assert_eq!(d.text(), "7+5=12\n");
        d.clear_display_field(5)?;
        assert_eq!(d.text(), "7+5=1\n");
        assert!(d.has_shown("7+5=12"));
        Ok(())
    }

    #[test]
    fn test_dummy_backlight() -> Result<(), BridgeError> {
        let mut d = DummyDisplay::new();
        assert!(!d.lcd().backlight());
        d.set_backlight(true)?;
        assert!(d.lcd().backlight());
        Ok(())
    }

    #[test]
    fn test_digit_char() {
        assert_eq!(digit_char(0), '0');
        assert_eq!(digit_char(9), '9');
        assert_eq!(digit_char(12), '?');
    }
}
