/// most digits the answer field on the LCD can hold
pub const MAX_INPUT_DIGITS: usize = 5;

/// Digits typed so far for the current answer. Overflow and deleting from
/// an empty buffer are silently ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputBuffer {
    digits: Vec<u8>,
    max_len: usize,
}

impl Default for InputBuffer {
    fn default() -> Self {
        InputBuffer::new(MAX_INPUT_DIGITS)
    }
}

impl InputBuffer {
    pub fn new(max_len: usize) -> Self {
        InputBuffer {
            digits: Vec::with_capacity(max_len),
            max_len,
        }
    }

    /// append a digit (0-9); returns whether it was taken
    pub fn push(&mut self, digit: u8) -> bool {
        if digit > 9 || self.digits.len() >= self.max_len {
            return false;
        }
        self.digits.push(digit);
        true
    }

    /// drop the last digit, if any
    pub fn pop_last(&mut self) -> Option<u8> {
        self.digits.pop()
    }

    pub fn clear(&mut self) {
        self.digits.clear();
    }

    pub fn len(&self) -> usize {
        self.digits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.digits.is_empty()
    }

    pub fn digits(&self) -> &[u8] {
        &self.digits
    }

    /// the typed number, `None` when nothing has been typed
    pub fn value(&self) -> Option<u32> {
        if self.digits.is_empty() {
            return None;
        }
        Some(
            self.digits
                .iter()
                .fold(0u32, |acc, d| acc.saturating_mul(10).saturating_add(u32::from(*d))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_value_is_none() {
        let b = InputBuffer::default();
        assert_eq!(b.value(), None);
        assert!(b.is_empty());
    }

    #[test]
    fn test_push_and_value() {
        let mut b = InputBuffer::default();
        for d in [0, 4, 2] {
            assert!(b.push(d));
        }
        assert_eq!(b.value(), Some(42));
        assert_eq!(b.digits(), &[0, 4, 2]);
    }

    #[test]
    fn test_push_beyond_max_is_noop() {
        let mut b = InputBuffer::new(3);
        assert!(b.push(1));
        assert!(b.push(2));
        assert!(b.push(3));
        assert!(!b.push(4));
        assert_eq!(b.len(), 3);
        assert_eq!(b.value(), Some(123));
    }

    #[test]
    fn test_push_rejects_non_digit() {
        let mut b = InputBuffer::default();
        assert!(!b.push(10));
        assert!(b.is_empty());
    }

    #[test]
    fn test_pop_last() {
        let mut b = InputBuffer::default();
        b.push(5);
        b.push(6);
        assert_eq!(b.pop_last(), Some(6));
        assert_eq!(b.value(), Some(5));
    }

    #[test]
    fn test_pop_on_empty_is_noop() {
        let mut b = InputBuffer::default();
        assert_eq!(b.pop_last(), None);
        assert_eq!(b.value(), None);
    }

    #[test]
    fn test_clear() {
        let mut b = InputBuffer::default();
        b.push(9);
        b.clear();
        assert_eq!(b.value(), None);
        assert!(b.push(1));
    }
}
