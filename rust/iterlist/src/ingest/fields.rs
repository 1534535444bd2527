//! A field stream with one field of look-ahead.

use super::scan::Field;

/// Iterator over fields that supports peeking and conditional consumption.
pub(crate) struct FieldStream<I: Iterator<Item = Field>> {
    iter: I,
    /// A peeked field returned first by the next call to `next()`.
    next: Option<Field>,
}

impl<I: Iterator<Item = Field>> FieldStream<I> {
    pub fn new(iter: I) -> Self {
        FieldStream { iter, next: None }
    }

    pub fn peek(&mut self) -> Option<&Field> {
        if self.next.is_none() {
            self.next = self.iter.next();
        }
        self.next.as_ref()
    }

    /// Consumes the next field if it equals `expected`.
    pub fn eat(&mut self, expected: &Field) -> bool {
        if self.peek() == Some(expected) {
            self.next();
            true
        } else {
            false
        }
    }

    /// Consumes the next field if it is an integer.
    pub fn next_int(&mut self) -> Option<u64> {
        match self.peek() {
            Some(&Field::Int(value)) => {
                self.next();
                Some(value)
            }
            _ => None,
        }
    }
}

impl<I: Iterator<Item = Field>> Iterator for FieldStream<I> {
    type Item = Field;

    #[inline]
    fn next(&mut self) -> Option<Field> {
        if self.next.is_some() {
            self.next.take()
        } else {
            self.iter.next()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_eat() {
        let mut s = FieldStream::new(vec![Field::Int(1), Field::Dash, Field::Int(5)].into_iter());
        assert_eq!(s.peek(), Some(&Field::Int(1)));
        assert!(!s.eat(&Field::Dash));
        assert_eq!(s.next_int(), Some(1));
        assert_eq!(s.next_int(), None);
        assert!(s.eat(&Field::Dash));
        assert_eq!(s.peek(), Some(&Field::Int(5)));
        assert_eq!(s.next(), Some(Field::Int(5)));
        assert_eq!(s.next(), None);
    }
}
