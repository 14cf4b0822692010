//! Shortest-first generator for compact class identifiers.

/// Base-26 odometer over the digits `a`..`z`.
///
/// Values come out ordered first by length, then lexicographically:
/// `a, b, .., z, aa, ab, ..`. There is no "zero" digit, so once every digit
/// overflows past `z` a new `a` digit is prepended. The sequence is infinite;
/// a fresh instance is created per renaming pass and state is never shared.
#[derive(Debug, Default)]
pub struct CompactNameGenerator {
    digits: Vec<u8>,
}

impl CompactNameGenerator {
    /// Generator positioned before the first value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the odometer and return the next identifier.
    pub fn next_name(&mut self) -> String {
        let mut position = self.digits.len();
        while position > 0 {
            position -= 1;
            if self.digits[position] < 25 {
                self.digits[position] += 1;
                return self.render();
            }
            self.digits[position] = 0;
        }

        // Every digit carried over (or the sequence just started).
        self.digits.insert(0, 0);
        self.render()
    }

    fn render(&self) -> String {
        self.digits.iter().map(|digit| (b'a' + digit) as char).collect()
    }
}

impl Iterator for CompactNameGenerator {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        Some(self.next_name())
    }
}

#[cfg(test)]
mod tests {
    use super::CompactNameGenerator;

    #[test]
    fn first_twenty_eight_values_roll_over_into_two_letters() {
        let generator = CompactNameGenerator::new();
        let names: Vec<String> = generator.take(28).collect();

        assert_eq!(names[0], "a");
        assert_eq!(names[1], "b");
        assert_eq!(names[25], "z");
        assert_eq!(names[26], "aa");
        assert_eq!(names[27], "ab");
    }

    #[test]
    fn carries_through_longer_sequences() {
        let mut generator = CompactNameGenerator::new();
        let values: Vec<String> = generator.by_ref().take(26 + 26 * 26).collect();

        assert_eq!(values[26 + 25], "az");
        assert_eq!(values[26 + 26], "ba");
        assert_eq!(values.last().map(String::as_str), Some("zz"));
        assert_eq!(generator.next_name(), "aaa");
    }

    #[test]
    fn instances_do_not_interact() {
        let mut first = CompactNameGenerator::new();
        let mut second = CompactNameGenerator::new();
        first.next_name();
        first.next_name();
        assert_eq!(second.next_name(), "a");
    }
}
