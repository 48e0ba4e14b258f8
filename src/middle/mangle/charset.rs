//! Frequency-ordered alphabet for generated names
//!
//! Names are drawn from the characters that already occur most often in
//! the output, which helps a later gzip pass.

/// Characters a generated name may use, in base order
const CHARS: &str = "abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ$_0123456789";

/// Characters allowed first in an identifier
const LEADING: usize = 54;

/// Character counts over the text that survives mangling
#[derive(Debug, Clone)]
pub struct CharFrequency {
    counts: [u64; 64],
}

impl Default for CharFrequency {
    fn default() -> Self {
        Self::new()
    }
}

fn slot(c: char) -> Option<usize> {
    CHARS.find(c)
}

impl CharFrequency {
    pub fn new() -> Self {
        Self { counts: [0; 64] }
    }

    /// Count every alphabet character of `text`
    pub fn consider(
        &mut self,
        text: &str,
    ) {
        for c in text.chars() {
            if let Some(i) = slot(c) {
                self.counts[i] += 1;
            }
        }
    }

    pub fn count(
        &self,
        c: char,
    ) -> u64 {
        slot(c).map_or(0, |i| self.counts[i])
    }

    /// Alphabet sorted by descending frequency, digits last
    ///
    /// The sort is stable, so ties keep the base order.
    pub fn alphabet(&self) -> Alphabet {
        let mut chars: Vec<char> = CHARS.chars().collect();
        chars.sort_by(|a, b| {
            a.is_ascii_digit()
                .cmp(&b.is_ascii_digit())
                .then_with(|| self.count(*b).cmp(&self.count(*a)))
        });
        Alphabet { chars }
    }
}

/// A sorted alphabet; numbers map to names through [`Alphabet::base54`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Default for Alphabet {
    fn default() -> Self {
        CharFrequency::new().alphabet()
    }
}

impl Alphabet {
    /// Name number `n`: base 54 for the first character, base 64 after
    pub fn base54(
        &self,
        n: usize,
    ) -> String {
        let mut name = String::new();
        let mut num = n + 1;
        let mut base = LEADING;
        loop {
            num -= 1;
            name.push(self.chars[num % base]);
            num /= base;
            base = self.chars.len();
            if num == 0 {
                break;
            }
        }
        name
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alphabet() {
        let alphabet = Alphabet::default();
        assert_eq!(alphabet.base54(0), "a");
        assert_eq!(alphabet.base54(25), "z");
        assert_eq!(alphabet.base54(26), "A");
        assert_eq!(alphabet.base54(52), "$");
        assert_eq!(alphabet.base54(53), "_");
        assert_eq!(alphabet.base54(54), "aa");
        assert_eq!(alphabet.base54(55), "ba");
    }

    #[test]
    fn test_frequency_order() {
        let mut frequency = CharFrequency::new();
        frequency.consider("zzz yy x 999");
        let alphabet = frequency.alphabet();
        assert_eq!(&alphabet.chars()[..3], &['z', 'y', 'x']);
        assert_eq!(alphabet.chars()[3], 'a');
        // Digits never lead even when frequent
        assert_eq!(alphabet.chars()[54], '9');
        assert_eq!(alphabet.base54(0), "z");
    }

    #[test]
    fn test_names_are_distinct() {
        let alphabet = Alphabet::default();
        let names: std::collections::HashSet<String> = (0..5000).map(|n| alphabet.base54(n)).collect();
        assert_eq!(names.len(), 5000);
    }
}
