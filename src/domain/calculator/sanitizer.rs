//! Reduces freeform chat text to the calculator's alphabet

use std::fmt;

/// Characters passed through untouched.
pub const ALLOWED: &str = "0123456789.+-*/%()";

/// Recognised words (matched case-insensitively as whole letter runs) and
/// their canonical spelling.
const WORDS: &[(&str, &str)] = &[
    ("pi", "pi"),
    ("π", "pi"),
    ("e", "e"),
    ("sin", "sin"),
    ("cos", "cos"),
    ("tan", "tan"),
];

/// Single-character convenience operators.
const SYMBOLS: &[(char, &str)] = &[
    ('^', "**"),
    ('×', "*"),
    ('÷', "/"),
];

/// An expression that has been through [`sanitize`].
///
/// Only contains characters from [`ALLOWED`] and the canonical words. It
/// may still be empty, unbalanced or otherwise meaningless.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SanitizedExpression(String);

impl SanitizedExpression {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `c` may appear in a sanitized expression.
    pub fn is_canonical_char(c: char) -> bool {
        ALLOWED.contains(c) || WORDS.iter().any(|(_, canonical)| canonical.contains(c))
    }
}

impl fmt::Display for SanitizedExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SanitizedExpression {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Strip `raw` down to the calculator alphabet.
///
/// Letter runs that are not a known word are dropped as a whole, as is
/// every other character outside the alphabet, whitespace included. This
/// never fails.
pub fn sanitize(raw: &str) -> SanitizedExpression {
    let mut out = String::with_capacity(raw.len());
    let mut dropped = String::new();
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        if c.is_alphabetic() {
            let mut word = String::from(c);
            while let Some(&next) = chars.peek() {
                if !next.is_alphabetic() {
                    break;
                }
                word.push(next);
                chars.next();
            }
            let lowered = word.to_lowercase();
            match WORDS.iter().find(|(spelling, _)| *spelling == lowered) {
                Some((_, canonical)) => out.push_str(canonical),
                None => dropped.push_str(&word),
            }
        } else if let Some((_, canonical)) = SYMBOLS.iter().find(|(symbol, _)| *symbol == c) {
            out.push_str(canonical);
        } else if ALLOWED.contains(c) {
            out.push(c);
        } else if !c.is_whitespace() {
            dropped.push(c);
        }
    }

    if !dropped.is_empty() {
        tracing::debug!(dropped = %dropped, "Dropped characters from calculator input");
    }
    tracing::info!("Calculated {}", out);

    SanitizedExpression(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_caret_becomes_power() {
        assert_eq!(sanitize("2^10").as_str(), "2**10");
    }

    #[test]
    fn test_words_are_canonicalised() {
        assert_eq!(sanitize("2*PI").as_str(), "2*pi");
        assert_eq!(sanitize("2 × π").as_str(), "2*pi");
        assert_eq!(sanitize("Sin(pi / 2) + e").as_str(), "sin(pi/2)+e");
    }

    #[test]
    fn test_unknown_words_and_symbols_are_dropped() {
        assert_eq!(sanitize("what is 5 + 3?").as_str(), "5+3");
        assert_eq!(sanitize("sqrt(4)").as_str(), "(4)");
        assert_eq!(sanitize("__import__('os')").as_str(), "()");
        assert_eq!(sanitize("1,000 / 2").as_str(), "1000/2");
    }

    #[test]
    fn test_empty_input() {
        assert!(sanitize("").is_empty());
        assert!(sanitize("hello there").is_empty());
    }

    #[test]
    fn test_sanitize_is_deterministic() {
        for input in ["2+2", "sin(π)^2 × 3", "🙂 5 / 0 🙂", "pie", "tan tan tan"] {
            assert_eq!(sanitize(input), sanitize(input));
        }
    }

    #[test]
    fn test_output_stays_in_alphabet() {
        let pool: Vec<char> = "0123456789.+-*/%()^×÷ πeEsincostanpiPIxyz!@#$&_=[]{};:'\",<>?\\|`~\t\n日本語🙂"
            .chars()
            .collect();
        let mut rng = rand::thread_rng();
        for _ in 0..500 {
            let len = rng.gen_range(0..40);
            let input: String = (0..len).map(|_| pool[rng.gen_range(0..pool.len())]).collect();
            let sanitized = sanitize(&input);
            assert!(
                sanitized.as_str().chars().all(SanitizedExpression::is_canonical_char),
                "{:?} produced {:?}",
                input,
                sanitized
            );
        }
    }
}
