//! Display-name collation
//!
//! Names are compared level by level, like a root-locale collator:
//! base characters first (accents and case ignored), then accents, then
//! case with lowercase first. Punctuation sorts before digits, digits
//! before letters.

use std::cmp::Ordering;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// ASCII punctuation and symbols in root collation order.
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

/// Primary weight groups, lowest first.
const WHITESPACE: u8 = 0;
const PUNCTUATION: u8 = 1;
const SYMBOL: u8 = 2;
const DIGIT: u8 = 3;
const LETTER: u8 = 4;

/// Base weight for a combining mark position.
const NO_ACCENT: u32 = 0;

#[derive(Debug, PartialEq, Eq)]
struct CollationKey {
    primary: Vec<(u8, u32)>,
    secondary: Vec<u32>,
    tertiary: Vec<bool>,
}

impl CollationKey {
    fn new(name: &str) -> Self {
        let mut key = CollationKey {
            primary: Vec::new(),
            secondary: Vec::new(),
            tertiary: Vec::new(),
        };

        for c in name.nfd() {
            if is_combining_mark(c) {
                key.secondary.push(u32::from(c));
                continue;
            }
            key.primary.push(primary_weight(c));
            key.secondary.push(NO_ACCENT);
            key.tertiary.push(c.is_uppercase());
        }
        key
    }
}

fn primary_weight(c: char) -> (u8, u32) {
    if c.is_whitespace() {
        return (WHITESPACE, 0);
    }
    if let Some(position) = PUNCTUATION_ORDER.find(c) {
        return (PUNCTUATION, position as u32);
    }
    if let Some(digit) = c.to_digit(10) {
        return (DIGIT, digit);
    }
    if c.is_alphanumeric() {
        let folded = c.to_lowercase().next().unwrap_or(c);
        return (LETTER, u32::from(folded));
    }
    (SYMBOL, u32::from(c))
}

/// Display-name ordering used for the project list and every level.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    if a == b {
        return Ordering::Equal;
    }
    let (ka, kb) = (CollationKey::new(a), CollationKey::new(b));
    ka.primary
        .cmp(&kb.primary)
        .then_with(|| ka.secondary.cmp(&kb.secondary))
        .then_with(|| ka.tertiary.cmp(&kb.tertiary))
        .then_with(|| a.cmp(b))
}
