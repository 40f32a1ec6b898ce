//! Compiled character classes for terminal matching.
//!
//! A character class is written in a small surface syntax: single characters,
//! `a-z` ranges, implicit concatenation and an optional leading `^` for
//! negation. The class is compiled once into an ordered list of disjoint code
//! point intervals so that matching a single code point is a binary search.

#[cfg(test)]
mod __tests__;

use std::fmt::{Debug, Display, Formatter};

const MAX_CODE_POINT: u32 = 0x10FFFF;

#[derive(Clone, PartialEq, Eq, Hash)]
/// A compiled character class matching exactly one code point.
pub struct CharSet {
    pattern: Box<str>,
    ranges: Vec<(u32, u32)>,
    negated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// A plain set of code point intervals.
///
/// Used for FIRST set computation where classes, literal heads and
/// transitive non-terminal firsts are unioned together.
pub(crate) struct CodePointSet {
    ranges: Vec<(u32, u32)>,
}

fn normalize(mut ranges: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    ranges.sort_unstable();
    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(ranges.len());
    for (lo, hi) in ranges {
        match merged.last_mut() {
            Some((_, last_hi)) if lo <= last_hi.saturating_add(1) => {
                if hi > *last_hi {
                    *last_hi = hi;
                }
            }
            _ => merged.push((lo, hi)),
        }
    }
    merged
}

fn range_contains(ranges: &[(u32, u32)], point: u32) -> bool {
    let index = ranges.partition_point(|(lo, _)| *lo <= point);
    index > 0 && ranges[index - 1].1 >= point
}

fn complement(ranges: &[(u32, u32)]) -> Vec<(u32, u32)> {
    let mut out = Vec::with_capacity(ranges.len() + 1);
    let mut next = 0u32;
    for (lo, hi) in ranges {
        if *lo > next {
            out.push((next, lo - 1));
        }
        next = hi + 1;
        if next > MAX_CODE_POINT {
            return out;
        }
    }
    out.push((next, MAX_CODE_POINT));
    out
}

impl CharSet {
    /// Compile a character class from its surface syntax.
    ///
    /// Accepted escapes are `\\`, `\n`, `\t`, `\r`, `\-` and `\]`. A `-` at
    /// the start or the end of the pattern is a literal dash. Shorthand
    /// classes like `\d` are not part of the syntax.
    pub fn parse(pattern: &str) -> Result<Self, String> {
        let mut chars = pattern.chars().peekable();
        let mut negated = false;
        if let Some('^') = chars.peek() {
            chars.next();
            negated = true;
        }

        // Members are (code point, was-escaped); a dash acts as a range
        // operator only when it was written unescaped.
        let mut items: Vec<(char, bool)> = Vec::new();
        while let Some(c) = chars.next() {
            if c == '\\' {
                let escaped = match chars.next() {
                    Some('\\') => '\\',
                    Some('n') => '\n',
                    Some('t') => '\t',
                    Some('r') => '\r',
                    Some('-') => '-',
                    Some(']') => ']',
                    Some(other) => {
                        return Err(format!(
                            "Unknown escape '\\{}' in character class [{}].",
                            other, pattern
                        ))
                    }
                    None => {
                        return Err(format!(
                            "Dangling escape at the end of character class [{}].",
                            pattern
                        ))
                    }
                };
                items.push((escaped, true));
            } else {
                items.push((c, false));
            }
        }

        if items.is_empty() {
            return Err(format!(
                "Character class [{}] does not contain any member.",
                pattern
            ));
        }

        let mut ranges: Vec<(u32, u32)> = Vec::new();
        let mut index = 0;
        while index < items.len() {
            let (lo, _) = items[index];
            if index + 2 < items.len() && items[index + 1] == ('-', false) {
                let (hi, _) = items[index + 2];
                if (lo as u32) > (hi as u32) {
                    return Err(format!(
                        "Range {}-{} in character class [{}] is out of order.",
                        lo, hi, pattern
                    ));
                }
                ranges.push((lo as u32, hi as u32));
                index += 3;
            } else {
                ranges.push((lo as u32, lo as u32));
                index += 1;
            }
        }

        Ok(Self {
            pattern: pattern.into(),
            ranges: normalize(ranges),
            negated,
        })
    }

    /// Whether the class matches the given code point.
    pub fn contains(&self, c: char) -> bool {
        range_contains(&self.ranges, c as u32) != self.negated
    }

    /// The disjoint intervals this class accepts, with negation applied.
    pub(crate) fn intervals(&self) -> Vec<(u32, u32)> {
        if self.negated {
            complement(&self.ranges)
        } else {
            self.ranges.clone()
        }
    }

    /// The surface pattern this class was compiled from.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Display for CharSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.pattern)
    }
}
impl Debug for CharSet {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharSet")
            .field("pattern", &self.pattern)
            .field("ranges", &self.ranges)
            .field("negated", &self.negated)
            .finish()
    }
}

impl CodePointSet {
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    pub fn insert_char(&mut self, c: char) {
        self.ranges.push((c as u32, c as u32));
        self.ranges = normalize(std::mem::take(&mut self.ranges));
    }

    pub fn insert_class(&mut self, class: &CharSet) {
        self.ranges.extend(class.intervals());
        self.ranges = normalize(std::mem::take(&mut self.ranges));
    }

    pub fn extend(&mut self, other: &CodePointSet) {
        self.ranges.extend(other.ranges.iter().copied());
        self.ranges = normalize(std::mem::take(&mut self.ranges));
    }

    pub fn contains(&self, c: char) -> bool {
        range_contains(&self.ranges, c as u32)
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
