//! Value-range expressions for argument validation.
//!
//! A range expression is a comma separated list of items:
//!
//! | Item      | Meaning                        |
//! |-----------|--------------------------------|
//! | `v`       | exactly `v`                    |
//! | `lo:hi`   | `lo <= x <= hi`                |
//! | `lo:`     | `x >= lo`                      |
//! | `:hi`     | `x <= hi`                      |
//! | `!v`      | never `v`                      |
//!
//! A value is valid when no exclusion names it and, if the expression has any
//! other item, at least one of them accepts it. `"1:10,20,!5"` accepts 1, 10
//! and 20 and rejects 5 and 11.
//!
//! [`is_compliant_validation_expression`] is the structural check run at
//! load time; [`ValidExpr::parse`] runs only on compliant text.

use std::fmt;

/// Structural check of a range expression.
///
/// One left-to-right scan; rejects a leading `.`, a second `:` inside one
/// item, `:.`, a sign not followed by a digit, a digit followed by `-`, two
/// decimal points or two exponent markers in one number, a `!` not followed
/// by a sign or digit, and any character outside the grammar.
pub fn is_compliant_validation_expression(text: &str) -> bool {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return false;
    }

    let next = |i: usize| bytes.get(i + 1).copied().unwrap_or(0);

    let mut error = bytes[0] == b'.';
    let mut in_range = false;
    let mut has_dot = false;
    let mut has_exponent = false;

    for (i, &c) in bytes.iter().enumerate() {
        match c {
            b'0'..=b'9' => error |= next(i) == b'-',
            b':' => {
                error |= in_range || next(i) == b'.';
                in_range = true;
                has_dot = false;
                has_exponent = false;
            }
            b'-' | b'+' => error |= !next(i).is_ascii_digit(),
            b',' => {
                in_range = false;
                error |= next(i) == b'.';
                has_dot = false;
                has_exponent = false;
            }
            b'.' => {
                error |= has_dot || !next(i).is_ascii_digit();
                has_dot = true;
            }
            b'e' | b'E' => {
                error |= has_exponent;
                has_exponent = true;
            }
            b'!' => {
                let n = next(i);
                error |= !(n == b'-' || n == b'+' || n.is_ascii_digit());
            }
            _ => return false,
        }
    }
    !error
}

/// A numeric literal of a range expression.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeNumber {
    text: String,
    value: f64,
    int: Option<i64>,
}

impl RangeNumber {
    fn parse(text: &str) -> Option<Self> {
        let value: f64 = text.parse().ok()?;
        let int = text.parse::<i64>().ok().or_else(|| {
            (value.fract() == 0.0 && value.abs() < i64::MAX as f64).then_some(value as i64)
        });
        Some(Self {
            text: text.to_string(),
            value,
            int,
        })
    }

    pub fn as_f64(&self) -> f64 {
        self.value
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.int
    }

    /// Whether the literal is spelled as a floating point number.
    pub fn is_float(&self) -> bool {
        self.text.contains(['.', 'e', 'E'])
    }

    fn eq_int(&self, v: i64) -> bool {
        self.int == Some(v)
    }

    fn le_int(&self, v: i64) -> bool {
        match self.int {
            Some(n) => n <= v,
            None => self.value <= v as f64,
        }
    }

    fn ge_int(&self, v: i64) -> bool {
        match self.int {
            Some(n) => n >= v,
            None => self.value >= v as f64,
        }
    }
}

impl fmt::Display for RangeNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One comma separated item of a range expression.
#[derive(Clone, Debug, PartialEq)]
pub enum RangeItem {
    Exact(RangeNumber),
    Bounded(RangeNumber, RangeNumber),
    AtLeast(RangeNumber),
    AtMost(RangeNumber),
    Exclude(RangeNumber),
}

/// A parsed range expression.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidExpr {
    source: String,
    items: Vec<RangeItem>,
}

impl ValidExpr {
    /// Parse a compliant expression. Returns `None` for anything
    /// [`is_compliant_validation_expression`] rejects.
    pub fn parse(text: &str) -> Option<Self> {
        if !is_compliant_validation_expression(text) {
            return None;
        }
        let mut items = Vec::new();
        for item in text.split(',').filter(|item| !item.is_empty()) {
            items.push(parse_item(item)?);
        }
        Some(Self {
            source: text.to_string(),
            items,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn items(&self) -> &[RangeItem] {
        &self.items
    }

    /// Whether any literal is spelled as a float, which routes integer
    /// checks through the float matcher.
    pub fn has_float(&self) -> bool {
        self.source.contains('.')
    }

    pub fn is_int_valid(&self, value: i64) -> bool {
        if self.has_float() {
            return self.is_float_valid(value as f64);
        }
        self.check(|item| match item {
            RangeItem::Exact(n) => n.eq_int(value),
            RangeItem::Bounded(lo, hi) => lo.le_int(value) && hi.ge_int(value),
            RangeItem::AtLeast(lo) => lo.le_int(value),
            RangeItem::AtMost(hi) => hi.ge_int(value),
            RangeItem::Exclude(n) => n.eq_int(value),
        })
    }

    /// Exact and excluded values only count when spelled as floats.
    pub fn is_float_valid(&self, value: f64) -> bool {
        self.check(|item| match item {
            RangeItem::Exact(n) | RangeItem::Exclude(n) => n.is_float() && n.as_f64() == value,
            RangeItem::Bounded(lo, hi) => lo.as_f64() <= value && value <= hi.as_f64(),
            RangeItem::AtLeast(lo) => lo.as_f64() <= value,
            RangeItem::AtMost(hi) => value <= hi.as_f64(),
        })
    }

    /// `accepts` reports whether an item names the value; exclusions veto.
    fn check(&self, accepts: impl Fn(&RangeItem) -> bool) -> bool {
        let mut has_positive = false;
        let mut matched = false;
        for item in &self.items {
            if matches!(item, RangeItem::Exclude(_)) {
                if accepts(item) {
                    return false;
                }
            } else {
                has_positive = true;
                matched |= accepts(item);
            }
        }
        matched || !has_positive
    }
}

impl fmt::Display for ValidExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_item(item: &str) -> Option<RangeItem> {
    if let Some(excluded) = item.strip_prefix('!') {
        return RangeNumber::parse(excluded).map(RangeItem::Exclude);
    }
    match item.split_once(':') {
        None => RangeNumber::parse(item).map(RangeItem::Exact),
        Some(("", "")) => None,
        Some(("", hi)) => RangeNumber::parse(hi).map(RangeItem::AtMost),
        Some((lo, "")) => RangeNumber::parse(lo).map(RangeItem::AtLeast),
        Some((lo, hi)) => Some(RangeItem::Bounded(
            RangeNumber::parse(lo)?,
            RangeNumber::parse(hi)?,
        )),
    }
}
