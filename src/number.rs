// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Numeric payloads of frames, and converting them from and to
//! text.

use num::{BigInt, Num};

#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Integer(BigInt),
    Float(f64),
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Number::Integer(n) => f.write_fmt(format_args!("{}", n)),
            // Debug always shows a '.' or an exponent, unlike Display
            Number::Float(x) => f.write_fmt(format_args!("{:?}", x)),
        }
    }
}

impl Number {
    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Number::Integer(n) => Some(n),
            Number::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number::Integer(_) => None,
            Number::Float(x) => Some(*x),
        }
    }
}

/// Parse digits in the given radix, with optional sign (a leading
/// '+' is accepted, too).
pub fn parse_integer(s: &str, radix: u32) -> Option<BigInt> {
    let s = s.strip_prefix('+').unwrap_or(s);
    BigInt::from_str_radix(s, radix).ok()
}

/// Parse a decimal floating point literal; "1." is accepted.
pub fn parse_float(s: &str) -> Option<f64> {
    if s.ends_with('.') {
        format!("{}0", s).parse().ok()
    } else {
        s.parse().ok()
    }
}

/// Write `n` with a "0x" or "0b" style prefix, in lower case (the
/// sign, if any, goes in front of the prefix).
pub fn fmt_radix(n: &BigInt, radix: u32, f: &mut std::fmt::Formatter<'_>)
                 -> Result<(), std::fmt::Error> {
    match radix {
        16 => f.write_fmt(format_args!("{:#x}", n)),
        2 => f.write_fmt(format_args!("{:#b}", n)),
        _ => f.write_fmt(format_args!("{}", n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers() {
        assert_eq!(parse_integer("+17", 10), Some(BigInt::from(17)));
        assert_eq!(parse_integer("-17", 10), Some(BigInt::from(-17)));
        assert_eq!(parse_integer("1A", 16), Some(BigInt::from(26)));
        assert_eq!(parse_integer("101", 2), Some(BigInt::from(5)));
        assert_eq!(parse_integer("", 10), None);
        assert_eq!(parse_integer("12345678901234567890123", 10).map(|n| n.to_string()),
                   Some("12345678901234567890123".to_string()));
    }

    #[test]
    fn floats() {
        assert_eq!(parse_float("3.14"), Some(3.14));
        assert_eq!(parse_float("-2."), Some(-2.0));
        assert_eq!(parse_float("1e3"), Some(1000.0));
        assert_eq!(parse_float("+1E-2"), Some(0.01));
        assert_eq!(Number::Float(1000.0).to_string(), "1000.0");
        assert_eq!(Number::Float(3.14).to_string(), "3.14");
    }

    struct Radix(BigInt, u32);

    impl std::fmt::Display for Radix {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
            fmt_radix(&self.0, self.1, f)
        }
    }

    #[test]
    fn radix_formatting() {
        assert_eq!(Radix(BigInt::from(26), 16).to_string(), "0x1a");
        assert_eq!(Radix(BigInt::from(-26), 16).to_string(), "-0x1a");
        assert_eq!(Radix(BigInt::from(5), 2).to_string(), "0b101");
        assert_eq!(Radix(BigInt::from(8), 8).to_string(), "8");
    }
}
