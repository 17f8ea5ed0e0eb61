// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The closed set of frame variants. The variant decides a frame's
//! tag, how its value is formatted, and whether it can be evaluated.

use crate::number::fmt_radix;
use crate::value::Value;
use kstring::KString;
use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Kind {
    /// Plain frame without any further behaviour
    Frame,
    Symbol,
    String,
    Number,
    Integer,
    Hex,
    Bin,
    List,
    /// Operator, e.g. the quote marker
    Op,
    /// Wrapper around a native function
    Fn,
    Env,
    Error,
    /// Any other tag (io, file, web, ..); behaves like `Frame`.
    Custom(CustomTag),
}

/// A lower-cased tag that is not one of the built-in ones.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CustomTag(KString);

impl CustomTag {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Plain,
    /// Evaluates to itself
    Primitive,
    Container,
    /// Executable data
    Active,
    Environment,
    Error,
}

impl Kind {
    /// Lower-cased variant name.
    pub fn tag(&self) -> &str {
        match self {
            Kind::Frame => "frame",
            Kind::Symbol => "symbol",
            Kind::String => "string",
            Kind::Number => "number",
            Kind::Integer => "integer",
            Kind::Hex => "hex",
            Kind::Bin => "bin",
            Kind::List => "list",
            Kind::Op => "op",
            Kind::Fn => "fn",
            Kind::Env => "env",
            Kind::Error => "error",
            Kind::Custom(t) => t.as_str(),
        }
    }

    /// The inverse of `tag`; unknown tags (lower-cased) become
    /// `Custom`.
    pub fn from_tag(tag: &str) -> Kind {
        match tag {
            "frame" => Kind::Frame,
            "symbol" => Kind::Symbol,
            "string" => Kind::String,
            "number" => Kind::Number,
            "integer" => Kind::Integer,
            "hex" => Kind::Hex,
            "bin" => Kind::Bin,
            "list" => Kind::List,
            "op" => Kind::Op,
            "fn" => Kind::Fn,
            "env" => Kind::Env,
            "error" => Kind::Error,
            _ => {
                let lower = tag.to_lowercase();
                if lower == tag {
                    Kind::Custom(CustomTag(KString::from_ref(tag)))
                } else {
                    Kind::from_tag(&lower)
                }
            }
        }
    }

    pub fn family(&self) -> Family {
        match self {
            Kind::Frame | Kind::Custom(_) => Family::Plain,
            Kind::Symbol | Kind::String | Kind::Number
                | Kind::Integer | Kind::Hex | Kind::Bin => Family::Primitive,
            Kind::List => Family::Container,
            Kind::Op | Kind::Fn => Family::Active,
            Kind::Env => Family::Environment,
            Kind::Error => Family::Error,
        }
    }

    /// The variant this one specializes, if any (Hex and Bin are
    /// integers, which are numbers).
    pub fn parent(&self) -> Option<Kind> {
        match self {
            Kind::Integer => Some(Kind::Number),
            Kind::Hex | Kind::Bin => Some(Kind::Integer),
            _ => None,
        }
    }

    /// Whether `self` is `other` or one of its specializations.
    pub fn is_a(&self, other: &Kind) -> bool {
        let mut k = Some(self.clone());
        while let Some(kind) = k {
            if &kind == other {
                return true
            }
            k = kind.parent();
        }
        false
    }

    /// Format `value` the way this variant shows it in dumps.
    pub fn fmt_value(&self, value: &Value, f: &mut std::fmt::Formatter<'_>)
                     -> Result<(), std::fmt::Error> {
        let radix = match self {
            Kind::Hex => 16,
            Kind::Bin => 2,
            _ => return Display::fmt(value, f),
        };
        if let Some(n) = value.as_integer() {
            fmt_radix(n, radix, f)
        } else {
            Display::fmt(value, f)
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_round_trip() {
        for k in [Kind::Frame, Kind::Symbol, Kind::String, Kind::Number,
                  Kind::Integer, Kind::Hex, Kind::Bin, Kind::List, Kind::Op,
                  Kind::Fn, Kind::Env, Kind::Error] {
            assert_eq!(Kind::from_tag(k.tag()), k);
        }
        assert_eq!(Kind::from_tag("Web"), Kind::from_tag("web"));
        assert_eq!(Kind::from_tag("Symbol"), Kind::Symbol);
    }

    #[test]
    fn custom_tags_are_lower_case() {
        let k = Kind::from_tag("WebServer");
        assert!(matches!(&k, Kind::Custom(t) if t.as_str() == "webserver"));
        assert_eq!(k.tag(), "webserver");
        assert_eq!(k.to_string(), "webserver");
    }

    #[test]
    fn hierarchy() {
        assert!(Kind::Hex.is_a(&Kind::Number));
        assert!(Kind::Bin.is_a(&Kind::Integer));
        assert!(!Kind::Number.is_a(&Kind::Integer));
        assert!(!Kind::Symbol.is_a(&Kind::Number));
        assert_eq!(Kind::Hex.family(), Family::Primitive);
        assert_eq!(Kind::Fn.family(), Family::Active);
        assert_eq!(Kind::from_tag("web").family(), Family::Plain);
    }
}
