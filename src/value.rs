// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The scalar payload carried by every frame.

use crate::frame::{Arena, EvalError, FrameId};
use crate::number::Number;
use kstring::KString;
use num::BigInt;
use std::rc::Rc;

type NativeFnBody = dyn Fn(&mut Arena, FrameId) -> Result<FrameId, EvalError>;

/// A Rust closure callable from a `fn` frame. Receives the
/// environment frame it is evaluated in.
#[derive(Clone)]
pub struct NativeFn {
    name: KString,
    body: Rc<NativeFnBody>,
}

impl NativeFn {
    pub fn new(
        name: &str,
        body: impl Fn(&mut Arena, FrameId) -> Result<FrameId, EvalError> + 'static
    ) -> NativeFn {
        NativeFn {
            name: KString::from_ref(name),
            body: Rc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, arena: &mut Arena, env: FrameId)
                -> Result<FrameId, EvalError> {
        (self.body)(arena, env)
    }
}

impl std::fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("NativeFn({:?})", self.name.as_str()))
    }
}

#[derive(Debug, Clone)]
pub enum Value {
    String(KString),
    Number(Number),
    Native(NativeFn),
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            // identity, there's no way to compare closures
            (Value::Native(a), Value::Native(b)) => Rc::ptr_eq(&a.body, &b.body),
            _ => false,
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Number(n) => f.write_fmt(format_args!("{}", n)),
            Value::Native(nf) => f.write_str(nf.name()),
        }
    }
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Value::Number(n) => n.as_integer(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::String(KString::from_ref(s))
    }
}

impl From<KString> for Value {
    fn from(s: KString) -> Value {
        Value::String(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::String(KString::from(s))
    }
}

impl From<BigInt> for Value {
    fn from(n: BigInt) -> Value {
        Value::Number(Number::Integer(n))
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Value {
        Value::Number(Number::Integer(BigInt::from(n)))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Value {
        Value::Number(Number::Integer(BigInt::from(n)))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Value {
        Value::Number(Number::Float(x))
    }
}

impl From<NativeFn> for Value {
    fn from(nf: NativeFn) -> Value {
        Value::Native(nf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Value::from("abc").to_string(), "abc");
        assert_eq!(Value::from(-42).to_string(), "-42");
        assert_eq!(Value::from(2.5).to_string(), "2.5");
        assert_eq!(Value::from(KString::from_ref("sym")), Value::from("sym"));
        let nf = NativeFn::new("id", |_, env| Ok(env));
        assert_eq!(Value::from(nf).to_string(), "id");
    }

    #[test]
    fn native_equality_is_identity() {
        let a = NativeFn::new("f", |_, env| Ok(env));
        let b = NativeFn::new("f", |_, env| Ok(env));
        assert_eq!(Value::from(a.clone()), Value::from(a.clone()));
        assert_ne!(Value::from(a), Value::from(b));
        assert_ne!(Value::from(1), Value::from(1.0));
    }
}
