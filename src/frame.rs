// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Frames: nodes with a tag, a scalar value, named slots and ordered
//! children.

//! Frames live in an [Arena](Arena) and refer to each other via
//! [FrameId](FrameId) handles, thus a frame can appear below several
//! parents, or below itself. Nothing is ever removed from an arena.

use crate::dump::{Dump, Head};
use crate::kind::{Family, Kind};
use crate::value::{NativeFn, Value};
use kstring::KString;
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(usize);

impl FrameId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("@{:x}", self.0))
    }
}

#[derive(Error, Debug)]
#[error("no slot '{key}' in {head}")]
pub struct LookupError {
    pub key: KString,
    /// `head` of the frame the lookup was done in
    pub head: String,
}

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("{0} is not evaluable")]
    NotEvaluable(String),
    #[error("{name}: {message}")]
    Native {
        name: KString,
        message: String,
    },
    #[error("{0}")]
    Lookup(#[from] LookupError),
}

#[derive(Debug, Clone)]
pub struct Frame {
    kind: Kind,
    value: Value,
    slots: BTreeMap<KString, FrameId>,
    children: Vec<FrameId>,
}

impl Frame {
    pub fn new(kind: Kind, value: impl Into<Value>) -> Frame {
        Frame {
            kind,
            value: value.into(),
            slots: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    pub fn tag(&self) -> &str {
        self.kind.tag()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// The value formatted according to the kind, e.g. "0x1a" for a
    /// hex frame.
    pub fn formatted_value(&self) -> String {
        FormattedValue(self).to_string()
    }

    pub fn slot(&self, key: &str) -> Option<FrameId> {
        self.slots.get(key).copied()
    }

    /// In key order.
    pub fn slots(&self) -> impl Iterator<Item = (&str, FrameId)> {
        self.slots.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn children(&self) -> &[FrameId] {
        &self.children
    }
}

struct FormattedValue<'t>(&'t Frame);

impl<'t> std::fmt::Display for FormattedValue<'t> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        self.0.kind.fmt_value(&self.0.value, f)
    }
}

/// `<tag:value>`, i.e. a head without the identity.
impl std::fmt::Display for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("<{}:{}>", self.tag(), FormattedValue(self)))
    }
}

/// Things that can be attached to a frame: handles of frames already
/// in the arena, or detached frames, which are allocated on the way.
pub trait IntoFrameId {
    fn into_frame_id(self, arena: &mut Arena) -> FrameId;
}

impl IntoFrameId for FrameId {
    fn into_frame_id(self, _arena: &mut Arena) -> FrameId {
        self
    }
}

impl IntoFrameId for Frame {
    fn into_frame_id(self, arena: &mut Arena) -> FrameId {
        arena.alloc(self)
    }
}

#[derive(Debug, Default)]
pub struct Arena {
    frames: Vec<Frame>,
}

impl Arena {
    pub fn new() -> Arena {
        Arena { frames: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn alloc(&mut self, frame: Frame) -> FrameId {
        let id = FrameId(self.frames.len());
        self.frames.push(frame);
        id
    }

    /// Allocate `frame` and return a builder for it.
    pub fn new_frame(&mut self, frame: Frame) -> FrameBuilder<'_> {
        let id = self.alloc(frame);
        FrameBuilder { arena: self, id }
    }

    /// A builder for a frame that is already allocated.
    pub fn build(&mut self, id: FrameId) -> FrameBuilder<'_> {
        FrameBuilder { arena: self, id }
    }

    pub fn symbol(&mut self, name: &str) -> FrameId {
        self.alloc(Frame::new(Kind::Symbol, name))
    }

    pub fn list(&mut self) -> FrameId {
        self.alloc(Frame::new(Kind::List, ""))
    }

    pub fn env(&mut self, name: &str) -> FrameId {
        self.alloc(Frame::new(Kind::Env, name))
    }

    pub fn error(&mut self, message: &str) -> FrameId {
        self.alloc(Frame::new(Kind::Error, message))
    }

    /// A `fn` frame, its value is the function's name.
    pub fn native(&mut self, nf: NativeFn) -> FrameId {
        self.alloc(Frame::new(Kind::Fn, nf))
    }

    /// Panics if `id` belongs to another arena and is out of range
    /// here.
    pub fn frame(&self, id: FrameId) -> &Frame {
        &self.frames[id.index()]
    }

    fn frame_mut(&mut self, id: FrameId) -> &mut Frame {
        &mut self.frames[id.index()]
    }

    pub fn get(&self, id: FrameId, key: &str) -> Result<FrameId, LookupError> {
        self.frame(id).slot(key).ok_or_else(|| LookupError {
            key: KString::from_ref(key),
            head: self.head(id).to_string(),
        })
    }

    /// Replaces any previous frame stored under `key`.
    pub fn set(&mut self, id: FrameId, key: &str, that: impl IntoFrameId)
               -> FrameBuilder<'_> {
        self.build(id).set(key, that)
    }

    /// `set` under the tag of `that`.
    pub fn set_by_tag(&mut self, id: FrameId, that: impl IntoFrameId)
                      -> FrameBuilder<'_> {
        self.build(id).set_by_tag(that)
    }

    /// `set` under the (unformatted) value of `that`.
    pub fn set_by_value(&mut self, id: FrameId, that: impl IntoFrameId)
                        -> FrameBuilder<'_> {
        self.build(id).set_by_value(that)
    }

    pub fn push(&mut self, id: FrameId, that: impl IntoFrameId)
                -> FrameBuilder<'_> {
        self.build(id).push(that)
    }

    /// `<tag:value> @id`
    pub fn head(&self, id: FrameId) -> Head<'_> {
        Head::new(self, id)
    }

    /// The whole graph reachable from `id`, see [Dump](Dump).
    pub fn dump(&self, id: FrameId) -> Dump<'_> {
        Dump::new(self, id)
    }

    /// Primitives evaluate to themselves, `fn` frames call their
    /// native function with `env`; everything else is an error.
    pub fn evaluate(&mut self, id: FrameId, env: FrameId)
                    -> Result<FrameId, EvalError> {
        let frame = self.frame(id);
        if frame.kind.family() == Family::Primitive {
            return Ok(id)
        }
        let nf = match (&frame.kind, &frame.value) {
            (Kind::Fn, Value::Native(nf)) => nf.clone(),
            _ => return Err(EvalError::NotEvaluable(self.head(id).to_string())),
        };
        nf.call(self, env)
    }
}

/// Chaining access to one frame: every method returns the builder
/// again, `id` or `finish` give the handle.
pub struct FrameBuilder<'a> {
    arena: &'a mut Arena,
    id: FrameId,
}

impl<'a> FrameBuilder<'a> {
    pub fn id(&self) -> FrameId {
        self.id
    }

    pub fn finish(self) -> FrameId {
        self.id
    }

    pub fn set(self, key: &str, that: impl IntoFrameId) -> Self {
        let that = that.into_frame_id(self.arena);
        self.arena.frame_mut(self.id).slots.insert(KString::from_ref(key), that);
        self
    }

    pub fn set_by_tag(self, that: impl IntoFrameId) -> Self {
        let that = that.into_frame_id(self.arena);
        let key = KString::from_ref(self.arena.frame(that).tag());
        self.set(&key, that)
    }

    pub fn set_by_value(self, that: impl IntoFrameId) -> Self {
        let that = that.into_frame_id(self.arena);
        let key = self.arena.frame(that).value().to_string();
        self.set(&key, that)
    }

    pub fn push(self, that: impl IntoFrameId) -> Self {
        let that = that.into_frame_id(self.arena);
        self.arena.frame_mut(self.id).children.push(that);
        self
    }
}
