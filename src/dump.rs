// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Human readable tree dumps of frame graphs.

//! Every frame is shown on its own line, as newline, one tab per
//! nesting level, an optional prefix, and the head:
//!
//! ```text
//!
//! <list:> @3
//! 	0 : <integer:1> @0
//! 	1 : <integer:2> @1
//! ```
//!
//! Slots come first (prefixed with `key = `), then children
//! (prefixed with `index : `). A frame that was already shown is
//! not descended into again, its line ends in ` _/` instead; thus
//! dumps of cyclic graphs terminate.

use crate::frame::{Arena, FrameId};
use std::collections::HashSet;
use std::fmt::{Display, Formatter, Write};

const CYCLE_MARKER: &str = " _/";

/// `<tag:value> @id`
pub struct Head<'a> {
    arena: &'a Arena,
    id: FrameId,
}

impl<'a> Head<'a> {
    pub fn new(arena: &'a Arena, id: FrameId) -> Head<'a> {
        Head { arena, id }
    }
}

impl<'a> Display for Head<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{} {}", self.arena.frame(self.id), self.id))
    }
}

enum Prefix<'t> {
    Root,
    Slot(&'t str),
    Child(usize),
}

impl<'t> Display for Prefix<'t> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Prefix::Root => Ok(()),
            Prefix::Slot(key) => f.write_fmt(format_args!("{} = ", key)),
            Prefix::Child(i) => f.write_fmt(format_args!("{} : ", i)),
        }
    }
}

/// The full dump of everything reachable from a frame. Each
/// formatting run starts with an empty set of visited frames, so
/// dumps are independent of each other, even when one is formatted
/// while another is in progress.
pub struct Dump<'a> {
    arena: &'a Arena,
    root: FrameId,
}

impl<'a> Dump<'a> {
    pub fn new(arena: &'a Arena, root: FrameId) -> Dump<'a> {
        Dump { arena, root }
    }
}

const TABS: &str = "\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\
                     \t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\
                     \t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\
                     \t\t\t\t\t\t\t\t\t\t\t\t\t\t\t\t";

fn indent(f: &mut Formatter<'_>, depth: usize) -> Result<(), std::fmt::Error> {
    let mut left = depth;
    while left > 0 {
        let n = left.min(TABS.len());
        f.write_str(&TABS[..n])?;
        left -= n;
    }
    Ok(())
}

impl<'a> Display for Dump<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        let mut visited = HashSet::new();
        // Depth first, in the order the lines are printed; arbitrarily
        // deep graphs don't grow the native stack.
        let mut todo: Vec<(FrameId, usize, Prefix<'a>)> =
            vec![(self.root, 0, Prefix::Root)];
        while let Some((id, depth, prefix)) = todo.pop() {
            f.write_char('\n')?;
            indent(f, depth)?;
            f.write_fmt(format_args!("{}{}", prefix, Head::new(self.arena, id)))?;
            if !visited.insert(id) {
                f.write_str(CYCLE_MARKER)?;
                continue
            }
            let frame = self.arena.frame(id);
            for (i, child) in frame.children().iter().enumerate().rev() {
                todo.push((*child, depth + 1, Prefix::Child(i)));
            }
            let slots: Vec<(&'a str, FrameId)> = frame.slots().collect();
            for (key, slot) in slots.into_iter().rev() {
                todo.push((slot, depth + 1, Prefix::Slot(key)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::frame::{Arena, Frame, FrameId};
    use crate::kind::Kind;
    use std::fmt::Write;

    #[test]
    fn tree() {
        let mut arena = Arena::new();
        let root = arena.new_frame(Frame::new(Kind::Frame, "Hello"))
            .push(Frame::new(Kind::Frame, "World"))
            .set_by_tag(Frame::new(Kind::Frame, "left"))
            .set_by_value(Frame::new(Kind::Frame, "right"))
            .finish();
        assert_eq!(arena.dump(root).to_string(),
                   "\n<frame:Hello> @0\
                    \n\tframe = <frame:left> @2\
                    \n\tright = <frame:right> @3\
                    \n\t0 : <frame:World> @1");
    }

    #[test]
    fn self_reference() {
        let mut arena = Arena::new();
        let env = arena.env("global");
        arena.set(env, "self", env);
        assert_eq!(arena.dump(env).to_string(),
                   "\n<env:global> @0\n\tself = <env:global> @0 _/");
    }

    #[test]
    fn shared_child_is_shown_once() {
        let mut arena = Arena::new();
        let list = arena.list();
        let x = arena.symbol("x");
        arena.push(list, x).push(x);
        assert_eq!(arena.dump(list).to_string(),
                   "\n<list:> @0\n\t0 : <symbol:x> @1\n\t1 : <symbol:x> @1 _/");
    }

    #[test]
    fn dumps_are_independent() {
        let mut arena = Arena::new();
        let a = arena.symbol("a");
        let outer = arena.list();
        arena.push(outer, a);
        let first = arena.dump(outer).to_string();
        let both = format!("{}{}", arena.dump(outer), arena.dump(a));
        assert_eq!(arena.dump(outer).to_string(), first);
        assert_eq!(both, format!("{}\n<symbol:a> @0", first));
    }

    /// Collects what the outer dump writes, and dumps `inner` from
    /// within the first write after `trigger` has been written.
    struct NestingSink<'a> {
        arena: &'a Arena,
        inner: FrameId,
        trigger: &'static str,
        out: String,
        nested: Option<String>,
    }

    impl<'a> Write for NestingSink<'a> {
        fn write_str(&mut self, s: &str) -> std::fmt::Result {
            if self.nested.is_none() && self.out.contains(self.trigger) {
                self.nested = Some(self.arena.dump(self.inner).to_string());
            }
            self.out.push_str(s);
            Ok(())
        }
    }

    #[test]
    fn dump_within_a_dump() {
        let mut arena = Arena::new();
        let outer = arena.list();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        arena.push(x, y);
        arena.push(outer, x).push(x);
        let mut sink = NestingSink {
            arena: &arena,
            inner: x,
            trigger: "<symbol:y>",
            out: String::new(),
            nested: None,
        };
        write!(sink, "{}", arena.dump(outer)).expect("formats");
        // x was already visited by the outer dump at that point
        let nested = sink.nested.expect("dumped while the outer dump ran");
        assert_eq!(nested, "\n<symbol:x> @1\n\t0 : <symbol:y> @2");
        assert!(!nested.contains(" _/"));
        assert_eq!(sink.out,
                   "\n<list:> @0\
                    \n\t0 : <symbol:x> @1\
                    \n\t\t0 : <symbol:y> @2\
                    \n\t1 : <symbol:x> @1 _/");
    }

    /// Counts the bytes and lines of a dump without keeping it.
    #[derive(Default)]
    struct Measure {
        bytes: usize,
        lines: usize,
    }

    impl Write for Measure {
        fn write_str(&mut self, s: &str) -> std::fmt::Result {
            self.bytes += s.len();
            if s == "\n" {
                self.lines += 1;
            }
            Ok(())
        }
    }

    #[test]
    fn deep_chain() {
        let depth = 100_000;
        let mut arena = Arena::new();
        let root = arena.list();
        let mut last = root;
        for _ in 0..depth {
            let l = arena.list();
            arena.push(last, l);
            last = l;
        }
        let mut m = Measure::default();
        write!(m, "{}", arena.dump(root)).expect("formats");
        assert_eq!(m.lines, depth + 1);
        let expected: usize = (0..=depth)
            .map(|d| {
                let prefix = if d == 0 { "" } else { "0 : " };
                1 + d + prefix.len() + format!("<list:> @{:x}", d).len()
            })
            .sum();
        assert_eq!(m.bytes, expected);
    }
}
