// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Where a buffer being read comes from, for error messages (the
//! position within the buffer is kept separately).

use crate::pos::Pos;
use kstring::KString;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    File(PathBuf),
    /// A source without a path, e.g. stdin
    Special(KString),
}

impl Context {
    pub fn file(path: &Path) -> Context {
        Context::File(path.to_path_buf())
    }

    pub fn special(name: &str) -> Context {
        Context::Special(KString::from_ref(name))
    }

    /// Location to be put *after* the error reason and a space,
    /// includes "in" or "from".
    pub fn at(&self, pos: Pos) -> ContextWithPos<'_> {
        ContextWithPos(self, pos)
    }
}

/// Location to be put *before* a colon and the error reason.
impl Display for Context {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Context::File(path) => f.write_fmt(format_args!("{:?}", path)),
            Context::Special(name) => f.write_fmt(format_args!("({})", name)),
        }
    }
}

pub struct ContextWithPos<'t>(&'t Context, Pos);

impl<'t> Display for ContextWithPos<'t> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        // Following the Emacs convention for location information.
        match self.0 {
            Context::File(_) => f.write_fmt(format_args!("in {}{}", self.0, self.1)),
            Context::Special(_) => f.write_fmt(format_args!("from {}{}", self.0, self.1)),
        }
    }
}
