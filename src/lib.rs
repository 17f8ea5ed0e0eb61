// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A reader for a minimal Lisp-style notation that builds a graph of
//! uniform, self-describing frames (after Minsky), and dumps them as
//! indented trees.
//!
//! * Every node is a [Frame](frame::Frame): a tag selecting its
//!   [Kind](kind::Kind), a scalar value, named slots and ordered
//!   children. Frames live in an [Arena](frame::Arena) and refer to
//!   each other by handle, so shared and cyclic structures are fine;
//!   [dumps](dump::Dump) terminate on them.
//!
//! * [lex](lex::lex) turns characters into tokens carrying ready-made
//!   leaf frames (symbols, integers, hex and binary integers,
//!   floating point numbers), structural parens and quotes.
//!
//! * [read](read) assembles lists and quoted forms, handing out each
//!   top-level expression as soon as it is complete;
//!   [dump_all](read::dump_all) prints them as they come.
//!
//! There is no evaluator beyond the trivial rules: primitives
//! evaluate to themselves, `fn` frames call their native function.

pub mod chars;
pub mod context;
pub mod dump;
pub mod frame;
pub mod kind;
pub mod lex;
pub mod number;
pub mod pos;
pub mod read;
pub mod settings;
pub mod value;
