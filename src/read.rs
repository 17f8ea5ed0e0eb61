// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Building frame trees from the token stream, one top-level
//! expression at a time:
//!
//! ```text
//! Program := ε | Program Expr
//! Expr    := Quote Expr | '(' List ')' | Symbol | Number | Integer | Hex | Bin
//! List    := ε | List Expr
//! ```
//!
//! A quoted expression becomes the sole child of the `op` frame that
//! the quote token carries; list elements become the children of a
//! `list` frame, in order.

use crate::chars::{buffered_chars, str_chars, CharResult};
use crate::context::Context;
use crate::frame::{Arena, FrameId};
use crate::lex::{lex, LexError, LexErrorWithPos, Token, TokenWithPos};
use crate::pos::Pos;
use crate::settings::{Settings, DEFAULT_SETTINGS};
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace};

#[derive(Error, Debug)]
pub enum SyntaxError {
    #[error("unexpected closing character ')'")]
    UnexpectedClose,
    #[error("premature EOF while expecting closing character ')' for '('")]
    PrematureEofInList,
    #[error("premature EOF while expecting an expression after '{0}'")]
    PrematureEofAfterQuote(String),
    #[error("nesting too deep")]
    NestingTooDeep,
}

impl SyntaxError {
    pub fn is_premature_eof(&self) -> bool {
        matches!(self, SyntaxError::PrematureEofInList
                 | SyntaxError::PrematureEofAfterQuote(_))
    }

    fn at(self, p: Pos) -> ReadErrorWithPos {
        ReadErrorWithPos {
            err: ReadError::Syntax(self),
            pos: p
        }
    }
}

#[derive(Error, Debug)]
pub enum ReadError {
    #[error("lexical error: {0}")]
    Lexical(LexError),
    #[error("syntax error: {0}")]
    Syntax(SyntaxError),
}

#[derive(Error, Debug)]
#[error("{err} {pos}")]
pub struct ReadErrorWithPos {
    pub err: ReadError,
    pub pos: Pos
}

impl From<LexErrorWithPos> for ReadErrorWithPos {
    fn from(ep: LexErrorWithPos) -> ReadErrorWithPos {
        let LexErrorWithPos { err, pos } = ep;
        ReadErrorWithPos {
            err: ReadError::Lexical(err),
            pos
        }
    }
}

impl ReadErrorWithPos {
    pub fn in_context(self, context: Context) -> ReadErrorWithLocation {
        ReadErrorWithLocation::PC(Box::new(
            ReadErrorWithPosContext {
                err_with_pos: self,
                context
            }))
    }
}

#[derive(Error, Debug)]
pub struct ReadErrorWithPosContext {
    pub err_with_pos: ReadErrorWithPos,
    pub context: Context
}

impl Display for ReadErrorWithPosContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_fmt(format_args!("{} {}",
                                 self.err_with_pos.err,
                                 self.context.at(self.err_with_pos.pos)))
    }
}

#[derive(Error, Debug)]
pub enum ReadErrorWithLocation {
    #[error("{0}")]
    PC(Box<ReadErrorWithPosContext>),
    #[error("{1}: {0}")]
    IO(std::io::Error, Context)
}

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("{0}")]
    Read(#[from] ReadErrorWithPos),
    #[error("write error: {0}")]
    IO(#[from] std::io::Error),
}


/// A list or quote whose closing token or quoted expression is still
/// to come.
enum Open {
    List(FrameId, Pos),
    Quote(FrameId, Pos, String),
}

/// Reads top-level expressions from a token stream into an arena,
/// on demand. Nesting is tracked on an explicit stack, bounded by
/// `max_depth`.
pub struct Reader<'s, T> {
    tokens: T,
    settings: &'s Settings,
}

impl<'s, T> Reader<'s, T>
    where T: Iterator<Item = Result<TokenWithPos, LexErrorWithPos>>
{
    pub fn new(tokens: T, settings: &'s Settings) -> Reader<'s, T> {
        Reader { tokens, settings }
    }

    /// The next complete top-level expression, `None` at the end of
    /// the input. Tokens after the expression are not looked at yet.
    pub fn read_next(&mut self, arena: &mut Arena)
                     -> Result<Option<FrameId>, ReadErrorWithPos> {
        let max_depth = self.settings.max_depth as usize;
        let mut stack: Vec<Open> = Vec::new();
        loop {
            let TokenWithPos(t, pos) = match self.next_token()? {
                Some(tp) => tp,
                None => return match stack.last() {
                    None => Ok(None),
                    Some(Open::List(_, p)) =>
                        Err(SyntaxError::PrematureEofInList.at(*p)),
                    Some(Open::Quote(_, p, quote)) =>
                        Err(SyntaxError::PrematureEofAfterQuote(quote.clone()).at(*p)),
                }
            };
            let mut done = match t {
                Token::Leaf(frame) => arena.alloc(frame),
                Token::Close => match stack.pop() {
                    Some(Open::List(list, _)) => list,
                    _ => return Err(SyntaxError::UnexpectedClose.at(pos)),
                },
                Token::Quote(op) => {
                    if stack.len() >= max_depth {
                        return Err(SyntaxError::NestingTooDeep.at(pos))
                    }
                    let quote = op.value().to_string();
                    stack.push(Open::Quote(arena.alloc(op), pos, quote));
                    continue
                }
                Token::Open => {
                    if stack.len() >= max_depth {
                        return Err(SyntaxError::NestingTooDeep.at(pos))
                    }
                    stack.push(Open::List(arena.list(), pos));
                    continue
                }
            };
            // Hand the finished expression to its container; a quote
            // is finished by its first expression.
            loop {
                match stack.last() {
                    None => return Ok(Some(done)),
                    Some(Open::List(list, _)) => {
                        arena.push(*list, done);
                        break
                    }
                    Some(Open::Quote(op, _, _)) => {
                        let op = *op;
                        arena.push(op, done);
                        stack.pop();
                        done = op;
                    }
                }
            }
        }
    }

    fn next_token(&mut self) -> Result<Option<TokenWithPos>, ReadErrorWithPos> {
        match self.tokens.next() {
            None => Ok(None),
            Some(r) => Ok(Some(r?))
        }
    }
}

/// Read all of `cs`, calling `f` with each top-level expression as
/// soon as it is complete (before the next one is read). Returns the
/// number of expressions. Reading stops at the first error, from
/// reading or from `f`.
pub fn read_each<'s, E>(
    cs: impl Iterator<Item = CharResult> + 's,
    settings: &'s Settings,
    arena: &mut Arena,
    mut f: impl FnMut(&mut Arena, FrameId) -> Result<(), E>,
) -> Result<usize, E>
    where E: From<ReadErrorWithPos>
{
    let mut reader = Reader::new(lex(cs, settings), settings);
    let mut count = 0;
    while let Some(id) = reader.read_next(arena)? {
        trace!(head = %arena.head(id), "read top-level expression");
        f(arena, id)?;
        count += 1;
    }
    Ok(count)
}

fn collect_all<'s>(
    cs: impl Iterator<Item = CharResult> + 's,
    arena: &mut Arena,
) -> Result<Vec<FrameId>, ReadErrorWithPos> {
    let mut v = Vec::new();
    read_each(cs, &DEFAULT_SETTINGS, arena, |_, id| -> Result<(), ReadErrorWithPos> {
        v.push(id);
        Ok(())
    })?;
    Ok(v)
}

pub fn read_all(
    fh: impl Read,
    arena: &mut Arena,
) -> Result<Vec<FrameId>, ReadErrorWithPos> {
    collect_all(buffered_chars(fh), arena)
}

pub fn read_str(
    s: &str,
    arena: &mut Arena,
) -> Result<Vec<FrameId>, ReadErrorWithPos> {
    collect_all(str_chars(s), arena)
}

pub fn read_file(
    path: &Path,
    arena: &mut Arena,
) -> Result<Vec<FrameId>, ReadErrorWithLocation> {
    debug!(?path, "reading file");
    let fh = File::open(path)
        .map_err(|e| ReadErrorWithLocation::IO(e, Context::file(path)))?;
    read_all(fh, arena).map_err(|e| e.in_context(Context::file(path)))
}

/// Write the dump of each top-level expression in `fh` to `out`,
/// each followed by a newline, as soon as it has been read. Dumps
/// written before an error stay written.
pub fn dump_all(
    fh: impl Read,
    settings: &Settings,
    out: impl Write,
) -> Result<usize, DumpError> {
    let mut out = out; // for `File`
    let mut arena = Arena::new();
    read_each(buffered_chars(fh), settings, &mut arena,
              |arena: &mut Arena, id: FrameId| -> Result<(), DumpError> {
                  writeln!(out, "{}", arena.dump(id))?;
                  out.flush()?;
                  Ok(())
              })
}
