// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Get characters and their positions from anything implementing
//! `Read`, or from a string.

use crate::pos::Pos;
use std::io::{self, Read};
use thiserror::Error;
use utf8::{BufReadDecoder, BufReadDecoderError};
use genawaiter::rc::Gen;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("IO error ({0})")]
    IO(#[from] io::Error),
    #[error("invalid UTF-8 sequence {0:x?}")]
    InvalidUtf8(Vec<u8>),
}

pub type CharResult = Result<(char, Pos), DecodeError>;

/// Decodes `fh` lazily; stops after the first error.
pub fn buffered_chars<R>(
    fh: R
) -> impl Iterator<Item=CharResult>
    where R: Read
{
    Gen::new(|co| async move {
        let mut inp = BufReadDecoder::new(io::BufReader::new(fh));
        let mut pos = Pos::START;
        while let Some(r) = inp.next_strict() {
            match r {
                Ok(x) => {
                    for c in x.chars() {
                        co.yield_(Ok((c, pos))).await;
                        pos = pos.after(c);
                    }
                }
                Err(BufReadDecoderError::InvalidByteSequence(bytes)) => {
                    co.yield_(Err(DecodeError::InvalidUtf8(bytes.to_vec()))).await;
                    return;
                }
                Err(BufReadDecoderError::Io(e)) => {
                    co.yield_(Err(DecodeError::IO(e))).await;
                    return;
                }
            }
        }
    }).into_iter()
}

/// The same for a string that is already in memory (never fails).
pub fn str_chars(s: &str) -> impl Iterator<Item=CharResult> + '_ {
    s.chars().scan(Pos::START, |pos, c| {
        let p = *pos;
        *pos = p.after(c);
        Some(Ok((c, p)))
    })
}
