// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Settings for lexing and reading.

#[derive(Debug, Clone)]
pub struct Settings {
    /// The character that quotes the following expression.
    /// Must not be whitespace, ';' or a parenthesis.
    pub quote: char,
    /// Maximum nesting of lists and quotes; the limit with default
    /// stack size on Linux is well above 1000.
    pub max_depth: u32,
}

pub const DEFAULT_SETTINGS : Settings = Settings {
    quote: '`',
    max_depth: 500,
};

impl Default for Settings {
    fn default() -> Settings {
        DEFAULT_SETTINGS
    }
}
