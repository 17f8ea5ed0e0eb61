// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use framereader::chars::buffered_chars;
use framereader::context::Context;
use framereader::frame::{Arena, Frame};
use framereader::kind::Kind;
use framereader::lex::{lex, Token, TokenWithPos};
use framereader::read::{dump_all, DumpError, ReadErrorWithLocation, ReadErrorWithPos};
use framereader::settings::{Settings, DEFAULT_SETTINGS};
use framereader::value::NativeFn;
use clap::Parser as ClapParser;
use std::io::{stdin, stdout, BufWriter, Read};
use std::path::{Path, PathBuf};
use anyhow::{Result, bail};


#[derive(clap::Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Print the token stream instead of frame dumps
    #[clap(short, long, value_parser)]
    tokens: bool,
    /// First print a hand-built sample tree and environment
    #[clap(long, value_parser)]
    demo: bool,
    /// The quote character
    #[clap(long, value_parser, default_value_t = DEFAULT_SETTINGS.quote)]
    quote: char,
    /// Maximum nesting depth of lists and quotes
    #[clap(long, value_parser, default_value_t = DEFAULT_SETTINGS.max_depth)]
    max_depth: u32,
    /// Paths to the input files, `-` for stdin
    #[clap(value_parser)]
    input_paths: Vec<PathBuf>,
}

fn open(path: &Path) -> Result<(Box<dyn Read>, Context), ReadErrorWithLocation> {
    if path == Path::new("-") {
        Ok((Box::new(stdin()), Context::special("stdin")))
    } else {
        let fh = std::fs::File::open(path)
            .map_err(|e| ReadErrorWithLocation::IO(e, Context::file(path)))?;
        Ok((Box::new(fh), Context::file(path)))
    }
}

fn dump_path(path: &Path, settings: &Settings) -> Result<()> {
    let (fh, context) = open(path)?;
    match dump_all(fh, settings, BufWriter::new(stdout())) {
        Ok(_) => Ok(()),
        Err(DumpError::Read(e)) => Err(e.in_context(context).into()),
        Err(e) => Err(e.into()),
    }
}

fn print_tokens(path: &Path, settings: &Settings) -> Result<()> {
    let (fh, context) = open(path)?;
    let mut depth: usize = 0;
    let mut count = 0;
    for te in lex(buffered_chars(fh), settings) {
        let TokenWithPos(token, pos) = te.map_err(
            |e| ReadErrorWithPos::from(e).in_context(context.clone()))?;
        if let Token::Close = token {
            depth = depth.saturating_sub(1);
        }
        println!("{}{} {}", "  ".repeat(depth), pos, token);
        if let Token::Open = token {
            depth += 1;
        }
        count += 1;
    }
    println!(";; {} tokens", count);
    Ok(())
}

fn demo() -> Result<()> {
    let mut arena = Arena::new();
    let hello = arena.new_frame(Frame::new(Kind::Frame, "Hello"))
        .push(Frame::new(Kind::Frame, "World"))
        .set_by_tag(Frame::new(Kind::Frame, "left"))
        .set_by_value(Frame::new(Kind::Frame, "right"))
        .finish();
    println!("{}", arena.dump(hello));

    let glob = arena.env("global");
    let this = NativeFn::new("this", |_, env| Ok(env));
    arena.build(glob)
        .set_by_tag(Frame::new(Kind::from_tag("web"), "flask"))
        .set_by_value(Frame::new(Kind::Fn, this))
        .set("global", glob);
    let f = arena.get(glob, "this")?;
    let result = arena.evaluate(f, glob)?;
    println!("{}", arena.dump(result));
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = Settings {
        quote: args.quote,
        max_depth: args.max_depth,
    };

    if args.demo {
        demo()?;
    }

    // Report errors per input, carry on with the next one.
    let mut failed = 0;
    for path in &args.input_paths {
        let r = if args.tokens {
            print_tokens(path, &settings)
        } else {
            dump_path(path, &settings)
        };
        if let Err(e) = r {
            eprintln!("{}", e);
            failed += 1;
        }
    }
    if failed > 0 {
        bail!("{} of {} inputs failed", failed, args.input_paths.len())
    }
    Ok(())
}
