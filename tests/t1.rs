use anyhow::Result;
use framereader::frame::Arena;
use framereader::kind::Kind;
use framereader::read::{dump_all, read_file, ReadError, ReadErrorWithLocation};
use framereader::settings::DEFAULT_SETTINGS;
use std::path::PathBuf;

const INPUT: &[u8] = include_bytes!("t-input.lisp");
const EXPECTED: &[u8] = include_bytes!("t-expected.txt");

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests").join(name)
}

#[test]
fn t1() -> Result<()> {
    let mut out = Vec::<u8>::new();
    let n = dump_all(INPUT, &DEFAULT_SETTINGS, &mut out)?;
    assert_eq!(n, 9);
    assert_eq!(String::from_utf8(out)?, std::str::from_utf8(EXPECTED)?);
    Ok(())
}

#[test]
fn dumping_twice_gives_the_same_text() -> Result<()> {
    let mut arena = Arena::new();
    let ids = read_file(&fixture("t-input.lisp"), &mut arena)?;
    assert_eq!(ids.len(), 9);
    for id in ids {
        assert_eq!(arena.dump(id).to_string(), arena.dump(id).to_string());
    }
    Ok(())
}

#[test]
fn file_with_error() -> Result<()> {
    let mut arena = Arena::new();
    let err = read_file(&fixture("t-unbalanced.lisp"), &mut arena)
        .expect_err("unbalanced");
    match &err {
        ReadErrorWithLocation::PC(e) => {
            assert!(matches!(&e.err_with_pos.err, ReadError::Syntax(se) if se.is_premature_eof()));
        }
        ReadErrorWithLocation::IO(e, _) => panic!("unexpected IO error {}", e),
    }
    let msg = err.to_string();
    assert!(msg.starts_with("syntax error: premature EOF"), "{}", msg);
    assert!(msg.ends_with("t-unbalanced.lisp\"@1.0"), "{}", msg);
    Ok(())
}

#[test]
fn symbols_with_odd_characters() -> Result<()> {
    let mut arena = Arena::new();
    let ids = framereader::read::read_str("λ <= a.b #t \"str\"", &mut arena)?;
    let shown: Vec<String> = ids.iter().map(|id| arena.frame(*id).to_string()).collect();
    assert_eq!(shown, vec!["<symbol:λ>", "<symbol:<=>", "<symbol:a.b>",
                           "<symbol:#t>", "<symbol:\"str\">"]);
    assert!(ids.iter().all(|id| arena.frame(*id).kind() == &Kind::Symbol));
    Ok(())
}
