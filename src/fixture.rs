//! Parsing of `.irt` fixture documents.
//!
//! A fixture is a flat sequence of sections, each introduced by a tag line of
//! the form `--NAME--`:
//!
//! ```text
//! --TEST--
//! Add two constants
//! --ARGS--
//! --emit-c
//! --CODE--
//! { ... }
//! --EXPECT--
//! ...
//! ```
//!
//! Tags may appear in any order. `--TEST--`, `--CODE--` and `--EXPECT--` are
//! required; `--ARGS--`, `--TARGET--` and `--XFAIL--` are optional and unknown
//! tags are ignored.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::HarnessError;

/// File suffix recognised as a fixture.
pub const FIXTURE_EXTENSION: &str = "irt";

/// Arguments passed to the binary when a fixture has no `--ARGS--` section.
pub const DEFAULT_ARGS: &str = "--save";

const TAG_TEST: &str = "TEST";
const TAG_ARGS: &str = "ARGS";
const TAG_TARGET: &str = "TARGET";
const TAG_XFAIL: &str = "XFAIL";
const TAG_CODE: &str = "CODE";
const TAG_EXPECT: &str = "EXPECT";

// CRLF mode lets `$` match before "\r\n" so Windows checkouts still parse.
static TAG_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mR)^--([A-Z]+)--$").expect("tag pattern is a valid regex")
});

/// A parsed test case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    pub path: PathBuf,
    pub name: String,
    pub code: String,
    pub expected: String,
    pub args: String,
    pub target: Option<String>,
    pub xfail_reason: Option<String>,
}

impl Fixture {
    /// Reads and parses the fixture at `path`.
    ///
    /// An unreadable file is reported as malformed, like any other document
    /// the harness cannot make sense of. Bytes that are not valid UTF-8 are
    /// replaced rather than rejected.
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Fixture, HarnessError> {
        let path = path.as_ref();
        let bytes = fs::read(path)
            .map_err(|e| HarnessError::malformed(path, format!("cannot read file: {}", e)))?;
        Self::parse_document(path, &String::from_utf8_lossy(&bytes))
    }

    /// Parses an in-memory fixture document.
    pub fn parse_document<P: AsRef<Path>>(path: P, text: &str) -> Result<Fixture, HarnessError> {
        let path = path.as_ref();
        let mut sections = split_sections(text);
        if sections.is_empty() {
            return Err(HarnessError::malformed(path, "no --TAG-- sections found"));
        }

        let mut required = |tag: &str| {
            sections
                .remove(tag)
                .ok_or_else(|| HarnessError::malformed(path, format!("missing --{}-- section", tag)))
        };
        let name = required(TAG_TEST)?;
        let code = required(TAG_CODE)?;
        let expected = required(TAG_EXPECT)?.replace('\r', "");

        let args = sections
            .remove(TAG_ARGS)
            .unwrap_or_else(|| DEFAULT_ARGS.to_string());
        let target = sections.remove(TAG_TARGET).filter(|t| !t.is_empty());
        let xfail_reason = sections.remove(TAG_XFAIL).filter(|r| !r.is_empty());

        Ok(Fixture {
            path: path.to_path_buf(),
            name,
            code,
            expected,
            args,
            target,
            xfail_reason,
        })
    }

    /// Invocation arguments split the way a shell would split unquoted words.
    pub fn arg_list(&self) -> Vec<String> {
        self.args.split_whitespace().map(str::to_string).collect()
    }

    /// True when the fixture is pinned to a target other than `current`.
    pub fn skipped_on(&self, current: &str) -> bool {
        self.target.as_deref().is_some_and(|t| t != current)
    }
}

/// Maps every tag in `text` to its trimmed section content.
///
/// A section runs from the end of its tag line to the start of the next tag
/// line. Repeated tags keep the content of their last occurrence.
fn split_sections(text: &str) -> HashMap<String, String> {
    // (tag name, offset of the tag line, offset just past the tag token)
    let tags: Vec<(&str, usize, usize)> = TAG_LINE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some((caps.get(1)?.as_str(), whole.start(), whole.end()))
        })
        .collect();

    let mut sections = HashMap::with_capacity(tags.len());
    for (i, &(name, _, content_start)) in tags.iter().enumerate() {
        let content_end = tags.get(i + 1).map_or(text.len(), |&(_, start, _)| start);
        let content = trim_section(&text[content_start..content_end]);
        sections.insert(name.to_string(), content.to_string());
    }
    sections
}

/// Strips the ASCII whitespace set ` \t\n\r\x0B\x0C` from both ends.
pub(crate) fn trim_section(s: &str) -> &str {
    s.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0B' | '\x0C'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Fixture, HarnessError> {
        Fixture::parse_document("tests/sample.irt", text)
    }

    #[test]
    fn invalid_utf8_in_a_section_still_parses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bytes.irt");
        let mut doc = b"--TEST--\nLatin-1\n--CODE--\nstr \"".to_vec();
        doc.push(0xE9);
        doc.extend_from_slice(b"\"\n--EXPECT--\nok\n");
        fs::write(&path, doc).unwrap();

        let fixture = Fixture::parse(&path).unwrap();
        assert_eq!(fixture.name, "Latin-1");
        assert_eq!(fixture.code, "str \"\u{FFFD}\"");
        assert_eq!(fixture.expected, "ok");
    }

    #[test]
    fn parses_minimal_fixture_with_default_args() {
        let fixture = parse("--TEST--\nAdd\n--CODE--\n1+1\n--EXPECT--\n2").unwrap();
        assert_eq!(fixture.name, "Add");
        assert_eq!(fixture.code, "1+1");
        assert_eq!(fixture.expected, "2");
        assert_eq!(fixture.args, DEFAULT_ARGS);
        assert_eq!(fixture.target, None);
        assert_eq!(fixture.xfail_reason, None);
        assert_eq!(fixture.path, PathBuf::from("tests/sample.irt"));
    }

    #[test]
    fn tag_order_does_not_matter() {
        let fixture = parse(
            "--EXPECT--\nok\n--XFAIL--\nknown bug\n--CODE--\nx\n--TARGET--\naarch64\n--ARGS--\n-O2 --emit-c\n--TEST--\nReordered\n",
        )
        .unwrap();
        assert_eq!(fixture.name, "Reordered");
        assert_eq!(fixture.code, "x");
        assert_eq!(fixture.expected, "ok");
        assert_eq!(fixture.args, "-O2 --emit-c");
        assert_eq!(fixture.arg_list(), vec!["-O2", "--emit-c"]);
        assert_eq!(fixture.target.as_deref(), Some("aarch64"));
        assert_eq!(fixture.xfail_reason.as_deref(), Some("known bug"));
    }

    #[test]
    fn missing_expect_is_malformed() {
        let err = parse("--TEST--\nX\n--CODE--\nfoo\n--ARGS--\n-O0").unwrap_err();
        match err {
            HarnessError::MalformedFixture { reason, .. } => {
                assert_eq!(reason, "missing --EXPECT-- section")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn document_without_tags_is_malformed() {
        assert!(parse("just some text\n").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn tags_must_occupy_a_whole_line() {
        // Inline and lowercase markers are part of the section body.
        let fixture = parse(
            "--TEST--\nInline\n--CODE--\nx --EXPECT-- y\n--note--\n--EXPECT--\nz",
        )
        .unwrap();
        assert_eq!(fixture.code, "x --EXPECT-- y\n--note--");
        assert_eq!(fixture.expected, "z");
    }

    #[test]
    fn repeated_tag_keeps_last_occurrence() {
        let fixture =
            parse("--TEST--\nfirst\n--CODE--\na\n--EXPECT--\nb\n--TEST--\nsecond").unwrap();
        assert_eq!(fixture.name, "second");
    }

    #[test]
    fn carriage_returns_stripped_from_expected_only() {
        let fixture =
            parse("--TEST--\r\nCRLF\r\n--CODE--\r\nline1\r\nline2\r\n--EXPECT--\r\na\r\nb\r\n")
                .unwrap();
        assert_eq!(fixture.name, "CRLF");
        assert_eq!(fixture.code, "line1\r\nline2");
        assert_eq!(fixture.expected, "a\nb");
    }

    #[test]
    fn unknown_tags_are_ignored() {
        let fixture =
            parse("--TEST--\nT\n--COMMENT--\nignored\n--CODE--\nc\n--EXPECT--\ne").unwrap();
        assert_eq!(fixture.code, "c");
    }

    #[test]
    fn empty_optional_sections_count_as_absent() {
        let fixture = parse("--TEST--\nT\n--TARGET--\n\n--XFAIL--\n--CODE--\nc\n--EXPECT--\ne")
            .unwrap();
        assert_eq!(fixture.target, None);
        assert_eq!(fixture.xfail_reason, None);
    }

    #[test]
    fn parsing_is_deterministic() {
        let text = "--TEST--\nT\n--ARGS--\n--run\n--CODE--\nc\n--EXPECT--\ne\n";
        assert_eq!(parse(text).unwrap(), parse(text).unwrap());
    }

    #[test]
    fn target_filter() {
        let fixture = parse("--TEST--\nT\n--TARGET--\nx86\n--CODE--\nc\n--EXPECT--\ne").unwrap();
        assert!(fixture.skipped_on("aarch64"));
        assert!(!fixture.skipped_on("x86"));
        let untargeted = parse("--TEST--\nT\n--CODE--\nc\n--EXPECT--\ne").unwrap();
        assert!(!untargeted.skipped_on("anything"));
    }
}
