use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::types::{Play, POWERBALL_MAX, POWERBALL_MIN, WHITE_MAX, WHITE_MIN};

// Lines shorter than this are header/footer fragments, not plays.
const MIN_LINE_LEN: usize = 10;
// A play line recognizes at least six in-range integers: five whites and
// the powerball.
const MIN_LINE_NUMBERS: usize = 6;

// Known miscognitions of the printed "PB" glyph and of leading zeros. Digit
// classes are ASCII-only: `\d` would also match other scripts' decimal
// digits, which the byte-wise run splitting must never see.
static WORD_MB_KB: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[MK]B\b").unwrap());
static RUN_OF_MS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"m+\s?([0-9])").unwrap());
static BARE_B_DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bB([0-9]{1,2})").unwrap());
static DIGITS_THEN_B: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9])B\b").unwrap());
static DIGIT_THEN_PB: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9])PB").unwrap());
static O_BEFORE_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"O([0-9])").unwrap());
static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{4,}").unwrap());
static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]{1,2}").unwrap());
static PB_NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"PB\s*([0-9]{1,2})").unwrap());

// Text repair
//------------------------------------------------------------------------------

/// Applies the fixed substitution list, in order, to recognized text:
/// marker miscognitions become "PB", stray letters become digits, and runs
/// of four or more digits split into two-digit chunks (an odd trailing
/// digit stays alone).
pub fn repair(text: &str) -> String {
    let t = WORD_MB_KB.replace_all(text, "PB");
    let t = RUN_OF_MS.replace_all(&t, "PB $1");
    let t = BARE_B_DIGITS.replace_all(&t, "PB $1");
    let t = DIGITS_THEN_B.replace_all(&t, "$1");
    let t = DIGIT_THEN_PB.replace_all(&t, "$1 PB");
    let t = t.replace("Ba", "04").replace("Oa", "04");
    let t = O_BEFORE_DIGIT.replace_all(&t, "0$1");
    let t = DIGIT_RUN.replace_all(&t, |caps: &Captures| split_run(&caps[0]));
    t.into_owned()
}

// The run is ASCII by construction of DIGIT_RUN, so byte chunks are chars.
fn split_run(run: &str) -> String {
    run.as_bytes()
        .chunks(2)
        .map(|chunk| std::str::from_utf8(chunk).expect("digit run is ascii"))
        .collect::<Vec<_>>()
        .join(" ")
}

// Line extraction
//------------------------------------------------------------------------------

/// Extracts plays from recognized ticket text. Runs only when the
/// template-matching path produced nothing; it is deliberately conservative
/// and yields fewer, higher-confidence plays.
pub fn extract(text: &str) -> Vec<Play> {
    let repaired = repair(text);
    let plays: Vec<Play> = repaired
        .lines()
        .filter(|line| line.len() >= MIN_LINE_LEN)
        .filter_map(extract_line)
        .collect();
    debug!(plays = plays.len(), "textual fallback complete");
    plays
}

fn extract_line(line: &str) -> Option<Play> {
    // In-range integers with their positions; positions disambiguate which
    // occurrence the "PB N" anchor refers to.
    let numbers: Vec<(usize, u8)> = NUMBER
        .find_iter(line)
        .filter_map(|m| m.as_str().parse::<u8>().ok().map(|v| (m.start(), v)))
        .filter(|&(_, v)| (WHITE_MIN..=WHITE_MAX).contains(&v))
        .collect();
    if numbers.len() < MIN_LINE_NUMBERS {
        return None;
    }

    let anchor = PB_NUMBER.captures(line).and_then(|caps| {
        let m = caps.get(1)?;
        let n: u8 = m.as_str().parse().ok()?;
        ((POWERBALL_MIN..=POWERBALL_MAX).contains(&n)).then_some((m.start(), n))
    });

    let (pivot, powerball) = match anchor {
        Some((start, n)) => (numbers.iter().position(|&(s, _)| s == start)?, n),
        None => (numbers.len() - 1, numbers[numbers.len() - 1].1),
    };

    if pivot < 5 {
        return None;
    }
    let white: Vec<u8> = numbers[pivot - 5..pivot].iter().map(|&(_, v)| v).collect();
    Play::from_parts(&white, powerball)
}
