// ============================================================================
// mp4utils-core/src/script/lexer.rs
// ============================================================================
//
// SCRIPT LEXER: One Script Line to Typed Tokens
//
// Grammar (two states, switched by the literal " | "):
//
//   main:  bv:<digits>  ba:<digits>  <word>  " | " (-> files)  whitespace
//   files: <word>  whitespace
//
// where <word> is [._0-9A-Za-z-]+. Alternatives are tried in that order at
// each position and the first match wins, so `bv:300` is a bitrate while
// `bvx` is a word. Anything else is a lexical error for the whole line.
// Words without an extension get `.mp4` appended here.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::video::naming::auto_append_extension;

/// The separator between a join target and its children.
pub const SEPARATOR: &str = " | ";

static VIDEO_BITRATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^bv:(\d+)").unwrap());
static AUDIO_BITRATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^ba:(\d+)").unwrap());
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[._0-9A-Za-z-]+").unwrap());
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s+").unwrap());

/// One lexical unit of a script line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptToken {
    VideoBitrateOverride(u32),
    AudioBitrateOverride(u32),
    /// A word before the separator.
    JoinTargetName(String),
    /// A word after the separator.
    ChildFileName(String),
    Separator,
}

impl fmt::Display for ScriptToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScriptToken::VideoBitrateOverride(v) => write!(f, "bv:{v}"),
            ScriptToken::AudioBitrateOverride(v) => write!(f, "ba:{v}"),
            ScriptToken::JoinTargetName(name) | ScriptToken::ChildFileName(name) => {
                f.write_str(name)
            }
            ScriptToken::Separator => f.write_str("|"),
        }
    }
}

/// A line that does not match the grammar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unexpected '{found}' at column {column}")]
pub struct LexError {
    /// 1-based character column of the offending input.
    pub column: usize,
    /// The offending input, up to the next whitespace.
    pub found: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LexState {
    Main,
    Files,
}

/// Splits one script line into tokens.
pub fn tokenize_line(line: &str) -> Result<Vec<ScriptToken>, LexError> {
    let mut tokens = Vec::new();
    let mut state = LexState::Main;
    let mut pos = 0;

    while pos < line.len() {
        let rest = &line[pos..];

        if state == LexState::Main {
            if let Some(caps) = VIDEO_BITRATE.captures(rest) {
                tokens.push(ScriptToken::VideoBitrateOverride(parse_bitrate(line, pos, &caps[1])?));
                pos += caps[0].len();
                continue;
            }
            if let Some(caps) = AUDIO_BITRATE.captures(rest) {
                tokens.push(ScriptToken::AudioBitrateOverride(parse_bitrate(line, pos, &caps[1])?));
                pos += caps[0].len();
                continue;
            }
        }

        if let Some(word) = WORD.find(rest) {
            let name = auto_append_extension(word.as_str());
            tokens.push(match state {
                LexState::Main => ScriptToken::JoinTargetName(name),
                LexState::Files => ScriptToken::ChildFileName(name),
            });
            pos += word.end();
            continue;
        }

        if state == LexState::Main && rest.starts_with(SEPARATOR) {
            tokens.push(ScriptToken::Separator);
            state = LexState::Files;
            pos += SEPARATOR.len();
            continue;
        }

        if let Some(space) = WHITESPACE.find(rest) {
            pos += space.end();
            continue;
        }

        return Err(error_at(line, pos));
    }

    Ok(tokens)
}

fn parse_bitrate(line: &str, pos: usize, digits: &str) -> Result<u32, LexError> {
    digits.parse::<u32>().map_err(|_| error_at(line, pos))
}

fn error_at(line: &str, pos: usize) -> LexError {
    let found: String = line[pos..]
        .chars()
        .take_while(|c| !c.is_whitespace())
        .collect();
    LexError {
        column: line[..pos].chars().count() + 1,
        found: if found.is_empty() {
            line[pos..].chars().take(1).collect()
        } else {
            found
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ScriptToken::*;

    #[test]
    fn test_blank_line_has_no_tokens() {
        assert!(tokenize_line("").unwrap().is_empty());
        assert!(tokenize_line("   \t ").unwrap().is_empty());
    }

    #[test]
    fn test_full_join_line() {
        let tokens = tokenize_line("bv:3000 ba:128 out.mp4 | a.avi b.mkv").unwrap();
        assert_eq!(
            tokens,
            vec![
                VideoBitrateOverride(3000),
                AudioBitrateOverride(128),
                JoinTargetName("out.mp4".to_string()),
                Separator,
                ChildFileName("a.avi".to_string()),
                ChildFileName("b.mkv".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_extensions_get_mp4() {
        let tokens = tokenize_line("merged | part1 part-2.mov").unwrap();
        assert_eq!(
            tokens,
            vec![
                JoinTargetName("merged.mp4".to_string()),
                Separator,
                ChildFileName("part1.mp4".to_string()),
                ChildFileName("part-2.mov".to_string()),
            ]
        );
    }

    #[test]
    fn test_single_word() {
        assert_eq!(
            tokenize_line("clip_01.avi").unwrap(),
            vec![JoinTargetName("clip_01.avi".to_string())]
        );
    }

    #[test]
    fn test_bitrate_prefix_inside_word() {
        // "bvx" is not a bitrate, and bitrates are not recognised after the separator.
        assert_eq!(
            tokenize_line("bvx | bv").unwrap(),
            vec![
                JoinTargetName("bvx.mp4".to_string()),
                Separator,
                ChildFileName("bv.mp4".to_string()),
            ]
        );
    }

    #[test]
    fn test_invalid_character_is_error() {
        let err = tokenize_line("out.mp4 | a.avi b$c.mkv").unwrap_err();
        assert_eq!(err.column, 18);
        assert_eq!(err.found, "$c.mkv");
    }

    #[test]
    fn test_separator_requires_single_spaces() {
        assert!(tokenize_line("out.mp4  | a.avi").is_err());
        assert!(tokenize_line("out.mp4 |a.avi").is_err());
    }

    #[test]
    fn test_second_separator_is_error() {
        assert!(tokenize_line("out.mp4 | a.avi | b.avi").is_err());
    }

    #[test]
    fn test_bitrate_in_files_state_is_error() {
        assert!(tokenize_line("out.mp4 | bv:300").is_err());
    }

    #[test]
    fn test_bitrate_overflow_is_error() {
        let err = tokenize_line("bv:99999999999 a.mp4").unwrap_err();
        assert_eq!(err.column, 1);
    }

    #[test]
    fn test_token_display() {
        assert_eq!(VideoBitrateOverride(900).to_string(), "bv:900");
        assert_eq!(Separator.to_string(), "|");
    }
}
