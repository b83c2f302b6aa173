/*!
 * Reader for the KeyValues text format used by package manifests
 *
 * A document is a sequence of `key value` pairs where a value is either a
 * string or a `{ ... }` block of further pairs. Keys and string values may be
 * quoted or bare; `//` starts a comment that runs to the end of the line.
 */

use std::iter::Peekable;
use std::str::Chars;

use super::error::{ManifestError, ManifestResult};

/// A value in a KeyValues document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Plain string value
    Str(String),
    /// Nested block of pairs
    Block(KeyValues),
}

/// An ordered block of key/value pairs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyValues {
    entries: Vec<(String, Value)>,
}

impl KeyValues {
    /// First value stored under `key`, compared case-insensitively
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// String value stored under `key`
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key) {
            Some(Value::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Block stored under `key`
    pub fn get_block(&self, key: &str) -> Option<&KeyValues> {
        match self.get(key) {
            Some(Value::Block(b)) => Some(b),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Token {
    Str(String),
    Open,
    Close,
}

struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            line: 1,
        }
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c == Some('\n') {
            self.line += 1;
        }
        c
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.chars.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('/') => {
                    let mut ahead = self.chars.clone();
                    ahead.next();
                    if ahead.peek() != Some(&'/') {
                        return;
                    }
                    while let Some(c) = self.bump() {
                        if c == '\n' {
                            break;
                        }
                    }
                }
                _ => return,
            }
        }
    }

    fn next_token(&mut self) -> ManifestResult<Option<Token>> {
        self.skip_trivia();
        let Some(&c) = self.chars.peek() else {
            return Ok(None);
        };

        match c {
            '{' => {
                self.bump();
                Ok(Some(Token::Open))
            }
            '}' => {
                self.bump();
                Ok(Some(Token::Close))
            }
            '"' => {
                self.bump();
                self.quoted().map(|s| Some(Token::Str(s)))
            }
            _ => Ok(Some(Token::Str(self.bare()))),
        }
    }

    fn quoted(&mut self) -> ManifestResult<String> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None => return Err(ManifestError::UnexpectedEof { line: self.line }),
                Some('"') => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => return Err(ManifestError::UnexpectedEof { line: self.line }),
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn bare(&mut self) -> String {
        let mut out = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || c == '{' || c == '}' || c == '"' {
                break;
            }
            out.push(c);
            self.bump();
        }
        out
    }
}

/// Parse a KeyValues document
pub fn parse(input: &str) -> ManifestResult<KeyValues> {
    let mut lexer = Lexer::new(input);
    parse_block(&mut lexer, true)
}

fn parse_block(lexer: &mut Lexer<'_>, top_level: bool) -> ManifestResult<KeyValues> {
    let mut block = KeyValues::default();

    loop {
        let key = match lexer.next_token()? {
            Some(Token::Str(key)) => key,
            Some(Token::Close) if !top_level => return Ok(block),
            Some(Token::Close) => return Err(ManifestError::Unbalanced { line: lexer.line }),
            Some(Token::Open) => {
                return Err(ManifestError::UnexpectedToken {
                    found: '{',
                    line: lexer.line,
                })
            }
            None if top_level => return Ok(block),
            None => return Err(ManifestError::UnexpectedEof { line: lexer.line }),
        };

        let value = match lexer.next_token()? {
            Some(Token::Str(value)) => Value::Str(value),
            Some(Token::Open) => Value::Block(parse_block(lexer, false)?),
            Some(Token::Close) => {
                return Err(ManifestError::UnexpectedToken {
                    found: '}',
                    line: lexer.line,
                })
            }
            None => return Err(ManifestError::UnexpectedEof { line: lexer.line }),
        };

        block.entries.push((key, value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
"AppState"
{
	"appid"		"228980"
	"Universe"		"1"
	"name"		"Steamworks \"Common\" Redistributables"
	"installdir"		"Steamworks Shared"
	// depots are nested one level deeper
	"InstalledDepots"
	{
		"228990"
		{
			"manifest"		"1829726630299308803"
		}
	}
}
"#;

    #[test]
    fn test_parse_nested_document() {
        let doc = parse(SAMPLE).unwrap();
        let app = doc.get_block("AppState").unwrap();

        assert_eq!(app.get_str("appid"), Some("228980"));
        assert_eq!(
            app.get_str("name"),
            Some("Steamworks \"Common\" Redistributables")
        );
        assert_eq!(app.get_str("INSTALLDIR"), Some("Steamworks Shared"));

        let depot = app
            .get_block("InstalledDepots")
            .and_then(|d| d.get_block("228990"))
            .unwrap();
        assert_eq!(depot.get_str("manifest"), Some("1829726630299308803"));
    }

    #[test]
    fn test_parse_bare_tokens() {
        let doc = parse("root { key value other \"quoted value\" }").unwrap();
        let root = doc.get_block("root").unwrap();
        assert_eq!(root.len(), 2);
        assert_eq!(root.get_str("key"), Some("value"));
        assert_eq!(root.get_str("other"), Some("quoted value"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            parse("\"AppState\"\n{\n\"name\" \"x\"\n"),
            Err(ManifestError::UnexpectedEof { .. })
        ));
        assert!(matches!(
            parse("\"a\" \"b\" }"),
            Err(ManifestError::Unbalanced { line: 1 })
        ));
        assert!(matches!(
            parse("\"a\" { \"b\" }"),
            Err(ManifestError::UnexpectedToken { found: '}', .. })
        ));
        assert!(matches!(
            parse("\"unterminated"),
            Err(ManifestError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse("  // only a comment\n").unwrap().is_empty());
    }
}
