//! Recursive-descent decoder for the legacy property-list text format.

use std::collections::BTreeMap;

use super::Value;
use crate::error::{ProjectError, Result};

/// Decodes a legacy property-list document into a [`Value`] tree.
///
/// Comments (`// ...` and `/* ... */`) are discarded, including the
/// `// !$*UTF8*$!` header Xcode writes on the first line.
///
/// # Errors
///
/// Returns [`ProjectError::Decode`] with the 1-based line of the first
/// unexpected character.
pub fn decode(text: &str) -> Result<Value> {
    let mut parser = Parser { src: text, pos: 0, line: 1 };
    parser.skip_trivia()?;
    let value = parser.value()?;
    parser.skip_trivia()?;
    if let Some(c) = parser.peek() {
        return Err(parser.error(format!("unexpected trailing character {c:?}")));
    }
    Ok(value)
}

struct Parser<'s> {
    src: &'s str,
    pos: usize,
    line: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn starts_with(&self, pat: &str) -> bool {
        self.src[self.pos..].starts_with(pat)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn error(&self, message: impl Into<String>) -> ProjectError {
        ProjectError::Decode { line: self.line, message: message.into() }
    }

    fn expect(&mut self, want: char) -> Result<()> {
        match self.peek() {
            Some(c) if c == want => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected {want:?}, found {c:?}"))),
            None => Err(self.error(format!("expected {want:?}, found end of input"))),
        }
    }

    fn skip_trivia(&mut self) -> Result<()> {
        loop {
            if self.starts_with("//") {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else if self.starts_with("/*") {
                let start = self.line;
                self.pos += 2;
                loop {
                    if self.starts_with("*/") {
                        self.pos += 2;
                        break;
                    }
                    if self.bump().is_none() {
                        return Err(ProjectError::Decode {
                            line: start,
                            message: "unterminated comment".to_string(),
                        });
                    }
                }
            } else if self.peek().is_some_and(char::is_whitespace) {
                self.bump();
            } else {
                return Ok(());
            }
        }
    }

    fn value(&mut self) -> Result<Value> {
        match self.peek() {
            Some('{') => self.dictionary(),
            Some('(') => self.array(),
            Some(_) => self.string().map(Value::String),
            None => Err(self.error("expected a value, found end of input")),
        }
    }

    fn dictionary(&mut self) -> Result<Value> {
        self.expect('{')?;
        let mut map = BTreeMap::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Value::Dictionary(map));
            }
            let key = self.string()?;
            self.skip_trivia()?;
            self.expect('=')?;
            self.skip_trivia()?;
            let value = self.value()?;
            self.skip_trivia()?;
            self.expect(';')?;
            map.insert(key, value);
        }
    }

    fn array(&mut self) -> Result<Value> {
        self.expect('(')?;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            if self.peek() == Some(')') {
                self.bump();
                return Ok(Value::Array(items));
            }
            items.push(self.value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(')') => {}
                _ => return Err(self.error("expected ',' or ')' in array")),
            }
        }
    }

    fn string(&mut self) -> Result<String> {
        match self.peek() {
            Some(q @ ('"' | '\'')) => {
                self.bump();
                self.quoted(q)
            }
            _ => self.unquoted(),
        }
    }

    fn quoted(&mut self, quote: char) -> Result<String> {
        let start = self.line;
        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => out.push(self.escape()?),
                Some(c) => out.push(c),
                None => {
                    return Err(ProjectError::Decode {
                        line: start,
                        message: "unterminated string".to_string(),
                    })
                }
            }
        }
    }

    fn escape(&mut self) -> Result<char> {
        let Some(c) = self.bump() else {
            return Err(self.error("dangling escape at end of input"));
        };
        Ok(match c {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'v' => '\u{b}',
            'U' => {
                let hex: String = (0..4).filter_map(|_| self.bump()).collect();
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| self.error(format!("invalid unicode escape \\U{hex}")))?
            }
            other => other,
        })
    }

    fn unquoted(&mut self) -> Result<String> {
        let begin = self.pos;
        while let Some(c) = self.peek() {
            let delimiter = c.is_whitespace() || "{}();,=\"'".contains(c);
            if delimiter || self.starts_with("//") || self.starts_with("/*") {
                break;
            }
            self.bump();
        }
        if self.pos == begin {
            let found = self.peek().map_or("end of input".to_string(), |c| format!("{c:?}"));
            return Err(self.error(format!("expected a string, found {found}")));
        }
        Ok(self.src[begin..self.pos].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dict(value: &Value) -> &BTreeMap<String, Value> {
        value.as_dictionary().unwrap()
    }

    #[test]
    fn decodes_nested_structures_and_drops_comments() {
        let text = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	objects = {
/* Begin PBXGroup section */
		29B97314FDCFA39411CA2CEA /* CustomTemplate */ = {
			isa = PBXGroup;
			children = (
				080E96DDFE201D6D7F000001 /* Classes */,
			);
			sourceTree = "<group>";
		};
/* End PBXGroup section */
	};
}
"#;
        let value = decode(text).unwrap();
        let objects = dict(&dict(&value)["objects"]);
        let group = dict(&objects["29B97314FDCFA39411CA2CEA"]);
        assert_eq!(group["isa"].as_str(), Some("PBXGroup"));
        assert_eq!(group["sourceTree"].as_str(), Some("<group>"));
        let children = group["children"].as_array().unwrap();
        assert_eq!(children, &[Value::from("080E96DDFE201D6D7F000001")]);
    }

    #[test]
    fn decodes_escapes_in_quoted_strings() {
        let value = decode(r#"{ a = "say \"hi\"\n\U00e9"; b = 'it\'s'; }"#).unwrap();
        assert_eq!(dict(&value)["a"].as_str(), Some("say \"hi\"\n\u{e9}"));
        assert_eq!(dict(&value)["b"].as_str(), Some("it's"));
    }

    #[test]
    fn unquoted_tokens_keep_slashes_and_dollars() {
        let value = decode("{ path = Classes/main.m; root = $SRCROOT/Libs; }").unwrap();
        assert_eq!(dict(&value)["path"].as_str(), Some("Classes/main.m"));
        assert_eq!(dict(&value)["root"].as_str(), Some("$SRCROOT/Libs"));
    }

    #[test]
    fn trailing_comma_is_optional() {
        let value = decode("( a, b )").unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
    }

    #[test]
    fn reports_line_of_missing_semicolon() {
        let err = decode("{\n a = b\n c = d; }").unwrap_err();
        match err {
            ProjectError::Decode { line, message } => {
                assert_eq!(line, 3);
                assert!(message.contains("';'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
