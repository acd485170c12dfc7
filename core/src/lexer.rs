//! Lexer for schema definition language text.
//!
//! The lexer converts source text into a stream of tokens. Commas, whitespace
//! and the byte order mark are insignificant and skipped; `#` comments are
//! returned as [`TokenKind::Comment`] so the parser can attach them to the
//! declaration that follows.

/// Position of a token in the source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Span {
    /// 1-based line number where the token starts.
    pub line: u32,
    /// 1-based column number where the token starts.
    pub column: u32,
}

impl Span {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// Token categories produced by the [`Lexer`].
#[derive(Clone, Debug, PartialEq)]
pub enum TokenKind {
    Bang,
    Dollar,
    Amp,
    LParen,
    RParen,
    Spread,
    Colon,
    Equals,
    At,
    LBracket,
    RBracket,
    LBrace,
    Pipe,
    RBrace,
    Name(String),
    Int(String),
    Float(String),
    /// String literal, already unescaped.
    String(String),
    /// Block string literal, already dedented.
    BlockString(String),
    /// Comment text with the leading `#` removed.
    Comment(String),
    Eof,
    /// Lexing failed; the message describes why.
    Error(String),
}

impl TokenKind {
    /// Human-readable token description for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Bang => "\"!\"".to_string(),
            Self::Dollar => "\"$\"".to_string(),
            Self::Amp => "\"&\"".to_string(),
            Self::LParen => "\"(\"".to_string(),
            Self::RParen => "\")\"".to_string(),
            Self::Spread => "\"...\"".to_string(),
            Self::Colon => "\":\"".to_string(),
            Self::Equals => "\"=\"".to_string(),
            Self::At => "\"@\"".to_string(),
            Self::LBracket => "\"[\"".to_string(),
            Self::RBracket => "\"]\"".to_string(),
            Self::LBrace => "\"{\"".to_string(),
            Self::Pipe => "\"|\"".to_string(),
            Self::RBrace => "\"}\"".to_string(),
            Self::Name(name) => format!("name \"{name}\""),
            Self::Int(raw) => format!("int {raw}"),
            Self::Float(raw) => format!("float {raw}"),
            Self::String(_) => "string".to_string(),
            Self::BlockString(_) => "block string".to_string(),
            Self::Comment(_) => "comment".to_string(),
            Self::Eof => "end of input".to_string(),
            Self::Error(msg) => msg.clone(),
        }
    }
}

/// A token with its position.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Lexer for schema definition language source.
pub struct Lexer<'src> {
    /// Remaining source text.
    rest: &'src str,
    /// Current line number (1-based).
    line: u32,
    /// Current column number (1-based).
    column: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            rest: source.strip_prefix('\u{feff}').unwrap_or(source),
            line: 1,
            column: 1,
        }
    }

    /// Line the lexer is currently positioned on; after a token has been
    /// read this is the line the token ended on.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns the next token from the source.
    pub fn next_token(&mut self) -> Token {
        self.skip_ignored();

        let span = Span::new(self.line, self.column);
        let Some(c) = self.peek_char() else {
            return Token::new(TokenKind::Eof, span);
        };

        let kind = match c {
            '!' => self.single(TokenKind::Bang),
            '$' => self.single(TokenKind::Dollar),
            '&' => self.single(TokenKind::Amp),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            ':' => self.single(TokenKind::Colon),
            '=' => self.single(TokenKind::Equals),
            '@' => self.single(TokenKind::At),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '{' => self.single(TokenKind::LBrace),
            '|' => self.single(TokenKind::Pipe),
            '}' => self.single(TokenKind::RBrace),
            '.' => {
                if self.rest.starts_with("...") {
                    self.advance_by(3);
                    TokenKind::Spread
                } else {
                    self.advance();
                    TokenKind::Error("unexpected \".\"; did you mean \"...\"?".to_string())
                }
            }
            '#' => self.read_comment(),
            '"' => {
                if self.rest.starts_with("\"\"\"") {
                    self.read_block_string()
                } else {
                    self.read_string()
                }
            }
            '-' | '0'..='9' => self.read_number(),
            c if c == '_' || c.is_ascii_alphabetic() => self.read_name(),
            other => {
                self.advance();
                TokenKind::Error(format!("unexpected character {other:?}"))
            }
        };

        Token::new(kind, span)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.rest = &self.rest[c.len_utf8()..];
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else if c == '\r' {
            // \r\n counts as one line break
            if self.peek_char() != Some('\n') {
                self.line += 1;
                self.column = 1;
            }
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn advance_by(&mut self, n: usize) {
        for _ in 0..n {
            self.advance();
        }
    }

    fn skip_ignored(&mut self) {
        while let Some(c) = self.peek_char() {
            match c {
                ' ' | '\t' | '\n' | '\r' | ',' | '\u{feff}' => {
                    self.advance();
                }
                _ => break,
            }
        }
    }

    fn read_comment(&mut self) -> TokenKind {
        self.advance();
        let mut text = String::new();
        while let Some(c) = self.peek_char() {
            if c == '\n' || c == '\r' {
                break;
            }
            text.push(c);
            self.advance();
        }
        let text = text.strip_prefix(' ').unwrap_or(&text).trim_end();
        TokenKind::Comment(text.to_string())
    }

    fn read_name(&mut self) -> TokenKind {
        let mut name = String::new();
        while let Some(c) = self.peek_char() {
            if c == '_' || c.is_ascii_alphanumeric() {
                name.push(c);
                self.advance();
            } else {
                break;
            }
        }
        TokenKind::Name(name)
    }

    fn read_digits(&mut self, out: &mut String) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                out.push(c);
                self.advance();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    fn read_number(&mut self) -> TokenKind {
        let mut raw = String::new();
        let mut is_float = false;

        if self.peek_char() == Some('-') {
            raw.push('-');
            self.advance();
        }

        if self.peek_char() == Some('0') {
            raw.push('0');
            self.advance();
            if self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
                return TokenKind::Error(format!("invalid number, unexpected digit after 0: {raw}"));
            }
        } else if self.read_digits(&mut raw) == 0 {
            return TokenKind::Error(format!("invalid number, expected digit after {raw:?}"));
        }

        if self.peek_char() == Some('.') && self.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            raw.push('.');
            self.advance();
            self.read_digits(&mut raw);
        }

        if let Some(marker @ ('e' | 'E')) = self.peek_char() {
            is_float = true;
            raw.push(marker);
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.peek_char() {
                raw.push(sign);
                self.advance();
            }
            if self.read_digits(&mut raw) == 0 {
                return TokenKind::Error(format!("invalid number, expected exponent digits: {raw}"));
            }
        }

        if self
            .peek_char()
            .is_some_and(|c| c == '_' || c == '.' || c.is_ascii_alphabetic())
        {
            return TokenKind::Error(format!("invalid number, unexpected character after {raw}"));
        }

        if is_float {
            TokenKind::Float(raw)
        } else {
            TokenKind::Int(raw)
        }
    }

    fn read_string(&mut self) -> TokenKind {
        self.advance();
        let mut value = String::new();

        loop {
            let Some(c) = self.peek_char() else {
                return TokenKind::Error("unterminated string".to_string());
            };
            match c {
                '"' => {
                    self.advance();
                    return TokenKind::String(value);
                }
                '\n' | '\r' => return TokenKind::Error("unterminated string".to_string()),
                '\\' => {
                    self.advance();
                    match self.advance() {
                        Some('"') => value.push('"'),
                        Some('\\') => value.push('\\'),
                        Some('/') => value.push('/'),
                        Some('b') => value.push('\u{8}'),
                        Some('f') => value.push('\u{c}'),
                        Some('n') => value.push('\n'),
                        Some('r') => value.push('\r'),
                        Some('t') => value.push('\t'),
                        Some('u') => match self.read_unicode_escape() {
                            Some(ch) => value.push(ch),
                            None => {
                                return TokenKind::Error("invalid unicode escape".to_string());
                            }
                        },
                        Some(other) => {
                            return TokenKind::Error(format!("invalid escape sequence \\{other}"));
                        }
                        None => return TokenKind::Error("unterminated string".to_string()),
                    }
                }
                other => {
                    value.push(other);
                    self.advance();
                }
            }
        }
    }

    fn read_unicode_escape(&mut self) -> Option<char> {
        let mut hex = String::with_capacity(4);
        for _ in 0..4 {
            hex.push(self.advance()?);
        }
        let code = u32::from_str_radix(&hex, 16).ok()?;
        char::from_u32(code)
    }

    fn read_block_string(&mut self) -> TokenKind {
        self.advance_by(3);
        let mut raw = String::new();

        loop {
            if self.rest.starts_with("\"\"\"") {
                self.advance_by(3);
                return TokenKind::BlockString(block_string_value(&raw));
            }
            if self.rest.starts_with("\\\"\"\"") {
                self.advance_by(4);
                raw.push_str("\"\"\"");
                continue;
            }
            match self.advance() {
                Some(c) => raw.push(c),
                None => return TokenKind::Error("unterminated block string".to_string()),
            }
        }
    }
}

/// Dedents a raw block string and trims blank leading and trailing lines.
pub fn block_string_value(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.split('\n').collect();

    let common_indent = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let indent = line.chars().take_while(|c| *c == ' ' || *c == '\t').count();
            (indent < line.chars().count()).then_some(indent)
        })
        .min()
        .unwrap_or(0);

    let mut dedented: Vec<String> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line.to_string()
            } else {
                line.chars().skip(common_indent).collect()
            }
        })
        .collect();

    let is_blank = |line: &String| line.chars().all(|c| c == ' ' || c == '\t');
    while dedented.first().is_some_and(is_blank) {
        dedented.remove(0);
    }
    while dedented.last().is_some_and(is_blank) {
        dedented.pop();
    }

    dedented.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(source);
        let mut out = Vec::new();
        loop {
            let token = lexer.next_token();
            if token.kind == TokenKind::Eof {
                break;
            }
            out.push(token.kind);
        }
        out
    }

    #[test]
    fn test_lexes_punctuation_and_names() {
        assert_eq!(
            kinds("type User { id: ID! }"),
            vec![
                TokenKind::Name("type".into()),
                TokenKind::Name("User".into()),
                TokenKind::LBrace,
                TokenKind::Name("id".into()),
                TokenKind::Colon,
                TokenKind::Name("ID".into()),
                TokenKind::Bang,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_commas_are_insignificant() {
        assert_eq!(
            kinds("a,,b"),
            vec![TokenKind::Name("a".into()), TokenKind::Name("b".into())]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("0 -12 1.5 2e10 -3.1E-2"),
            vec![
                TokenKind::Int("0".into()),
                TokenKind::Int("-12".into()),
                TokenKind::Float("1.5".into()),
                TokenKind::Float("2e10".into()),
                TokenKind::Float("-3.1E-2".into()),
            ]
        );
        assert!(matches!(kinds("01")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\"b\nA""#),
            vec![TokenKind::String("a\"b\nA".into())]
        );
        assert!(matches!(kinds("\"open")[0], TokenKind::Error(_)));
    }

    #[test]
    fn test_block_string_is_dedented() {
        let source = "\"\"\"\n    Hello,\n      World!\n\n    Yours\n  \"\"\"";
        assert_eq!(
            kinds(source),
            vec![TokenKind::BlockString("Hello,\n  World!\n\nYours".into())]
        );
    }

    #[test]
    fn test_comment_token_strips_marker() {
        let mut lexer = Lexer::new("# The user\ntype");
        let comment = lexer.next_token();
        assert_eq!(comment.kind, TokenKind::Comment("The user".into()));
        assert_eq!(comment.span, Span::new(1, 1));
        let name = lexer.next_token();
        assert_eq!(name.span, Span::new(2, 1));
    }

    #[test]
    fn test_spread_and_lone_dot() {
        assert_eq!(kinds("..."), vec![TokenKind::Spread]);
        assert!(matches!(kinds(".")[0], TokenKind::Error(_)));
    }
}
