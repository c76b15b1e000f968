// ABOUTME: Hand-rolled byte lexer turning source text into a token stream

use crate::token::{lookup_ident, Token, TokenKind};

/// Scans a source string one byte at a time, handing out tokens on demand
/// via `next_token`. ASCII-only, matching the language's identifier and
/// literal rules.
pub struct Lexer {
    input: Vec<u8>,
    position: usize,
    read_position: usize,
    ch: u8,
    line: usize,
    column: usize,
    // column of `ch` itself, tracked alongside position/read_position
    ch_line: usize,
    ch_column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        let mut lexer = Lexer {
            input: input.as_bytes().to_vec(),
            position: 0,
            read_position: 0,
            ch: 0,
            line: 1,
            column: 0,
            ch_line: 1,
            ch_column: 0,
        };
        lexer.read_char();
        lexer
    }

    fn read_char(&mut self) {
        if self.ch == b'\n' {
            self.line += 1;
            self.column = 0;
        }

        self.ch = if self.read_position >= self.input.len() {
            0
        } else {
            self.input[self.read_position]
        };
        self.position = self.read_position;
        self.read_position += 1;
        self.column += 1;
        self.ch_line = self.line;
        self.ch_column = self.column;
    }

    fn peek_char(&self) -> u8 {
        if self.read_position >= self.input.len() {
            0
        } else {
            self.input[self.read_position]
        }
    }

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        if self.ch == b'/' && self.peek_char() == b'/' {
            self.skip_single_line_comment();
            return self.next_token();
        }
        if self.ch == b'/' && self.peek_char() == b'*' {
            self.skip_multi_line_comment();
            return self.next_token();
        }

        let line = self.ch_line;
        let column = self.ch_column;

        let tok = match self.ch {
            b'=' => {
                if self.peek_char() == b'=' {
                    let ch = self.ch;
                    self.read_char();
                    let literal = format!("{}{}", ch as char, self.ch as char);
                    Token::new(TokenKind::Eq, literal, line, column)
                } else {
                    Token::new(TokenKind::Assign, "=", line, column)
                }
            }
            b'+' => match self.peek_char() {
                b'+' => {
                    self.read_char();
                    Token::new(TokenKind::PlusPlus, "++", line, column)
                }
                b'=' => {
                    self.read_char();
                    Token::new(TokenKind::PlusAssign, "+=", line, column)
                }
                _ => Token::new(TokenKind::Plus, "+", line, column),
            },
            b'-' => match self.peek_char() {
                b'-' => {
                    self.read_char();
                    Token::new(TokenKind::MinusMinus, "--", line, column)
                }
                b'=' => {
                    self.read_char();
                    Token::new(TokenKind::MinusAssign, "-=", line, column)
                }
                _ => Token::new(TokenKind::Minus, "-", line, column),
            },
            b'!' => {
                if self.peek_char() == b'=' {
                    let ch = self.ch;
                    self.read_char();
                    let literal = format!("{}{}", ch as char, self.ch as char);
                    Token::new(TokenKind::NotEq, literal, line, column)
                } else {
                    Token::new(TokenKind::Bang, "!", line, column)
                }
            }
            b'/' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    Token::new(TokenKind::SlashAssign, "/=", line, column)
                } else {
                    Token::new(TokenKind::Slash, "/", line, column)
                }
            }
            b'*' => {
                if self.peek_char() == b'=' {
                    self.read_char();
                    Token::new(TokenKind::AsteriskAssign, "*=", line, column)
                } else {
                    Token::new(TokenKind::Asterisk, "*", line, column)
                }
            }
            b'<' => {
                if self.peek_char() == b'=' {
                    let ch = self.ch;
                    self.read_char();
                    let literal = format!("{}{}", ch as char, self.ch as char);
                    Token::new(TokenKind::Lte, literal, line, column)
                } else {
                    Token::new(TokenKind::Lt, "<", line, column)
                }
            }
            b'>' => {
                if self.peek_char() == b'=' {
                    let ch = self.ch;
                    self.read_char();
                    let literal = format!("{}{}", ch as char, self.ch as char);
                    Token::new(TokenKind::Gte, literal, line, column)
                } else {
                    Token::new(TokenKind::Gt, ">", line, column)
                }
            }
            b';' => Token::new(TokenKind::Semicolon, ";", line, column),
            b':' => Token::new(TokenKind::Colon, ":", line, column),
            b',' => Token::new(TokenKind::Comma, ",", line, column),
            b'{' => Token::new(TokenKind::Lbrace, "{", line, column),
            b'}' => Token::new(TokenKind::Rbrace, "}", line, column),
            b'(' => Token::new(TokenKind::Lparen, "(", line, column),
            b')' => Token::new(TokenKind::Rparen, ")", line, column),
            b'[' => Token::new(TokenKind::Lbracket, "[", line, column),
            b']' => Token::new(TokenKind::Rbracket, "]", line, column),
            b'"' => {
                let literal = self.read_string();
                Token::new(TokenKind::String, literal, line, column)
            }
            0 => Token::new(TokenKind::Eof, "", line, column),
            ch if is_letter(ch) => {
                let literal = self.read_identifier();
                let kind = lookup_ident(&literal);
                return Token::new(kind, literal, line, column);
            }
            ch if is_digit(ch) => return self.read_number(line, column),
            ch => Token::new(TokenKind::Illegal, (ch as char).to_string(), line, column),
        };

        self.read_char();
        tok
    }

    fn skip_single_line_comment(&mut self) {
        while self.ch != b'\n' && self.ch != 0 {
            self.read_char();
        }
        self.skip_whitespace();
    }

    fn skip_multi_line_comment(&mut self) {
        // consume "/*"
        self.read_char();
        self.read_char();
        loop {
            if self.ch == 0 {
                break;
            }
            if self.ch == b'*' && self.peek_char() == b'/' {
                self.read_char();
                self.read_char();
                break;
            }
            self.read_char();
        }
        self.skip_whitespace();
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.ch, b' ' | b'\t' | b'\n' | b'\r') {
            self.read_char();
        }
    }

    fn read_identifier(&mut self) -> String {
        let start = self.position;
        while is_letter(self.ch) || is_digit(self.ch) {
            self.read_char();
        }
        String::from_utf8_lossy(&self.input[start..self.position]).into_owned()
    }

    fn read_number(&mut self, line: usize, column: usize) -> Token {
        let start = self.position;
        while is_digit(self.ch) || self.ch == b'.' {
            self.read_char();
        }
        let text = String::from_utf8_lossy(&self.input[start..self.position]).into_owned();
        let dot_count = text.matches('.').count();
        let kind = match dot_count {
            0 => TokenKind::Int,
            1 => TokenKind::Float,
            _ => TokenKind::Illegal,
        };
        Token::new(kind, text, line, column)
    }

    fn read_string(&mut self) -> String {
        let start = self.position + 1;
        loop {
            self.read_char();
            if self.ch == b'"' || self.ch == 0 {
                break;
            }
        }
        String::from_utf8_lossy(&self.input[start..self.position]).into_owned()
    }
}

fn is_letter(ch: u8) -> bool {
    ch.is_ascii_alphabetic() || ch == b'_'
}

fn is_digit(ch: u8) -> bool {
    ch.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut lexer = Lexer::new(src);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok.kind == TokenKind::Eof;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn lexes_basic_operators() {
        let toks = kinds("= + - ! * / < > == != <= >= ++ -- += -= *= /=");
        assert_eq!(
            toks,
            vec![
                TokenKind::Assign,
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Bang,
                TokenKind::Asterisk,
                TokenKind::Slash,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eq,
                TokenKind::NotEq,
                TokenKind::Lte,
                TokenKind::Gte,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::PlusAssign,
                TokenKind::MinusAssign,
                TokenKind::AsteriskAssign,
                TokenKind::SlashAssign,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_keywords_and_identifiers() {
        let toks = kinds("let func true false if else return while for in break continue and or x1");
        assert_eq!(
            toks,
            vec![
                TokenKind::Let,
                TokenKind::Function,
                TokenKind::True,
                TokenKind::False,
                TokenKind::If,
                TokenKind::Else,
                TokenKind::Return,
                TokenKind::While,
                TokenKind::For,
                TokenKind::In,
                TokenKind::Break,
                TokenKind::Continue,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn illegal_number_with_two_dots() {
        let mut lexer = Lexer::new("1.2.3");
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::Illegal);
        assert_eq!(tok.literal, "1.2.3");
    }

    #[test]
    fn single_and_multi_line_comments_are_skipped() {
        let toks = kinds("1 // trailing comment\n2 /* block\ncomment */ 3");
        assert_eq!(
            toks,
            vec![
                TokenKind::Int,
                TokenKind::Int,
                TokenKind::Int,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_block_comment_reaches_eof() {
        let toks = kinds("1 /* never closed");
        assert_eq!(toks, vec![TokenKind::Int, TokenKind::Eof]);
    }

    #[test]
    fn tracks_line_and_column() {
        let mut lexer = Lexer::new("let x\n= 1");
        let let_tok = lexer.next_token();
        assert_eq!((let_tok.line, let_tok.column), (1, 1));
        let x_tok = lexer.next_token();
        assert_eq!((x_tok.line, x_tok.column), (1, 5));
        let assign_tok = lexer.next_token();
        assert_eq!((assign_tok.line, assign_tok.column), (2, 1));
    }

    #[test]
    fn identifier_with_multiple_trailing_digits() {
        let toks = kinds("item10 x123 row2col3");
        assert_eq!(
            toks,
            vec![
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn string_without_escapes() {
        let mut lexer = Lexer::new("\"hello world\"");
        let tok = lexer.next_token();
        assert_eq!(tok.kind, TokenKind::String);
        assert_eq!(tok.literal, "hello world");
    }
}
