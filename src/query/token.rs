//! Query tokenizer.

/// A lexical token of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    LParen,
    RParen,
    And,
    Or,
    Not,
    /// A term, exactly as written (quotes included).
    Term(String),
}

impl Token {
    fn from_word(word: &str) -> Self {
        if word.eq_ignore_ascii_case("AND") {
            Token::And
        } else if word.eq_ignore_ascii_case("OR") {
            Token::Or
        } else if word.eq_ignore_ascii_case("NOT") {
            Token::Not
        } else {
            Token::Term(word.to_string())
        }
    }
}

/// Split a query into tokens.
///
/// Every non-whitespace span becomes a token; nothing is rejected. Within
/// a double-quoted section whitespace and parentheses do not end the term,
/// and `\"` does not end the quotes. An unterminated quote runs to the end
/// of the input.
pub fn tokenize(query: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = query.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            _ => {
                let mut end = query.len();
                let mut in_quotes = false;
                let mut escaped = false;
                while let Some(&(i, c)) = chars.peek() {
                    if in_quotes {
                        if escaped {
                            escaped = false;
                        } else if c == '\\' {
                            escaped = true;
                        } else if c == '"' {
                            in_quotes = false;
                        }
                    } else if c.is_whitespace() || c == '(' || c == ')' {
                        end = i;
                        break;
                    } else if c == '"' {
                        in_quotes = true;
                    }
                    chars.next();
                }

                let word = &query[start..end];
                if word.starts_with('"') {
                    tokens.push(Token::Term(word.to_string()));
                } else {
                    tokens.push(Token::from_word(word));
                }
            }
        }
    }

    tokens
}

/// Remove surrounding double quotes and resolve `\"` and `\\`.
///
/// Strings that are not fully quoted are returned unchanged.
pub fn strip_quotes(s: &str) -> String {
    let Some(inner) = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return s.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if next == '"' || next == '\\' {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}
