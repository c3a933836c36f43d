//! Infix to postfix conversion (shunting-yard).

use super::token::Token;

/// One element of a postfix query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostfixItem {
    Term(String),
    And,
    Or,
    Not,
}

/// Operators waiting on the shunting-yard stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackOp {
    LParen,
    And,
    Or,
    Not,
}

impl StackOp {
    fn precedence(self) -> u8 {
        match self {
            StackOp::Not => 3,
            StackOp::And => 2,
            StackOp::Or => 1,
            StackOp::LParen => 0,
        }
    }

    fn to_item(self) -> Option<PostfixItem> {
        match self {
            StackOp::And => Some(PostfixItem::And),
            StackOp::Or => Some(PostfixItem::Or),
            StackOp::Not => Some(PostfixItem::Not),
            StackOp::LParen => None,
        }
    }
}

/// Convert tokens to postfix order.
///
/// `AND` and `OR` are left-associative. `NOT` is a prefix operator and never
/// pops the stack when pushed, so `NOT NOT a` is `a`. Unmatched `)` is
/// ignored and unmatched `(` is dropped.
pub fn to_postfix(tokens: &[Token]) -> Vec<PostfixItem> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<StackOp> = Vec::new();

    for token in tokens {
        match token {
            Token::Term(term) => output.push(PostfixItem::Term(term.clone())),
            Token::LParen => stack.push(StackOp::LParen),
            Token::RParen => {
                while let Some(op) = stack.pop() {
                    match op.to_item() {
                        Some(item) => output.push(item),
                        None => break,
                    }
                }
            }
            Token::Not => stack.push(StackOp::Not),
            Token::And | Token::Or => {
                let op = if *token == Token::And {
                    StackOp::And
                } else {
                    StackOp::Or
                };
                while let Some(&top) = stack.last() {
                    if top == StackOp::LParen || top.precedence() < op.precedence() {
                        break;
                    }
                    stack.pop();
                    output.extend(top.to_item());
                }
                stack.push(op);
            }
        }
    }

    while let Some(op) = stack.pop() {
        output.extend(op.to_item());
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::token::tokenize;

    fn postfix(query: &str) -> String {
        to_postfix(&tokenize(query))
            .iter()
            .map(|item| match item {
                PostfixItem::Term(t) => t.clone(),
                PostfixItem::And => "AND".to_string(),
                PostfixItem::Or => "OR".to_string(),
                PostfixItem::Not => "NOT".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_precedence() {
        assert_eq!(postfix("a OR b AND NOT c"), "a b c NOT AND OR");
        assert_eq!(postfix("a AND b OR c"), "a b AND c OR");
    }

    #[test]
    fn test_left_associative() {
        assert_eq!(postfix("a AND b AND c"), "a b AND c AND");
        assert_eq!(postfix("a OR b OR c"), "a b OR c OR");
    }

    #[test]
    fn test_parentheses_group() {
        assert_eq!(postfix("(a OR b) AND c"), "a b OR c AND");
        assert_eq!(postfix("NOT (a OR b)"), "a b OR NOT");
    }

    #[test]
    fn test_double_not() {
        assert_eq!(postfix("NOT NOT a"), "a NOT NOT");
        assert_eq!(postfix("a AND NOT NOT b"), "a b NOT NOT AND");
    }

    #[test]
    fn test_unbalanced_parentheses() {
        assert_eq!(postfix("a) OR b"), "a b OR");
        assert_eq!(postfix("((a AND b"), "a b AND");
    }

    #[test]
    fn test_adjacent_terms_have_no_operator() {
        assert_eq!(postfix("a b"), "a b");
    }
}
