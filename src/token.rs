// Tokenizer (C2)
//
// Produces one token at a time from the pushback buffer: either a single
// non-identifier byte, or a maximal run of letters/digits/underscores
// starting with a letter or underscore. Stateless across calls - all
// state lives in the pushback buffer it reads from.

use crate::error::M4Result;
use crate::pushback::Pushback;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Byte(u8),
    Ident(Vec<u8>),
}

impl Token {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Token::Byte(b) => std::slice::from_ref(b),
            Token::Ident(s) => s,
        }
    }

    pub fn is_byte(&self, b: u8) -> bool {
        matches!(self, Token::Byte(x) if *x == b)
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

pub fn next_token(pb: &mut Pushback) -> M4Result<Option<Token>> {
    let first = match pb.read()? {
        Some(b) => b,
        None => return Ok(None),
    };
    if !is_ident_start(first) {
        return Ok(Some(Token::Byte(first)));
    }
    let mut ident = vec![first];
    loop {
        match pb.read()? {
            Some(b) if is_ident_continue(b) => ident.push(b),
            Some(b) => {
                pb.unread(b);
                break;
            }
            None => break,
        }
    }
    Ok(Some(Token::Ident(ident)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens_of(s: &[u8]) -> Vec<Token> {
        let mut pb = Pushback::new(false);
        pb.unread_str(s);
        let mut out = Vec::new();
        while let Some(t) = next_token(&mut pb).unwrap() {
            out.push(t);
        }
        out
    }

    #[test]
    fn single_punctuation_byte_is_a_token() {
        assert_eq!(tokens_of(b"("), vec![Token::Byte(b'(')]);
    }

    #[test]
    fn identifier_is_maximal() {
        assert_eq!(
            tokens_of(b"foo_Bar2"),
            vec![Token::Ident(b"foo_Bar2".to_vec())]
        );
    }

    #[test]
    fn identifier_followed_by_punctuation_stops_cleanly() {
        assert_eq!(
            tokens_of(b"foo("),
            vec![Token::Ident(b"foo".to_vec()), Token::Byte(b'(')]
        );
    }

    #[test]
    fn leading_underscore_starts_an_identifier() {
        assert_eq!(tokens_of(b"_x1"), vec![Token::Ident(b"_x1".to_vec())]);
    }

    #[test]
    fn digit_alone_is_not_an_identifier_start() {
        assert_eq!(
            tokens_of(b"1a"),
            vec![Token::Byte(b'1'), Token::Ident(b"a".to_vec())]
        );
    }

    #[test]
    fn whitespace_bytes_pass_through_individually() {
        assert_eq!(
            tokens_of(b"a b"),
            vec![
                Token::Ident(b"a".to_vec()),
                Token::Byte(b' '),
                Token::Ident(b"b".to_vec())
            ]
        );
    }

    #[test]
    fn empty_input_is_eof() {
        let mut pb = Pushback::new(false);
        assert_eq!(next_token(&mut pb).unwrap(), None);
    }
}
