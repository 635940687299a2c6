//! `NS_ ":" (ID|keyword)*` — a closed whitelist of extension keywords,
//! terminated by the start of the bit-timing record (spec §4.7's
//! `in_new_symbols` state).

use crate::lexer::TokenKind;

use super::{PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<Vec<String>> {
    p.expect_syntax(":")?;

    let mut names = vec![];
    loop {
        let t = p.scan()?;
        if t.is_keyword("BS_") || t.is_keyword("BU_") || t.kind == TokenKind::Eof {
            p.unscan(t);
            break;
        }
        if t.kind == TokenKind::Identifier || t.kind == TokenKind::Keyword {
            names.push(t.text);
        } else {
            p.unscan(t);
            break;
        }
    }
    Ok(names)
}
