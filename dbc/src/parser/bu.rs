//! `BU_ ":" ID*`

use crate::lexer::TokenKind;

use super::{PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<Vec<String>> {
    p.expect_syntax(":")?;
    let mut nodes = vec![];
    loop {
        let t = p.scan()?;
        if t.kind == TokenKind::Identifier {
            nodes.push(t.text);
        } else {
            p.unscan(t);
            break;
        }
    }
    Ok(nodes)
}
