//! `BS_ ":" [ N ":" N "," N ]`

use crate::ast::BitTiming;
use crate::lexer::TokenKind;

use super::{err, PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<Option<BitTiming>> {
    p.expect_syntax(":")?;

    let t = p.scan()?;
    if t.kind != TokenKind::Number {
        p.unscan(t);
        return Ok(None);
    }
    let baudrate: u32 = t
        .text
        .parse()
        .map_err(|_| err(t.pos, format!("invalid baudrate '{}'", t.text)))?;

    p.expect_syntax(":")?;
    let btr1 = p.expect_u32()?;
    p.expect_syntax(",")?;
    let btr2 = p.expect_u32()?;

    Ok(Some(BitTiming { baudrate, btr1, btr2 }))
}
