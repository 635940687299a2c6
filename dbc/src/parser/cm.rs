//! `CM_` comment record, one of five shapes (spec §6.1):
//! `STR | "BU_" ID STR | "BO_" N STR | "SG_" N ID STR | "EV_" ID STR`,
//! terminated by `;`.

use crate::ast::Comment;
use crate::lexer::TokenKind;

use super::{err, PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<Comment> {
    let t = p.scan()?;
    let comment = if t.kind == TokenKind::String {
        let inner = t.text[1..t.text.len() - 1].to_string();
        Comment::Network(inner)
    } else if t.is_keyword("BU_") {
        let node = p.expect_identifier()?.text;
        let text = p.expect_string()?;
        Comment::Node { node, text }
    } else if t.is_keyword("BO_") {
        let message_id = p.expect_u32()?;
        let text = p.expect_string()?;
        Comment::Message { message_id, text }
    } else if t.is_keyword("SG_") {
        let message_id = p.expect_u32()?;
        let signal = p.expect_identifier()?.text;
        let text = p.expect_string()?;
        Comment::Signal { message_id, signal, text }
    } else if t.is_keyword("EV_") {
        let name = p.expect_identifier()?.text;
        let text = p.expect_string()?;
        Comment::EnvVar { name, text }
    } else {
        return Err(err(t.pos, format!("expected comment shape, found '{}'", t.text)));
    };

    p.expect_syntax(";")?;
    Ok(comment)
}
