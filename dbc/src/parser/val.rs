//! `VAL_ (N ID | ID) (N STR)* ";"` — value table encoding, dispatching on
//! whether the record addresses a signal (leading number) or an env var
//! (leading identifier).

use crate::ast::ValueEncoding;
use crate::lexer::TokenKind;

use super::{err, PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<ValueEncoding> {
    let t = p.scan()?;
    let encoding = if t.kind == TokenKind::Number {
        let message_id: u32 = t
            .text
            .parse()
            .map_err(|_| err(t.pos, format!("invalid message id '{}'", t.text)))?;
        let signal = p.expect_identifier()?.text;
        let entries = parse_entries(p)?;
        ValueEncoding::Signal { message_id, signal, entries }
    } else if t.kind == TokenKind::Identifier {
        let name = t.text;
        let entries = parse_entries(p)?;
        ValueEncoding::EnvVar { name, entries }
    } else {
        return Err(err(t.pos, format!("expected message id or env var name, found '{}'", t.text)));
    };

    p.expect_syntax(";")?;
    Ok(encoding)
}

fn parse_entries(p: &mut Parser) -> PResult<Vec<(i64, String)>> {
    let mut entries = vec![];
    loop {
        let t = p.scan()?;
        if t.kind != TokenKind::Number {
            p.unscan(t);
            break;
        }
        let code: i64 = t
            .text
            .parse()
            .map_err(|_| err(t.pos, "invalid value code"))?;
        let label = p.expect_string()?;
        entries.push((code, label));
    }
    Ok(entries)
}
