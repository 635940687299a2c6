//! `BO_ N ID ":" N ID signal*` and the nested `SG_` signal lines (spec
//! §4.2 "Message block" / "Signal line").

use crate::ast::{Message, MuxToken, Signal};
use crate::lexer::TokenKind;

use super::{err, PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<Message> {
    let id = p.expect_u32()?;
    let name = p.expect_identifier()?.text;
    p.expect_syntax(":")?;
    let length = p.expect_u32()?;
    let transmitter = p.expect_identifier()?.text;

    let mut signals = vec![];
    loop {
        let t = p.scan()?;
        if t.is_keyword("SG_") {
            signals.push(parse_signal(p)?);
        } else {
            p.unscan(t);
            break;
        }
    }

    Ok(Message { id, name, length, transmitter, signals })
}

fn parse_mux(p: &mut Parser) -> PResult<MuxToken> {
    let t = p.scan()?;
    if t.kind != TokenKind::MuxIndicator {
        p.unscan(t);
        return Ok(MuxToken::None);
    }
    if t.text == "M" {
        return Ok(MuxToken::Switch);
    }
    let rest = &t.text[1..]; // strip leading 'm'
    if let Some(digits) = rest.strip_suffix('M') {
        let n: u32 = digits
            .parse()
            .map_err(|_| err(t.pos, format!("invalid mux value '{}'", t.text)))?;
        Ok(MuxToken::SwitchedValue(n))
    } else {
        let n: u32 = rest
            .parse()
            .map_err(|_| err(t.pos, format!("invalid mux value '{}'", t.text)))?;
        Ok(MuxToken::Value(n))
    }
}

fn parse_signal(p: &mut Parser) -> PResult<Signal> {
    let name = p.expect_identifier()?.text;
    let mux = parse_mux(p)?;
    p.expect_syntax(":")?;

    let start_bit = p.expect_u32()?;
    p.expect_syntax("|")?;
    let size = p.expect_u32()?;
    p.expect_syntax("@")?;

    let order_tok = p.scan()?;
    if order_tok.kind != TokenKind::Number || !matches!(order_tok.text.as_str(), "0" | "1") {
        return Err(err(order_tok.pos, format!("expected byte order digit, found '{}'", order_tok.text)));
    }
    let big_endian = order_tok.text == "0";

    let sign_tok = p.scan()?;
    if sign_tok.kind != TokenKind::Syntax || !matches!(sign_tok.text.as_str(), "+" | "-") {
        return Err(err(sign_tok.pos, format!("expected sign, found '{}'", sign_tok.text)));
    }
    let unsigned = sign_tok.text == "+";

    p.expect_syntax("(")?;
    let factor = p.expect_float()?;
    p.expect_syntax(",")?;
    let offset = p.expect_float()?;
    p.expect_syntax(")")?;

    p.expect_syntax("[")?;
    let min = p.expect_float()?;
    p.expect_syntax("|")?;
    let max = p.expect_float()?;
    p.expect_syntax("]")?;

    let unit = p.expect_string()?;

    let mut receivers = vec![p.expect_identifier()?.text];
    loop {
        let t = p.scan()?;
        if t.kind == TokenKind::Syntax && t.text == "," {
            receivers.push(p.expect_identifier()?.text);
        } else {
            p.unscan(t);
            break;
        }
    }

    Ok(Signal {
        name,
        mux,
        start_bit,
        size,
        big_endian,
        unsigned,
        factor,
        offset,
        min,
        max,
        unit,
        receivers,
    })
}
