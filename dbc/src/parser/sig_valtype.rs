//! `SIG_VALTYPE_ N ID ":" N ";"` — extended signal value type (float/double).

use crate::ast::SignalExtValueType;

use super::{PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<SignalExtValueType> {
    let message_id = p.expect_u32()?;
    let signal = p.expect_identifier()?.text;
    p.expect_syntax(":")?;
    let value_type = p.expect_u32()?;
    p.expect_syntax(";")?;

    Ok(SignalExtValueType { message_id, signal, value_type })
}
