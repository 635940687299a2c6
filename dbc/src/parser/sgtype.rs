//! `SGTYPE_ ... ";"` — legacy signal type declaration. Only the leading
//! name is modeled; see [`super::ev`].

use crate::ast::SignalType;

use super::{PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<SignalType> {
    let name = p.expect_identifier()?.text;
    p.skip_to_semicolon()?;
    Ok(SignalType { name })
}
