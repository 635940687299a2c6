//! `VERSION STR`

use super::{PResult, Parser};

pub fn parse(p: &mut Parser) -> PResult<String> {
    p.expect_string()
}
