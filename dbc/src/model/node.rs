//! `Node` (spec §3).

use crate::model::attribute::Attributes;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub description: String,
    pub attributes: Attributes,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Node { name: name.into(), description: String::new(), attributes: Attributes::default() }
    }
}
