//! `Signal` (spec §3).

use std::collections::BTreeSet;

use crate::model::attribute::Attributes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signedness {
    Unsigned,
    Signed,
}

/// A signal's role in its message's multiplex scheme (spec §3 "Signal").
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MuxRole {
    #[default]
    Plain,
    Multiplexor,
    Multiplexed { indexes: BTreeSet<u32> },
    Both { indexes: BTreeSet<u32> },
}

impl MuxRole {
    pub fn is_multiplexed(&self) -> bool {
        matches!(self, MuxRole::Multiplexed { .. } | MuxRole::Both { .. })
    }

    pub fn is_multiplexor(&self) -> bool {
        matches!(self, MuxRole::Multiplexor | MuxRole::Both { .. })
    }

    pub fn indexes(&self) -> Option<&BTreeSet<u32>> {
        match self {
            MuxRole::Multiplexed { indexes } | MuxRole::Both { indexes } => Some(indexes),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub name: String,
    pub start_bit: u32,
    pub size: u32,
    pub endianness: Endianness,
    pub signedness: Signedness,
    pub factor: f64,
    pub offset: f64,
    pub min: f64,
    pub max: f64,
    pub unit: String,
    pub receivers: Vec<String>,
    /// Raw-code → label, insertion order preserved (spec §8 S5).
    pub enum_values: Vec<(i64, String)>,
    pub description: String,
    pub attributes: Attributes,
    pub role: MuxRole,
    /// `(child signal name, selector set)` — populated on multiplexor /
    /// both-role signals only by [`Signal::add_mux_child`].
    pub mux_children: Vec<(String, BTreeSet<u32>)>,
}

impl Signal {
    pub fn new(name: impl Into<String>) -> Self {
        Signal {
            name: name.into(),
            start_bit: 0,
            size: 0,
            endianness: Endianness::Little,
            signedness: Signedness::Unsigned,
            factor: 1.0,
            offset: 0.0,
            min: 0.0,
            max: 0.0,
            unit: String::new(),
            receivers: vec![],
            enum_values: vec![],
            description: String::new(),
            attributes: Attributes::default(),
            role: MuxRole::Plain,
            mux_children: vec![],
        }
    }

    /// `0 ≤ v ≤ 2^size − 1` unsigned; `−(2^(size−1) − 1) ≤ v ≤ 2^(size−1) −
    /// 1` signed — the asymmetric range the source uses (spec §4.4
    /// "Numeric semantics").
    pub fn representable_range(&self) -> (i64, i64) {
        match self.signedness {
            Signedness::Unsigned => {
                let max = if self.size >= 64 { i64::MAX } else { (1i64 << self.size) - 1 };
                (0, max)
            }
            Signedness::Signed => {
                let bound = if self.size == 0 {
                    0
                } else if self.size - 1 >= 63 {
                    i64::MAX
                } else {
                    (1i64 << (self.size - 1)) - 1
                };
                (-bound, bound)
            }
        }
    }

    /// Rejects a duplicate code or one outside [`Signal::representable_range`].
    pub fn add_value_enum(&mut self, code: i64, label: impl Into<String>) -> crate::Result<()> {
        use crate::error::Error;

        if self.enum_values.iter().any(|(c, _)| *c == code) {
            return Err(Error::DuplicateName { kind: "value enum code", name: code.to_string() });
        }
        let (lo, hi) = self.representable_range();
        if code < lo || code > hi {
            return Err(Error::OutOfRange {
                what: format!("signal '{}' value enum code", self.name),
                value: code.to_string(),
                bounds: format!("[{}, {}]", lo, hi),
            });
        }
        self.enum_values.push((code, label.into()));
        Ok(())
    }

    /// Binds `child` as active for `indexes` (spec §4.3). Valid on
    /// multiplexor-role signals only; `indexes` must be non-empty.
    pub fn add_mux_child(
        &mut self,
        child: impl Into<String>,
        indexes: BTreeSet<u32>,
    ) -> crate::Result<()> {
        use crate::error::Error;

        if !self.role.is_multiplexor() {
            return Err(Error::TypeMismatch {
                attribute: self.name.clone(),
                expected: "multiplexor signal",
                found: "non-multiplexor signal",
            });
        }
        if indexes.is_empty() {
            return Err(Error::OutOfRange {
                what: format!("signal '{}' mux child selector set", self.name),
                value: "{}".to_string(),
                bounds: "non-empty set".to_string(),
            });
        }
        let child = child.into();
        if let Some(entry) = self.mux_children.iter_mut().find(|(n, _)| *n == child) {
            entry.1.extend(indexes);
        } else {
            self.mux_children.push((child, indexes));
        }
        Ok(())
    }
}
