//! Whole-model validation (spec §7: `validate(model) -> Result`).
//!
//! Every invariant [`crate::model`] enforces incrementally as entities are
//! inserted (name uniqueness, bit-occupancy, attribute bounds) is also
//! re-checked here in one pass, so a model built any other way than
//! through the addition methods (a hand-built [`Network`], or one loaded
//! from JSON) is still verified before being emitted. The pass is read-only
//! and idempotent — running it twice on the same model yields the same
//! result (spec §7).

use crate::error::Error;
use crate::model::{AttributeKind, AttributeValue, Network};

pub fn validate(net: &Network) -> crate::Result<()> {
    validate_nodes(net)?;
    validate_messages(net)?;
    validate_attributes(net)?;
    Ok(())
}

fn validate_nodes(net: &Network) -> crate::Result<()> {
    let mut seen = std::collections::HashSet::new();
    for node in &net.nodes {
        if !seen.insert(node.name.as_str()) {
            return Err(Error::DuplicateName { kind: "node", name: node.name.clone() });
        }
    }
    Ok(())
}

fn validate_messages(net: &Network) -> crate::Result<()> {
    for msg in net.messages.values() {
        if msg.transmitter != crate::lexer::NO_NODE && net.node(&msg.transmitter).is_none() {
            return Err(Error::UnknownReference {
                what: "node",
                name: msg.transmitter.clone(),
                context: format!("message {} transmitter", msg.id),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for sig in &msg.signals {
            if !seen.insert(sig.name.as_str()) {
                return Err(Error::DuplicateName { kind: "signal", name: sig.name.clone() });
            }

            let end = sig.start_bit + sig.size;
            if end > msg.bit_len() {
                return Err(Error::OutOfRange {
                    what: format!("signal '{}' bit range", sig.name),
                    value: format!("[{}, {})", sig.start_bit, end),
                    bounds: format!("[0, {})", msg.bit_len()),
                });
            }

            for r in &sig.receivers {
                if r != crate::lexer::NO_NODE && net.node(r).is_none() {
                    return Err(Error::UnknownReference {
                        what: "node",
                        name: r.clone(),
                        context: format!("message {} signal '{}' receiver", msg.id, sig.name),
                    });
                }
            }

            let (lo, hi) = sig.representable_range();
            for (code, _) in &sig.enum_values {
                if *code < lo || *code > hi {
                    return Err(Error::OutOfRange {
                        what: format!("signal '{}' value enum code", sig.name),
                        value: code.to_string(),
                        bounds: format!("[{}, {}]", lo, hi),
                    });
                }
            }

            for (child, indexes) in &sig.mux_children {
                if !sig.role.is_multiplexor() {
                    return Err(Error::TypeMismatch {
                        attribute: sig.name.clone(),
                        expected: "multiplexor signal",
                        found: "non-multiplexor signal",
                    });
                }
                if msg.signal(child).is_none() {
                    return Err(Error::UnknownReference {
                        what: "signal",
                        name: child.clone(),
                        context: format!("message {} mux child of '{}'", msg.id, sig.name),
                    });
                }
                if indexes.is_empty() {
                    return Err(Error::OutOfRange {
                        what: format!("signal '{}' mux child '{}' selector set", sig.name, child),
                        value: "{}".to_string(),
                        bounds: "non-empty set".to_string(),
                    });
                }
            }
        }

        // Mux well-formedness (spec §8 property 6): multiplexor signals
        // must cover bit ranges disjoint from every other multiplexor and
        // from every normal (non-multiplexed) signal. `Message::add_signal`
        // already enforces this incrementally via the occupancy map; here
        // we re-derive it structurally for models assembled another way.
        let multiplexors: Vec<_> = msg.signals.iter().filter(|s| s.role.is_multiplexor()).collect();
        for (i, a) in multiplexors.iter().enumerate() {
            for b in multiplexors.iter().skip(i + 1) {
                if ranges_overlap(a.start_bit, a.size, b.start_bit, b.size) {
                    return Err(Error::BitOverlap {
                        message_id: msg.id,
                        first: a.name.clone(),
                        second: b.name.clone(),
                        bit: a.start_bit.max(b.start_bit),
                    });
                }
            }
            for other in &msg.signals {
                if std::ptr::eq(*a, other) || other.role.is_multiplexed() || other.role.is_multiplexor() {
                    continue;
                }
                if ranges_overlap(a.start_bit, a.size, other.start_bit, other.size) {
                    return Err(Error::BitOverlap {
                        message_id: msg.id,
                        first: a.name.clone(),
                        second: other.name.clone(),
                        bit: a.start_bit.max(other.start_bit),
                    });
                }
            }
        }

        validate_attribute_assignments(net, &msg.attributes, AttributeKind::Message)?;
        for sig in &msg.signals {
            validate_attribute_assignments(net, &sig.attributes, AttributeKind::Signal)?;
        }
    }
    Ok(())
}

fn validate_attributes(net: &Network) -> crate::Result<()> {
    let mut seen = std::collections::HashSet::new();
    for def in &net.attribute_defs {
        if !seen.insert(def.name.as_str()) {
            return Err(Error::DuplicateName { kind: "attribute definition", name: def.name.clone() });
        }
        crate::model::validate_bounds(&def.name, &def.ty, &def.default)?;
    }

    validate_attribute_assignments(net, &net.attributes, AttributeKind::General)?;
    for node in &net.nodes {
        validate_attribute_assignments(net, &node.attributes, AttributeKind::Node)?;
    }
    Ok(())
}

fn validate_attribute_assignments(
    net: &Network,
    attrs: &crate::model::Attributes,
    kind: AttributeKind,
) -> crate::Result<()> {
    for (name, value) in attrs.iter() {
        let def = net.attribute_def(name).ok_or_else(|| Error::UnknownReference {
            what: "attribute definition",
            name: name.clone(),
            context: "attribute assignment".to_string(),
        })?;
        if def.kind != kind {
            return Err(Error::TypeMismatch {
                attribute: name.clone(),
                expected: kind_name(def.kind),
                found: kind_name(kind),
            });
        }
        crate::model::validate_bounds(name, &def.ty, value)?;
        if let AttributeValue::Enum(idx) = value {
            if let crate::model::AttributeType::Enum(labels) = &def.ty {
                if *idx as usize >= labels.len() {
                    return Err(Error::OutOfRange {
                        what: format!("attribute '{}' enum index", name),
                        value: idx.to_string(),
                        bounds: format!("[0, {})", labels.len()),
                    });
                }
            }
        }
    }
    Ok(())
}

fn ranges_overlap(a_start: u32, a_size: u32, b_start: u32, b_size: u32) -> bool {
    a_start < b_start + b_size && b_start < a_start + a_size
}

fn kind_name(kind: AttributeKind) -> &'static str {
    match kind {
        AttributeKind::General => "general",
        AttributeKind::Node => "node",
        AttributeKind::Message => "message",
        AttributeKind::Signal => "signal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_clean_model() {
        let net = crate::parse_dbc(
            "VERSION \"1.0\"\n\nNS_ :\n\nBS_ :\n\nBU_ : A B\n\nBO_ 100 M1: 8 A\n SG_ S1 : 0|8@1+ (1,0) [0|255] \"u\" B\n",
        )
        .unwrap();
        assert!(validate(&net).is_ok());
    }

    #[test]
    fn rejects_dangling_transmitter() {
        let mut net = Network::new();
        net.add_message(crate::model::Message::new(1, "M", 8, "Ghost")).unwrap();
        assert!(matches!(validate(&net), Err(Error::UnknownReference { what: "node", .. })));
    }
}
