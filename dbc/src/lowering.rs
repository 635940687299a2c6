//! AST → model lowering (spec §4.4). Resolves every cross-reference the
//! parser deliberately left as a name or raw literal: comments and
//! attribute values attach to entities, extended-mux ranges expand to
//! index sets, value-encodings become signal enumerations.

use std::collections::{BTreeSet, HashSet};

use crate::ast::{self, Ast};
use crate::error::Error;
use crate::model::{
    AttributeDef, AttributeKind, AttributeType, AttributeValue, Endianness, Host, Message,
    MuxRole, Network, Signal, Signedness, ValueTable,
};

pub fn lower(ast: Ast) -> crate::Result<Network> {
    let mut net = Network::new();

    // 1. Version, baudrate.
    net.version = ast.version.unwrap_or_default();
    net.baudrate = ast.bit_timing.map(|bt| bt.baudrate).unwrap_or(0);

    // 2. Nodes.
    for name in ast.nodes {
        net.add_node(name)?;
    }

    // 3. Messages and their signals.
    for m in ast.messages {
        let mut msg = Message::new(m.id, m.name, m.length, m.transmitter);
        for s in m.signals {
            msg.add_signal(lower_signal(s))?;
        }
        net.add_message(msg)?;
    }

    // Global value tables (VAL_TABLE_) are preserved verbatim; they feed
    // `enum_ref` resolution in the JSON projection rather than any model
    // invariant.
    for vt in ast.value_tables {
        net.value_tables.push(ValueTable { name: vt.name, entries: vt.entries });
    }

    // 4. Value encodings. Env-var encodings are tolerated and dropped —
    // env vars have no model slot (spec §4.4 step 4).
    for ve in ast.value_encodings {
        if let ast::ValueEncoding::Signal { message_id, signal, entries } = ve {
            let msg = net.message_mut(message_id).ok_or_else(|| Error::UnknownReference {
                what: "message",
                name: message_id.to_string(),
                context: "value encoding".to_string(),
            })?;
            let sig = msg.signal_mut(&signal).ok_or_else(|| Error::UnknownReference {
                what: "signal",
                name: signal.clone(),
                context: format!("message {}", message_id),
            })?;
            for (code, label) in entries {
                sig.add_value_enum(code, label)?;
            }
        }
    }

    // 5. Comments.
    for c in ast.comments {
        match c {
            ast::Comment::Network(text) => net.description = text,
            ast::Comment::Node { node, text } => {
                net.node_mut(&node)
                    .ok_or_else(|| Error::UnknownReference {
                        what: "node",
                        name: node.clone(),
                        context: "comment".to_string(),
                    })?
                    .description = text;
            }
            ast::Comment::Message { message_id, text } => {
                net.message_mut(message_id)
                    .ok_or_else(|| Error::UnknownReference {
                        what: "message",
                        name: message_id.to_string(),
                        context: "comment".to_string(),
                    })?
                    .description = text;
            }
            ast::Comment::Signal { message_id, signal, text } => {
                let msg = net.message_mut(message_id).ok_or_else(|| Error::UnknownReference {
                    what: "message",
                    name: message_id.to_string(),
                    context: "comment".to_string(),
                })?;
                msg.signal_mut(&signal)
                    .ok_or_else(|| Error::UnknownReference {
                        what: "signal",
                        name: signal.clone(),
                        context: format!("message {}", message_id),
                    })?
                    .description = text;
            }
            // Env vars aren't modeled; tolerate their comments the same
            // way their VAL_ encodings are tolerated.
            ast::Comment::EnvVar { .. } => {}
        }
    }

    // 6. Attribute definitions. `EV_`-kind definitions are accepted by the
    // parser but dropped here — see `ast::AttributeKind::EnvVar`.
    for ad in ast.attribute_defs {
        let Some(kind) = lower_attribute_kind(ad.kind) else { continue };
        let ty = lower_attribute_type(ad.ty);
        let default = placeholder_value(&ty);
        net.add_attribute_definition(AttributeDef { kind, name: ad.name, ty, default })?;
    }

    // 7. Attribute defaults. The definition always exists by now (this
    // pass runs after step 6 regardless of file order — spec §4.2
    // "two-phase attribute typing").
    for default in ast.attribute_defaults {
        let def = net
            .attribute_defs
            .iter_mut()
            .find(|d| d.name == default.name)
            .ok_or_else(|| Error::UnknownReference {
                what: "attribute definition",
                name: default.name.clone(),
                context: "attribute default".to_string(),
            })?;
        let value = parse_literal(&def.ty, &default.raw_value, true)?;
        crate::model::validate_bounds(&default.name, &def.ty, &value)?;
        def.default = value;
    }

    // 8. Attribute values. `EV_`-hosted assignments are dropped with their
    // definitions, for the same reason as step 6.
    for av in ast.attribute_values {
        let host = match av.host {
            ast::AttributeHost::Network => Host::Network,
            ast::AttributeHost::Node(n) => Host::Node(n),
            ast::AttributeHost::Message(id) => Host::Message(id),
            ast::AttributeHost::Signal { message_id, signal } => {
                Host::Signal { message_id, signal }
            }
            ast::AttributeHost::EnvVar(_) => continue,
        };
        let def = net
            .attribute_def(&av.name)
            .ok_or_else(|| Error::UnknownReference {
                what: "attribute definition",
                name: av.name.clone(),
                context: format!("{:?}", host),
            })?
            .clone();
        let value = parse_literal(&def.ty, &av.raw_value, false)?;
        net.assign_attribute(host, &av.name, value)?;
    }

    // 9. Extended-mux reconciliation.
    let mut has_ext_mux: HashSet<u32> = HashSet::new();
    for em in ast.extended_muxes {
        has_ext_mux.insert(em.message_id);
        let mut indexes = BTreeSet::new();
        for (from, to) in em.ranges {
            indexes.extend(from..=to);
        }
        let msg = net.message_mut(em.message_id).ok_or_else(|| Error::UnknownReference {
            what: "message",
            name: em.message_id.to_string(),
            context: "extended mux".to_string(),
        })?;
        if msg.signal(&em.multiplexed).is_none() {
            return Err(Error::UnknownReference {
                what: "signal",
                name: em.multiplexed.clone(),
                context: format!("extended mux in message {}", em.message_id),
            });
        }
        msg.signal_mut(&em.multiplexor)
            .ok_or_else(|| Error::UnknownReference {
                what: "signal",
                name: em.multiplexor.clone(),
                context: format!("extended mux in message {}", em.message_id),
            })?
            .add_mux_child(em.multiplexed, indexes)?;
    }

    for (id, msg) in net.messages.iter_mut() {
        let multiplexors: Vec<String> =
            msg.signals.iter().filter(|s| s.role.is_multiplexor()).map(|s| s.name.clone()).collect();
        msg.extended_mux = multiplexors.len() > 1;

        if multiplexors.len() == 1 && !has_ext_mux.contains(id) {
            let mux_name = multiplexors[0].clone();
            let children: Vec<(String, BTreeSet<u32>)> = msg
                .signals
                .iter()
                .filter(|s| s.name != mux_name)
                .filter_map(|s| s.role.indexes().map(|idx| (s.name.clone(), idx.clone())))
                .collect();
            let mux_sig = msg.signal_mut(&mux_name).expect("mux_name came from msg.signals");
            for (child, indexes) in children {
                mux_sig.add_mux_child(child, indexes)?;
            }
        }
    }

    Ok(net)
}

fn lower_signal(s: ast::Signal) -> Signal {
    let role = match s.mux {
        ast::MuxToken::None => MuxRole::Plain,
        ast::MuxToken::Switch => MuxRole::Multiplexor,
        ast::MuxToken::Value(n) => MuxRole::Multiplexed { indexes: BTreeSet::from([n]) },
        ast::MuxToken::SwitchedValue(n) => MuxRole::Both { indexes: BTreeSet::from([n]) },
    };

    let mut sig = Signal::new(s.name);
    sig.start_bit = s.start_bit;
    sig.size = s.size;
    sig.endianness = if s.big_endian { Endianness::Big } else { Endianness::Little };
    sig.signedness = if s.unsigned { Signedness::Unsigned } else { Signedness::Signed };
    sig.factor = s.factor;
    sig.offset = s.offset;
    sig.min = s.min;
    sig.max = s.max;
    sig.unit = s.unit;
    sig.receivers = s.receivers;
    sig.role = role;
    sig
}

fn lower_attribute_kind(kind: ast::AttributeKind) -> Option<AttributeKind> {
    match kind {
        ast::AttributeKind::General => Some(AttributeKind::General),
        ast::AttributeKind::Node => Some(AttributeKind::Node),
        ast::AttributeKind::Message => Some(AttributeKind::Message),
        ast::AttributeKind::Signal => Some(AttributeKind::Signal),
        ast::AttributeKind::EnvVar => None,
    }
}

fn lower_attribute_type(ty: ast::AttributeTypeDef) -> AttributeType {
    match ty {
        ast::AttributeTypeDef::Int { from, to } => AttributeType::Int { from, to },
        ast::AttributeTypeDef::Hex { from, to } => AttributeType::Hex { from, to },
        ast::AttributeTypeDef::Float { from, to } => AttributeType::Float { from, to },
        ast::AttributeTypeDef::String => AttributeType::String,
        ast::AttributeTypeDef::Enum(labels) => AttributeType::Enum(labels),
    }
}

fn placeholder_value(ty: &AttributeType) -> AttributeValue {
    match ty {
        AttributeType::Int { from, .. } => AttributeValue::Int(*from),
        AttributeType::Hex { from, .. } => AttributeValue::Hex(*from),
        AttributeType::Float { from, .. } => AttributeValue::Float(*from),
        AttributeType::String => AttributeValue::String(String::new()),
        AttributeType::Enum(_) => AttributeValue::Enum(0),
    }
}

/// `enum_as_label`: defaults spell an enum value as its label, value
/// assignments spell it as the label's integer index (spec §4.4 step 8).
fn parse_literal(ty: &AttributeType, raw: &str, enum_as_label: bool) -> crate::Result<AttributeValue> {
    let bad = |found: &'static str| Error::TypeMismatch {
        attribute: raw.to_string(),
        expected: ty.type_name(),
        found,
    };

    match ty {
        AttributeType::Int { .. } => {
            raw.trim().parse::<i64>().map(AttributeValue::Int).map_err(|_| bad("non-integer literal"))
        }
        AttributeType::Hex { .. } => parse_hex_literal(raw).map(AttributeValue::Hex).ok_or_else(|| bad("non-hex literal")),
        AttributeType::Float { .. } => {
            raw.trim().parse::<f64>().map(AttributeValue::Float).map_err(|_| bad("non-float literal"))
        }
        AttributeType::String => Ok(AttributeValue::String(raw.to_string())),
        AttributeType::Enum(labels) => {
            if enum_as_label {
                let idx = labels.iter().position(|l| l == raw).ok_or_else(|| {
                    Error::UnknownReference {
                        what: "enum label",
                        name: raw.to_string(),
                        context: "attribute default".to_string(),
                    }
                })?;
                Ok(AttributeValue::Enum(idx as u32))
            } else {
                raw.trim()
                    .parse::<u32>()
                    .map(AttributeValue::Enum)
                    .map_err(|_| bad("non-integer enum index"))
            }
        }
    }
}

/// Hex literals carry the `0x`/`0X` prefix the lexer requires; value
/// assignments and defaults alike store it verbatim (spec §6.1 `HEX`
/// bounds, mirrored for `BA_DEF_DEF_`/`BA_` literals of hex type).
/// Shared with the JSON projection, whose hex attribute values use the
/// same textual convention.
pub(crate) fn parse_hex_literal(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    let digits = raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X"))?;
    i64::from_str_radix(digits, 16).ok()
}
