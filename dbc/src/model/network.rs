//! `Network`, the model root (spec §3).

use crate::error::Error;
use crate::model::attribute::{AttributeDef, AttributeValue, Attributes, Host};
use crate::model::message::Message;
use crate::model::node::Node;
use crate::model::value_table::ValueTable;

#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    pub version: String,
    /// 0 = unspecified (spec §3 "Network").
    pub baudrate: u32,
    /// The network-wide `CM_ "…";` comment. Not part of the JSON
    /// projection (spec §6.2's `Network` schema has no description field)
    /// but preserved for DBC round-tripping.
    pub description: String,
    pub nodes: Vec<Node>,
    /// Ascending by id, matching the raising order the emitter requires
    /// (spec §4.5).
    pub messages: std::collections::BTreeMap<u32, Message>,
    pub value_tables: Vec<ValueTable>,
    pub attribute_defs: Vec<AttributeDef>,
    pub attributes: Attributes,
}

impl Network {
    pub fn new() -> Self {
        Network {
            version: String::new(),
            baudrate: 0,
            description: String::new(),
            nodes: vec![],
            messages: std::collections::BTreeMap::new(),
            value_tables: vec![],
            attribute_defs: vec![],
            attributes: Attributes::default(),
        }
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    pub fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    pub fn add_node(&mut self, name: impl Into<String>) -> crate::Result<()> {
        let name = name.into();
        if self.node(&name).is_some() {
            return Err(Error::DuplicateName { kind: "node", name });
        }
        self.nodes.push(Node::new(name));
        Ok(())
    }

    pub fn add_message(&mut self, msg: Message) -> crate::Result<()> {
        if self.messages.contains_key(&msg.id) {
            return Err(Error::DuplicateId { id: msg.id });
        }
        self.messages.insert(msg.id, msg);
        Ok(())
    }

    pub fn message(&self, id: u32) -> Option<&Message> {
        self.messages.get(&id)
    }

    pub fn message_mut(&mut self, id: u32) -> Option<&mut Message> {
        self.messages.get_mut(&id)
    }

    pub fn message_by_name(&self, name: &str) -> Option<&Message> {
        self.messages.values().find(|m| m.name == name)
    }

    pub fn attribute_def(&self, name: &str) -> Option<&AttributeDef> {
        self.attribute_defs.iter().find(|d| d.name == name)
    }

    pub fn add_attribute_definition(&mut self, def: AttributeDef) -> crate::Result<()> {
        if self.attribute_def(&def.name).is_some() {
            return Err(Error::DuplicateName { kind: "attribute definition", name: def.name });
        }
        self.attribute_defs.push(def);
        Ok(())
    }

    /// Looks up the definition by name, checks host-kind and value-type
    /// compatibility and bounds, then attaches the value to `host` (spec
    /// §4.3 `assign_attribute`).
    pub fn assign_attribute(
        &mut self,
        host: Host,
        name: &str,
        value: AttributeValue,
    ) -> crate::Result<()> {
        let def = self
            .attribute_def(name)
            .ok_or_else(|| Error::UnknownReference {
                what: "attribute definition",
                name: name.to_string(),
                context: format!("{:?}", host),
            })?
            .clone();

        if def.kind != host.kind() {
            return Err(Error::TypeMismatch {
                attribute: name.to_string(),
                expected: kind_name(def.kind),
                found: kind_name(host.kind()),
            });
        }

        crate::model::attribute::validate_bounds(name, &def.ty, &value)?;

        let attrs = self.attributes_mut(&host)?;
        attrs.set(name, value);
        Ok(())
    }

    fn attributes_mut(&mut self, host: &Host) -> crate::Result<&mut Attributes> {
        match host {
            Host::Network => Ok(&mut self.attributes),
            Host::Node(n) => self
                .node_mut(n)
                .map(|node| &mut node.attributes)
                .ok_or_else(|| Error::UnknownReference {
                    what: "node",
                    name: n.clone(),
                    context: "attribute assignment".to_string(),
                }),
            Host::Message(id) => self
                .message_mut(*id)
                .map(|msg| &mut msg.attributes)
                .ok_or_else(|| Error::UnknownReference {
                    what: "message",
                    name: id.to_string(),
                    context: "attribute assignment".to_string(),
                }),
            Host::Signal { message_id, signal } => {
                let msg = self.message_mut(*message_id).ok_or_else(|| Error::UnknownReference {
                    what: "message",
                    name: message_id.to_string(),
                    context: "attribute assignment".to_string(),
                })?;
                msg.signal_mut(signal)
                    .map(|sig| &mut sig.attributes)
                    .ok_or_else(|| Error::UnknownReference {
                        what: "signal",
                        name: signal.clone(),
                        context: format!("message {}", message_id),
                    })
            }
        }
    }
}

impl Default for Network {
    fn default() -> Self {
        Self::new()
    }
}

fn kind_name(kind: crate::model::attribute::AttributeKind) -> &'static str {
    use crate::model::attribute::AttributeKind::*;
    match kind {
        General => "general",
        Node => "node",
        Message => "message",
        Signal => "signal",
    }
}

