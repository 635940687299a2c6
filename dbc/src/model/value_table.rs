//! Global value table — a named enumeration shared across signals via
//! `enum_ref` (spec §4.6), independent of any one signal's own
//! `enum_values`.

#[derive(Debug, Clone, PartialEq)]
pub struct ValueTable {
    pub name: String,
    pub entries: Vec<(i64, String)>,
}
