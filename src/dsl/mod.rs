//! # DSL Module
//!
//! Parses the compact entity description language accepted on the command line:
//!
//! ```text
//! --fields    "name:string, description:text, status:enum(open, closed)"
//! --relations "tasks:hasMany, owner:belongsTo"
//! ```
//!
//! ## Grammar
//!
//! A description is a comma separated list of `name:definition` tokens. Commas
//! inside parentheses do not separate tokens, which is what lets an enum carry
//! its value list inline. Each token is split on its **first** colon.
//!
//! | Definition          | Field kind                       |
//! |---------------------|----------------------------------|
//! | `string`            | [`FieldKind::String`]            |
//! | `text`, `longText`  | [`FieldKind::Text`]              |
//! | `integer`, `int`    | [`FieldKind::Integer`]           |
//! | `boolean`, `bool`   | [`FieldKind::Boolean`]           |
//! | `enum(v1, v2, ...)` | [`FieldKind::Enum`]              |
//! | anything else       | [`FieldKind::Passthrough`]       |
//!
//! Relation definitions must be exactly `hasMany` or `belongsTo`.
//!
//! ## Errors
//!
//! Structural problems (unbalanced parentheses, a token without a colon) are
//! [`ParseError`](crate::error::ParseError)s and abort generation before
//! anything is written. An unknown relation kind only drops that relation.

mod parser;
mod types;


pub use parser::{
    parse_field, parse_fields, parse_relation, parse_relations, split_top_level, ParsedRelations,
};
pub use types::{FieldKind, FieldSpec, RelationKind, RelationSpec};
