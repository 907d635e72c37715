//! `varcfg_core` is the export pipeline behind [varcfg](https://github.com/ifiokjr/varcfg). A schema describes which configuration keys exist, their types, defaults and descriptions. A variant fills in values for those keys, and the pipeline turns the values into JSON, YAML, or a layered C header.
//!
//! ## Processing Pipeline
//!
//! ```text
//! schema.json / values.yaml
//!   → Document loader (JSON, YAML or TOML into an ordered mapping)
//!   → Schema (typed field descriptors) + ValueMap (defaults, then values)
//!   → Exporters
//!       JSON / YAML: structural serialization of the ValueMap
//!       C header:    identifier validation → literal encoding → two-tier layout
//!   → Export sink (directory, memory)
//!
//! C header → Highlighter (escape, then wrap tokens in spans) → HTML preview
//! ```
//!
//! ## Generated Header
//!
//! Variant values are emitted first as plain `#define`s and schema defaults
//! follow inside `#ifndef` guards, so under the C preprocessor a variant value
//! always wins over the default for the same key:
//!
//! ```c
//! #pragma once
//! // Auto-generated by varcfg. Do not edit.
//! // Variant: board_a
//!
//! #define UART_BAUD 9600
//!
//! // UART baud rate
//! #ifndef UART_BAUD
//! #define UART_BAUD 115200
//! #endif
//! ```
//!
//! Keys that are not valid C identifiers, and values the schema does not
//! describe, are skipped with a warning instead of failing the export.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading from `varcfg.toml`.
//! - [`context`]: Resolves config, command line overrides, schema and values into a [`VariantContext`].
//! - [`document`]: JSON / YAML / TOML schema and values documents.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use varcfg_core::DefaultValue;
//! use varcfg_core::FieldSpec;
//! use varcfg_core::Schema;
//! use varcfg_core::ValueMap;
//! use varcfg_core::generate_header;
//!
//! let schema = Schema::from_fields([(
//! 	"UART_BAUD",
//! 	FieldSpec::Number {
//! 		default: Some(DefaultValue::Typed(115_200_u32.into())),
//! 		description: None,
//! 	},
//! )]);
//! let values = ValueMap::from_schema(&schema).with_value("UART_BAUD", json!(9600));
//!
//! let header = generate_header(&schema, &values, "board_a");
//! assert!(header.contains("#define UART_BAUD 9600\n"));
//! assert!(header.contains("#ifndef UART_BAUD\n#define UART_BAUD 115200\n#endif"));
//! ```

pub use check::*;
pub use config::*;
pub use context::*;
pub use document::*;
pub use error::*;
pub use export::*;
pub use header::*;
pub use highlight::*;
pub use identifier::*;
pub use literal::*;
pub use schema::*;
pub use values::*;

mod check;
pub mod config;
pub mod context;
pub mod document;
#[allow(unused_assignments)]
mod error;
mod export;
mod header;
mod highlight;
mod identifier;
mod literal;
mod schema;
mod values;

#[cfg(test)]
mod __fixtures;
