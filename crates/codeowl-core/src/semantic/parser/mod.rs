//! Language-agnostic parsing infrastructure for structural extraction.
//!
//! Files are parsed with tree-sitter and walked by one [`Extractor`] per
//! grammar family, producing normalized records that look the same for
//! every language.
//!
//! ## Components
//!
//! - `GrammarRegistry` - Maps file extensions to languages and grammars
//! - `TreeSitterParser` - Parses bytes into a `ParsedSource` (tree + text)
//! - `Extractor` trait - Functions, type declarations, imports and calls
//!
//! ## Supported Languages
//!
//! - Python (`.py`)
//! - JavaScript (`.js`) and TypeScript (`.ts`), one shared extractor
//! - Go (`.go`)
//! - Rust (`.rs`)

mod go;
mod javascript;
mod language;
mod python;
mod registry;
mod result;
mod rust;
mod traits;
mod treesitter;

pub use go::GoExtractor;
pub use javascript::EcmaScriptExtractor;
pub use language::Language;
pub use python::PythonExtractor;
pub use registry::GrammarRegistry;
pub use result::{FileSemanticRecord, FunctionKind, FunctionRecord, TypeKind, TypeRecord};
pub use rust::RustExtractor;
pub use traits::Extractor;
pub use treesitter::{
    find_ancestor, node_end_line, node_line, ParsedSource, Preorder, TreeSitterParser,
};
