pub mod config;
pub mod semantic;

pub use config::{Config, ConfigError};
pub use semantic::{
    AnalysisError, FileSemanticRecord, GraphBuilder, Language, RepositoryGraph, RepositoryIndexer,
    SemanticAnalyzer,
};
