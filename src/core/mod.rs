pub mod analyzer;
pub mod config;
pub mod document;
pub mod error;
pub mod extract;
pub mod fragments;
pub mod model;
pub mod pipeline;
pub mod render;
pub mod resolve;

pub use analyzer::{Analyzer, AnalyzerError, OpenAiAnalyzer};
pub use config::MapdocConfig;
pub use document::{XmlDocument, XmlNode};
pub use error::ExtractError;
pub use model::{
    Connector, Entity, EntityKind, Field, KeyRole, LineageRecord, MappingGraph, MappingVariable,
    ResolvedMapping, Session, SkippedConnector,
};
pub use pipeline::{GeneratePipeline, GenerateReport};
pub use resolve::{LineageResolver, ResolutionPolicy};
