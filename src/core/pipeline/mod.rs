//! Orchestration of the model-backed generation run.
//!
//! Splits the workflow into context fragments, walks the mapping context in
//! chunks, and writes one artifact per step under the output directory.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::core::analyzer::{prompts, strip_code_fences, Analyzer};
use crate::core::config::GenerateConfig;
use crate::core::document::XmlDocument;
use crate::core::fragments;
use crate::utils::files;
use crate::Result;

/// Summary of one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateReport {
    /// Artifacts written, in write order.
    pub artifacts: Vec<PathBuf>,
    /// Number of mapping chunks sent to the model.
    pub chunk_count: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

/// Drives the prompt sequence and writes the generation artifacts.
pub struct GeneratePipeline {
    analyzer: Box<dyn Analyzer>,
    config: GenerateConfig,
}

impl GeneratePipeline {
    pub fn new(analyzer: Box<dyn Analyzer>, config: GenerateConfig) -> Self {
        Self { analyzer, config }
    }

    /// Run every generation step against one workflow document.
    ///
    /// Analyzer failures abort the run; artifacts written before the failure
    /// stay on disk.
    pub async fn run(&self, document: &XmlDocument, out_dir: &Path) -> Result<GenerateReport> {
        let started_at = Utc::now();
        let mut artifacts = Vec::new();
        let sample_code = files::read_or_empty(&self.config.sample_code);

        let source_xml = fragments::source_context(document);
        let path = out_dir.join("source_information.xml");
        files::write_artifact(&path, &source_xml)?;
        artifacts.push(path);

        info!("describing source and target systems");
        let information = self
            .analyzer
            .complete(&prompts::source_information(&source_xml))
            .await?;
        let path = out_dir.join("source_information.md");
        files::write_artifact(&path, &information)?;
        artifacts.push(path);

        info!("generating the data access layer");
        let reply = self
            .analyzer
            .complete(&prompts::source_code(&source_xml, &information, &sample_code))
            .await?;
        let source_code = strip_code_fences(&reply);
        let path = out_dir.join("source_code.py");
        files::write_artifact(&path, &source_code)?;
        artifacts.push(path);

        let mapping_xml = fragments::mapping_context(document);
        let path = out_dir.join("mapping_xml.xml");
        files::write_artifact(&path, &mapping_xml)?;
        artifacts.push(path);

        let chunks = fragments::chunk_text(&mapping_xml, self.config.chunk_size);
        let chunk_count = chunks.len();
        let mut summaries = Vec::with_capacity(chunk_count);
        let mut codes = Vec::with_capacity(chunk_count);
        for (index, chunk) in chunks.iter().enumerate() {
            info!("processing mapping chunk {}/{}", index + 1, chunk_count);
            let summary = self
                .analyzer
                .complete(&prompts::mapping_summary(chunk))
                .await?;
            let reply = self
                .analyzer
                .complete(&prompts::mapping_code(chunk, &summary, &sample_code))
                .await?;
            codes.push(strip_code_fences(&reply));
            summaries.push(summary);
        }

        let path = out_dir.join("mapping_summary.md");
        files::write_artifact(&path, &summaries.join("\n\n"))?;
        artifacts.push(path);

        let mapping_code = codes.join("\n\n");
        let path = out_dir.join("mapping_code.py");
        files::write_artifact(&path, &mapping_code)?;
        artifacts.push(path);

        info!("merging into the final program");
        let reply = self
            .analyzer
            .complete(&prompts::final_code(&mapping_code, &source_code))
            .await?;
        let path = out_dir.join("final_code.py");
        files::write_artifact(&path, &strip_code_fences(&reply))?;
        artifacts.push(path);

        Ok(GenerateReport {
            artifacts,
            chunk_count,
            started_at,
            completed_at: Utc::now(),
        })
    }
}
