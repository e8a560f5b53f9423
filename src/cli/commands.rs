use crate::{
    cli::args::{DocsArgs, GenerateArgs, LineageArgs, LineageFormat, SplitArgs},
    core::{
        extract, fragments, render, GeneratePipeline, LineageRecord, LineageResolver,
        MapdocConfig, OpenAiAnalyzer, ResolutionPolicy, SkippedConnector, XmlDocument,
    },
    utils::files,
    Result,
};
use anyhow::anyhow;
use serde::Serialize;
use std::path::Path;

/// Render the full Markdown document for one workflow export.
pub async fn docs(args: DocsArgs) -> Result<()> {
    tracing::info!("rendering documentation for {}", args.workflow.display());

    let config = MapdocConfig::load(None)?;
    let document = XmlDocument::parse_file(&args.workflow)?;
    let root = document.root();

    let sources = extract::extract_sources(root);
    let targets = extract::extract_targets(root);
    let sessions = extract::extract_sessions(root);

    let mut mappings = Vec::new();
    for graph in extract::extract_mappings(root) {
        let resolved = LineageResolver::new(&graph, ResolutionPolicy::Lenient).resolve()?;
        mappings.push((graph, resolved));
    }

    let workflow_name = workflow_stem(&args.workflow);
    let markdown =
        render::render_workflow(&workflow_name, &sources, &targets, &mappings, &sessions);

    let out_dir = args
        .out
        .unwrap_or(config.output.dir)
        .join(&workflow_name);
    let doc_path = out_dir.join("workflow.md");
    files::write_artifact(&doc_path, &markdown)?;

    println!(
        "Documented {} sources, {} targets, {} mappings, {} sessions",
        sources.len(),
        targets.len(),
        mappings.len(),
        sessions.len()
    );
    println!("Wrote {}", doc_path.display());
    Ok(())
}

#[derive(Serialize)]
struct MappingLineage {
    mapping: String,
    records: Vec<LineageEntry>,
    skipped: Vec<SkippedConnector>,
}

#[derive(Serialize)]
struct LineageEntry {
    to_instance: String,
    #[serde(flatten)]
    record: LineageRecord,
}

/// Resolve field lineage and print it in the requested format.
pub async fn lineage(args: LineageArgs) -> Result<()> {
    tracing::info!("resolving lineage for {}", args.workflow.display());

    let document = XmlDocument::parse_file(&args.workflow)?;
    let policy = if args.strict {
        ResolutionPolicy::Strict
    } else {
        ResolutionPolicy::Lenient
    };

    let mut graphs = extract::extract_mappings(document.root());
    if let Some(ref name) = args.mapping {
        graphs.retain(|graph| graph.display_name() == name.as_str());
        if graphs.is_empty() {
            return Err(anyhow!(
                "mapping {} not found in {}",
                name,
                args.workflow.display()
            ));
        }
    }

    let mut reports = Vec::new();
    for graph in &graphs {
        let resolved = LineageResolver::new(graph, policy).resolve()?;
        let records = resolved
            .entries()
            .map(|(key, record)| LineageEntry {
                to_instance: key.0.clone(),
                record: record.clone(),
            })
            .collect();
        reports.push(MappingLineage {
            mapping: resolved.mapping_name.clone(),
            records,
            skipped: resolved.skipped.clone(),
        });
    }

    match args.format {
        LineageFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        LineageFormat::Text => {
            for report in &reports {
                println!("Mapping: {}", report.mapping);
                for entry in &report.records {
                    println!(
                        "  {} -> {}.{} via {}",
                        entry.record.source_field,
                        entry.to_instance,
                        entry.record.target_field,
                        entry.record.transformation
                    );
                }
                if !report.skipped.is_empty() {
                    println!("  Skipped connectors: {}", report.skipped.len());
                }
            }
        }
    }
    Ok(())
}

/// Write one standalone XML file per folder unit of the export.
pub async fn split(args: SplitArgs) -> Result<()> {
    tracing::info!("splitting {}", args.workflow.display());

    let config = MapdocConfig::load(None)?;
    let document = XmlDocument::parse_file(&args.workflow)?;
    let units = fragments::folder_units(&document);

    if units.is_empty() {
        println!("No folder units found in {}", args.workflow.display());
        return Ok(());
    }

    let out_dir = args.out.unwrap_or(config.output.dir);
    for unit in &units {
        let path = out_dir.join(unit.file_name());
        files::write_artifact(&path, &unit.xml)?;
        println!("Wrote {}", path.display());
    }
    println!("Split into {} files", units.len());
    Ok(())
}

/// Run the full generation pipeline against the configured model endpoint.
pub async fn generate(args: GenerateArgs) -> Result<()> {
    tracing::info!("generating draft code for {}", args.workflow.display());

    let config = MapdocConfig::load(args.config.as_deref())?;
    let document = XmlDocument::parse_file(&args.workflow)?;

    let analyzer = OpenAiAnalyzer::new(&config.api)?;
    let pipeline = GeneratePipeline::new(Box::new(analyzer), config.generate.clone());

    let out_dir = args.out.unwrap_or(config.output.dir);
    let report = pipeline.run(&document, &out_dir).await?;

    println!(
        "Generated {} artifacts from {} mapping chunks in {}",
        report.artifacts.len(),
        report.chunk_count,
        out_dir.display()
    );
    Ok(())
}

fn workflow_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workflow".to_string())
}
