pub mod args;
pub mod commands;

pub use args::{DocsArgs, GenerateArgs, LineageArgs, LineageFormat, SplitArgs};
use clap::{Parser, Subcommand};

const HELP_TEMPLATE: &str = "\
{name} {version}\n\
{about-with-newline}\n\
USAGE:\n    {usage}\n\
\nOPTIONS:\n{options}\n\
WORKFLOW COMMANDS:\n{subcommands}\n";

#[derive(Parser)]
#[command(name = "mapdoc")]
#[command(version = crate::VERSION)]
#[command(about = "Documentation and draft ETL code from Informatica PowerCenter workflow XML")]
#[command(help_template = HELP_TEMPLATE)]
#[command(
    after_long_help = "Typical flow: render docs for review, check lineage, split large exports, then generate draft code."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(
        about = "Render Markdown documentation for a workflow export",
        long_about = "Docs extracts sources, targets, mappings, and sessions from the export, resolves field lineage, and writes a single Markdown document per workflow.",
        after_help = "Example:\n    mapdoc docs ./wf_customer_load.XML --out ./output"
    )]
    Docs(DocsArgs),
    #[command(
        about = "Resolve and print field-level lineage",
        long_about = "Lineage walks every connector feeding a target definition back to its source field and reports the transformation expression in between.",
        after_help = "Example:\n    mapdoc lineage ./wf_customer_load.XML --mapping m_customer_load --format json"
    )]
    Lineage(LineageArgs),
    #[command(
        about = "Split a multi-folder export into per-unit XML files",
        long_about = "Split writes one standalone XML file per folder unit so that very large exports can be reviewed or processed piecewise.",
        after_help = "Example:\n    mapdoc split ./wf_everything.XML --out ./parts"
    )]
    Split(SplitArgs),
    #[command(
        about = "Generate draft ETL code through a model endpoint",
        long_about = "Generate feeds source and mapping context to an OpenAI-compatible chat endpoint and writes the returned documentation and Python drafts as reviewable artifacts.",
        after_help = "Example:\n    mapdoc generate ./wf_customer_load.XML --out ./output --config ./mapdoc.toml"
    )]
    Generate(GenerateArgs),
}

pub async fn run(args: Args) -> crate::Result<()> {
    match args.command {
        Command::Docs(docs_args) => commands::docs(docs_args).await,
        Command::Lineage(lineage_args) => commands::lineage(lineage_args).await,
        Command::Split(split_args) => commands::split(split_args).await,
        Command::Generate(generate_args) => commands::generate(generate_args).await,
    }
}
