use clap::Args;
use std::path::PathBuf;

#[derive(Args)]
pub struct DocsArgs {
    /// Workflow XML export to document
    #[arg(value_name = "WORKFLOW")]
    pub workflow: PathBuf,

    /// Directory receiving the rendered documentation (default: output.dir from mapdoc.toml)
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct LineageArgs {
    /// Workflow XML export to resolve
    #[arg(value_name = "WORKFLOW")]
    pub workflow: PathBuf,

    /// Resolve only the named mapping
    #[arg(long, value_name = "NAME")]
    pub mapping: Option<String>,

    /// Fail on the first connector whose source field cannot be resolved
    #[arg(long)]
    pub strict: bool,

    /// Emit either terminal-friendly text or machine-readable JSON
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: LineageFormat,
}

#[derive(Clone, clap::ValueEnum, Debug)]
pub enum LineageFormat {
    /// Human-readable lines, one per resolved field
    Text,
    /// JSON payload suitable for downstream tooling
    Json,
}

#[derive(Args)]
pub struct SplitArgs {
    /// Workflow XML export to split
    #[arg(value_name = "WORKFLOW")]
    pub workflow: PathBuf,

    /// Directory receiving the per-unit XML files (default: output.dir from mapdoc.toml)
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Workflow XML export to rewrite
    #[arg(value_name = "WORKFLOW")]
    pub workflow: PathBuf,

    /// Directory receiving the generated artifacts (default: output.dir from mapdoc.toml)
    #[arg(long, value_name = "DIR")]
    pub out: Option<PathBuf>,

    /// Path to custom config file (default: ./mapdoc.toml)
    #[arg(long, value_name = "FILE", help_heading = "Configuration")]
    pub config: Option<PathBuf>,
}
