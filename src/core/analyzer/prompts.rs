//! Prompt construction for the generation pipeline.
//!
//! Each builder returns one self-contained user prompt. The templates ask
//! the model to answer in a fixed shape so downstream artifacts stay
//! comparable across workflows.

const SOURCE_SECTIONS: &str = "\
*   **Source:**
    *   System: [e.g. Oracle Database, Flat File]
    *   Tables/Files: [list of source tables or files]
    *   Data Fields: [source fields with their data types]

*   **Target:**
    *   System: [e.g. Snowflake, AWS S3]
    *   Tables/Files: [list of target tables or files]
    *   Data Fields: [target fields with their data types]
";

const MAPPING_SECTIONS: &str = "\
**Mapping Details:**

| Source Field | Target Field | Transformation Logic |
|---|---|---|
| Source_Field1 | Target_Field1 | Direct Map |
| Source_Field2 | Target_Field2 | Data Type Conversion (e.g. String to Date) |
| Source_Field3 | Target_Field3 | Expression (e.g. Calculate Age) |
| Source_Field4 | Target_Field4 | Lookup (e.g. Enrich from a lookup table) |
| ... | ... | ... |

**SQL Queries and Stored Procedures:**

*   [SQL used in the mapping: Source Qualifier queries, expression logic, filter conditions]
*   [Stored procedures with name, input and output parameters, and a one-line description]

**Business Rules and Logic:**

*   [Business rules implemented in the mapping: validation, data quality checks, conditional routing, error handling]
";

/// Prompt asking the model to summarize source and target systems from
/// definition XML.
pub fn source_information(source_xml: &str) -> String {
    let mut prompt = String::from(
        "Analyze these Informatica PowerCenter source and target definitions and describe what feeds the workflow.\n\n",
    );
    prompt.push_str("Definitions:\n");
    prompt.push_str(source_xml.trim());
    prompt.push_str("\n\nReturn only the following sections, nothing else:\n\n");
    prompt.push_str(SOURCE_SECTIONS);
    prompt
}

/// Prompt asking for the data access layer of the rewritten pipeline.
///
/// The reply must contain only the `load_source_data` and
/// `load_target_data` functions.
pub fn source_code(source_xml: &str, information: &str, sample_code: &str) -> String {
    let mut prompt = String::from(
        "You are an expert Python ETL developer. Using the source definitions and the extracted source information below, write the data access layer for this workflow.\n\n",
    );
    prompt.push_str(
        "Write only the load_source_data and load_target_data functions. Comment the code so each step is explainable. Return only code.\n\n",
    );
    prompt.push_str("Source Definitions:\n");
    prompt.push_str(source_xml.trim());
    prompt.push_str("\n\nSource Information:\n");
    prompt.push_str(information.trim());
    push_sample_code(&mut prompt, sample_code);
    prompt
}

/// Prompt asking for a structured summary of one mapping XML chunk.
pub fn mapping_summary(mapping_xml: &str) -> String {
    let mut prompt = String::from(
        "You are an expert in ETL workflows. Summarize the Informatica PowerCenter mapping XML below.\n\n",
    );
    prompt.push_str("Mapping XML:\n");
    prompt.push_str(mapping_xml.trim());
    prompt.push_str("\n\nReturn only the following sections, nothing else:\n\n");
    prompt.push_str(MAPPING_SECTIONS);
    prompt
}

/// Prompt asking for transformation code covering one mapping XML chunk.
pub fn mapping_code(mapping_xml: &str, summary: &str, sample_code: &str) -> String {
    let mut prompt = String::from(
        "You are an expert Python ETL developer. Write Python ETL code implementing the mapping XML and summary below.\n\n",
    );
    prompt.push_str(
        "Comment the code so each step is explainable. Return only code.\n\n",
    );
    prompt.push_str("Mapping XML:\n");
    prompt.push_str(mapping_xml.trim());
    prompt.push_str("\n\nMapping Summary:\n");
    prompt.push_str(summary.trim());
    push_sample_code(&mut prompt, sample_code);
    prompt
}

/// Prompt asking the model to merge the per-chunk mapping code and the data
/// access layer into one program.
pub fn final_code(mapping_code: &str, source_code: &str) -> String {
    let mut prompt = String::from(
        "You are an expert Python ETL developer. Merge the mapping code and the data access code below into one final, runnable Python ETL program.\n\n",
    );
    prompt.push_str("Mapping Code:\n");
    prompt.push_str(mapping_code.trim());
    prompt.push_str("\n\nSource Code:\n");
    prompt.push_str(source_code.trim());
    prompt.push_str(
        "\n\nComment the code so each step is explainable. Return only code.\n",
    );
    prompt
}

fn push_sample_code(prompt: &mut String, sample_code: &str) {
    let trimmed = sample_code.trim();
    if !trimmed.is_empty() {
        prompt.push_str("\n\nSample Code:\n");
        prompt.push_str(trimmed);
    }
    prompt.push('\n');
}
