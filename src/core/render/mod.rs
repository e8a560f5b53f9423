use crate::core::model::{
    Entity, MappingGraph, ResolvedMapping, Session, UNKNOWN_MARKER,
};

/// Session attributes surfaced in the Session Properties table. Everything
/// else stays in the model but is not rendered.
const IMPORTANT_SESSION_PROPERTIES: [&str; 6] = [
    "Commit Type",
    "Commit Interval",
    "DTM buffer size",
    "Recovery Strategy",
    "Pushdown Optimization",
    "Session Log File Name",
];

fn value_or_marker(value: Option<&str>) -> &str {
    value.unwrap_or(UNKNOWN_MARKER)
}

/// Render one source definition: header block plus field table.
pub fn render_source(entity: &Entity) -> String {
    let name = value_or_marker(entity.name.as_deref());
    let mut out = String::new();

    out.push_str(&format!("## Source name: {}\n", name));
    out.push_str(&format!(
        "- **Database Type:** {}\n",
        value_or_marker(entity.attr("DATABASETYPE"))
    ));
    out.push_str(&format!(
        "- **Database Name:** {}\n",
        value_or_marker(entity.attr("DBDNAME"))
    ));
    out.push_str(&format!("- **Table Name:** {}\n", name));
    out.push_str(&format!(
        "- **Owner:** {}\n",
        value_or_marker(entity.attr("OWNERNAME"))
    ));
    out.push('\n');

    out.push_str("### Fields\n");
    out.push_str("| Field Name | Data Type | Length | Precision | Scale | Nullable |\n");
    out.push_str("|------------|-----------|--------|-----------|-------|----------|\n");
    for field in &entity.fields {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} |\n",
            value_or_marker(field.name.as_deref()),
            value_or_marker(field.data_type.as_deref()),
            value_or_marker(field.length.as_deref()),
            value_or_marker(field.precision.as_deref()),
            value_or_marker(field.scale.as_deref()),
            value_or_marker(field.nullable.as_deref()),
        ));
    }
    out
}

/// Render one target definition: header block plus field table with ordinals
/// and key types.
pub fn render_target(entity: &Entity) -> String {
    let name = value_or_marker(entity.name.as_deref());
    let mut out = String::new();

    out.push_str(&format!("## Target name: {}\n", name));
    out.push_str(&format!(
        "- **Database Type:** {}\n",
        value_or_marker(entity.attr("DATABASETYPE"))
    ));
    out.push_str(&format!(
        "- **Database Name:** {}\n",
        value_or_marker(entity.attr("DBDNAME"))
    ));
    out.push_str(&format!("- **Table Name:** {}\n", name));
    out.push_str(&format!(
        "- **Owner:** {}\n",
        value_or_marker(entity.attr("OWNERNAME"))
    ));
    out.push('\n');

    out.push_str("### Fields\n");
    out.push_str(
        "| Field Number | Name | Data Type | Precision | Scale | Nullable | Key Type |\n",
    );
    out.push_str(
        "|--------------|------|-----------|-----------|-------|----------|----------|\n",
    );
    for field in &entity.fields {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            value_or_marker(field.ordinal.as_deref()),
            value_or_marker(field.name.as_deref()),
            value_or_marker(field.data_type.as_deref()),
            value_or_marker(field.precision.as_deref()),
            value_or_marker(field.scale.as_deref()),
            value_or_marker(field.nullable.as_deref()),
            value_or_marker(field.key_type.as_deref()),
        ));
    }
    out
}

/// Render one mapping: name, description, variables, then the resolved
/// field-mapping table in record order.
pub fn render_mapping(graph: &MappingGraph, resolved: &ResolvedMapping) -> String {
    let mut out = String::new();

    out.push_str("---\n");
    out.push_str(&format!("- **Mapping Name:** {}\n", graph.display_name()));
    out.push_str(&format!(
        "- **Description:** {}\n",
        value_or_marker(graph.description.as_deref())
    ));
    out.push('\n');

    out.push_str("**Mapping Variables**\n");
    for variable in &graph.variables {
        out.push_str(&format!(
            "- **{}**: {}\n",
            value_or_marker(variable.name.as_deref()),
            value_or_marker(variable.value.as_deref()),
        ));
    }
    out.push('\n');

    out.push_str("### Field Mappings\n\n");
    out.push_str(
        "| Source | Target | Transformation | Default Value | Data Type | Precision | Scale |\n",
    );
    out.push_str(
        "|--------|--------|----------------|---------------|-----------|-----------|-------|\n",
    );
    for record in resolved.records() {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            record.source_field,
            record.target_field,
            record.transformation,
            value_or_marker(record.default_value.as_deref()),
            value_or_marker(record.data_type.as_deref()),
            value_or_marker(record.precision.as_deref()),
            value_or_marker(record.scale.as_deref()),
        ));
    }
    out
}

/// Render one session: basic info, components, connections, writer settings,
/// and the filtered properties table.
pub fn render_session(session: &Session) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "## Session: {}\n",
        value_or_marker(session.name.as_deref())
    ));
    out.push_str(&format!(
        "- **Mapping Name:** {}\n",
        value_or_marker(session.mapping_name.as_deref())
    ));
    out.push_str(&format!(
        "- **Description:** {}\n",
        value_or_marker(session.description.as_deref())
    ));
    out.push_str(&format!(
        "- **Version:** {}\n",
        value_or_marker(session.version.as_deref())
    ));
    out.push('\n');

    out.push_str("### Transformation Components\n");
    out.push_str("| Instance Name | Type | Stage | Pipeline | Repartition |\n");
    out.push_str("|---------------|------|-------|----------|-------------|\n");
    for component in &session.components {
        out.push_str(&format!(
            "| {} | {} | {} | {} | {} |\n",
            value_or_marker(component.instance_name.as_deref()),
            value_or_marker(component.transformation_type.as_deref()),
            value_or_marker(component.stage.as_deref()),
            value_or_marker(component.pipeline.as_deref()),
            value_or_marker(component.repartitioning.as_deref()),
        ));
    }
    out.push('\n');

    out.push_str("### Connections\n");
    out.push_str("| Component | Connection Name | Type | Subtype |\n");
    out.push_str("|-----------|-----------------|------|---------|\n");
    for connection in &session.connections {
        out.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            value_or_marker(connection.instance.as_deref()),
            value_or_marker(connection.connection_name.as_deref()),
            value_or_marker(connection.connection_type.as_deref()),
            value_or_marker(connection.connection_subtype.as_deref()),
        ));
    }
    out.push('\n');

    out.push_str("### Target Load Settings\n");
    if !session.writer_settings.is_empty() {
        out.push_str("| Setting | Value |\n");
        out.push_str("|---------|-------|\n");
        for (name, value) in &session.writer_settings {
            out.push_str(&format!("| {} | {} |\n", name, value_or_marker(value.as_deref())));
        }
    }
    out.push('\n');

    out.push_str("### Session Properties\n");
    out.push_str("| Property | Value |\n");
    out.push_str("|----------|-------|\n");
    for (name, value) in &session.attributes {
        if IMPORTANT_SESSION_PROPERTIES.contains(&name.as_str()) {
            out.push_str(&format!("| {} | {} |\n", name, value_or_marker(value.as_deref())));
        }
    }
    out
}

/// Assemble the complete workflow document.
pub fn render_workflow(
    workflow_name: &str,
    sources: &[Entity],
    targets: &[Entity],
    mappings: &[(MappingGraph, ResolvedMapping)],
    sessions: &[Session],
) -> String {
    let mut out = String::new();

    out.push_str(&format!("# Workflow: {}\n\n", workflow_name));

    out.push_str("# Sources\n\n");
    for source in sources {
        out.push_str(&render_source(source));
        out.push('\n');
    }
    out.push('\n');

    out.push_str("# Targets\n\n");
    for target in targets {
        out.push_str(&render_target(target));
        out.push('\n');
    }
    out.push('\n');

    out.push_str("## Mapping Details\n\n");
    for (graph, resolved) in mappings {
        out.push_str(&render_mapping(graph, resolved));
        out.push('\n');
    }
    out.push('\n');

    out.push_str("## Sessions\n\n");
    for session in sessions {
        out.push_str(&render_session(session));
        out.push('\n');
    }

    out
}
