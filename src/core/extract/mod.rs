use crate::core::document::XmlNode;
use crate::core::model::{
    Connector, Entity, EntityKind, Field, Instance, MappingGraph, MappingVariable, Session,
    SessionComponent, SessionConnection, Transformation,
};
use indexmap::IndexMap;

/// Lift a SOURCE element into an entity. Fields come from direct SOURCEFIELD
/// children in declaration order.
pub fn source_entity(node: &XmlNode) -> Entity {
    Entity {
        name: owned(node.attr("NAME")),
        kind: EntityKind::Source,
        attrs: entity_attrs(node),
        fields: node.children_named("SOURCEFIELD").map(field_from).collect(),
    }
}

/// Lift a TARGET element into an entity. Fields come from direct TARGETFIELD
/// children in declaration order.
pub fn target_entity(node: &XmlNode) -> Entity {
    Entity {
        name: owned(node.attr("NAME")),
        kind: EntityKind::Target,
        attrs: entity_attrs(node),
        fields: node.children_named("TARGETFIELD").map(field_from).collect(),
    }
}

/// All SOURCE descendants of the given element, in document order.
pub fn extract_sources(root: &XmlNode) -> Vec<Entity> {
    root.descendants("SOURCE")
        .into_iter()
        .map(source_entity)
        .collect()
}

/// All TARGET descendants of the given element, in document order.
pub fn extract_targets(root: &XmlNode) -> Vec<Entity> {
    root.descendants("TARGET")
        .into_iter()
        .map(target_entity)
        .collect()
}

/// Lift one MAPPING element into a graph. Every list keeps document order.
/// Transformations without a NAME attribute are dropped since connectors can
/// never reference them.
pub fn mapping_graph(node: &XmlNode) -> MappingGraph {
    let variables = node
        .descendants("MAPPINGVARIABLE")
        .into_iter()
        .map(|var| MappingVariable {
            name: owned(var.attr("NAME")),
            value: owned(var.attr("VALUE")),
        })
        .collect();

    let instances = node
        .descendants("INSTANCE")
        .into_iter()
        .map(|inst| Instance {
            name: owned(inst.attr("NAME")),
            transformation_name: inst.attr("TRANSFORMATION_NAME").unwrap_or_default().to_string(),
            transformation_type: owned(inst.attr("TRANSFORMATION_TYPE")),
        })
        .collect();

    let transformations = node
        .descendants("TRANSFORMATION")
        .into_iter()
        .filter_map(|trans| {
            let name = trans.attr("NAME")?.to_string();
            Some(Transformation {
                name,
                kind: owned(trans.attr("TYPE")),
                fields: trans
                    .descendants("TRANSFORMFIELD")
                    .into_iter()
                    .map(field_from)
                    .collect(),
            })
        })
        .collect();

    let connectors = node
        .descendants("CONNECTOR")
        .into_iter()
        .map(|conn| Connector {
            from_instance: conn.attr("FROMINSTANCE").unwrap_or_default().to_string(),
            from_field: conn.attr("FROMFIELD").unwrap_or_default().to_string(),
            to_instance: conn.attr("TOINSTANCE").unwrap_or_default().to_string(),
            to_field: conn.attr("TOFIELD").unwrap_or_default().to_string(),
            to_instance_type: owned(conn.attr("TOINSTANCETYPE")),
        })
        .collect();

    MappingGraph {
        name: owned(node.attr("NAME")),
        description: owned(node.attr("DESCRIPTION")),
        variables,
        instances,
        transformations,
        connectors,
    }
}

/// All MAPPING descendants of the given element, in document order.
pub fn extract_mappings(root: &XmlNode) -> Vec<MappingGraph> {
    root.descendants("MAPPING")
        .into_iter()
        .map(mapping_graph)
        .collect()
}

/// Lift one SESSION element into session configuration.
///
/// `attributes` collects every ATTRIBUTE pair under the session, including
/// those nested inside extensions; an ATTRIBUTE without VALUE is kept under
/// its name with `None`. The renderer applies its own filter.
pub fn extract_session(node: &XmlNode) -> Session {
    let components = node
        .descendants("SESSTRANSFORMATIONINST")
        .into_iter()
        .map(|inst| SessionComponent {
            instance_name: owned(inst.attr("SINSTANCENAME")),
            transformation_type: owned(inst.attr("TRANSFORMATIONTYPE")),
            stage: owned(inst.attr("STAGE")),
            pipeline: owned(inst.attr("PIPELINE")),
            repartitioning: owned(inst.attr("ISREPARTITIONPOINT")),
        })
        .collect();

    let connections = node
        .descendants("SESSIONEXTENSION")
        .into_iter()
        .filter_map(|ext| {
            let reference = ext.descendants("CONNECTIONREFERENCE").into_iter().next()?;
            Some(SessionConnection {
                instance: owned(ext.attr("SINSTANCENAME")),
                connection_name: owned(reference.attr("CONNECTIONNAME")),
                connection_type: owned(reference.attr("CONNECTIONTYPE")),
                connection_subtype: owned(reference.attr("CONNECTIONSUBTYPE")),
            })
        })
        .collect();

    let writer_settings = node
        .descendants("SESSIONEXTENSION")
        .into_iter()
        .find(|ext| ext.attr("SUBTYPE") == Some("Relational Writer"))
        .map(|ext| attribute_pairs(ext.children_named("ATTRIBUTE")))
        .unwrap_or_default();

    let attributes = attribute_pairs(node.descendants("ATTRIBUTE").into_iter());

    Session {
        name: owned(node.attr("NAME")),
        mapping_name: owned(node.attr("MAPPINGNAME")),
        description: owned(node.attr("DESCRIPTION")),
        version: owned(node.attr("VERSIONNUMBER")),
        components,
        connections,
        writer_settings,
        attributes,
    }
}

/// All SESSION descendants of the given element, in document order.
pub fn extract_sessions(root: &XmlNode) -> Vec<Session> {
    root.descendants("SESSION")
        .into_iter()
        .map(extract_session)
        .collect()
}

fn owned(value: Option<&str>) -> Option<String> {
    value.map(str::to_string)
}

fn entity_attrs(node: &XmlNode) -> IndexMap<String, String> {
    node.attrs()
        .filter(|(name, _)| *name != "NAME")
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}

fn field_from(node: &XmlNode) -> Field {
    Field {
        name: owned(node.attr("NAME")),
        ordinal: owned(node.attr("FIELDNUMBER")),
        data_type: owned(node.attr("DATATYPE")),
        length: owned(node.attr("LENGTH")),
        precision: owned(node.attr("PRECISION")),
        scale: owned(node.attr("SCALE")),
        nullable: owned(node.attr("NULLABLE")),
        key_type: owned(node.attr("KEYTYPE")),
        default_value: owned(node.attr("DEFAULTVALUE")),
    }
}

fn attribute_pairs<'a>(nodes: impl Iterator<Item = &'a XmlNode>) -> Vec<(String, Option<String>)> {
    nodes
        .filter_map(|attr| {
            let name = attr.attr("NAME")?;
            Some((name.to_string(), owned(attr.attr("VALUE"))))
        })
        .collect()
}
