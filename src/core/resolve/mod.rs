use crate::core::error::ExtractError;
use crate::core::model::{
    Instance, LineageRecord, MappingGraph, ResolvedMapping, SkipReason, SkippedConnector,
    Transformation,
};
use std::collections::HashMap;

/// Connectors into any other instance type carry intermediate hops and are
/// ignored by resolution.
const TARGET_INSTANCE_TYPE: &str = "Target Definition";

/// How to treat a qualifying connector whose source field is not declared by
/// the transformation it resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionPolicy {
    /// Skip the connector and record a diagnostic.
    #[default]
    Lenient,
    /// Abort the mapping's resolution with `UnresolvableField`.
    Strict,
}

/// Resolves a mapping's connectors into per-target-field lineage records.
///
/// Both indices are built once, up front. On duplicate keys the first
/// declaration wins, so repeated lookups during the connector walk stay
/// deterministic.
pub struct LineageResolver<'a> {
    graph: &'a MappingGraph,
    policy: ResolutionPolicy,
    instances_by_transformation: HashMap<&'a str, &'a Instance>,
    transformations_by_name: HashMap<&'a str, &'a Transformation>,
}

impl<'a> LineageResolver<'a> {
    pub fn new(graph: &'a MappingGraph, policy: ResolutionPolicy) -> Self {
        let mut instances_by_transformation = HashMap::new();
        for instance in &graph.instances {
            instances_by_transformation
                .entry(instance.transformation_name.as_str())
                .or_insert(instance);
        }

        let mut transformations_by_name = HashMap::new();
        for transformation in &graph.transformations {
            transformations_by_name
                .entry(transformation.name.as_str())
                .or_insert(transformation);
        }

        LineageResolver {
            graph,
            policy,
            instances_by_transformation,
            transformations_by_name,
        }
    }

    /// Walk connectors in document order and build the lineage table.
    ///
    /// Guarantees: at most one record per `(to_instance, to_field)` key, the
    /// first qualifying connector wins, and record values are verbatim copies
    /// of the resolved transformation field.
    pub fn resolve(&self) -> Result<ResolvedMapping, ExtractError> {
        let mut resolved = ResolvedMapping::new(self.graph.display_name().to_string());

        for connector in &self.graph.connectors {
            if connector.to_instance_type.as_deref() != Some(TARGET_INSTANCE_TYPE) {
                continue;
            }

            let instance = match self
                .instances_by_transformation
                .get(connector.from_instance.as_str())
            {
                Some(instance) => *instance,
                None => {
                    tracing::debug!(
                        "mapping {}: connector source instance {} not declared; skipping",
                        resolved.mapping_name,
                        connector.from_instance
                    );
                    resolved.skipped.push(SkippedConnector {
                        connector: connector.clone(),
                        reason: SkipReason::UnknownInstance,
                    });
                    continue;
                }
            };

            let transformation = match self
                .transformations_by_name
                .get(instance.transformation_name.as_str())
            {
                Some(transformation) => *transformation,
                None => {
                    tracing::debug!(
                        "mapping {}: instance names undeclared transformation {}; skipping",
                        resolved.mapping_name,
                        instance.transformation_name
                    );
                    resolved.skipped.push(SkippedConnector {
                        connector: connector.clone(),
                        reason: SkipReason::UnknownTransformation,
                    });
                    continue;
                }
            };

            let field = match transformation.field(&connector.from_field) {
                Some(field) => field,
                None => match self.policy {
                    ResolutionPolicy::Lenient => {
                        tracing::debug!(
                            "mapping {}: transformation {} does not declare field {}; skipping",
                            resolved.mapping_name,
                            transformation.name,
                            connector.from_field
                        );
                        resolved.skipped.push(SkippedConnector {
                            connector: connector.clone(),
                            reason: SkipReason::UnknownField,
                        });
                        continue;
                    }
                    ResolutionPolicy::Strict => {
                        return Err(ExtractError::UnresolvableField {
                            mapping: resolved.mapping_name.clone(),
                            transformation: transformation.name.clone(),
                            field: connector.from_field.clone(),
                        });
                    }
                },
            };

            let record = LineageRecord {
                source_field: connector.from_field.clone(),
                target_field: connector.to_field.clone(),
                transformation: transformation.name.clone(),
                default_value: field.default_value.clone(),
                data_type: field.data_type.clone(),
                precision: field.precision.clone(),
                scale: field.scale.clone(),
            };

            // Later duplicates of a claimed destination are discarded silently.
            resolved.insert_first(
                (connector.to_instance.clone(), connector.to_field.clone()),
                record,
            );
        }

        Ok(resolved)
    }
}
