// SPDX-License-Identifier: AGPL-3.0-or-later

//! The schema-build-time transformation pipeline.
//!
//! Runs once per process against a static introspection snapshot and produces
//! the [`transformed`] document consumed by the GraphQL schema builder. The
//! whole pipeline is pure and order preserving: enums and mappings pass
//! through untouched, relation fields are retagged, union-typed arguments are
//! collapsed to one concrete shape each, globally computed input fields are
//! split out of the client-facing field lists and pagination argument trios
//! are handed to the configured strategy.

use std::fmt;
use std::sync::Arc;

use log::debug;

use crate::computed_inputs::ComputedInputs;
use crate::dmmf::source;
use crate::dmmf::transformed;
use crate::pagination::{PaginationArgsContext, PaginationStrategy, RelayStrategy};

/// Argument names marking a field as paginated.
///
/// A field qualifies for pagination rewriting iff its flattened argument-name
/// set is a superset of this set.
pub const PAGINATION_ARG_NAMES: &[&str] = &["cursor", "take", "skip"];

/// Options applied across the whole schema transformation.
pub struct TransformOptions {
    /// Whether atomic-operations input variants (type names ending in
    /// `OperationsInput`) remain selectable when collapsing argument unions.
    pub atomic_operations: bool,

    /// Generators applied schema-wide to any input type declaring a field of
    /// the registered name.
    pub globally_computed_inputs: ComputedInputs,

    /// Strategy rewriting the argument lists of paginated fields.
    pub pagination_strategy: Arc<dyn PaginationStrategy>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            atomic_operations: true,
            globally_computed_inputs: ComputedInputs::new(),
            pagination_strategy: Arc::new(RelayStrategy),
        }
    }
}

impl fmt::Debug for TransformOptions {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TransformOptions")
            .field("atomic_operations", &self.atomic_operations)
            .field("globally_computed_inputs", &self.globally_computed_inputs)
            .field("pagination_strategy", &self.pagination_strategy.name())
            .finish()
    }
}

/// Transforms one introspection document under the given options.
pub fn transform(document: &source::Document, options: &TransformOptions) -> transformed::Document {
    debug!(
        "transforming introspection document: {} models, {} input types, {} output types",
        document.datamodel.models.len(),
        document.schema.input_types.len(),
        document.schema.output_types.len()
    );

    transformed::Document {
        datamodel: transform_datamodel(&document.datamodel),
        mappings: document.mappings.clone(),
        schema: transform_schema(&document.schema, options),
    }
}

/// Retags relation fields of every model, leaving everything else untouched.
fn transform_datamodel(datamodel: &source::Datamodel) -> transformed::Datamodel {
    transformed::Datamodel {
        enums: datamodel.enums.clone(),
        models: datamodel
            .models
            .iter()
            .map(|model| transformed::Model {
                name: model.name.clone(),
                db_name: model.db_name.clone(),
                is_embedded: model.is_embedded,
                fields: model.fields.iter().map(transform_model_field).collect(),
                unique_fields: model.unique_fields.clone(),
            })
            .collect(),
    }
}

fn transform_model_field(field: &source::Field) -> transformed::Field {
    transformed::Field {
        name: field.name.clone(),
        kind: match field.kind {
            source::FieldKind::Scalar => transformed::ModelFieldKind::Scalar,
            source::FieldKind::Enum => transformed::ModelFieldKind::Enum,
            source::FieldKind::Object => transformed::ModelFieldKind::Relation,
        },
        field_type: field.field_type.clone(),
        is_list: field.is_list,
        is_required: field.is_required,
        is_unique: field.is_unique,
        is_id: field.is_id,
        is_generated: field.is_generated,
        has_default_value: field.has_default_value,
        relation_name: field.relation_name.clone(),
        relation_from_fields: field.relation_from_fields.clone(),
        relation_to_fields: field.relation_to_fields.clone(),
    }
}

fn transform_schema(schema: &source::Schema, options: &TransformOptions) -> transformed::Schema {
    transformed::Schema {
        enums: schema.enums.clone(),
        input_types: schema
            .input_types
            .iter()
            .map(|input_type| {
                transform_input_type(
                    input_type,
                    &options.globally_computed_inputs,
                    options.atomic_operations,
                )
            })
            .collect(),
        output_types: schema
            .output_types
            .iter()
            .map(|output_type| transform_output_type(output_type, options))
            .collect(),
    }
}

/// Transforms one input type.
///
/// Fields named like any globally registered computed input are removed from
/// the client-facing field list unconditionally. The generators whose key
/// names a field this type originally declared are attached as the type's
/// `computed_inputs`, to be resolved at request time.
fn transform_input_type(
    input_type: &source::InputType,
    globally_computed_inputs: &ComputedInputs,
    atomic_operations: bool,
) -> transformed::InputType {
    let computed_inputs = globally_computed_inputs
        .iter()
        .filter(|(name, _)| input_type.fields.iter().any(|field| &field.name == *name))
        .map(|(name, generator)| (name.clone(), generator.clone()))
        .collect();

    transformed::InputType {
        name: input_type.name.clone(),
        fields: input_type
            .fields
            .iter()
            .filter(|field| !globally_computed_inputs.contains_key(&field.name))
            .map(|field| transform_arg(field, atomic_operations))
            .collect(),
        computed_inputs,
    }
}

/// Transforms one output type, rewriting pagination argument lists through
/// the configured strategy.
fn transform_output_type(
    output_type: &source::OutputType,
    options: &TransformOptions,
) -> transformed::OutputType {
    transformed::OutputType {
        name: output_type.name.clone(),
        fields: output_type
            .fields
            .iter()
            .map(|field| {
                let mut args: Vec<transformed::TransformedArg> = field
                    .args
                    .iter()
                    .map(|arg| transform_arg(arg, options.atomic_operations))
                    .collect();

                let is_paginated = PAGINATION_ARG_NAMES
                    .iter()
                    .all(|name| args.iter().any(|arg| &arg.name == name));
                if is_paginated {
                    debug!(
                        "rewriting pagination arguments of field `{}` with the {} strategy",
                        field.name,
                        options.pagination_strategy.name()
                    );
                    args = options
                        .pagination_strategy
                        .transform_dmmf_args(PaginationArgsContext {
                            args,
                            pagination_arg_names: PAGINATION_ARG_NAMES,
                            field,
                        });
                }

                transformed::OutputField {
                    name: field.name.clone(),
                    args,
                    output_type: transformed::FieldTypeInfo {
                        type_name: field.output_type.type_ref.name().to_owned(),
                        kind: field.output_type.kind,
                        is_required: field.is_required,
                        is_nullable: field.is_nullable,
                        is_list: field.output_type.is_list,
                    },
                }
            })
            .collect(),
    }
}

/// Collapses one union-typed argument into a single concrete shape.
///
/// Nullability and requiredness always come from the outer argument, never
/// from the chosen candidate.
fn transform_arg(arg: &source::SchemaArg, atomic_operations: bool) -> transformed::TransformedArg {
    let chosen = flatten_union(&arg.input_types, atomic_operations)
        .expect("introspection guarantees at least one candidate input type per argument");

    transformed::TransformedArg {
        name: arg.name.clone(),
        input_type: transformed::ArgTypeInfo {
            type_name: chosen.type_ref.name().to_owned(),
            kind: chosen.kind,
            is_list: chosen.is_list,
            is_nullable: arg.is_nullable,
            is_required: arg.is_required,
        },
    }
}

/// Picks the union member to expose on the GraphQL schema.
///
/// The target schema language has no argument-level unions, so exactly one
/// candidate has to be chosen. The heuristic prefers the broadest relational
/// filter shape over narrow relation-filter shapes to keep the public
/// argument type of a field stable:
///
/// 1. with atomic operations disabled, candidates whose type name ends in
///    `OperationsInput` are dropped from consideration
/// 2. first list-valued object candidate named `*WhereInput`
/// 3. first object candidate named `*WhereInput`
/// 4. first list-valued object candidate
/// 5. first object candidate
/// 6. the first member of the original, unfiltered union. The fallback
///    intentionally bypasses the atomic-operations filter: an argument whose
///    only candidates are operations inputs keeps its shape.
fn flatten_union<'a>(
    input_types: &'a [source::SchemaArgInputType],
    atomic_operations: bool,
) -> Option<&'a source::SchemaArgInputType> {
    let candidates: Vec<&source::SchemaArgInputType> = if atomic_operations {
        input_types.iter().collect()
    } else {
        input_types
            .iter()
            .filter(|candidate| !candidate.type_ref.name().ends_with("OperationsInput"))
            .collect()
    };

    let is_object = |candidate: &&&source::SchemaArgInputType| {
        candidate.kind == source::FieldKind::Object
    };

    candidates
        .iter()
        .find(|c| is_object(c) && c.is_list && c.type_ref.name().ends_with("WhereInput"))
        .or_else(|| {
            candidates
                .iter()
                .find(|c| is_object(c) && c.type_ref.name().ends_with("WhereInput"))
        })
        .or_else(|| candidates.iter().find(|c| is_object(c) && c.is_list))
        .or_else(|| candidates.iter().find(is_object))
        .copied()
        .or_else(|| input_types.first())
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use crate::dmmf::transformed::ModelFieldKind;

    use super::*;

    fn candidate(type_name: &str, kind: &str, is_list: bool) -> source::SchemaArgInputType {
        serde_json::from_value(json!({
            "type": type_name,
            "kind": kind,
            "isList": is_list,
        }))
        .unwrap()
    }

    #[rstest]
    #[case::where_input_beats_relation_filter(
        vec![
            ("UserRelationFilter", "object", false),
            ("UserWhereInput", "object", false),
        ],
        "UserWhereInput"
    )]
    #[case::first_list_where_input_wins(
        vec![
            ("UserWhereInput", "object", true),
            ("UserScalarWhereInput", "object", true),
        ],
        "UserWhereInput"
    )]
    #[case::list_object_beats_plain_object(
        vec![
            ("UserCreateInput", "object", false),
            ("UserCreateManyInput", "object", true),
        ],
        "UserCreateManyInput"
    )]
    #[case::object_beats_scalar(
        vec![
            ("String", "scalar", false),
            ("UserCreateInput", "object", false),
        ],
        "UserCreateInput"
    )]
    #[case::scalar_only_unions_fall_back_to_the_first_member(
        vec![
            ("Int", "scalar", false),
            ("String", "scalar", false),
        ],
        "Int"
    )]
    fn flattening_is_deterministic(
        #[case] candidates: Vec<(&str, &str, bool)>,
        #[case] expected: &str,
    ) {
        let input_types: Vec<source::SchemaArgInputType> = candidates
            .into_iter()
            .map(|(name, kind, is_list)| candidate(name, kind, is_list))
            .collect();

        let chosen = flatten_union(&input_types, true).unwrap();
        assert_eq!(chosen.type_ref.name(), expected);
    }

    #[test]
    fn atomic_filter_fallback_bypasses_the_filter() {
        let input_types = vec![candidate("IntFieldUpdateOperationsInput", "object", false)];

        // The only candidate is filtered out, so the unfiltered first member
        // is chosen after all.
        let chosen = flatten_union(&input_types, false).unwrap();
        assert_eq!(chosen.type_ref.name(), "IntFieldUpdateOperationsInput");
    }

    #[test]
    fn atomic_filter_prefers_remaining_object_candidates() {
        let input_types = vec![
            candidate("IntFieldUpdateOperationsInput", "object", false),
            candidate("IntFilter", "object", false),
        ];

        let chosen = flatten_union(&input_types, false).unwrap();
        assert_eq!(chosen.type_ref.name(), "IntFilter");

        // With atomic operations enabled, the first object candidate wins
        // again.
        let chosen = flatten_union(&input_types, true).unwrap();
        assert_eq!(chosen.type_ref.name(), "IntFieldUpdateOperationsInput");
    }

    #[test]
    fn scalar_only_survivors_fall_back_to_the_unfiltered_first_member() {
        // Only object candidates are ever preferred, so filtering the
        // operations input leaves nothing to choose and the unfiltered first
        // member is used after all.
        let input_types = vec![
            candidate("IntFieldUpdateOperationsInput", "object", false),
            candidate("Int", "scalar", false),
        ];

        let chosen = flatten_union(&input_types, false).unwrap();
        assert_eq!(chosen.type_ref.name(), "IntFieldUpdateOperationsInput");
    }

    #[test]
    fn nullability_comes_from_the_argument_not_the_candidate() {
        let arg: source::SchemaArg = serde_json::from_value(json!({
            "name": "where",
            "inputTypes": [{ "type": "UserWhereInput", "kind": "object", "isList": true }],
            "isNullable": true,
            "isRequired": false,
        }))
        .unwrap();

        let transformed = transform_arg(&arg, true);
        assert_eq!(transformed.input_type.type_name, "UserWhereInput");
        assert!(transformed.input_type.is_list);
        assert!(transformed.input_type.is_nullable);
        assert!(!transformed.input_type.is_required);
    }

    #[test]
    fn datamodel_transform_retags_relation_fields_only() {
        let datamodel: source::Datamodel = serde_json::from_value(json!({
            "enums": [{ "name": "Role", "values": ["USER", "ADMIN"] }],
            "models": [{
                "name": "Post",
                "fields": [
                    {
                        "name": "title",
                        "kind": "scalar",
                        "type": "String",
                        "isList": false,
                        "isRequired": true,
                    },
                    {
                        "name": "role",
                        "kind": "enum",
                        "type": "Role",
                        "isList": false,
                        "isRequired": true,
                    },
                    {
                        "name": "author",
                        "kind": "object",
                        "type": "User",
                        "isList": false,
                        "isRequired": true,
                        "relationName": "PostToUser",
                    },
                ],
            }],
        }))
        .unwrap();

        let transformed = transform_datamodel(&datamodel);
        let kinds: Vec<ModelFieldKind> = transformed.models[0]
            .fields
            .iter()
            .map(|field| field.kind)
            .collect();

        assert_eq!(
            kinds,
            vec![
                ModelFieldKind::Scalar,
                ModelFieldKind::Enum,
                ModelFieldKind::Relation,
            ]
        );
        assert_eq!(transformed.enums, datamodel.enums);
        assert_eq!(
            transformed.models[0].fields[2].relation_name.as_deref(),
            Some("PostToUser")
        );
    }

    fn scalar_arg(name: &str) -> serde_json::Value {
        json!({
            "name": name,
            "inputTypes": [{ "type": "Int", "kind": "scalar" }],
        })
    }

    #[test]
    fn pagination_rewrite_requires_the_full_trio() {
        let schema: source::Schema = serde_json::from_value(json!({
            "enums": [],
            "inputTypes": [],
            "outputTypes": [{
                "name": "Query",
                "fields": [
                    {
                        "name": "posts",
                        "args": [
                            scalar_arg("where"),
                            scalar_arg("cursor"),
                            scalar_arg("take"),
                            scalar_arg("skip"),
                        ],
                        "outputType": { "type": "Post", "kind": "object", "isList": true },
                    },
                    {
                        "name": "latestPosts",
                        "args": [scalar_arg("take"), scalar_arg("skip")],
                        "outputType": { "type": "Post", "kind": "object", "isList": true },
                    },
                ],
            }],
        }))
        .unwrap();

        let transformed = transform_schema(&schema, &TransformOptions::default());
        let fields = &transformed.output_types[0].fields;

        let paginated: Vec<&str> = fields[0].args.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(paginated, vec!["where", "first", "last", "before", "after"]);

        // Missing `cursor`, so the relay strategy is never consulted.
        let unpaginated: Vec<&str> = fields[1].args.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(unpaginated, vec!["take", "skip"]);
    }

    #[test]
    fn output_fields_keep_normalized_type_references() {
        let schema: source::Schema = serde_json::from_value(json!({
            "enums": [],
            "inputTypes": [],
            "outputTypes": [{
                "name": "Query",
                "fields": [{
                    "name": "post",
                    "args": [],
                    "isRequired": true,
                    "isNullable": true,
                    "outputType": {
                        "type": { "name": "Post", "fields": [] },
                        "kind": "object",
                    },
                }],
            }],
        }))
        .unwrap();

        let transformed = transform_schema(&schema, &TransformOptions::default());
        let field = &transformed.output_types[0].fields[0];

        assert_eq!(field.output_type.type_name, "Post");
        assert!(field.output_type.is_required);
        assert!(field.output_type.is_nullable);
        assert!(!field.output_type.is_list);
    }

    fn computed_author_id() -> ComputedInputs {
        let mut globals = ComputedInputs::new();
        globals.insert(
            "authorId".to_owned(),
            crate::computed_inputs::ComputedInput::from_fn(|_| Ok(json!("u1"))),
        );
        globals
    }

    #[test]
    fn globally_computed_fields_are_stripped_from_every_input_type() {
        let input_type: source::InputType = serde_json::from_value(json!({
            "name": "PostCreateInput",
            "fields": [
                scalar_arg("title"),
                {
                    "name": "authorId",
                    "inputTypes": [{ "type": "String", "kind": "scalar" }],
                },
            ],
        }))
        .unwrap();

        let transformed = transform_input_type(&input_type, &computed_author_id(), true);

        let names: Vec<&str> = transformed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title"]);
        assert!(transformed.computed_inputs.contains_key("authorId"));
    }

    #[test]
    fn inapplicable_computed_inputs_leave_input_types_untouched() {
        // `authorId` is not a field of this type, so nothing is stripped and
        // no generator is attached.
        let input_type: source::InputType = serde_json::from_value(json!({
            "name": "PostCreateInput",
            "fields": [
                scalar_arg("title"),
                {
                    "name": "author",
                    "inputTypes": [{ "type": "UserCreateNestedInput", "kind": "object" }],
                },
            ],
        }))
        .unwrap();

        let transformed = transform_input_type(&input_type, &computed_author_id(), true);

        let names: Vec<&str> = transformed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["title", "author"]);
        assert!(transformed.computed_inputs.is_empty());
    }

    #[test]
    fn mappings_pass_through_untouched() {
        let document: source::Document = serde_json::from_value(json!({
            "datamodel": { "enums": [], "models": [] },
            "mappings": [{
                "model": "Post",
                "findOne": "post",
                "findMany": "posts",
                "create": "createOnePost",
            }],
            "schema": { "enums": [], "inputTypes": [], "outputTypes": [] },
        }))
        .unwrap();

        let transformed = transform(&document, &TransformOptions::default());
        assert_eq!(transformed.mappings, document.mappings);
    }
}
