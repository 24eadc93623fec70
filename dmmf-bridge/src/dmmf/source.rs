// SPDX-License-Identifier: AGPL-3.0-or-later

//! Types describing an introspection document as produced by the ORM's code
//! generator, before any transformation has been applied.
//!
//! These shapes mirror the machine-readable document one-to-one so they can be
//! deserialized straight from the generator's output. Everything downstream of
//! deserialization works on the [`transformed`](crate::dmmf::transformed)
//! counterparts instead.

use serde::{Deserialize, Serialize};

/// A reference to a schema type, either as a bare name or as a nested
/// structured descriptor.
///
/// Introspection documents are inconsistent about which form they emit. All
/// consumers reduce a reference to its canonical name via [`TypeRef::name`]
/// and never look at the descriptor form again.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum TypeRef {
    /// Reference by bare type name.
    Name(String),

    /// Reference via a structured descriptor. Only the name is retained, any
    /// further descriptor fields are dropped during deserialization.
    Descriptor {
        /// Name of the referenced type.
        name: String,
    },
}

impl TypeRef {
    /// Returns the canonical name of the referenced type.
    pub fn name(&self) -> &str {
        match self {
            TypeRef::Name(name) => name,
            TypeRef::Descriptor { name } => name,
        }
    }
}

/// Distinguishes scalar, enum and object-typed fields and arguments.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// A primitive leaf value.
    Scalar,
    /// A value of an enum declared by the datamodel.
    Enum,
    /// A nested object, for model fields this means a relation.
    Object,
}

/// The complete introspection document: datamodel, operation mappings and the
/// API schema.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Entities and relations as declared by the database schema.
    pub datamodel: Datamodel,

    /// Model-to-operation name mappings, passed through untouched.
    pub mappings: Vec<Mapping>,

    /// Input types, output types and enums of the generated API surface.
    pub schema: Schema,
}

/// The introspected data model.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Datamodel {
    /// Enums declared by the datamodel.
    pub enums: Vec<DatamodelEnum>,

    /// Models declared by the datamodel.
    pub models: Vec<Model>,
}

/// An enum declaration in the datamodel.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatamodelEnum {
    /// Name of the enum.
    pub name: String,

    /// Enum member names in declaration order.
    pub values: Vec<String>,

    /// Database-level name when it differs from `name`.
    #[serde(default)]
    pub db_name: Option<String>,
}

/// A model (entity) declaration in the datamodel.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    /// Name of the model.
    pub name: String,

    /// Database-level name when it differs from `name`.
    #[serde(default)]
    pub db_name: Option<String>,

    /// Whether this model is embedded into its parent.
    #[serde(default)]
    pub is_embedded: bool,

    /// Fields of the model in declaration order.
    pub fields: Vec<Field>,

    /// Compound uniqueness constraints over field names.
    #[serde(default)]
    pub unique_fields: Vec<Vec<String>>,
}

/// A field of a [`Model`].
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Name of the field.
    pub name: String,

    /// Whether the field holds a scalar, enum or relation value.
    pub kind: FieldKind,

    /// Name of the field's value type.
    #[serde(rename = "type")]
    pub field_type: String,

    /// Whether the field holds a list of values.
    pub is_list: bool,

    /// Whether the field is non-optional.
    pub is_required: bool,

    /// Whether the field carries a uniqueness constraint.
    #[serde(default)]
    pub is_unique: bool,

    /// Whether the field is the model's id.
    #[serde(default)]
    pub is_id: bool,

    /// Whether the field's value is generated by the database.
    #[serde(default)]
    pub is_generated: bool,

    /// Whether the field has a default value.
    #[serde(default)]
    pub has_default_value: bool,

    /// Name of the relation this field takes part in, if any.
    #[serde(default)]
    pub relation_name: Option<String>,

    /// Names of the fields on this model holding the relation's foreign keys.
    #[serde(default)]
    pub relation_from_fields: Option<Vec<String>>,

    /// Names of the referenced fields on the related model.
    #[serde(default)]
    pub relation_to_fields: Option<Vec<String>>,
}

/// Maps one model to the names of the API operations generated for it.
///
/// Mappings are opaque to the transformation pipeline and pass through it
/// untouched.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Mapping {
    /// Name of the model these operations act on.
    pub model: String,

    /// Name of the single-record query, if generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find_one: Option<String>,

    /// Name of the multi-record query, if generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub find_many: Option<String>,

    /// Name of the create mutation, if generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create: Option<String>,

    /// Name of the update mutation, if generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<String>,

    /// Name of the multi-record update mutation, if generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_many: Option<String>,

    /// Name of the upsert mutation, if generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upsert: Option<String>,

    /// Name of the delete mutation, if generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete: Option<String>,

    /// Name of the multi-record delete mutation, if generated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delete_many: Option<String>,
}

/// The generated API schema prior to transformation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Enums exposed by the API surface.
    pub enums: Vec<SchemaEnum>,

    /// Input object types accepted by API operations.
    pub input_types: Vec<InputType>,

    /// Output object types returned by API operations.
    pub output_types: Vec<OutputType>,
}

/// An enum exposed by the API surface.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaEnum {
    /// Name of the enum.
    pub name: String,

    /// Enum member names in declaration order.
    pub values: Vec<String>,
}

/// An input object type prior to transformation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InputType {
    /// Name of the input type.
    pub name: String,

    /// Fields of the input type, each potentially union-typed.
    pub fields: Vec<SchemaArg>,
}

/// An output object type prior to transformation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputType {
    /// Name of the output type.
    pub name: String,

    /// Fields of the output type in declaration order.
    pub fields: Vec<OutputField>,
}

/// A field of an [`OutputType`] prior to transformation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OutputField {
    /// Name of the field.
    pub name: String,

    /// Arguments accepted by the field, each potentially union-typed.
    pub args: Vec<SchemaArg>,

    /// Whether the field is non-optional.
    #[serde(default)]
    pub is_required: bool,

    /// Whether the field's value may be null even when required.
    #[serde(default)]
    pub is_nullable: bool,

    /// The field's value type.
    pub output_type: SchemaArgInputType,
}

/// An argument or input field which may accept a union of candidate shapes.
///
/// `input_types` is an ordered, non-empty sequence of candidates. The target
/// schema language has no argument-level unions, so the transformation picks
/// exactly one candidate per argument.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaArg {
    /// Name of the argument.
    pub name: String,

    /// Ordered candidate shapes this argument accepts.
    pub input_types: Vec<SchemaArgInputType>,

    /// Whether the argument's value may be explicitly null.
    #[serde(default)]
    pub is_nullable: bool,

    /// Whether the argument must be supplied.
    #[serde(default)]
    pub is_required: bool,
}

/// One candidate shape of a [`SchemaArg`], also used for output field types.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaArgInputType {
    /// Reference to the candidate's type.
    #[serde(rename = "type")]
    pub type_ref: TypeRef,

    /// Whether the candidate is a scalar, enum or object type.
    pub kind: FieldKind,

    /// Whether the candidate holds a list of values.
    #[serde(default)]
    pub is_list: bool,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn type_ref_resolves_bare_names() {
        let type_ref: TypeRef = serde_json::from_value(json!("UserWhereInput")).unwrap();
        assert_eq!(type_ref.name(), "UserWhereInput");
    }

    #[test]
    fn type_ref_resolves_structured_descriptors() {
        let type_ref: TypeRef = serde_json::from_value(json!({
            "name": "UserWhereInput",
            "fields": [],
            "isWhereType": true,
        }))
        .unwrap();
        assert_eq!(type_ref.name(), "UserWhereInput");
    }

    #[test]
    fn field_kind_uses_lowercase_tags() {
        let kind: FieldKind = serde_json::from_value(json!("object")).unwrap();
        assert_eq!(kind, FieldKind::Object);

        let kind: FieldKind = serde_json::from_value(json!("scalar")).unwrap();
        assert_eq!(kind, FieldKind::Scalar);
    }

    #[test]
    fn schema_arg_defaults_optional_flags() {
        let arg: SchemaArg = serde_json::from_value(json!({
            "name": "where",
            "inputTypes": [{ "type": "UserWhereInput", "kind": "object" }],
        }))
        .unwrap();

        assert!(!arg.is_nullable);
        assert!(!arg.is_required);
        assert!(!arg.input_types[0].is_list);
    }
}
