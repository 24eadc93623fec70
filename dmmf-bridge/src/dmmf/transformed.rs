// SPDX-License-Identifier: AGPL-3.0-or-later

//! Types describing a transformed introspection document, ready to be handed
//! to a GraphQL schema builder.
//!
//! The transformed document differs from its [`source`](crate::dmmf::source)
//! counterpart in three ways: every union-typed argument has been collapsed to
//! exactly one concrete shape, relation fields carry the `relation` kind tag,
//! and input types know which of their original fields are populated by
//! computed-input generators instead of the client.

use crate::computed_inputs::ComputedInputs;
use crate::dmmf::source::{DatamodelEnum, FieldKind, Mapping, SchemaEnum};

/// A fully transformed introspection document.
#[derive(Clone, Debug)]
pub struct Document {
    /// The datamodel with relation fields tagged as such.
    pub datamodel: Datamodel,

    /// Model-to-operation mappings, identical to the source document.
    pub mappings: Vec<Mapping>,

    /// The transformed API schema.
    pub schema: Schema,
}

/// The transformed data model.
#[derive(Clone, Debug)]
pub struct Datamodel {
    /// Enums, identical to the source document.
    pub enums: Vec<DatamodelEnum>,

    /// Models with their field kinds remapped.
    pub models: Vec<Model>,
}

/// A model with transformed field kinds.
#[derive(Clone, Debug)]
pub struct Model {
    /// Name of the model.
    pub name: String,

    /// Database-level name when it differs from `name`.
    pub db_name: Option<String>,

    /// Whether this model is embedded into its parent.
    pub is_embedded: bool,

    /// Fields of the model in declaration order.
    pub fields: Vec<Field>,

    /// Compound uniqueness constraints over field names.
    pub unique_fields: Vec<Vec<String>>,
}

/// A field of a transformed [`Model`].
#[derive(Clone, Debug)]
pub struct Field {
    /// Name of the field.
    pub name: String,

    /// Whether the field holds a scalar, enum or relation value.
    pub kind: ModelFieldKind,

    /// Name of the field's value type.
    pub field_type: String,

    /// Whether the field holds a list of values.
    pub is_list: bool,

    /// Whether the field is non-optional.
    pub is_required: bool,

    /// Whether the field carries a uniqueness constraint.
    pub is_unique: bool,

    /// Whether the field is the model's id.
    pub is_id: bool,

    /// Whether the field's value is generated by the database.
    pub is_generated: bool,

    /// Whether the field has a default value.
    pub has_default_value: bool,

    /// Name of the relation this field takes part in, if any.
    pub relation_name: Option<String>,

    /// Names of the fields on this model holding the relation's foreign keys.
    pub relation_from_fields: Option<Vec<String>>,

    /// Names of the referenced fields on the related model.
    pub relation_to_fields: Option<Vec<String>>,
}

/// Field-kind vocabulary of the transformed datamodel.
///
/// Identical to [`FieldKind`] except that fields pointing at other models are
/// tagged `Relation` instead of `Object`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelFieldKind {
    /// A primitive leaf value.
    Scalar,
    /// A value of an enum declared by the datamodel.
    Enum,
    /// A reference to another model.
    Relation,
}

/// The transformed API schema.
#[derive(Clone, Debug)]
pub struct Schema {
    /// Enums, identical to the source document.
    pub enums: Vec<SchemaEnum>,

    /// Input types with collapsed argument shapes and computed inputs split
    /// out of the client-facing field list.
    pub input_types: Vec<InputType>,

    /// Output types with collapsed and, where applicable, pagination-rewritten
    /// argument lists.
    pub output_types: Vec<OutputType>,
}

/// A transformed input object type.
#[derive(Clone, Debug)]
pub struct InputType {
    /// Name of the input type.
    pub name: String,

    /// Client-facing fields. Contains no field whose name is registered as a
    /// globally computed input.
    pub fields: Vec<TransformedArg>,

    /// The subset of globally registered generators whose key names a field
    /// this type originally declared.
    pub computed_inputs: ComputedInputs,
}

/// A transformed output object type.
#[derive(Clone, Debug)]
pub struct OutputType {
    /// Name of the output type.
    pub name: String,

    /// Fields of the output type in declaration order.
    pub fields: Vec<OutputField>,
}

/// A field of a transformed [`OutputType`].
#[derive(Clone, Debug)]
pub struct OutputField {
    /// Name of the field.
    pub name: String,

    /// Arguments of the field, each collapsed to one concrete shape.
    pub args: Vec<TransformedArg>,

    /// The field's value type with its reference normalized to a name.
    pub output_type: FieldTypeInfo,
}

/// Value type of a transformed output field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldTypeInfo {
    /// Canonical name of the value type.
    pub type_name: String,

    /// Whether the value is a scalar, enum or object.
    pub kind: FieldKind,

    /// Whether the field is non-optional.
    pub is_required: bool,

    /// Whether the field's value may be null even when required.
    pub is_nullable: bool,

    /// Whether the field holds a list of values.
    pub is_list: bool,
}

/// An argument collapsed to exactly one concrete shape, never a union.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformedArg {
    /// Name of the argument.
    pub name: String,

    /// The single shape chosen for this argument.
    pub input_type: ArgTypeInfo,
}

/// The concrete shape of a [`TransformedArg`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArgTypeInfo {
    /// Canonical name of the argument's type.
    pub type_name: String,

    /// Whether the argument is a scalar, enum or object type.
    pub kind: FieldKind,

    /// Whether the argument holds a list of values.
    pub is_list: bool,

    /// Whether the argument's value may be explicitly null. Taken from the
    /// original union-typed argument, not from the chosen candidate.
    pub is_nullable: bool,

    /// Whether the argument must be supplied. Taken from the original
    /// union-typed argument, not from the chosen candidate.
    pub is_required: bool,
}
