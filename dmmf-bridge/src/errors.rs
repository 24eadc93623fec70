// SPDX-License-Identifier: AGPL-3.0-or-later

//! Error types of this crate.
//!
//! The schema-build-time transformation itself has no failure path, it is a
//! total function over well-formed introspection documents. Errors only arise
//! at request time, when resolving computed inputs against the transformed
//! document.

/// Errors from looking up types in a transformed document.
#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    /// The referenced input type is not part of the transformed schema.
    #[error("input type `{0}` is not part of the transformed schema")]
    UnknownInputType(String),

    /// The referenced output type is not part of the transformed schema.
    #[error("output type `{0}` is not part of the transformed schema")]
    UnknownOutputType(String),

    /// The referenced model is not part of the transformed datamodel.
    #[error("model `{0}` is not part of the transformed datamodel")]
    UnknownModel(String),

    /// No operation mapping was generated for the referenced model.
    #[error("no operation mapping exists for model `{0}`")]
    UnknownMapping(String),
}

/// Errors raised while resolving computed inputs for one mutation request.
///
/// Any of these aborts resolution for the whole request, no partially merged
/// payload is ever returned.
#[derive(thiserror::Error, Debug)]
pub enum ComputedInputError {
    /// A nested input type referenced during recursive resolution does not
    /// exist in the schema index. This indicates a misconfigured schema.
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// The request payload contains a key the input type does not declare.
    #[error("field `{field}` in the request payload is not declared by input type `{input_type}`")]
    UndeclaredField {
        /// The undeclared payload key.
        field: String,
        /// Name of the input type the payload was resolved against.
        input_type: String,
    },

    /// A computed-input generator returned an error.
    #[error("computed input generator for `{field}` failed: {reason:#}")]
    Generator {
        /// Name of the field the generator was registered for.
        field: String,
        /// The error returned by the generator.
        reason: anyhow::Error,
    },

    /// A required request-scoped dependency is absent from the request
    /// context.
    #[error("could not find {0} in request context")]
    MissingContext(&'static str),
}
