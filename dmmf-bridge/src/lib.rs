// SPDX-License-Identifier: AGPL-3.0-or-later

//! # dmmf-bridge
//!
//! Converts the data-model introspection document produced by an ORM's code
//! generator into a shape a GraphQL schema builder can consume, so an
//! application can derive its object types, input types and resolver argument
//! lists from the database schema instead of hand-writing them.
//!
//! The crate covers two halves of that job:
//!
//! * The schema-build-time [transformation](dmmf::transform): normalizing
//!   polymorphic type references, retagging relation fields, collapsing
//!   union-typed arguments into single GraphQL-compatible shapes and handing
//!   paginated argument lists to a pluggable [pagination] strategy. The
//!   result is indexed by a [`DmmfDocument`] for by-name lookups.
//! * The request-time [computed-input resolution](computed_inputs):
//!   recursively merging server-generated field values into the mutation
//!   payloads clients supply.
#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

pub mod computed_inputs;
pub mod context;
pub mod dmmf;
pub mod errors;
pub mod pagination;

pub use crate::computed_inputs::{
    add_computed_inputs, ComputedInput, ComputedInputs, ResolverParams,
};
pub use crate::context::RequestContext;
pub use crate::dmmf::{transform, DmmfDocument, TransformOptions};
pub use crate::errors::{ComputedInputError, DocumentError};
pub use crate::pagination::{CursorStrategy, PaginationStrategy, RelayStrategy};
