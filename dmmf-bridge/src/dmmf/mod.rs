// SPDX-License-Identifier: AGPL-3.0-or-later

//! Introspection document shapes and their transformation into a form a
//! GraphQL schema builder can consume.

pub mod document;
pub mod source;
pub mod transform;
pub mod transformed;

pub use document::DmmfDocument;
pub use transform::{transform, TransformOptions, PAGINATION_ARG_NAMES};
