// SPDX-License-Identifier: AGPL-3.0-or-later

//! Name-indexed access to a transformed introspection document.

use std::collections::HashMap;
use std::sync::Arc;

use log::trace;

use crate::dmmf::source::{self, Mapping};
use crate::dmmf::transform::{transform, TransformOptions};
use crate::dmmf::transformed;
use crate::errors::DocumentError;

/// Provides fast lookup of input types, output types, models and operation
/// mappings by name.
///
/// Built once at schema-initialization time and immutable afterwards, so it
/// can be shared across concurrent request handlers without locking. Cloning
/// shares the underlying document.
#[derive(Clone, Debug)]
pub struct DmmfDocument {
    document: Arc<transformed::Document>,
    input_types: HashMap<String, usize>,
    output_types: HashMap<String, usize>,
    models: HashMap<String, usize>,
    mappings: HashMap<String, usize>,
}

impl DmmfDocument {
    /// Indexes a transformed document.
    pub fn new(document: transformed::Document) -> Self {
        let mut input_types = HashMap::new();
        for (position, input_type) in document.schema.input_types.iter().enumerate() {
            input_types.insert(input_type.name.clone(), position);
        }

        let mut output_types = HashMap::new();
        for (position, output_type) in document.schema.output_types.iter().enumerate() {
            output_types.insert(output_type.name.clone(), position);
        }

        let mut models = HashMap::new();
        for (position, model) in document.datamodel.models.iter().enumerate() {
            models.insert(model.name.clone(), position);
        }

        let mut mappings = HashMap::new();
        for (position, mapping) in document.mappings.iter().enumerate() {
            mappings.insert(mapping.model.clone(), position);
        }

        trace!(
            "indexed transformed document: {} input types, {} output types, {} models",
            input_types.len(),
            output_types.len(),
            models.len()
        );

        Self {
            document: Arc::new(document),
            input_types,
            output_types,
            models,
            mappings,
        }
    }

    /// Transforms an introspection document and indexes the result.
    pub fn from_source(document: &source::Document, options: &TransformOptions) -> Self {
        Self::new(transform(document, options))
    }

    /// Returns the indexed document itself.
    pub fn document(&self) -> &transformed::Document {
        &self.document
    }

    /// Looks up an input type by name.
    pub fn get_input_type(&self, name: &str) -> Result<&transformed::InputType, DocumentError> {
        self.input_types
            .get(name)
            .map(|position| &self.document.schema.input_types[*position])
            .ok_or_else(|| DocumentError::UnknownInputType(name.to_owned()))
    }

    /// Looks up an output type by name.
    pub fn get_output_type(&self, name: &str) -> Result<&transformed::OutputType, DocumentError> {
        self.output_types
            .get(name)
            .map(|position| &self.document.schema.output_types[*position])
            .ok_or_else(|| DocumentError::UnknownOutputType(name.to_owned()))
    }

    /// Looks up a model by name.
    pub fn get_model(&self, name: &str) -> Result<&transformed::Model, DocumentError> {
        self.models
            .get(name)
            .map(|position| &self.document.datamodel.models[*position])
            .ok_or_else(|| DocumentError::UnknownModel(name.to_owned()))
    }

    /// Looks up the operation mapping of a model.
    pub fn get_mapping(&self, model: &str) -> Result<&Mapping, DocumentError> {
        self.mappings
            .get(model)
            .map(|position| &self.document.mappings[*position])
            .ok_or_else(|| DocumentError::UnknownMapping(model.to_owned()))
    }
}
