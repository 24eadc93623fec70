// SPDX-License-Identifier: AGPL-3.0-or-later

//! Request-time resolution of computed inputs.
//!
//! A computed input is a field of a mutation payload that the client does not
//! supply. Its value is produced server-side by a generator function which
//! receives the request parameters. Globally registered generators apply to
//! every input type declaring a matching field and recurse into nested object
//! payloads; resolver-local generators apply to the top level of one call's
//! `data` payload only.
//!
//! Resolution walks the payload, not the schema, so recursion depth is
//! bounded by the nesting of the client-supplied data.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};
use log::trace;
use serde_json::{Map, Value};

use crate::context::RequestContext;
use crate::dmmf::source::FieldKind;
use crate::dmmf::transformed::InputType;
use crate::dmmf::DmmfDocument;
use crate::errors::ComputedInputError;

/// A generator function producing the value of one computed input.
///
/// Generators receive the full resolver parameters, including the request
/// context, and may suspend (for example to look up the current session in a
/// database). Cloning is cheap, all clones share one underlying function.
#[derive(Clone)]
pub struct ComputedInput(Arc<dyn Generator>);

trait Generator: Send + Sync {
    fn generate<'a>(&'a self, params: &'a ResolverParams) -> BoxFuture<'a, anyhow::Result<Value>>;
}

struct AsyncFn<F>(F);

impl<F> Generator for AsyncFn<F>
where
    F: for<'a> Fn(&'a ResolverParams) -> BoxFuture<'a, anyhow::Result<Value>> + Send + Sync,
{
    fn generate<'a>(&'a self, params: &'a ResolverParams) -> BoxFuture<'a, anyhow::Result<Value>> {
        (self.0)(params)
    }
}

struct SyncFn<F>(F);

impl<F> Generator for SyncFn<F>
where
    F: Fn(&ResolverParams) -> anyhow::Result<Value> + Send + Sync,
{
    fn generate<'a>(&'a self, params: &'a ResolverParams) -> BoxFuture<'a, anyhow::Result<Value>> {
        future::ready((self.0)(params)).boxed()
    }
}

impl ComputedInput {
    /// Wraps an asynchronous generator function.
    pub fn new<F>(generator: F) -> Self
    where
        F: for<'a> Fn(&'a ResolverParams) -> BoxFuture<'a, anyhow::Result<Value>>
            + Send
            + Sync
            + 'static,
    {
        Self(Arc::new(AsyncFn(generator)))
    }

    /// Wraps a generator which derives its value synchronously from the
    /// request parameters.
    pub fn from_fn<F>(generator: F) -> Self
    where
        F: Fn(&ResolverParams) -> anyhow::Result<Value> + Send + Sync + 'static,
    {
        Self(Arc::new(SyncFn(generator)))
    }

    /// Invokes the generator for one request.
    pub async fn resolve(&self, params: &ResolverParams) -> anyhow::Result<Value> {
        self.0.generate(params).await
    }
}

impl fmt::Debug for ComputedInput {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("ComputedInput")
    }
}

/// Mapping from field name to the generator populating that field.
///
/// Used both for globally registered generators (threaded through the schema
/// transformation) and for resolver-local ones (passed per call).
pub type ComputedInputs = HashMap<String, ComputedInput>;

/// Parameters of one mutation resolver invocation.
#[derive(Clone, Debug)]
pub struct ResolverParams {
    /// The raw client-supplied argument object, containing the `data` payload
    /// among other arguments.
    pub args: Map<String, Value>,

    /// Request-scoped context forwarded verbatim into every generator.
    pub context: RequestContext,
}

/// Resolves all computed inputs for one mutation call.
///
/// Starts from the client-supplied arguments and replaces the `data` payload
/// with the merge of recursively resolved global computed inputs and the
/// given resolver-local generators. Local values win over global ones sharing
/// a name and are never applied below the top level.
///
/// A failing generator or a lookup failure aborts the whole call, no
/// partially merged payload is returned.
pub async fn add_computed_inputs(
    document: &DmmfDocument,
    input_type: &InputType,
    locally_computed_inputs: &ComputedInputs,
    params: &ResolverParams,
) -> Result<Map<String, Value>, ComputedInputError> {
    let data = params
        .args
        .get("data")
        .cloned()
        .unwrap_or_else(|| Value::Object(Map::new()));

    let mut args = params.args.clone();
    let resolved = add_globally_computed(document, input_type, params, &data).await?;

    let mut data = match resolved {
        Value::Object(data) => data,
        // Local generators merge into object payloads only. A list payload
        // (for example a batched create) keeps its globally resolved form.
        other => {
            args.insert("data".to_owned(), other);
            return Ok(args);
        }
    };

    for (name, generator) in locally_computed_inputs {
        trace!("resolving local computed input `{}`", name);
        let value = generator
            .resolve(params)
            .await
            .map_err(|reason| ComputedInputError::Generator {
                field: name.clone(),
                reason,
            })?;
        data.insert(name.clone(), value);
    }

    args.insert("data".to_owned(), Value::Object(data));
    Ok(args)
}

/// Recursively populates globally computed inputs throughout a payload.
///
/// Sequences are resolved element-wise. For object payloads, the generators
/// attached to `input_type` are invoked first; the client-supplied keys are
/// then merged on top, descending through the schema index wherever the
/// declared field kind is an object. The two key sets are disjoint because
/// computed fields were removed from `input_type.fields` during the schema
/// transformation.
fn add_globally_computed<'a>(
    document: &'a DmmfDocument,
    input_type: &'a InputType,
    params: &'a ResolverParams,
    data: &'a Value,
) -> BoxFuture<'a, Result<Value, ComputedInputError>> {
    async move {
        let data = match data {
            Value::Array(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                for item in items {
                    resolved.push(add_globally_computed(document, input_type, params, item).await?);
                }
                return Ok(Value::Array(resolved));
            }
            // Scalar leaves carry no fields to populate.
            Value::Object(data) => data,
            other => return Ok(other.clone()),
        };

        let mut merged = Map::new();
        for (name, generator) in &input_type.computed_inputs {
            trace!(
                "resolving global computed input `{}` of `{}`",
                name,
                input_type.name
            );
            let value = generator
                .resolve(params)
                .await
                .map_err(|reason| ComputedInputError::Generator {
                    field: name.clone(),
                    reason,
                })?;
            merged.insert(name.clone(), value);
        }

        for (name, value) in data {
            let field = input_type
                .fields
                .iter()
                .find(|field| &field.name == name)
                .ok_or_else(|| ComputedInputError::UndeclaredField {
                    field: name.clone(),
                    input_type: input_type.name.clone(),
                })?;

            let value = if field.input_type.kind == FieldKind::Object {
                let nested = document.get_input_type(&field.input_type.type_name)?;
                add_globally_computed(document, nested, params, value).await?
            } else {
                value.clone()
            };
            merged.insert(name.clone(), value);
        }

        Ok(Value::Object(merged))
    }
    .boxed()
}
