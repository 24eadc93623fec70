// SPDX-License-Identifier: AGPL-3.0-or-later

//! Opaque request context forwarded into computed-input generators.
//!
//! Resolvers typically stash an ORM client handle or the current session in
//! here before resolving computed inputs. The context is a read-only type map,
//! cheap to clone and safe to share across concurrent request handlers.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::errors::ComputedInputError;

/// Read-only, cheaply clonable container for request-scoped values, keyed by
/// their type.
#[derive(Clone, Default)]
pub struct RequestContext {
    values: Arc<HashMap<TypeId, Box<dyn Any + Send + Sync>>>,
}

impl RequestContext {
    /// Returns an empty request context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a builder for assembling a context before a request is
    /// handled.
    pub fn builder() -> RequestContextBuilder {
        RequestContextBuilder::default()
    }

    /// Retrieves the value of type `T` from the context, if one was inserted.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.values
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref())
    }

    /// Retrieves the value of type `T` from the context and fails eagerly
    /// when it is absent.
    ///
    /// `what` names the missing dependency in the resulting error, for
    /// example `"the ORM client"`.
    pub fn expect<T: 'static>(&self, what: &'static str) -> Result<&T, ComputedInputError> {
        self.get().ok_or(ComputedInputError::MissingContext(what))
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("values", &self.values.len())
            .finish()
    }
}

/// Builder for [`RequestContext`].
#[derive(Default)]
pub struct RequestContextBuilder {
    values: HashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl RequestContextBuilder {
    /// Inserts a value into the context, replacing any previous value of the
    /// same type.
    pub fn insert<T: Send + Sync + 'static>(mut self, value: T) -> Self {
        self.values.insert(TypeId::of::<T>(), Box::new(value));
        self
    }

    /// Freezes the builder into an immutable [`RequestContext`].
    pub fn build(self) -> RequestContext {
        RequestContext {
            values: Arc::new(self.values),
        }
    }
}

impl fmt::Debug for RequestContextBuilder {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("RequestContextBuilder")
            .field("values", &self.values.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct FakeClient {
        url: String,
    }

    #[test]
    fn inserted_values_can_be_retrieved_by_type() {
        let context = RequestContext::builder()
            .insert(FakeClient {
                url: "postgres://localhost".into(),
            })
            .insert(7_u64)
            .build();

        assert_eq!(context.get::<u64>(), Some(&7));
        assert_eq!(
            context.get::<FakeClient>().map(|client| client.url.as_str()),
            Some("postgres://localhost")
        );
    }

    #[test]
    fn expect_fails_eagerly_on_missing_dependency() {
        let context = RequestContext::new();
        let result = context.expect::<FakeClient>("the ORM client");

        let message = result.unwrap_err().to_string();
        assert_eq!(message, "could not find the ORM client in request context");
    }
}
