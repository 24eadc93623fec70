// SPDX-License-Identifier: AGPL-3.0-or-later

//! Pluggable rewriting of pagination argument lists.
//!
//! The introspected API exposes cursor-based pagination through the argument
//! trio `cursor` / `take` / `skip`. Fields carrying (at least) this trio have
//! their argument list handed to a [`PaginationStrategy`] during the schema
//! transformation, so applications can expose whichever pagination convention
//! they prefer.

use crate::dmmf::source::{FieldKind, OutputField};
use crate::dmmf::transformed::{ArgTypeInfo, TransformedArg};

/// Everything a strategy gets to see when rewriting one field's arguments.
#[derive(Clone, Debug)]
pub struct PaginationArgsContext<'a> {
    /// The field's already-flattened arguments, including the pagination
    /// trio.
    pub args: Vec<TransformedArg>,

    /// The argument names which qualified the field for rewriting.
    pub pagination_arg_names: &'static [&'static str],

    /// The untransformed field descriptor.
    pub field: &'a OutputField,
}

/// Rewrites the argument list of a field exposing the pagination trio.
pub trait PaginationStrategy: Send + Sync {
    /// Name of this strategy, used in logs.
    fn name(&self) -> &'static str;

    /// Returns the replacement argument list for one field.
    fn transform_dmmf_args(&self, ctx: PaginationArgsContext<'_>) -> Vec<TransformedArg>;
}

/// Connection-style pagination: replaces `cursor` / `take` / `skip` with the
/// relay arguments `first`, `last`, `before` and `after`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RelayStrategy;

impl PaginationStrategy for RelayStrategy {
    fn name(&self) -> &'static str {
        "relay"
    }

    fn transform_dmmf_args(&self, ctx: PaginationArgsContext<'_>) -> Vec<TransformedArg> {
        let PaginationArgsContext {
            args,
            pagination_arg_names,
            ..
        } = ctx;

        let mut args: Vec<TransformedArg> = args
            .into_iter()
            .filter(|arg| !pagination_arg_names.contains(&arg.name.as_str()))
            .collect();

        args.push(nullable_scalar_arg("first", "Int"));
        args.push(nullable_scalar_arg("last", "Int"));
        args.push(nullable_scalar_arg("before", "String"));
        args.push(nullable_scalar_arg("after", "String"));
        args
    }
}

/// Keeps the introspected `cursor` / `take` / `skip` arguments as they are.
#[derive(Clone, Copy, Debug, Default)]
pub struct CursorStrategy;

impl PaginationStrategy for CursorStrategy {
    fn name(&self) -> &'static str {
        "cursor"
    }

    fn transform_dmmf_args(&self, ctx: PaginationArgsContext<'_>) -> Vec<TransformedArg> {
        ctx.args
    }
}

fn nullable_scalar_arg(name: &str, type_name: &str) -> TransformedArg {
    TransformedArg {
        name: name.to_owned(),
        input_type: ArgTypeInfo {
            type_name: type_name.to_owned(),
            kind: FieldKind::Scalar,
            is_list: false,
            is_nullable: true,
            is_required: false,
        },
    }
}
