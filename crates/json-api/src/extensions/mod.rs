//! Extension traits

mod internal;
mod state;

pub(crate) use internal::InternalErrorExt as _;
pub(crate) use state::StateExt as _;
