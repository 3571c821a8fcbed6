//! Command execution trait
//!
//! Operations are structs whose fields are the wire parameters; executing one
//! against a [`BoardContext`] yields a typed response. Keeping the raw wire
//! integers on the struct means input validation happens inside `execute`,
//! before any store access, exactly once.

use crate::context::BoardContext;
use crate::error::Result;
use async_trait::async_trait;

/// An executable board operation.
#[async_trait]
pub trait Execute {
    /// The typed response this operation produces
    type Output;

    async fn execute(&self, ctx: &BoardContext) -> Result<Self::Output>;
}
