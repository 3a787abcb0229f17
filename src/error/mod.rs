//! Error types.
//!
//! Validation failures are accumulated in an [`Errors`] tree of typed
//! [`ErrorRecord`]s addressed by path. Mistakes made while *building*
//! contracts are reported separately as [`ContractError`].
//!
//! [`Errors::add`] and [`Errors::add_with`] panic on a blank error type.
//! Use [`Errors::push`] when the type comes from outside the crate; it
//! returns [`ContractError::BlankErrorType`] instead.

mod contract_error;
mod messages;
mod record;
mod tree;

pub use contract_error::ContractError;
pub use messages::{DefaultMessages, MessageStrategy};
pub use record::{ErrorRecord, FlatError};
pub use tree::{Errors, ErrorsAssignment};
