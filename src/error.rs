use thiserror::Error;

use crate::{ec::EcError, wire::WireError};

/// Failure of a box-suite operation.
///
/// The error deliberately carries no cause: distinguishing a bad MAC from a
/// bad key length or an off-curve point would reveal which secret-dependent
/// check rejected the input. Any output associated with a [`BoxError`] must
/// be discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("box operation failed")]
pub struct BoxError;

impl From<WireError> for BoxError {
    fn from(_: WireError) -> Self {
        BoxError
    }
}

impl From<EcError> for BoxError {
    fn from(_: EcError) -> Self {
        BoxError
    }
}
