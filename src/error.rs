use thiserror::Error;

/// Failure modes of the container and of the heap primitives.
///
/// Every variant is a synchronous precondition failure; no operation
/// mutates state before reporting one.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("index {index} is out of range for {len} elements")]
    OutOfRange { index: usize, len: usize },
    #[error("maximum size exceeded for fixed-size container ({capacity} slots)")]
    CapacityExceeded { capacity: usize },
    #[error("resizing is disabled for this container")]
    ResizeForbidden,
    #[error("operation requires a non-empty heap")]
    Empty,
}
