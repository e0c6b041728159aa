//! Type aliases for operations that keep going after some of their parts fail.

/// A completed operation together with the errors of the parts that were skipped.
/// The `Vec<E>` holds every failure that was handled by leaving the part out.
pub type PartialSuccess<T, E> = ( T, Vec<E> );
