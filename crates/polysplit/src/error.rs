//! Error type shared by every fallible polygon operation.

/// Errors that can occur while allocating, building, measuring or splitting polygons.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum PolygonError {
    /// The vertex allocator could not provide storage for the requested capacity.
    #[error("failed to allocate storage for {capacity} vertices")]
    AllocationFailed {
        /// The capacity that was requested.
        capacity: usize,
    },

    /// A vertex was appended to a polygon that is already full.
    ///
    /// This indicates a sizing bug in the caller: capacity is fixed when the
    /// polygon is allocated and never grows.
    #[error("polygon is full ({capacity} vertices)")]
    CapacityExceeded {
        /// The fixed capacity of the polygon.
        capacity: usize,
    },

    /// The polygon has fewer than three vertices, or its vertices enclose no area.
    #[error("invalid polygon: {count} vertices do not span an area")]
    Degenerate {
        /// The number of vertices of the offending polygon.
        count: usize,
    },

    /// The classification tolerance is negative or NaN.
    #[error("epsilon must be a non-negative number, got {0}")]
    InvalidEpsilon(f32),

    /// An internal invariant was violated. This is a bug in this crate.
    #[error("internal error: {0}")]
    Internal(&'static str),
}
