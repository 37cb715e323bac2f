//! Vertex storage allocators.
//!
//! Every polygon created by a [`PolygonFactory`](crate::PolygonFactory) gets its
//! vertex buffer from a [`VertexAllocator`] and hands it back on release. The
//! allocator is injected into the factory, so an arena or pool can be
//! substituted without touching any of the geometry code.

use std::cell::{Cell, RefCell};

use nalgebra::Point3;

use crate::PolygonError;

/// Backing storage of a polygon.
pub type VertexBuffer = Vec<Point3<f32>>;

/// Source of vertex storage for polygons.
///
/// Implementations take `&self`; allocators that keep state use interior
/// mutability. They are not required to be thread-safe.
pub trait VertexAllocator {
    /// Returns an empty buffer able to hold at least `capacity` vertices
    /// without reallocating.
    fn allocate(&self, capacity: usize) -> Result<VertexBuffer, PolygonError>;

    /// Takes back a buffer previously returned by [`allocate`](Self::allocate).
    fn release(&self, buffer: VertexBuffer);
}

impl<A: VertexAllocator + ?Sized> VertexAllocator for &A {
    #[inline]
    fn allocate(&self, capacity: usize) -> Result<VertexBuffer, PolygonError> {
        (**self).allocate(capacity)
    }

    #[inline]
    fn release(&self, buffer: VertexBuffer) {
        (**self).release(buffer)
    }
}

/// Allocates straight from the system heap.
#[derive(Debug, Clone, Copy, Default)]
pub struct Heap;

impl VertexAllocator for Heap {
    fn allocate(&self, capacity: usize) -> Result<VertexBuffer, PolygonError> {
        reserve(capacity)
    }

    fn release(&self, buffer: VertexBuffer) {
        drop(buffer);
    }
}

fn reserve(capacity: usize) -> Result<VertexBuffer, PolygonError> {
    let mut buffer = Vec::new();
    buffer.try_reserve_exact(capacity).map_err(|_| {
        log::warn!("heap refused a buffer of {capacity} vertices");
        PolygonError::AllocationFailed { capacity }
    })?;
    Ok(buffer)
}

/// Recycles released buffers instead of returning them to the heap.
///
/// A pool can optionally be bounded to a number of live (handed out and not
/// yet released) buffers; requests past that bound fail with
/// [`PolygonError::AllocationFailed`].
#[derive(Debug, Default)]
pub struct Pool {
    free: RefCell<Vec<VertexBuffer>>,
    live: Cell<usize>,
    recycled: Cell<usize>,
    max_live: Option<usize>,
}

impl Pool {
    /// Creates an unbounded pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a pool that hands out at most `max_live` buffers at a time.
    pub fn bounded(max_live: usize) -> Self {
        Self {
            max_live: Some(max_live),
            ..Self::default()
        }
    }

    /// Number of buffers currently handed out.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// Number of released buffers waiting to be reused.
    pub fn idle(&self) -> usize {
        self.free.borrow().len()
    }

    /// Number of allocations served from a recycled buffer.
    pub fn recycled(&self) -> usize {
        self.recycled.get()
    }
}

impl VertexAllocator for Pool {
    fn allocate(&self, capacity: usize) -> Result<VertexBuffer, PolygonError> {
        if self.max_live.is_some_and(|max| self.live.get() >= max) {
            log::warn!(
                "pool exhausted: {} buffers live, refusing {capacity} vertices",
                self.live.get()
            );
            return Err(PolygonError::AllocationFailed { capacity });
        }

        let reused = {
            let mut free = self.free.borrow_mut();
            free.iter()
                .position(|b| b.capacity() >= capacity)
                .map(|idx| free.swap_remove(idx))
        };

        let buffer = match reused {
            Some(buffer) => {
                log::debug!("pool reused a buffer of {} for {capacity} vertices", buffer.capacity());
                self.recycled.set(self.recycled.get() + 1);
                buffer
            }
            None => reserve(capacity)?,
        };

        self.live.set(self.live.get() + 1);
        Ok(buffer)
    }

    fn release(&self, mut buffer: VertexBuffer) {
        buffer.clear();
        self.live.set(self.live.get().saturating_sub(1));
        self.free.borrow_mut().push(buffer);
    }
}
