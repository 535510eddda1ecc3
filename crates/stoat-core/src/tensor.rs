use std::sync::{Arc, RwLock, RwLockReadGuard};

use crate::error::{Error, Result};
use crate::layout::{IndexedOffsets, Layout};
use crate::scalar::Scalar;
use crate::shape::Shape;

// Tensor - an n-dimensional value over a flat shared buffer.
//
// A Tensor combines three things:
//
//   1. a flat buffer of elements (Vec<T> behind Arc<RwLock<..>>)
//   2. a Layout mapping multi-indices onto buffer positions
//   3. an ownership tag: Owned for the handle that allocated the buffer,
//      View for anything that merely reinterprets someone else's buffer
//
// OWNERSHIP MODEL:
//
//   Exactly one tensor is the primary owner of a freshly allocated buffer.
//   Transpose, narrow, reshape, squeeze, permute, and broadcast all return
//   View-tagged tensors that share the owner's buffer under a different
//   layout. Views are never writable: `set` checks the tag on every call
//   and rejects writes through a shared reference. This is what lets a
//   broadcast view with zero strides exist safely; writing through it
//   would update many logical positions at once.
//
//   Cloning a Tensor clones the Arc handle, not the data.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ownership {
    /// This handle allocated the buffer and may write through it.
    Owned,
    /// This handle reinterprets another tensor's buffer; read-only.
    View,
}

struct TensorInner<T: Scalar> {
    /// The flat element buffer, shared between an owner and its views.
    storage: Arc<RwLock<Vec<T>>>,
    /// Shape + strides + offset.
    layout: Layout,
    ownership: Ownership,
}

/// An n-dimensional array of scalars over a flat, shareable buffer.
///
/// # Example
/// ```
/// # fn main() -> stoat_core::Result<()> {
/// use stoat_core::Tensor;
///
/// let t = Tensor::from_vec(vec![1.0, 2.0, 3.0, 4.0], (2, 2))?;
/// assert_eq!(t.get(&[1, 0])?, 3.0);
/// # Ok(()) }
/// ```
pub struct Tensor<T: Scalar> {
    inner: Arc<TensorInner<T>>,
}

// Manual Clone: Arc::clone is cheap, T need not be Clone-heavy.
impl<T: Scalar> Clone for Tensor<T> {
    fn clone(&self) -> Self {
        Tensor {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Scalar> std::fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Tensor(shape={}, strides={:?}, {})",
            self.shape(),
            self.layout().strides(),
            match self.inner.ownership {
                Ownership::Owned => "owned",
                Ownership::View => "view",
            }
        )
    }
}

impl<T: Scalar> Tensor<T> {
    // Internal constructors

    fn from_owned_parts(data: Vec<T>, layout: Layout) -> Self {
        Tensor {
            inner: Arc::new(TensorInner {
                storage: Arc::new(RwLock::new(data)),
                layout,
                ownership: Ownership::Owned,
            }),
        }
    }

    fn view_with_layout(&self, layout: Layout) -> Self {
        Tensor {
            inner: Arc::new(TensorInner {
                storage: Arc::clone(&self.inner.storage),
                layout,
                ownership: Ownership::View,
            }),
        }
    }

    // Construction

    /// Build a tensor from flat data in row-major order.
    ///
    /// Errors when the data length disagrees with the shape's element count;
    /// the check happens here, not lazily on first access.
    pub fn from_vec(data: Vec<T>, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        if data.len() != shape.size() {
            return Err(Error::ElementCountMismatch {
                expected: shape.size(),
                got: data.len(),
                shape,
            });
        }
        Ok(Self::from_owned_parts(data, Layout::contiguous(shape)))
    }

    /// Build a tensor by evaluating `f` exactly once per multi-index, in
    /// row-major order, into a freshly owned buffer.
    pub fn from_fn(shape: impl Into<Shape>, mut f: impl FnMut(&[usize]) -> T) -> Self {
        let layout = Layout::contiguous(shape.into());
        let mut data = Vec::with_capacity(layout.size());
        for (index, _) in layout.indexed_offsets() {
            data.push(f(&index));
        }
        Self::from_owned_parts(data, layout)
    }

    /// A tensor with every element set to `value`.
    pub fn full(shape: impl Into<Shape>, value: T) -> Self {
        let layout = Layout::contiguous(shape.into());
        Self::from_owned_parts(vec![value; layout.size()], layout)
    }

    /// A rank-0 tensor holding a single value.
    pub fn scalar(value: T) -> Self {
        Self::full(Shape::scalar(), value)
    }

    // Accessors

    pub fn shape(&self) -> &Shape {
        self.inner.layout.shape()
    }

    pub fn dims(&self) -> &[usize] {
        self.inner.layout.dims()
    }

    pub fn rank(&self) -> usize {
        self.inner.layout.rank()
    }

    /// Total number of elements.
    pub fn size(&self) -> usize {
        self.inner.layout.size()
    }

    pub fn layout(&self) -> &Layout {
        &self.inner.layout
    }

    pub fn is_contiguous(&self) -> bool {
        self.inner.layout.is_contiguous()
    }

    /// Whether this handle is a non-owning view of another tensor's buffer.
    pub fn is_view(&self) -> bool {
        self.inner.ownership == Ownership::View
    }

    /// Read access to the raw buffer. Offsets from [`Tensor::layout`] index
    /// into this slice.
    pub fn storage(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.inner.storage.read().expect("storage lock poisoned")
    }

    // Element access

    /// Read one element at a checked multi-index.
    pub fn get(&self, index: &[usize]) -> Result<T> {
        let flat = self.inner.layout.offset_of(index)?;
        Ok(self.storage()[flat])
    }

    /// Write one element at a checked multi-index.
    ///
    /// Only the owning handle may write; any view (broadcast, transpose,
    /// narrow, ...) is rejected before the index is even looked at.
    pub fn set(&self, index: &[usize], value: T) -> Result<()> {
        if self.is_view() {
            return Err(Error::ReadOnlyView {
                shape: self.shape().clone(),
            });
        }
        let flat = self.inner.layout.offset_of(index)?;
        let mut guard = self
            .inner
            .storage
            .write()
            .map_err(|_| Error::msg("storage lock poisoned"))?;
        guard[flat] = value;
        Ok(())
    }

    /// The single element of a size-1 tensor (any rank, all axes 1).
    pub fn value(&self) -> Result<T> {
        if self.size() != 1 {
            return Err(Error::NotAScalar {
                shape: self.shape().clone(),
            });
        }
        let flat = self.inner.layout.offset_of_nth(0);
        Ok(self.storage()[flat])
    }

    /// Iterate `(multi_index, value)` pairs in row-major order.
    ///
    /// Restartable: each call walks the full index space from the start.
    /// For a broadcast view the shared element is yielded once per logical
    /// index without ever being copied into a new buffer.
    pub fn elements(&self) -> Elements<'_, T> {
        Elements {
            guard: self.storage(),
            iter: self.inner.layout.indexed_offsets(),
        }
    }

    /// Materialize the logical elements into a fresh row-major Vec.
    pub fn to_vec(&self) -> Vec<T> {
        let guard = self.storage();
        self.inner.layout.offsets().map(|o| guard[o]).collect()
    }

    // Views (share the buffer, never writable)

    /// Reinterpret this tensor at a broadcast target shape: a zero-copy
    /// view whose expanded axes carry stride 0.
    pub fn broadcast_to(&self, target: &Shape) -> Result<Self> {
        let layout = self.inner.layout.broadcast_to(target)?;
        Ok(self.view_with_layout(layout))
    }

    /// Swap two axes without moving data.
    pub fn transpose(&self, dim0: usize, dim1: usize) -> Result<Self> {
        Ok(self.view_with_layout(self.inner.layout.transpose(dim0, dim1)?))
    }

    /// Matrix transpose, rank 2 only.
    pub fn t(&self) -> Result<Self> {
        if self.rank() != 2 {
            return Err(Error::RankMismatch {
                expected: 2,
                got: self.rank(),
            });
        }
        self.transpose(0, 1)
    }

    /// Slice `[start, start + len)` along one axis.
    pub fn narrow(&self, dim: usize, start: usize, len: usize) -> Result<Self> {
        Ok(self.view_with_layout(self.inner.layout.narrow(dim, start, len)?))
    }

    /// Insert a size-1 axis at `dim`.
    pub fn unsqueeze(&self, dim: usize) -> Result<Self> {
        let rank = self.rank();
        if dim > rank {
            return Err(Error::DimOutOfRange {
                dim,
                rank: rank + 1,
            });
        }
        let mut dims = self.dims().to_vec();
        let mut strides = self.layout().strides().to_vec();
        // Any stride works for a size-1 axis; borrow the neighbour's so
        // contiguity is preserved where it held before.
        let stride = if dim < rank { strides[dim] } else { 1 };
        dims.insert(dim, 1);
        strides.insert(dim, stride);
        Ok(self.view_with_layout(Layout::new(
            Shape::new(dims),
            strides,
            self.layout().offset(),
        )))
    }

    /// Remove a size-1 axis at `dim`.
    pub fn squeeze(&self, dim: usize) -> Result<Self> {
        let rank = self.rank();
        if dim >= rank {
            return Err(Error::DimOutOfRange { dim, rank });
        }
        if self.dims()[dim] != 1 {
            return Err(Error::msg(format!(
                "squeeze: dimension {} has size {}, expected 1",
                dim,
                self.dims()[dim]
            )));
        }
        let mut dims = self.dims().to_vec();
        let mut strides = self.layout().strides().to_vec();
        dims.remove(dim);
        strides.remove(dim);
        Ok(self.view_with_layout(Layout::new(
            Shape::new(dims),
            strides,
            self.layout().offset(),
        )))
    }

    /// Reorder all axes. `permute(&[2, 0, 1])` on `[A, B, C]` gives
    /// `[C, A, B]`.
    pub fn permute(&self, dims: &[usize]) -> Result<Self> {
        let rank = self.rank();
        if dims.len() != rank {
            return Err(Error::RankMismatch {
                expected: rank,
                got: dims.len(),
            });
        }
        let mut seen = vec![false; rank];
        for &d in dims {
            if d >= rank {
                return Err(Error::DimOutOfRange { dim: d, rank });
            }
            if seen[d] {
                return Err(Error::msg(format!("permute: duplicate dimension {}", d)));
            }
            seen[d] = true;
        }
        let old_dims = self.dims();
        let old_strides = self.layout().strides();
        let new_dims: Vec<usize> = dims.iter().map(|&d| old_dims[d]).collect();
        let new_strides: Vec<usize> = dims.iter().map(|&d| old_strides[d]).collect();
        Ok(self.view_with_layout(Layout::new(
            Shape::new(new_dims),
            new_strides,
            self.layout().offset(),
        )))
    }

    /// View this tensor at a new shape with the same element count.
    ///
    /// Contiguous tensors reshape for free; anything else is materialized
    /// into a contiguous copy first.
    pub fn reshape(&self, shape: impl Into<Shape>) -> Result<Self> {
        let shape = shape.into();
        if shape.size() != self.size() {
            return Err(Error::ReshapeElementMismatch {
                src: self.size(),
                dst: shape.size(),
                dst_shape: shape,
            });
        }
        let base = if self.is_contiguous() {
            self.clone()
        } else {
            self.contiguous()
        };
        Ok(base.view_with_layout(Layout::contiguous(shape)))
    }

    /// An owned, contiguous row-major tensor with the same logical
    /// contents. Already-contiguous owned tensors are returned as-is.
    pub fn contiguous(&self) -> Self {
        if self.is_contiguous() && !self.is_view() {
            return self.clone();
        }
        let layout = Layout::contiguous(self.shape().clone());
        Self::from_owned_parts(self.to_vec(), layout)
    }
}

/// Iterator returned by [`Tensor::elements`]: `(multi_index, value)` pairs
/// in row-major order, reading through the tensor's strides.
pub struct Elements<'a, T: Scalar> {
    guard: RwLockReadGuard<'a, Vec<T>>,
    iter: IndexedOffsets,
}

impl<T: Scalar> Iterator for Elements<'_, T> {
    type Item = (Vec<usize>, T);

    fn next(&mut self) -> Option<(Vec<usize>, T)> {
        let (index, flat) = self.iter.next()?;
        Some((index, self.guard[flat]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.iter.size_hint()
    }
}

impl<T: Scalar> ExactSizeIterator for Elements<'_, T> {}
