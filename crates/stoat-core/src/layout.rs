use crate::error::{Error, Result};
use crate::shape::Shape;

// Layout - how a logical shape maps onto a flat buffer.
//
// A Layout pairs a Shape with per-axis strides and a base offset. The flat
// position of multi-index (i0 .. i(r-1)) is
//
//     offset + sum(ik * strides[k])
//
// and every shape/stride trick in this crate is some choice of strides:
//
//   * contiguous row-major: strides computed from the shape, offset 0
//   * transpose/permute:    the same strides in a different order
//   * narrow (slice):       a bumped offset, a shrunk shape
//   * broadcast view:       stride 0 on replicated axes, so every index
//                           along that axis lands on the same element
//
// A stride of 0 is what makes broadcasting free: no data is replicated,
// the mapping just stops moving along that axis.

/// Memory layout of a tensor: shape, strides, and base offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    shape: Shape,
    strides: Vec<usize>,
    offset: usize,
}

impl Layout {
    /// Contiguous row-major layout for a shape.
    pub fn contiguous(shape: Shape) -> Self {
        let strides = shape.default_strides();
        Layout {
            shape,
            strides,
            offset: 0,
        }
    }

    /// Layout with explicit strides and offset, for views.
    pub fn new(shape: Shape, strides: Vec<usize>, offset: usize) -> Self {
        debug_assert_eq!(shape.rank(), strides.len());
        Layout {
            shape,
            strides,
            offset,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn rank(&self) -> usize {
        self.shape.rank()
    }

    pub fn dims(&self) -> &[usize] {
        self.shape.dims()
    }

    pub fn size(&self) -> usize {
        self.shape.size()
    }

    /// Whether this layout is the canonical row-major one: default strides
    /// and no base offset.
    pub fn is_contiguous(&self) -> bool {
        self.offset == 0 && self.strides == self.shape.default_strides()
    }

    /// Checked flat offset for a multi-index.
    ///
    /// The index must have exactly `rank()` components, each inside its
    /// axis; anything else is an index error, not a silent wrap.
    pub fn offset_of(&self, index: &[usize]) -> Result<usize> {
        if index.len() != self.rank() {
            return Err(Error::RankMismatch {
                expected: self.rank(),
                got: index.len(),
            });
        }
        for (&i, &d) in index.iter().zip(self.dims().iter()) {
            if i >= d {
                return Err(Error::IndexOutOfBounds {
                    index: index.to_vec(),
                    shape: self.shape.clone(),
                });
            }
        }
        Ok(self.flat_offset(index))
    }

    /// Unchecked flat offset for an already-validated multi-index.
    pub fn flat_offset(&self, index: &[usize]) -> usize {
        let mut flat = self.offset;
        for (&i, &s) in index.iter().zip(self.strides.iter()) {
            flat += i * s;
        }
        flat
    }

    /// Flat offset of the n-th element in row-major enumeration order.
    ///
    /// Unravels `n` over the dims from the trailing axis up. Pure, so a
    /// traversal can be split across threads by position.
    pub fn offset_of_nth(&self, n: usize) -> usize {
        let mut rem = n;
        let mut flat = self.offset;
        for k in (0..self.rank()).rev() {
            let d = self.shape.dims()[k];
            flat += (rem % d) * self.strides[k];
            rem /= d;
        }
        flat
    }

    /// Swap two axes. A free operation: shape and strides swap, data stays.
    pub fn transpose(&self, dim0: usize, dim1: usize) -> Result<Layout> {
        let rank = self.rank();
        if dim0 >= rank || dim1 >= rank {
            return Err(Error::DimOutOfRange {
                dim: dim0.max(dim1),
                rank,
            });
        }
        let mut dims = self.shape.dims().to_vec();
        let mut strides = self.strides.clone();
        dims.swap(dim0, dim1);
        strides.swap(dim0, dim1);
        Ok(Layout::new(Shape::new(dims), strides, self.offset))
    }

    /// Restrict one axis to `[start, start + len)`. The offset absorbs the
    /// skipped prefix; strides are untouched.
    pub fn narrow(&self, dim: usize, start: usize, len: usize) -> Result<Layout> {
        let rank = self.rank();
        if dim >= rank {
            return Err(Error::DimOutOfRange { dim, rank });
        }
        let dim_size = self.shape.dims()[dim];
        if start + len > dim_size {
            return Err(Error::NarrowOutOfBounds {
                dim,
                start,
                len,
                dim_size,
            });
        }
        let mut dims = self.shape.dims().to_vec();
        dims[dim] = len;
        let offset = self.offset + start * self.strides[dim];
        Ok(Layout::new(Shape::new(dims), self.strides.clone(), offset))
    }

    /// Reinterpret this layout at a broadcast target shape.
    ///
    /// Every axis of `self`, right-aligned against `target`, must either
    /// match the target size (keeps its stride) or be size 1 (stride drops
    /// to 0). Axes missing on the left get stride 0 as well. The base
    /// offset is preserved, so broadcasting composes with narrow/transpose.
    pub fn broadcast_to(&self, target: &Shape) -> Result<Layout> {
        let unified = Shape::broadcast(self.shape(), target)?;
        if &unified != target {
            return Err(Error::BroadcastMismatch {
                lhs: self.shape.clone(),
                rhs: target.clone(),
            });
        }

        let dims = self.dims();
        let pad = target.rank() - dims.len();
        let mut strides = vec![0usize; target.rank()];
        for (i, (&d, &s)) in dims.iter().zip(self.strides.iter()).enumerate() {
            if d == target.dims()[i + pad] {
                strides[i + pad] = s;
            }
            // d == 1 with a larger target axis: stride stays 0.
        }
        Ok(Layout::new(target.clone(), strides, self.offset))
    }

    /// Iterator over flat offsets in row-major logical order.
    pub fn offsets(&self) -> Offsets {
        Offsets::new(self)
    }

    /// Iterator over `(multi_index, flat_offset)` pairs in row-major order.
    pub fn indexed_offsets(&self) -> IndexedOffsets {
        IndexedOffsets::new(self)
    }
}

// Offset iteration.
//
// Both iterators walk the logical multi-index space odometer-style: bump
// the trailing axis, carry leftwards on overflow. The flat offset is kept
// incrementally (add a stride on bump, subtract dim*stride on carry), so
// one step is O(1) amortized instead of a full index-times-stride dot
// product per element.

/// Iterator over the flat offsets of a layout, zero-stride aware.
pub struct Offsets {
    current: Vec<usize>,
    dims: Vec<usize>,
    strides: Vec<usize>,
    flat: usize,
    remaining: usize,
}

impl Offsets {
    fn new(layout: &Layout) -> Self {
        Offsets {
            current: vec![0; layout.rank()],
            dims: layout.dims().to_vec(),
            strides: layout.strides().to_vec(),
            flat: layout.offset(),
            remaining: layout.size(),
        }
    }

    fn advance(&mut self) {
        for k in (0..self.dims.len()).rev() {
            self.current[k] += 1;
            self.flat += self.strides[k];
            if self.current[k] < self.dims[k] {
                return;
            }
            self.current[k] = 0;
            self.flat -= self.strides[k] * self.dims[k];
        }
    }
}

impl Iterator for Offsets {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let out = self.flat;
        if self.remaining > 0 {
            self.advance();
        }
        Some(out)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Offsets {}

/// Iterator over `(multi_index, flat_offset)` pairs of a layout.
///
/// The index vector is cloned out per element; use [`Offsets`] when only
/// the buffer position matters.
pub struct IndexedOffsets {
    inner: Offsets,
}

impl IndexedOffsets {
    fn new(layout: &Layout) -> Self {
        IndexedOffsets {
            inner: Offsets::new(layout),
        }
    }
}

impl Iterator for IndexedOffsets {
    type Item = (Vec<usize>, usize);

    fn next(&mut self) -> Option<(Vec<usize>, usize)> {
        if self.inner.remaining == 0 {
            return None;
        }
        let index = self.inner.current.clone();
        let flat = self.inner.next()?;
        Some((index, flat))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for IndexedOffsets {}
