use geo::Rect;
use rstar::{AABB, RTreeObject};

/// An axis-aligned rectangle in an R-tree, tagged with the index of its source shape.
#[derive(Debug, Clone)]
pub(super) struct IndexedRect {
    idx: usize,
    rect: Rect<f64>,
}

impl IndexedRect {
    pub(super) fn new(idx: usize, rect: Rect<f64>) -> Self {
        Self { idx, rect }
    }

    #[inline] pub(super) fn idx(&self) -> usize { self.idx }
}

impl RTreeObject for IndexedRect {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.rect.min().into(), self.rect.max().into())
    }
}
