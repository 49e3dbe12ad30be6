//! Pixel rectangles for widget cells and clip regions
use core::cmp;

/// A rectangle in panel pixels
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Rect {
    /// Origin X
    pub x: u32,
    /// Origin Y
    pub y: u32,
    /// Width
    pub w: u32,
    /// Height
    pub h: u32,
}

impl Rect {
    /// Construct a new rectangle
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Rect {
        Rect { x, y, w, h }
    }

    /// First column right of the rectangle
    pub const fn right(&self) -> u32 {
        self.x.saturating_add(self.w)
    }

    /// First row below the rectangle
    pub const fn bottom(&self) -> u32 {
        self.y.saturating_add(self.h)
    }

    /// Compute intersection with another rectangle
    pub fn intersect(&self, other: Rect) -> Rect {
        let x = cmp::max(self.x, other.x);
        let y = cmp::max(self.y, other.y);
        let w = cmp::min(self.right(), other.right()).saturating_sub(x);
        let h = cmp::min(self.bottom(), other.bottom()).saturating_sub(y);
        Rect { x, y, w, h }
    }

    /// Test whether the rectangle is empty.
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Whether the pixel lies inside the rectangle
    pub fn contains(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 {
            return false;
        }
        let (x, y) = (x as u32, y as u32);
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}
