/// Axis-aligned rectangle in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Exclusive right edge
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    /// True when the two rectangles share a region of non-zero area
    pub fn intersects(&self, other: &Rect) -> bool {
        u64::from(self.x) < other.right()
            && self.right() > u64::from(other.x)
            && u64::from(self.y) < other.bottom()
            && self.bottom() > u64::from(other.y)
    }

    /// True when this rectangle lies inside a `width` x `height` canvas
    pub fn within(&self, width: u32, height: u32) -> bool {
        self.right() <= u64::from(width) && self.bottom() <= u64::from(height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersects() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        let c = Rect::new(20, 20, 10, 10);

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let left = Rect::new(0, 0, 16, 16);
        let right = Rect::new(16, 0, 16, 16);
        let below = Rect::new(0, 16, 16, 16);

        assert!(!left.intersects(&right));
        assert!(!left.intersects(&below));
    }

    #[test]
    fn test_within() {
        assert!(Rect::new(0, 0, 64, 64).within(64, 64));
        assert!(Rect::new(32, 48, 32, 16).within(64, 64));
        assert!(!Rect::new(33, 0, 32, 16).within(64, 64));
        assert!(!Rect::new(u32::MAX, 0, 2, 1).within(u32::MAX, 1));
    }
}
