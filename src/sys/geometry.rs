use serde::{Deserialize, Serialize};

/// A position in terminal cells. Coordinates may go negative while a floating
/// window is dragged past the left or top edge.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self { Self { x, y } }

    pub fn offset_by(self, dx: i32, dy: i32) -> Self { Self::new(self.x + dx, self.y + dy) }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self { Self { width, height } }

    pub fn is_degenerate(self) -> bool { self.width <= 0 || self.height <= 0 }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    pub fn max_x(self) -> i32 { self.origin.x + self.size.width }

    pub fn max_y(self) -> i32 { self.origin.y + self.size.height }

    pub fn translate(self, dx: i32, dy: i32) -> Self {
        Self {
            origin: self.origin.offset_by(dx, dy),
            size: self.size,
        }
    }

    pub fn with_origin(self, origin: Point) -> Self { Self { origin, size: self.size } }

    pub fn contains(self, point: Point) -> bool {
        point.x >= self.origin.x
            && point.x < self.max_x()
            && point.y >= self.origin.y
            && point.y < self.max_y()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn rect_edges_and_containment() {
        let r = Rect::new(60, 25, 40, 25);
        assert_eq!(r.max_x(), 100);
        assert_eq!(r.max_y(), 50);
        assert!(r.contains(Point::new(60, 25)));
        assert!(!r.contains(Point::new(100, 25)));
    }

    #[test]
    fn translate_moves_origin_only() {
        let r = Rect::new(10, 13, 80, 24).translate(-3, 2);
        assert_eq!(r, Rect::new(7, 15, 80, 24));
    }
}
