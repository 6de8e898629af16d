use crate::types::Vec2;

pub fn manhattan(ax: i32, ay: i32, bx: i32, by: i32) -> i32 {
    (ax - bx).abs() + (ay - by).abs()
}

pub(super) fn manhattan_between(a: Vec2, b: Vec2) -> i32 {
    manhattan(a.x, a.y, b.x, b.y)
}
