use glam::IVec2;

/// 4 directions, clock face order.
pub const DIR_4: [IVec2; 4] = [
    IVec2::from_array([0, -1]),
    IVec2::from_array([1, 0]),
    IVec2::from_array([0, 1]),
    IVec2::from_array([-1, 0]),
];

pub trait VecExt: Sized {
    /// Absolute size of vector in taxicab metric.
    fn taxi_len(&self) -> i32;

    /// Vec points to an adjacent cell, left, right, up or down.
    fn is_adjacent(&self) -> bool {
        self.taxi_len() == 1
    }

    /// Squared euclidean distance to other point.
    fn dist_sq(&self, other: &Self) -> i32;
}

impl VecExt for IVec2 {
    fn taxi_len(&self) -> i32 {
        self[0].abs() + self[1].abs()
    }

    fn dist_sq(&self, other: &Self) -> i32 {
        (*other - *self).length_squared()
    }
}

#[cfg(test)]
mod tests {
    use glam::ivec2;
    use quickcheck_macros::quickcheck;

    use super::*;

    #[test]
    fn direction_table() {
        assert!(DIR_4.iter().all(|d| d.is_adjacent()));
        assert_eq!(DIR_4.iter().copied().sum::<IVec2>(), IVec2::ZERO);
    }

    #[test]
    fn metrics() {
        assert_eq!(ivec2(2, -3).taxi_len(), 5);
        assert!(!ivec2(1, 1).is_adjacent());
        assert_eq!(ivec2(0, 0).dist_sq(&ivec2(3, 4)), 25);
    }

    #[quickcheck]
    fn dist_sq_is_symmetric(ax: i8, ay: i8, bx: i8, by: i8) -> bool {
        let (a, b) = (ivec2(ax as i32, ay as i32), ivec2(bx as i32, by as i32));
        a.dist_sq(&b) == b.dist_sq(&a) && a.dist_sq(&a) == 0
    }
}
