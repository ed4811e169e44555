//! Staffing rule: average customers per shift to recommended staff count

/// Lower bounds (inclusive) at which one more staff member is recommended
const THRESHOLDS: [f64; 3] = [25.0, 50.0, 100.0];

/// Recommended number of staff for an average headcount
///
/// | average      | staff |
/// |--------------|-------|
/// | `< 25`       | 1     |
/// | `25 ..< 50`  | 2     |
/// | `50 ..< 100` | 3     |
/// | `>= 100`     | 4     |
///
/// The average is compared as-is, without rounding.
pub fn recommend(average: f64) -> u8 {
    1 + THRESHOLDS.iter().filter(|&&bound| average >= bound).count() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recommend_boundaries() {
        assert_eq!(recommend(24.9), 1);
        assert_eq!(recommend(25.0), 2);
        assert_eq!(recommend(49.9), 2);
        assert_eq!(recommend(50.0), 3);
        assert_eq!(recommend(99.999), 3);
        assert_eq!(recommend(100.0), 4);
    }

    #[test]
    fn test_recommend_extremes() {
        assert_eq!(recommend(0.0), 1);
        assert_eq!(recommend(10_000.0), 4);
    }

    #[test]
    fn test_recommend_no_rounding() {
        // 24.99 would round to 25 but must stay below the threshold
        assert_eq!(recommend(24.99), 1);
        assert_eq!(recommend(49.5), 2);
    }
}
