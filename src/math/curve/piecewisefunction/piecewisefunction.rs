use crate::math::curve::curveerror::CurveError;

/// 檢查 breakpoints：至少兩個點、皆為有限值、嚴格遞增
pub fn validate_breakpoints(breakpoints: &[f64]) -> Result<(), CurveError> {
    if breakpoints.len() < 2 {
        return Err(CurveError::invalid_argument(format!(
            "at least 2 breakpoints are required, got {}",
            breakpoints.len()
        )));
    }
    if let Some(t) = breakpoints.iter().find(|t| !t.is_finite()) {
        return Err(CurveError::invalid_argument(format!(
            "breakpoint {} is not finite",
            t
        )));
    }
    if let Some(i) = (1..breakpoints.len()).find(|&i| breakpoints[i] <= breakpoints[i - 1]) {
        return Err(CurveError::invalid_argument(format!(
            "breakpoints must be strictly increasing: t[{}] = {} <= t[{}] = {}",
            i,
            breakpoints[i],
            i - 1,
            breakpoints[i - 1]
        )));
    }
    Ok(())
}

/// 二分搜尋 t 所在的區段，區間外夾到第一段或最後一段；NaN 視為第一段
pub fn find_segment(breakpoints: &[f64], t: f64) -> usize {
    let n = breakpoints.len().saturating_sub(1);
    if n == 0 || t.is_nan() || t <= breakpoints[0] {
        0
    } else if t >= breakpoints[n] {
        n - 1
    } else {
        breakpoints.partition_point(|&b| b <= t) - 1
    }
}

// ─────────────────────────────────────────────
// PiecewiseFunction
// ─────────────────────────────────────────────
//
// 區段 i 涵蓋 [t_i, t_{i+1})，最後一段為閉區間 [t_{n-1}, t_n]。
// 區間外的 t 夾到最近的端點區段（不視為錯誤）。

pub trait PiecewiseFunction {
    fn breakpoints(&self) -> &[f64];

    fn number_of_segments(&self) -> usize {
        self.breakpoints().len().saturating_sub(1)
    }

    fn start_time(&self) -> f64 {
        self.breakpoints().first().copied().unwrap_or(0.0)
    }

    fn end_time(&self) -> f64 {
        self.breakpoints().last().copied().unwrap_or(0.0)
    }

    fn segment_start_time(&self, segment_index: usize) -> Result<f64, CurveError> {
        self.check_segment_index(segment_index)?;
        Ok(self.breakpoints()[segment_index])
    }

    fn segment_end_time(&self, segment_index: usize) -> Result<f64, CurveError> {
        self.check_segment_index(segment_index)?;
        Ok(self.breakpoints()[segment_index + 1])
    }

    fn segment_duration(&self, segment_index: usize) -> Result<f64, CurveError> {
        self.check_segment_index(segment_index)?;
        let breakpoints = self.breakpoints();
        Ok(breakpoints[segment_index + 1] - breakpoints[segment_index])
    }

    fn is_time_in_range(&self, t: f64) -> bool {
        self.number_of_segments() > 0 && t >= self.start_time() && t <= self.end_time()
    }

    fn segment_index(&self, t: f64) -> usize {
        find_segment(self.breakpoints(), t)
    }

    fn check_segment_index(&self, segment_index: usize) -> Result<(), CurveError> {
        let n = self.number_of_segments();
        if segment_index >= n {
            Err(CurveError::segment_out_of_range(segment_index, n))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Knots(Vec<f64>);

    impl PiecewiseFunction for Knots {
        fn breakpoints(&self) -> &[f64] {
            &self.0
        }
    }

    #[test]
    fn rejects_malformed_breakpoints() {
        assert!(validate_breakpoints(&[0.0]).is_err());
        assert!(validate_breakpoints(&[0.0, 1.0, 1.0]).is_err());
        assert!(validate_breakpoints(&[0.0, 2.0, 1.0]).is_err());
        assert!(validate_breakpoints(&[0.0, f64::NAN]).is_err());
        assert!(validate_breakpoints(&[0.0, 1.0, 2.5]).is_ok());
    }

    #[test]
    fn segment_index_uses_half_open_segments_and_clamps() {
        let knots = Knots(vec![0.0, 1.0, 2.0, 4.0]);
        assert_eq!(knots.segment_index(-5.0), 0);
        assert_eq!(knots.segment_index(0.0), 0);
        assert_eq!(knots.segment_index(0.999), 0);
        assert_eq!(knots.segment_index(1.0), 1);
        assert_eq!(knots.segment_index(3.0), 2);
        assert_eq!(knots.segment_index(4.0), 2);
        assert_eq!(knots.segment_index(10.0), 2);
        assert_eq!(knots.segment_index(f64::NEG_INFINITY), 0);
        assert_eq!(knots.segment_index(f64::INFINITY), 2);
    }

    #[test]
    fn segment_index_of_nan_is_first_segment() {
        let knots = Knots(vec![0.0, 1.0, 2.0]);
        assert_eq!(knots.segment_index(f64::NAN), 0);
        assert_eq!(find_segment(&[], f64::NAN), 0);
    }

    #[test]
    fn segment_times() {
        let knots = Knots(vec![0.0, 1.0, 3.0]);
        assert_eq!(knots.number_of_segments(), 2);
        assert_eq!(knots.start_time(), 0.0);
        assert_eq!(knots.end_time(), 3.0);
        assert_eq!(knots.segment_start_time(1), Ok(1.0));
        assert_eq!(knots.segment_end_time(1), Ok(3.0));
        assert_eq!(knots.segment_duration(1), Ok(2.0));
        assert_eq!(
            knots.segment_duration(2),
            Err(CurveError::segment_out_of_range(2, 2))
        );
        assert!(knots.is_time_in_range(3.0));
        assert!(!knots.is_time_in_range(3.5));
    }
}
