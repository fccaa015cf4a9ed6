use crate::math::curve::curveerror::CurveError;
use crate::math::curve::piecewisefunction::piecewisefunction::find_segment;

// ─────────────────────────────────────────────
// Breakpoint 合併
// ─────────────────────────────────────────────
//
// 兩個分段函數做代數運算前，先取兩組 breakpoints 的聯集並裁切到共同區間
//   [max(lhs_0, rhs_0), min(lhs_n, rhs_n)]
// 距離不超過 tolerance 的相鄰點合併成一點（保留較早者，端點永遠保留）。
// 每個新區段再記錄它落在原本兩個運算元的哪一段，用區段中點查詢，
// 避免合併後的起點因容差略早於原 breakpoint 而查到前一段。

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MergedSegment {
    pub start: f64,
    pub end: f64,
    pub lhs_segment: usize,
    pub rhs_segment: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MergedBreakpoints {
    breakpoints: Vec<f64>,
    segments: Vec<MergedSegment>,
}

impl MergedBreakpoints {
    pub fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }

    pub fn segments(&self) -> &[MergedSegment] {
        &self.segments
    }

    pub fn into_breakpoints(self) -> Vec<f64> {
        self.breakpoints
    }
}

pub fn merge_breakpoints(
    lhs: &[f64],
    rhs: &[f64],
    tolerance: f64,
) -> Result<MergedBreakpoints, CurveError> {
    let (lhs_start, lhs_end) = domain(lhs)?;
    let (rhs_start, rhs_end) = domain(rhs)?;
    let lo = lhs_start.max(rhs_start);
    let hi = lhs_end.min(rhs_end);
    if hi - lo <= tolerance {
        return Err(CurveError::DomainMismatch {
            lhs_start,
            lhs_end,
            rhs_start,
            rhs_end,
        });
    }

    let mut interior: Vec<f64> = lhs
        .iter()
        .chain(rhs.iter())
        .copied()
        .filter(|&t| t > lo && t < hi)
        .collect();
    interior.sort_by(f64::total_cmp);

    let mut breakpoints = Vec::with_capacity(interior.len() + 2);
    breakpoints.push(lo);
    let mut collapsed = 0usize;
    for t in interior {
        let last = breakpoints[breakpoints.len() - 1];
        if t == last {
            continue;
        }
        if t - last > tolerance && hi - t > tolerance {
            breakpoints.push(t);
        } else {
            collapsed += 1;
        }
    }
    breakpoints.push(hi);

    if collapsed > 0 {
        log::warn!(
            "merge collapsed {} breakpoint(s) closer than {} to a neighbour",
            collapsed,
            tolerance
        );
    }

    let segments = breakpoints
        .windows(2)
        .map(|w| {
            let mid = 0.5 * (w[0] + w[1]);
            MergedSegment {
                start: w[0],
                end: w[1],
                lhs_segment: find_segment(lhs, mid),
                rhs_segment: find_segment(rhs, mid),
            }
        })
        .collect();

    log::debug!(
        "merged {} and {} breakpoints into {} over [{}, {}]",
        lhs.len(),
        rhs.len(),
        breakpoints.len(),
        lo,
        hi
    );

    Ok(MergedBreakpoints { breakpoints, segments })
}

fn domain(breakpoints: &[f64]) -> Result<(f64, f64), CurveError> {
    match (breakpoints.first(), breakpoints.last()) {
        (Some(&start), Some(&end)) if breakpoints.len() >= 2 => Ok((start, end)),
        _ => Err(CurveError::invalid_argument(
            "cannot merge a piecewise function without segments",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_of_nested_breakpoints() {
        let merged = merge_breakpoints(&[0.0, 2.0], &[0.0, 1.0, 2.0], 1e-10).unwrap();
        assert_eq!(merged.breakpoints(), &[0.0, 1.0, 2.0]);
        assert_eq!(
            merged.segments(),
            &[
                MergedSegment { start: 0.0, end: 1.0, lhs_segment: 0, rhs_segment: 0 },
                MergedSegment { start: 1.0, end: 2.0, lhs_segment: 0, rhs_segment: 1 },
            ]
        );
    }

    #[test]
    fn interleaved_breakpoints() {
        let merged = merge_breakpoints(&[0.0, 1.0, 3.0], &[0.0, 2.0, 3.0], 1e-10).unwrap();
        assert_eq!(merged.breakpoints(), &[0.0, 1.0, 2.0, 3.0]);
        let owners: Vec<(usize, usize)> = merged
            .segments()
            .iter()
            .map(|s| (s.lhs_segment, s.rhs_segment))
            .collect();
        assert_eq!(owners, vec![(0, 0), (1, 0), (1, 1)]);
    }

    #[test]
    fn clipped_to_overlap() {
        let merged = merge_breakpoints(&[0.0, 1.0, 2.0, 3.0], &[1.5, 2.5, 4.0], 1e-10).unwrap();
        assert_eq!(merged.breakpoints(), &[1.5, 2.0, 2.5, 3.0]);
        assert_eq!(merged.segments()[0].lhs_segment, 1);
        assert_eq!(merged.segments()[0].rhs_segment, 0);
        assert_eq!(merged.segments()[2].lhs_segment, 2);
        assert_eq!(merged.segments()[2].rhs_segment, 1);
    }

    #[test]
    fn near_coincident_breakpoints_collapse() {
        let merged = merge_breakpoints(&[0.0, 1.0, 2.0], &[0.0, 1.0 + 1e-12, 2.0], 1e-10).unwrap();
        assert_eq!(merged.breakpoints(), &[0.0, 1.0, 2.0]);
        assert_eq!(merged.segments()[1].rhs_segment, 1);

        let merged = merge_breakpoints(&[0.0, 2.0], &[0.0, 2.0 - 1e-12], 1e-10).unwrap();
        assert_eq!(merged.breakpoints(), &[0.0, 2.0 - 1e-12]);
    }

    #[test]
    fn disjoint_domains_are_rejected() {
        let result = merge_breakpoints(&[0.0, 1.0], &[1.0, 2.0], 1e-10);
        assert!(matches!(result, Err(CurveError::DomainMismatch { .. })));
        let result = merge_breakpoints(&[0.0, 1.0], &[3.0, 4.0], 1e-10);
        assert!(matches!(result, Err(CurveError::DomainMismatch { .. })));
    }
}
