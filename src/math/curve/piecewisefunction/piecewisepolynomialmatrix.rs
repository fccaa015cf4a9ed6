use nalgebra::DMatrix;

use crate::configuration::Configuration;
use crate::math::curve::curve::MatrixCurve;
use crate::math::curve::curveerror::CurveError;
use crate::math::curve::piecewisefunction::breakpointmerge::merge_breakpoints;
use crate::math::curve::piecewisefunction::piecewisefunction::{
    PiecewiseFunction,
    validate_breakpoints
};
use crate::math::polynomial::polynomial::{
    Polynomial,
    UnivariatePolynomial
};

pub type PolynomialMatrix<P = Polynomial> = DMatrix<P>;

// ─────────────────────────────────────────────
// PiecewisePolynomialMatrix
// ─────────────────────────────────────────────
//
// 每一段 [t_i, t_{i+1}) 對應一個 rows×cols 的多項式矩陣，
// 多項式以區段內的局部座標 s = t - t_i 表示。
// 因為係數是局部座標，整條軌跡平移只需要移動 breakpoints。

#[derive(Clone, Debug, PartialEq)]
pub struct PiecewisePolynomialMatrix<P: UnivariatePolynomial = Polynomial> {
    breakpoints: Vec<f64>,
    polynomials: Vec<PolynomialMatrix<P>>,
}

impl<P: UnivariatePolynomial> PiecewisePolynomialMatrix<P> {
    pub fn new(
        polynomials: Vec<PolynomialMatrix<P>>,
        breakpoints: Vec<f64>,
    ) -> Result<PiecewisePolynomialMatrix<P>, CurveError> {
        if polynomials.is_empty() {
            return Err(CurveError::invalid_argument("at least one segment is required"));
        }
        if breakpoints.len() != polynomials.len() + 1 {
            return Err(CurveError::invalid_argument(format!(
                "{} segments need {} breakpoints, got {}",
                polynomials.len(),
                polynomials.len() + 1,
                breakpoints.len()
            )));
        }
        validate_breakpoints(&breakpoints)?;

        let shape = polynomials[0].shape();
        if let Some(i) = polynomials.iter().position(|m| m.shape() != shape) {
            let (rows, cols) = polynomials[i].shape();
            return Err(CurveError::invalid_argument(format!(
                "segment {} is {}x{} but segment 0 is {}x{}",
                i, rows, cols, shape.0, shape.1
            )));
        }

        Ok(PiecewisePolynomialMatrix { breakpoints, polynomials })
    }

    /// 每段一個 1×1 矩陣
    pub fn from_scalars(
        polynomials: Vec<P>,
        breakpoints: Vec<f64>,
    ) -> Result<PiecewisePolynomialMatrix<P>, CurveError> {
        let matrices = polynomials
            .into_iter()
            .map(|p| DMatrix::from_element(1, 1, p))
            .collect();
        PiecewisePolynomialMatrix::new(matrices, breakpoints)
    }

    /// 所有區段皆為同一個常數矩陣
    pub fn constant(
        value: &DMatrix<f64>,
        breakpoints: Vec<f64>,
    ) -> Result<PiecewisePolynomialMatrix<P>, CurveError> {
        let segment_count = breakpoints.len().saturating_sub(1);
        let matrix: PolynomialMatrix<P> = value.map(P::constant);
        PiecewisePolynomialMatrix::new(vec![matrix; segment_count], breakpoints)
    }

    pub fn identity(
        size: usize,
        breakpoints: Vec<f64>,
    ) -> Result<PiecewisePolynomialMatrix<P>, CurveError> {
        PiecewisePolynomialMatrix::constant(&DMatrix::identity(size, size), breakpoints)
    }

    /// 沒有任何區段的初始狀態，只給逐段累積結果的演算法使用
    pub(crate) fn empty() -> PiecewisePolynomialMatrix<P> {
        PiecewisePolynomialMatrix {
            breakpoints: Vec::new(),
            polynomials: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        self.polynomials.first().map_or(0, |m| m.nrows())
    }

    pub fn cols(&self) -> usize {
        self.polynomials.first().map_or(0, |m| m.ncols())
    }

    // ─────────────────────────────────────────
    // 求值
    // ─────────────────────────────────────────

    pub fn value(&self, t: f64) -> DMatrix<f64> {
        let i = self.segment_index(t);
        let s = t - self.breakpoints[i];
        let matrix = &self.polynomials[i];
        DMatrix::from_fn(matrix.nrows(), matrix.ncols(), |row, col| matrix[(row, col)].value(s))
    }

    pub fn scalar_value(&self, t: f64, row: usize, col: usize) -> Result<f64, CurveError> {
        self.check_entry_index(row, col)?;
        let i = self.segment_index(t);
        Ok(self.segment_value_at_global_abscissa(i, t, row, col))
    }

    fn segment_value_at_global_abscissa(&self, segment_index: usize, t: f64, row: usize, col: usize) -> f64 {
        self.polynomials[segment_index][(row, col)].value(t - self.breakpoints[segment_index])
    }

    // ─────────────────────────────────────────
    // 微積分
    // ─────────────────────────────────────────

    /// 對局部座標取 `order` 階導數；`order == 0` 回傳原函數，負值為錯誤
    pub fn derivative(&self, order: i32) -> Result<PiecewisePolynomialMatrix<P>, CurveError> {
        if order < 0 {
            return Err(CurveError::invalid_argument(format!(
                "derivative order must be non-negative, got {}",
                order
            )));
        }
        let order = order as usize;
        let polynomials = self
            .polynomials
            .iter()
            .map(|m| m.map(|p| p.derivative(order)))
            .collect();
        Ok(PiecewisePolynomialMatrix {
            breakpoints: self.breakpoints.clone(),
            polynomials,
        })
    }

    /// 逐段積分，起點所有元素的值為 `value_at_start_time`，並在每個 breakpoint 保持連續
    pub fn integral(&self, value_at_start_time: f64) -> PiecewisePolynomialMatrix<P> {
        self.integrate(|_, _| value_at_start_time)
    }

    pub fn integral_from_matrix(
        &self,
        value_at_start_time: &DMatrix<f64>,
    ) -> Result<PiecewisePolynomialMatrix<P>, CurveError> {
        if value_at_start_time.shape() != (self.rows(), self.cols()) {
            return Err(CurveError::ShapeMismatch {
                operation: "integral",
                lhs_rows: self.rows(),
                lhs_cols: self.cols(),
                rhs_rows: value_at_start_time.nrows(),
                rhs_cols: value_at_start_time.ncols(),
            });
        }
        Ok(self.integrate(|row, col| value_at_start_time[(row, col)]))
    }

    fn integrate<F>(&self, value_at_start_time: F) -> PiecewisePolynomialMatrix<P>
    where
        F: Fn(usize, usize) -> f64,
    {
        let (rows, cols) = (self.rows(), self.cols());
        let mut result = PiecewisePolynomialMatrix::empty();
        result.breakpoints = self.breakpoints.clone();

        // 每段的積分常數取前一段積分結果在其終點的值
        let mut start_values = DMatrix::from_fn(rows, cols, |row, col| value_at_start_time(row, col));
        for (i, matrix) in self.polynomials.iter().enumerate() {
            let integrated = DMatrix::from_fn(rows, cols, |row, col| {
                matrix[(row, col)].integral(start_values[(row, col)])
            });
            let duration = self.breakpoints[i + 1] - self.breakpoints[i];
            start_values = DMatrix::from_fn(rows, cols, |row, col| integrated[(row, col)].value(duration));
            result.polynomials.push(integrated);
        }
        result
    }

    // ─────────────────────────────────────────
    // 代數運算
    // ─────────────────────────────────────────
    //
    // 兩個運算元的 breakpoints 可以不同：先合併成共同的 breakpoints，
    // 每個新區段把兩邊原本的多項式平移到新區段的局部座標後再逐元素運算。
    // `_assign` 版本先算出完整結果再整個換入，失敗時接收者不變。

    pub fn try_add(&self, other: &PiecewisePolynomialMatrix<P>) -> Result<PiecewisePolynomialMatrix<P>, CurveError> {
        self.try_add_with(other, &Configuration::default())
    }

    pub fn try_add_with(
        &self,
        other: &PiecewisePolynomialMatrix<P>,
        config: &Configuration,
    ) -> Result<PiecewisePolynomialMatrix<P>, CurveError> {
        self.check_same_shape(other, "addition")?;
        self.combine(other, config, |lhs, rhs| lhs.zip_map(rhs, |p, q| p + q))
    }

    pub fn try_sub(&self, other: &PiecewisePolynomialMatrix<P>) -> Result<PiecewisePolynomialMatrix<P>, CurveError> {
        self.try_sub_with(other, &Configuration::default())
    }

    pub fn try_sub_with(
        &self,
        other: &PiecewisePolynomialMatrix<P>,
        config: &Configuration,
    ) -> Result<PiecewisePolynomialMatrix<P>, CurveError> {
        self.check_same_shape(other, "subtraction")?;
        self.combine(other, config, |lhs, rhs| lhs.zip_map(rhs, |p, q| p + q.scale(-1.0)))
    }

    pub fn try_mul(&self, other: &PiecewisePolynomialMatrix<P>) -> Result<PiecewisePolynomialMatrix<P>, CurveError> {
        self.try_mul_with(other, &Configuration::default())
    }

    pub fn try_mul_with(
        &self,
        other: &PiecewisePolynomialMatrix<P>,
        config: &Configuration,
    ) -> Result<PiecewisePolynomialMatrix<P>, CurveError> {
        if self.cols() != other.rows() {
            return Err(CurveError::ShapeMismatch {
                operation: "multiplication",
                lhs_rows: self.rows(),
                lhs_cols: self.cols(),
                rhs_rows: other.rows(),
                rhs_cols: other.cols(),
            });
        }
        self.combine(other, config, polynomial_matrix_product::<P>)
    }

    pub fn try_add_assign(
        &mut self,
        other: &PiecewisePolynomialMatrix<P>,
    ) -> Result<&mut PiecewisePolynomialMatrix<P>, CurveError> {
        *self = self.try_add(other)?;
        Ok(self)
    }

    pub fn try_sub_assign(
        &mut self,
        other: &PiecewisePolynomialMatrix<P>,
    ) -> Result<&mut PiecewisePolynomialMatrix<P>, CurveError> {
        *self = self.try_sub(other)?;
        Ok(self)
    }

    pub fn try_mul_assign(
        &mut self,
        other: &PiecewisePolynomialMatrix<P>,
    ) -> Result<&mut PiecewisePolynomialMatrix<P>, CurveError> {
        *self = self.try_mul(other)?;
        Ok(self)
    }

    pub fn scale(&self, factor: f64) -> PiecewisePolynomialMatrix<P> {
        PiecewisePolynomialMatrix {
            breakpoints: self.breakpoints.clone(),
            polynomials: self
                .polynomials
                .iter()
                .map(|m| m.map(|p| p.scale(factor)))
                .collect(),
        }
    }

    fn combine<F>(
        &self,
        other: &PiecewisePolynomialMatrix<P>,
        config: &Configuration,
        op: F,
    ) -> Result<PiecewisePolynomialMatrix<P>, CurveError>
    where
        F: Fn(&PolynomialMatrix<P>, &PolynomialMatrix<P>) -> PolynomialMatrix<P>,
    {
        let merged = merge_breakpoints(
            &self.breakpoints,
            &other.breakpoints,
            config.breakpoint_tolerance(),
        )?;
        let polynomials = merged
            .segments()
            .iter()
            .map(|segment| {
                let lhs = self.rebased_matrix(segment.lhs_segment, segment.start);
                let rhs = other.rebased_matrix(segment.rhs_segment, segment.start);
                op(&lhs, &rhs)
            })
            .collect();
        Ok(PiecewisePolynomialMatrix {
            breakpoints: merged.into_breakpoints(),
            polynomials,
        })
    }

    /// 把第 `segment_index` 段改寫成以 `new_start` 為原點的局部座標
    fn rebased_matrix(&self, segment_index: usize, new_start: f64) -> PolynomialMatrix<P> {
        let offset = new_start - self.breakpoints[segment_index];
        log::trace!("rebasing segment {} by {}", segment_index, offset);
        self.polynomials[segment_index].map(|p| p.shift(offset))
    }

    fn check_same_shape(&self, other: &PiecewisePolynomialMatrix<P>, operation: &'static str) -> Result<(), CurveError> {
        if self.rows() != other.rows() || self.cols() != other.cols() {
            Err(CurveError::ShapeMismatch {
                operation,
                lhs_rows: self.rows(),
                lhs_cols: self.cols(),
                rhs_rows: other.rows(),
                rhs_cols: other.cols(),
            })
        } else {
            Ok(())
        }
    }

    // ─────────────────────────────────────────
    // 比較與平移
    // ─────────────────────────────────────────

    pub fn is_approx(&self, other: &PiecewisePolynomialMatrix<P>, tol: f64) -> bool {
        self.polynomials.len() == other.polynomials.len()
            && self.rows() == other.rows()
            && self.cols() == other.cols()
            && self
                .breakpoints
                .iter()
                .zip(other.breakpoints.iter())
                .all(|(a, b)| (a - b).abs() <= tol)
            && self
                .polynomials
                .iter()
                .zip(other.polynomials.iter())
                .all(|(lhs, rhs)| lhs.iter().zip(rhs.iter()).all(|(p, q)| p.is_approx(q, tol)))
    }

    pub fn is_approx_with(&self, other: &PiecewisePolynomialMatrix<P>, config: &Configuration) -> bool {
        self.is_approx(other, config.approx_tolerance())
    }

    /// 所有 breakpoints 加上 `offset`，係數不變
    ///
    /// 平移後的 breakpoints 須仍為有限且嚴格遞增（offset 為 NaN/∞，或捨入使相鄰點重合時失敗），
    /// 失敗時回傳 `InvalidArgument` 且接收者不變。
    pub fn shift_right(&mut self, offset: f64) -> Result<(), CurveError> {
        let shifted: Vec<f64> = self.breakpoints.iter().map(|t| t + offset).collect();
        validate_breakpoints(&shifted)?;
        self.breakpoints = shifted;
        Ok(())
    }

    // ─────────────────────────────────────────
    // 存取
    // ─────────────────────────────────────────

    pub fn polynomial_matrix(&self, segment_index: usize) -> Result<&PolynomialMatrix<P>, CurveError> {
        self.check_segment_index(segment_index)?;
        Ok(&self.polynomials[segment_index])
    }

    pub fn polynomial(&self, segment_index: usize, row: usize, col: usize) -> Result<&P, CurveError> {
        self.check_segment_index(segment_index)?;
        self.check_entry_index(row, col)?;
        Ok(&self.polynomials[segment_index][(row, col)])
    }

    pub fn segment_polynomial_degree(&self, segment_index: usize, row: usize, col: usize) -> Result<usize, CurveError> {
        self.polynomial(segment_index, row, col).map(|p| p.degree())
    }

    fn check_entry_index(&self, row: usize, col: usize) -> Result<(), CurveError> {
        if row >= self.rows() {
            return Err(CurveError::row_out_of_range(row, self.rows()));
        }
        if col >= self.cols() {
            return Err(CurveError::col_out_of_range(col, self.cols()));
        }
        Ok(())
    }
}

fn polynomial_matrix_product<P: UnivariatePolynomial>(
    lhs: &PolynomialMatrix<P>,
    rhs: &PolynomialMatrix<P>,
) -> PolynomialMatrix<P> {
    DMatrix::from_fn(lhs.nrows(), rhs.ncols(), |row, col| {
        (0..lhs.ncols()).fold(P::zero(), |acc, k| {
            acc + lhs[(row, k)].clone() * rhs[(k, col)].clone()
        })
    })
}

impl<P: UnivariatePolynomial> PiecewiseFunction for PiecewisePolynomialMatrix<P> {
    fn breakpoints(&self) -> &[f64] {
        &self.breakpoints
    }
}

impl<P: UnivariatePolynomial> MatrixCurve for PiecewisePolynomialMatrix<P> {
    fn rows(&self) -> usize {
        PiecewisePolynomialMatrix::rows(self)
    }

    fn cols(&self) -> usize {
        PiecewisePolynomialMatrix::cols(self)
    }

    fn value(&self, t: f64) -> DMatrix<f64> {
        PiecewisePolynomialMatrix::value(self, t)
    }
}
