use nalgebra::DMatrix;

/// 以時間為參數、值為 rows×cols 矩陣的曲線
pub trait MatrixCurve {
    fn rows(&self) -> usize;

    fn cols(&self) -> usize;

    fn value(&self, t: f64) -> DMatrix<f64>;
}
