use std::error::Error;

use nalgebra::DMatrix;

use polytraj::configuration::Configuration;
use polytraj::math::curve::piecewisefunction::piecewisefunction::PiecewiseFunction;
use polytraj::math::curve::piecewisefunction::piecewisepolynomialmatrix::PiecewisePolynomialMatrix;
use polytraj::math::polynomial::polynomial::{
    Polynomial,
    UnivariatePolynomial
};

fn main() -> Result<(), Box<dyn Error>> {
    let config = match std::env::args().nth(1) {
        Some(config_path) => Configuration::from_reader(&config_path)?,
        None => Configuration::default()
    };

    // 加速度：先等加速 1 秒，再等速 1 秒，最後減速 1 秒
    let acceleration: PiecewisePolynomialMatrix = PiecewisePolynomialMatrix::from_scalars(
        vec![
            Polynomial::constant(1.0),
            Polynomial::zero(),
            Polynomial::constant(-1.0)
        ],
        vec![0.0, 1.0, 2.0, 3.0]
    )?;
    let velocity = acceleration.integral(0.0);
    let position = velocity.integral(0.0);

    // 疊加一段以不同 breakpoints 表示的偏移
    let offset = PiecewisePolynomialMatrix::from_scalars(
        vec![Polynomial::new(vec![0.0, 0.1]), Polynomial::constant(0.15)],
        vec![0.0, 1.5, 3.0]
    )?;
    let shifted = position.try_add_with(&offset, &config)?;

    println!("breakpoints: {:?}", shifted.breakpoints());
    for i in 0..=12 {
        let t = 0.25 * i as f64;
        println!("{:.2}, {:.6}, {:.6}, {:.6}",
                 t,
                 acceleration.scalar_value(t, 0, 0)?,
                 velocity.scalar_value(t, 0, 0)?,
                 shifted.scalar_value(t, 0, 0)?);
    }

    let gain = PiecewisePolynomialMatrix::constant(
        &DMatrix::from_row_slice(2, 1, &[1.0, -0.5]),
        vec![0.0, 3.0]
    )?;
    let projected = gain.try_mul_with(&position, &config)?;
    println!("projected at end: {}", projected.value(position.end_time()));
    Ok(())
}
