use std::fmt;
use std::fmt::Debug;
use std::ops::{
    Add,
    Mul
};

// ─────────────────────────────────────────────
// UnivariatePolynomial
// ─────────────────────────────────────────────
//
// 分段矩陣只依賴這組能力，不綁定具體的多項式型別：
//   求值、k 階導數、給定常數的反導數、加法、乘法、實數縮放、
//   座標平移 q(s) = p(s + offset)、係數與次數查詢。

pub trait UnivariatePolynomial:
    Clone + PartialEq + Debug + Add<Output = Self> + Mul<Output = Self> + 'static
{
    fn zero() -> Self;

    fn constant(value: f64) -> Self;

    fn value(&self, x: f64) -> f64;

    /// `order` 階導數；次數不足時回傳零多項式
    fn derivative(&self, order: usize) -> Self;

    /// 反導數，常數項為 `constant`（即 s = 0 處的值）
    fn integral(&self, constant: f64) -> Self;

    /// q(s) = p(s + offset)
    fn shift(&self, offset: f64) -> Self;

    fn scale(&self, factor: f64) -> Self;

    /// 最高非零係數的次方；零多項式為 0
    fn degree(&self) -> usize;

    /// s^power 的係數，超出次數時為 0
    fn coefficient(&self, power: usize) -> f64;

    fn is_approx(&self, other: &Self, tol: f64) -> bool {
        let max_degree = self.degree().max(other.degree());
        (0..=max_degree).all(|k| (self.coefficient(k) - other.coefficient(k)).abs() <= tol)
    }
}

// ─────────────────────────────────────────────
// Polynomial
// ─────────────────────────────────────────────
//
// 係數以升冪儲存 [a_0, a_1, ..., a_n]，代表 Σ a_k·s^k。
// 尾端的 0 會被移除，但至少保留一個係數。

#[derive(Clone, PartialEq, Debug)]
pub struct Polynomial {
    coefs: Vec<f64>,
}

impl Polynomial {
    pub fn new(coefs: Vec<f64>) -> Polynomial {
        let mut polynomial = Polynomial { coefs };
        polynomial.trim();
        polynomial
    }

    /// coef·s^degree
    pub fn monomial(degree: usize, coef: f64) -> Polynomial {
        let mut coefs = vec![0.0; degree + 1];
        coefs[degree] = coef;
        Polynomial::new(coefs)
    }

    pub fn coefs(&self) -> &[f64] {
        &self.coefs
    }

    fn trim(&mut self) {
        while self.coefs.len() > 1 && self.coefs[self.coefs.len() - 1] == 0.0 {
            self.coefs.pop();
        }
        if self.coefs.is_empty() {
            self.coefs.push(0.0);
        }
    }
}

impl UnivariatePolynomial for Polynomial {
    fn zero() -> Polynomial {
        Polynomial { coefs: vec![0.0] }
    }

    fn constant(value: f64) -> Polynomial {
        Polynomial::new(vec![value])
    }

    fn value(&self, x: f64) -> f64 {
        self.coefs
            .iter()
            .rev()
            .fold(0.0, |acc, &beta| f64::mul_add(acc, x, beta))
    }

    fn derivative(&self, order: usize) -> Polynomial {
        if order == 0 {
            return self.clone();
        }
        if order >= self.coefs.len() {
            return Polynomial::zero();
        }
        let coefs = (order..self.coefs.len())
            .map(|k| {
                let falling: f64 = ((k - order + 1)..=k).map(|m| m as f64).product();
                falling * self.coefs[k]
            })
            .collect();
        Polynomial::new(coefs)
    }

    fn integral(&self, constant: f64) -> Polynomial {
        let mut coefs = Vec::with_capacity(self.coefs.len() + 1);
        coefs.push(constant);
        coefs.extend(
            self.coefs
                .iter()
                .enumerate()
                .map(|(k, &a)| a / (k + 1) as f64),
        );
        Polynomial::new(coefs)
    }

    fn shift(&self, offset: f64) -> Polynomial {
        if offset == 0.0 {
            return self.clone();
        }
        // Taylor shift：重複的 synthetic division
        let mut coefs = self.coefs.clone();
        let n = coefs.len();
        for i in 0..n {
            for j in (i..(n - 1)).rev() {
                coefs[j] = f64::mul_add(offset, coefs[j + 1], coefs[j]);
            }
        }
        Polynomial::new(coefs)
    }

    fn scale(&self, factor: f64) -> Polynomial {
        Polynomial::new(self.coefs.iter().map(|a| a * factor).collect())
    }

    fn degree(&self) -> usize {
        self.coefs.len() - 1
    }

    fn coefficient(&self, power: usize) -> f64 {
        self.coefs.get(power).copied().unwrap_or(0.0)
    }
}

impl Add for Polynomial {
    type Output = Polynomial;

    fn add(self, rhs: Polynomial) -> Polynomial {
        let (mut longer, shorter) = if self.coefs.len() >= rhs.coefs.len() {
            (self.coefs, rhs.coefs)
        } else {
            (rhs.coefs, self.coefs)
        };
        for (a, b) in longer.iter_mut().zip(shorter.iter()) {
            *a += b;
        }
        Polynomial::new(longer)
    }
}

impl Mul for Polynomial {
    type Output = Polynomial;

    fn mul(self, rhs: Polynomial) -> Polynomial {
        let mut coefs = vec![0.0; self.coefs.len() + rhs.coefs.len() - 1];
        for (i, &a) in self.coefs.iter().enumerate() {
            if a == 0.0 {
                continue;
            }
            for (j, &b) in rhs.coefs.iter().enumerate() {
                coefs[i + j] = f64::mul_add(a, b, coefs[i + j]);
            }
        }
        Polynomial::new(coefs)
    }
}

impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let terms: Vec<String> = self
            .coefs
            .iter()
            .enumerate()
            .filter(|(_, a)| **a != 0.0)
            .map(|(k, a)| match k {
                0 => format!("{}", a),
                1 => format!("{}*x", a),
                _ => format!("{}*x^{}", a, k),
            })
            .collect();
        if terms.is_empty() {
            write!(f, "0")
        } else {
            write!(f, "{}", terms.join(" + "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn trailing_zeros_are_trimmed() {
        let p = Polynomial::new(vec![1.0, 2.0, 0.0, 0.0]);
        assert_eq!(p.coefs(), &[1.0, 2.0]);
        assert_eq!(p.degree(), 1);
        assert_eq!(Polynomial::new(vec![]).coefs(), &[0.0]);
        assert_eq!(Polynomial::zero().degree(), 0);
    }

    #[test]
    fn horner_value() {
        // 1 + 2s + 3s^2
        let p = Polynomial::new(vec![1.0, 2.0, 3.0]);
        assert_relative_eq!(p.value(0.0), 1.0);
        assert_relative_eq!(p.value(2.0), 17.0, epsilon = 1e-12);
        assert_relative_eq!(p.value(-1.0), 2.0, epsilon = 1e-12);
    }

    #[test]
    fn derivative_of_cubic() {
        let p = Polynomial::new(vec![1.0, 1.0, 1.0, 1.0]);
        assert_eq!(p.derivative(1).coefs(), &[1.0, 2.0, 3.0]);
        assert_eq!(p.derivative(2).coefs(), &[2.0, 6.0]);
        assert_eq!(p.derivative(3).coefs(), &[6.0]);
        assert_eq!(p.derivative(4), Polynomial::zero());
        assert_eq!(Polynomial::constant(5.0).derivative(1), Polynomial::zero());
    }

    #[test]
    fn integral_sets_constant_term() {
        let p = Polynomial::new(vec![2.0, 6.0]);
        let q = p.integral(3.0);
        assert_eq!(q.coefs(), &[3.0, 2.0, 3.0]);
        assert_eq!(q.derivative(1), p);
    }

    #[test]
    fn shift_matches_evaluation() {
        let p = Polynomial::new(vec![0.5, -1.0, 2.0, 0.25]);
        let q = p.shift(1.5);
        for &s in &[-2.0, 0.0, 0.3, 1.0, 4.0] {
            assert_relative_eq!(q.value(s), p.value(s + 1.5), epsilon = 1e-10);
        }
        assert_eq!(Polynomial::monomial(2, 1.0).shift(1.0).coefs(), &[1.0, 2.0, 1.0]);
    }

    #[test]
    fn add_and_mul() {
        let p = Polynomial::new(vec![1.0, 1.0]);
        let q = Polynomial::new(vec![-1.0, 1.0]);
        assert_eq!((p.clone() + q.clone()).coefs(), &[0.0, 2.0]);
        assert_eq!((p * q).coefs(), &[-1.0, 0.0, 1.0]);
        let cancel = Polynomial::new(vec![1.0, 2.0]) + Polynomial::new(vec![0.0, -2.0]);
        assert_eq!(cancel.degree(), 0);
    }

    #[test]
    fn approx_compares_missing_coefficients_as_zero() {
        let p = Polynomial::new(vec![1.0, 2.0]);
        let q = Polynomial::new(vec![1.0, 2.0, 1e-12]);
        assert!(p.is_approx(&q, 1e-9));
        assert!(!p.is_approx(&q, 1e-13));
    }

    #[test]
    fn display() {
        assert_eq!(Polynomial::new(vec![1.0, 0.0, 2.0]).to_string(), "1 + 2*x^2");
        assert_eq!(Polynomial::zero().to_string(), "0");
    }
}
