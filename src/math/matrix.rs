use rand::Rng;
use std::f64::consts::PI;
use std::ops::{Add, Mul, Sub};

/// Dense row-major matrix. A single sample travels through the network as a
/// `1 × n` row.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub rows: usize,
    pub cols: usize,
    pub data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![0.0; cols]; rows],
        }
    }

    /// Wraps a single vector as a `1 × len` row.
    pub fn row(values: &[f64]) -> Matrix {
        Matrix {
            rows: 1,
            cols: values.len(),
            data: vec![values.to_vec()],
        }
    }

    /// Samples every entry uniformly from `[-bound, bound]`.
    pub fn uniform<R: Rng + ?Sized>(rows: usize, cols: usize, bound: f64, rng: &mut R) -> Matrix {
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for x in row.iter_mut() {
                *x = rng.gen_range(-bound..=bound);
            }
        }
        res
    }

    /// Samples a single value from N(0, 1) using the Box-Muller transform.
    fn sample_standard_normal<R: Rng + ?Sized>(rng: &mut R) -> f64 {
        // (0, 1] keeps ln() finite.
        let u1: f64 = 1.0 - rng.gen::<f64>();
        let u2: f64 = 1.0 - rng.gen::<f64>();
        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Xavier (Glorot) initialization: N(0, sqrt(1 / rows)).
    ///
    /// Shape: (rows, cols). `rows` is the fan-in, matching the
    /// `inputs × outputs` weight layout used by dense layers.
    pub fn xavier<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let std_dev = (1.0 / rows as f64).sqrt();
        let mut res = Matrix::zeros(rows, cols);
        for row in res.data.iter_mut() {
            for x in row.iter_mut() {
                *x = Matrix::sample_standard_normal(rng) * std_dev;
            }
        }
        res
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self
                .data
                .iter()
                .map(|row| row.iter().map(|&x| functor(x)).collect())
                .collect(),
        }
    }

    /// Element-wise (Hadamard) product of two same-shape matrices.
    pub fn hadamard(&self, other: &Matrix) -> Matrix {
        assert_eq!((self.rows, self.cols), (other.rows, other.cols), "hadamard: shape mismatch");
        let data = self.data.iter().zip(other.data.iter())
            .map(|(row_a, row_b)| row_a.iter().zip(row_b.iter()).map(|(x, y)| x * y).collect())
            .collect();
        Matrix { rows: self.rows, cols: self.cols, data }
    }

    /// `self += other * scale`, in place.
    pub fn add_scaled(&mut self, other: &Matrix, scale: f64) {
        assert_eq!((self.rows, self.cols), (other.rows, other.cols), "add_scaled: shape mismatch");
        for (row, other_row) in self.data.iter_mut().zip(other.data.iter()) {
            for (x, y) in row.iter_mut().zip(other_row.iter()) {
                *x += y * scale;
            }
        }
    }

    /// Copies the first row out as a plain vector.
    pub fn first_row(&self) -> Vec<f64> {
        self.data.first().cloned().unwrap_or_default()
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}

impl Add for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Matrix {
        assert_eq!((self.rows, self.cols), (rhs.rows, rhs.cols), "add: shape mismatch");
        let mut res = self.clone();
        res.add_scaled(rhs, 1.0);
        res
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Matrix {
        assert_eq!((self.rows, self.cols), (rhs.rows, rhs.cols), "sub: shape mismatch");
        let mut res = self.clone();
        res.add_scaled(rhs, -1.0);
        res
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Matrix {
        assert_eq!(self.cols, rhs.rows, "mul: inner dimensions differ");

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        res
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn row_times_matrix() {
        let x = Matrix::row(&[1.0, 2.0]);
        let w = Matrix { rows: 2, cols: 3, data: vec![vec![1.0, 0.0, -1.0], vec![0.5, 2.0, 1.0]] };
        let y = &x * &w;
        assert_eq!((y.rows, y.cols), (1, 3));
        assert_eq!(y.first_row(), vec![2.0, 4.0, 1.0]);
    }

    #[test]
    fn transpose_swaps_shape() {
        let m = Matrix { rows: 2, cols: 3, data: vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]] };
        let t = m.transpose();
        assert_eq!((t.rows, t.cols), (3, 2));
        assert_eq!(t.data[2], vec![3.0, 6.0]);
        assert_eq!(t.transpose(), m);
    }

    #[test]
    fn uniform_respects_bound_and_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        let m1 = Matrix::uniform(4, 5, 0.25, &mut a);
        let m2 = Matrix::uniform(4, 5, 0.25, &mut b);
        assert_eq!(m1, m2);
        assert!(m1.data.iter().flatten().all(|x| x.abs() <= 0.25));
    }

    #[test]
    fn hadamard_and_add_scaled() {
        let a = Matrix::row(&[1.0, -2.0, 3.0]);
        let b = Matrix::row(&[2.0, 0.5, -1.0]);
        assert_eq!(a.hadamard(&b).first_row(), vec![2.0, -1.0, -3.0]);

        let mut c = a.clone();
        c.add_scaled(&b, -2.0);
        assert_eq!(c.first_row(), vec![-3.0, -3.0, 5.0]);
        assert_eq!((&a - &b).first_row(), vec![-1.0, -2.5, 4.0]);
    }

    #[test]
    #[should_panic(expected = "inner dimensions")]
    fn mul_rejects_incompatible_shapes() {
        let _ = &Matrix::zeros(1, 2) * &Matrix::zeros(3, 1);
    }
}
