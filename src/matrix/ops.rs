use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use super::{kernel, Matrix};
use crate::error::{Error, Result};
use crate::traits::Scalar;

// ── Fallible arithmetic ─────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    fn check_same_shape(&self, rhs: &Matrix<T>) -> Result<()> {
        if self.rows != rhs.rows {
            return Err(Error::NonEqualRowsNum {
                expected: self.rows,
                got: rhs.rows,
            });
        }
        if self.cols != rhs.cols {
            return Err(Error::NonEqualColumnsNum {
                expected: self.cols,
                got: rhs.cols,
            });
        }
        Ok(())
    }

    fn zip_with<F>(&self, rhs: &Matrix<T>, op: F) -> Result<Matrix<T>>
    where
        F: Fn(T, T) -> T + Sync + Send,
    {
        self.check_same_shape(rhs)?;
        let mut out = Matrix::with_layout(self.rows, self.cols, self.layout);
        kernel::fill_positions(&mut out, |i, j| op(self.value(i, j), rhs.value(i, j)));
        Ok(out)
    }

    /// Element-wise sum. Output keeps `self`'s layout.
    ///
    /// ```
    /// use numkit::{Error, Matrix};
    /// let a = Matrix::from_rows(&[[1, 2], [3, 4]]).unwrap();
    /// let b = Matrix::filled(2, 2, 1);
    /// assert_eq!(a.try_add(&b).unwrap(), Matrix::from_rows(&[[2, 3], [4, 5]]).unwrap());
    /// assert!(matches!(
    ///     a.try_add(&Matrix::zeros(3, 2)),
    ///     Err(Error::NonEqualRowsNum { expected: 2, got: 3 })
    /// ));
    /// ```
    pub fn try_add(&self, rhs: &Matrix<T>) -> Result<Matrix<T>> {
        self.zip_with(rhs, |a, b| a + b)
    }

    /// Element-wise difference. Output keeps `self`'s layout.
    pub fn try_sub(&self, rhs: &Matrix<T>) -> Result<Matrix<T>> {
        self.zip_with(rhs, |a, b| a - b)
    }

    /// Matrix product. Requires `self.cols() == rhs.rows()`; the output
    /// keeps `self`'s layout.
    ///
    /// ```
    /// use numkit::Matrix;
    /// let a = Matrix::from_rows(&[[1.0, 2.0], [3.0, 4.0]]).unwrap();
    /// let x = Matrix::column_vector(vec![1.0, 1.0]);
    /// let y = a.try_mul(&x).unwrap();
    /// assert_eq!(y[(0, 0)], 3.0);
    /// assert_eq!(y[(1, 0)], 7.0);
    /// assert!(x.try_mul(&a).is_err());
    /// ```
    pub fn try_mul(&self, rhs: &Matrix<T>) -> Result<Matrix<T>> {
        if self.cols != rhs.rows {
            return Err(Error::IncorrectMatrix(format!(
                "cannot multiply {}x{} by {}x{}",
                self.rows, self.cols, rhs.rows, rhs.cols
            )));
        }
        let mut out = Matrix::with_layout(self.rows, rhs.cols, self.layout);
        kernel::fill_positions(&mut out, |i, j| {
            (0..self.cols).fold(T::zero(), |acc, k| acc + self.value(i, k) * rhs.value(k, j))
        });
        Ok(out)
    }

    /// Frobenius inner product `Σ a_ij * b_ij`; for column vectors this is
    /// the ordinary dot product.
    pub fn dot(&self, rhs: &Matrix<T>) -> Result<T> {
        self.check_same_shape(rhs)?;
        let mut acc = T::zero();
        for i in 0..self.rows {
            for j in 0..self.cols {
                acc = acc + self.value(i, j) * rhs.value(i, j);
            }
        }
        Ok(acc)
    }

    pub fn add_scalar(&self, k: T) -> Matrix<T> {
        self.map(|x| x + k)
    }

    pub fn sub_scalar(&self, k: T) -> Matrix<T> {
        self.map(|x| x - k)
    }

    pub fn scale(&self, k: T) -> Matrix<T> {
        self.map(|x| x * k)
    }
}

fn or_panic<T>(r: Result<T>) -> T {
    match r {
        Ok(v) => v,
        Err(e) => panic!("{e}"),
    }
}

// ── Matrix ⊕ Matrix ─────────────────────────────────────────────────

macro_rules! impl_binop {
    ($Op:ident, $method:ident, $try:ident) => {
        impl<T: Scalar> $Op<&Matrix<T>> for &Matrix<T> {
            type Output = Matrix<T>;
            fn $method(self, rhs: &Matrix<T>) -> Matrix<T> {
                or_panic(self.$try(rhs))
            }
        }

        impl<T: Scalar> $Op<Matrix<T>> for Matrix<T> {
            type Output = Matrix<T>;
            fn $method(self, rhs: Matrix<T>) -> Matrix<T> {
                or_panic(self.$try(&rhs))
            }
        }

        impl<T: Scalar> $Op<&Matrix<T>> for Matrix<T> {
            type Output = Matrix<T>;
            fn $method(self, rhs: &Matrix<T>) -> Matrix<T> {
                or_panic(self.$try(rhs))
            }
        }

        impl<T: Scalar> $Op<Matrix<T>> for &Matrix<T> {
            type Output = Matrix<T>;
            fn $method(self, rhs: Matrix<T>) -> Matrix<T> {
                or_panic(self.$try(&rhs))
            }
        }
    };
}

impl_binop!(Add, add, try_add);
impl_binop!(Sub, sub, try_sub);
impl_binop!(Mul, mul, try_mul);

// ── Matrix ⊕ scalar ─────────────────────────────────────────────────

macro_rules! impl_scalar_op {
    ($Op:ident, $method:ident, $with:ident) => {
        impl<T: Scalar> $Op<T> for &Matrix<T> {
            type Output = Matrix<T>;
            fn $method(self, k: T) -> Matrix<T> {
                self.$with(k)
            }
        }

        impl<T: Scalar> $Op<T> for Matrix<T> {
            type Output = Matrix<T>;
            fn $method(mut self, k: T) -> Matrix<T> {
                self.apply(|x| x.$method(k));
                self
            }
        }
    };
}

impl_scalar_op!(Add, add, add_scalar);
impl_scalar_op!(Sub, sub, sub_scalar);
impl_scalar_op!(Mul, mul, scale);

// Scalar on the left. `k - M` is element-wise `k - m_ij`.
macro_rules! impl_left_scalar {
    ($($t:ty),*) => {
        $(
            impl Add<Matrix<$t>> for $t {
                type Output = Matrix<$t>;
                fn add(self, m: Matrix<$t>) -> Matrix<$t> {
                    m + self
                }
            }

            impl Add<&Matrix<$t>> for $t {
                type Output = Matrix<$t>;
                fn add(self, m: &Matrix<$t>) -> Matrix<$t> {
                    m + self
                }
            }

            impl Sub<Matrix<$t>> for $t {
                type Output = Matrix<$t>;
                fn sub(self, mut m: Matrix<$t>) -> Matrix<$t> {
                    m.apply(|x| self - x);
                    m
                }
            }

            impl Sub<&Matrix<$t>> for $t {
                type Output = Matrix<$t>;
                fn sub(self, m: &Matrix<$t>) -> Matrix<$t> {
                    m.map(|x| self - x)
                }
            }

            impl Mul<Matrix<$t>> for $t {
                type Output = Matrix<$t>;
                fn mul(self, m: Matrix<$t>) -> Matrix<$t> {
                    m * self
                }
            }

            impl Mul<&Matrix<$t>> for $t {
                type Output = Matrix<$t>;
                fn mul(self, m: &Matrix<$t>) -> Matrix<$t> {
                    m * self
                }
            }
        )*
    };
}

impl_left_scalar!(f32, f64, i32, i64);

impl<T: Scalar + Neg<Output = T>> Neg for Matrix<T> {
    type Output = Matrix<T>;
    fn neg(mut self) -> Matrix<T> {
        self.apply(|x| -x);
        self
    }
}

impl<T: Scalar + Neg<Output = T>> Neg for &Matrix<T> {
    type Output = Matrix<T>;
    fn neg(self) -> Matrix<T> {
        self.map(|x| -x)
    }
}

// ── Assign ops ──────────────────────────────────────────────────────

impl<T: Scalar> Matrix<T> {
    fn zip_assign<F>(&mut self, rhs: &Matrix<T>, op: F)
    where
        F: Fn(T, T) -> T,
    {
        or_panic(self.check_same_shape(rhs));
        for pos in 0..self.data.len() {
            let (i, j) = self.layout.coords(pos, self.rows, self.cols);
            self.data[pos] = op(self.data[pos], rhs.value(i, j));
        }
    }
}

impl<T: Scalar> AddAssign<&Matrix<T>> for Matrix<T> {
    fn add_assign(&mut self, rhs: &Matrix<T>) {
        self.zip_assign(rhs, |a, b| a + b);
    }
}

impl<T: Scalar> AddAssign<Matrix<T>> for Matrix<T> {
    fn add_assign(&mut self, rhs: Matrix<T>) {
        *self += &rhs;
    }
}

impl<T: Scalar> SubAssign<&Matrix<T>> for Matrix<T> {
    fn sub_assign(&mut self, rhs: &Matrix<T>) {
        self.zip_assign(rhs, |a, b| a - b);
    }
}

impl<T: Scalar> SubAssign<Matrix<T>> for Matrix<T> {
    fn sub_assign(&mut self, rhs: Matrix<T>) {
        *self -= &rhs;
    }
}

impl<T: Scalar> MulAssign<&Matrix<T>> for Matrix<T> {
    fn mul_assign(&mut self, rhs: &Matrix<T>) {
        *self = or_panic(self.try_mul(rhs));
    }
}

impl<T: Scalar> MulAssign<Matrix<T>> for Matrix<T> {
    fn mul_assign(&mut self, rhs: Matrix<T>) {
        *self *= &rhs;
    }
}

impl<T: Scalar> AddAssign<T> for Matrix<T> {
    fn add_assign(&mut self, k: T) {
        self.apply(|x| x + k);
    }
}

impl<T: Scalar> SubAssign<T> for Matrix<T> {
    fn sub_assign(&mut self, k: T) {
        self.apply(|x| x - k);
    }
}

impl<T: Scalar> MulAssign<T> for Matrix<T> {
    fn mul_assign(&mut self, k: T) {
        self.apply(|x| x * k);
    }
}
