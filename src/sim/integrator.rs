use std::ops::{Add, Mul};

// ---------------------------------------------------------------------------
// Classical 4th-order Runge-Kutta, input held constant over the step
// ---------------------------------------------------------------------------

/// A state that can be advanced by a scaled derivative.
pub trait Integrable: Sized {
    type Deriv: Copy + Add<Output = Self::Deriv> + Mul<f64, Output = Self::Deriv>;

    /// `self + d * dt`
    fn apply(&self, d: &Self::Deriv, dt: f64) -> Self;
}

impl Integrable for f64 {
    type Deriv = f64;

    fn apply(&self, d: &f64, dt: f64) -> f64 {
        self + d * dt
    }
}

/// Single RK4 step of `x' = f(t, x, u)` from `(tk, xk)` with `uk` held over
/// the whole step (zero-order hold).
pub fn rk4_step<X, U, F>(f: F, tk: f64, h: f64, xk: &X, uk: &U) -> X
where
    X: Integrable,
    F: Fn(f64, &X, &U) -> X::Deriv,
{
    let k1 = f(tk, xk, uk);
    let k2 = f(tk + h * 0.5, &xk.apply(&k1, h * 0.5), uk);
    let k3 = f(tk + h * 0.5, &xk.apply(&k2, h * 0.5), uk);
    let k4 = f(tk + h, &xk.apply(&k3, h), uk);

    xk.apply(&(k1 + k2 * 2.0 + k3 * 2.0 + k4), h / 6.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
