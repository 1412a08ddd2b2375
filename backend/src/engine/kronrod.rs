//! Gauss-Kronrod node and weight tables
//!
//! A (2n+1)-point Kronrod rule extends the n-point Gauss-Legendre rule with
//! the n+1 roots of the Stieltjes polynomial `E_{n+1}`, which interlace with
//! the Gauss nodes. Tables are built once per order:
//!
//! 1. Gauss-Legendre nodes by Newton iteration on `P_n`
//! 2. `E_{n+1}` in the Legendre basis from `∫ P_n E_{n+1} P_j = 0, j <= n`
//! 3. Stieltjes roots by bisection between consecutive Gauss nodes
//! 4. Kronrod weights from the even Legendre moment equations
//!
//! Only the non-negative half of each symmetric rule is stored.

use std::f64::consts::PI;

/// Non-negative half of a symmetric Gauss-Kronrod rule on `[-1, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct KronrodTable {
    gauss_points: usize,
    /// Ascending from 0
    abscissa: Vec<f64>,
    kronrod_weights: Vec<f64>,
    /// Zero where the node belongs only to the Kronrod extension
    gauss_weights: Vec<f64>,
}

impl KronrodTable {
    /// Build the (2n+1)-point rule extending the n-point Gauss rule
    pub fn compute(gauss_points: usize) -> Self {
        assert!(gauss_points > 0, "gauss_points must be positive");
        let n = gauss_points;

        let (gauss_nodes, gauss_weights) = gauss_legendre(n);
        let stieltjes = stieltjes_coefficients(n);
        let evaluate = |x: f64| stieltjes_value(&stieltjes, n, x);

        // Kronrod nodes interlace: s_0 < g_0 < s_1 < ... < g_{n-1} < s_n
        let mut merged = Vec::with_capacity(2 * n + 1);
        let mut lower = -1.0;
        for (&g, &w) in gauss_nodes.iter().zip(&gauss_weights) {
            merged.push((bisect(&evaluate, lower, g), 0.0));
            merged.push((g, w));
            lower = g;
        }
        merged.push((bisect(&evaluate, lower, 1.0), 0.0));

        let mut half: Vec<(f64, f64)> = merged.split_off(n);
        half[0].0 = 0.0;

        let abscissa: Vec<f64> = half.iter().map(|&(x, _)| x).collect();
        let gauss_weights: Vec<f64> = half.iter().map(|&(_, w)| w).collect();
        let kronrod_weights = interpolatory_weights(&abscissa);

        Self {
            gauss_points: n,
            abscissa,
            kronrod_weights,
            gauss_weights,
        }
    }

    /// Total number of Kronrod points (2n+1)
    pub fn points(&self) -> usize {
        2 * self.gauss_points + 1
    }

    pub fn gauss_points(&self) -> usize {
        self.gauss_points
    }

    pub fn abscissa(&self) -> &[f64] {
        &self.abscissa
    }

    pub fn kronrod_weights(&self) -> &[f64] {
        &self.kronrod_weights
    }

    pub fn gauss_weights(&self) -> &[f64] {
        &self.gauss_weights
    }
}

/// Legendre polynomial `P_n(x)` and its derivative
fn legendre_with_derivative(n: usize, x: f64) -> (f64, f64) {
    let mut previous = 1.0;
    let mut current = x;
    for k in 2..=n {
        let k = k as f64;
        let next = ((2.0 * k - 1.0) * x * current - (k - 1.0) * previous) / k;
        previous = current;
        current = next;
    }
    if n == 0 {
        return (1.0, 0.0);
    }
    let derivative = n as f64 * (x * current - previous) / (x * x - 1.0);
    (current, derivative)
}

/// `P_0(x) ..= P_max_degree(x)`
fn legendre_sequence(max_degree: usize, x: f64) -> Vec<f64> {
    let mut values = Vec::with_capacity(max_degree + 1);
    values.push(1.0);
    if max_degree >= 1 {
        values.push(x);
    }
    for k in 2..=max_degree {
        let kf = k as f64;
        let next = ((2.0 * kf - 1.0) * x * values[k - 1] - (kf - 1.0) * values[k - 2]) / kf;
        values.push(next);
    }
    values
}

/// Gauss-Legendre nodes (ascending) and weights
pub(crate) fn gauss_legendre(n: usize) -> (Vec<f64>, Vec<f64>) {
    let mut positive = Vec::with_capacity(n / 2 + 1);

    for i in 0..n / 2 {
        let mut x = (PI * (i as f64 + 0.75) / (n as f64 + 0.5)).cos();
        for _ in 0..100 {
            let (p, dp) = legendre_with_derivative(n, x);
            let dx = p / dp;
            x -= dx;
            if dx.abs() <= f64::EPSILON * x.abs() {
                break;
            }
        }
        let (_, dp) = legendre_with_derivative(n, x);
        positive.push((x, 2.0 / ((1.0 - x * x) * dp * dp)));
    }

    let mut nodes = Vec::with_capacity(n);
    let mut weights = Vec::with_capacity(n);
    for &(x, w) in &positive {
        nodes.push(-x);
        weights.push(w);
    }
    if n % 2 == 1 {
        let (_, dp) = legendre_with_derivative(n, 0.0);
        nodes.push(0.0);
        weights.push(2.0 / (dp * dp));
    }
    for &(x, w) in positive.iter().rev() {
        nodes.push(x);
        weights.push(w);
    }
    (nodes, weights)
}

/// Coefficients `c_k` of `E_{n+1} = P_{n+1} + sum c_k P_k`, indexed by degree
fn stieltjes_coefficients(n: usize) -> Vec<f64> {
    // E_{n+1} has the parity of n+1, and the orthogonality conditions
    // against P_n P_j are trivially met for even j
    let unknowns: Vec<usize> = (0..=n).filter(|k| (n + 1 - k) % 2 == 0).collect();
    let conditions: Vec<usize> = (0..=n).filter(|j| j % 2 == 1).collect();

    // Exact for the degree 3n+1 products below
    let (nodes, weights) = gauss_legendre((3 * n + 2) / 2 + 1);
    let tables: Vec<Vec<f64>> = nodes.iter().map(|&x| legendre_sequence(n + 1, x)).collect();
    let triple = |k: usize, j: usize| -> f64 {
        tables
            .iter()
            .zip(&weights)
            .map(|(p, &w)| w * p[n] * p[k] * p[j])
            .sum()
    };

    let matrix: Vec<Vec<f64>> = conditions
        .iter()
        .map(|&j| unknowns.iter().map(|&k| triple(k, j)).collect())
        .collect();
    let rhs: Vec<f64> = conditions.iter().map(|&j| -triple(n + 1, j)).collect();
    let solution = solve_dense(matrix, rhs);

    let mut coefficients = vec![0.0; n + 2];
    coefficients[n + 1] = 1.0;
    for (&k, c) in unknowns.iter().zip(solution) {
        coefficients[k] = c;
    }
    coefficients
}

fn stieltjes_value(coefficients: &[f64], n: usize, x: f64) -> f64 {
    legendre_sequence(n + 1, x)
        .iter()
        .zip(coefficients)
        .map(|(p, c)| p * c)
        .sum()
}

/// Root of `f` in `[lo, hi]` given a sign change
fn bisect(f: &impl Fn(f64) -> f64, mut lo: f64, mut hi: f64) -> f64 {
    let mut f_lo = f(lo);
    for _ in 0..200 {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        let f_mid = f(mid);
        if f_mid == 0.0 {
            return mid;
        }
        if (f_mid < 0.0) == (f_lo < 0.0) {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}

/// Weights of the symmetric interpolatory rule on `±abscissa`
///
/// `abscissa[0]` is the centre node 0.
fn interpolatory_weights(abscissa: &[f64]) -> Vec<f64> {
    let m = abscissa.len();
    let max_degree = 2 * (m - 1);
    let tables: Vec<Vec<f64>> = abscissa
        .iter()
        .map(|&x| legendre_sequence(max_degree, x))
        .collect();

    let matrix: Vec<Vec<f64>> = (0..m)
        .map(|row| {
            let degree = 2 * row;
            tables
                .iter()
                .enumerate()
                .map(|(i, p)| if i == 0 { p[degree] } else { 2.0 * p[degree] })
                .collect()
        })
        .collect();
    let mut rhs = vec![0.0; m];
    rhs[0] = 2.0;

    solve_dense(matrix, rhs)
}

/// Gaussian elimination with partial pivoting
fn solve_dense(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Vec<f64> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n)
            .max_by(|&i, &j| a[i][col].abs().total_cmp(&a[j][col].abs()))
            .unwrap_or(col);
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in col + 1..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let tail: f64 = (row + 1..n).map(|k| a[row][k] * x[k]).sum();
        x[row] = (b[row] - tail) / a[row][row];
    }
    x
}
