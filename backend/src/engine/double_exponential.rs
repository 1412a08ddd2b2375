//! Level loop shared by the double-exponential rules
//!
//! A rule is a ladder of nodes `t = k h` mapped to an abscissa and weight.
//! Level 0 uses `h = 1` and walks each side outward until the first node
//! that degenerates (abscissa rounds onto an endpoint or leaves the
//! representable range, or the weight vanishes). That node bounds the side
//! for all later levels; finer nodes below it are still visited and only
//! the individual degenerate ones are skipped. Level `l` halves `h` and only
//! evaluates the new odd nodes, so `I_l = I_{l-1} / 2 + h * sum(new terms)`.

use num_complex::Complex64;
use tracing::{trace, warn};

use super::{Estimate, Integrand, MIN_LEVELS};

/// Largest `|t|` visited at level 0
const T_MAX: usize = 6;

/// Evaluation point and weight (Jacobian included) for one node
#[derive(Debug, Clone, Copy)]
pub(crate) struct Node {
    pub x: f64,
    pub weight: f64,
}

pub(crate) trait Ladder {
    const NAME: &'static str;

    /// `None` once the node can no longer be represented
    fn node(&self, t: f64) -> Option<Node>;
}

#[derive(Default)]
struct LevelSum {
    sum: Complex64,
    abs_sum: f64,
}

impl LevelSum {
    fn add<F>(&mut self, f: &mut F, node: Node) -> Result<Option<Complex64>, F::Error>
    where
        F: Integrand + ?Sized,
    {
        let y = f.evaluate(node.x)?;
        let term = y * node.weight;
        // Non-finite terms contribute nothing
        if !term.is_finite() {
            return Ok(None);
        }
        self.sum += term;
        self.abs_sum += y.norm() * node.weight;
        Ok(Some(term))
    }
}

pub(crate) fn integrate<F, L>(
    f: &mut F,
    ladder: &L,
    max_levels: usize,
    tolerance: f64,
) -> Result<Estimate, F::Error>
where
    F: Integrand + ?Sized,
    L: Ladder,
{
    let mut level_sum = LevelSum::default();
    // Even-k subset: the same rule at h = 2, used for the level-0 error
    let mut coarse = Complex64::new(0.0, 0.0);

    if let Some(node) = ladder.node(0.0) {
        if let Some(term) = level_sum.add(f, node)? {
            coarse += term;
        }
    }

    // Bound on |t| for the negative and positive sides
    let mut limits = [T_MAX; 2];
    for (side, sign) in [(0, -1.0), (1, 1.0)] {
        for k in 1..=T_MAX {
            let Some(node) = ladder.node(sign * k as f64) else {
                // The slice between k - 1 and k can still carry weight
                limits[side] = k;
                break;
            };
            if let Some(term) = level_sum.add(f, node)? {
                if k % 2 == 0 {
                    coarse += term;
                }
            }
        }
    }

    let mut h = 1.0;
    let mut value = level_sum.sum;
    let mut l1 = level_sum.abs_sum;
    let mut error = (value - coarse * 2.0).norm();
    let mut level = 0;

    trace!(rule = L::NAME, level, ?value, error, ?limits, "level complete");

    while level < max_levels && (level + 1 < MIN_LEVELS || error > tolerance * l1) {
        level += 1;
        h *= 0.5;

        let mut fresh = LevelSum::default();
        for (side, sign) in [(0, -1.0), (1, 1.0)] {
            let limit = limits[side] as f64;
            let mut j = 1usize;
            while (j as f64) * h < limit {
                if let Some(node) = ladder.node(sign * j as f64 * h) {
                    fresh.add(f, node)?;
                }
                j += 2;
            }
        }

        let previous = value;
        value = previous * 0.5 + fresh.sum * h;
        l1 = l1 * 0.5 + fresh.abs_sum * h;
        error = (value - previous).norm();

        trace!(rule = L::NAME, level, ?value, error, "level complete");
    }

    if error > tolerance * l1 {
        warn!(
            rule = L::NAME,
            levels = level,
            error,
            l1_norm = l1,
            "refinement stopped before meeting tolerance"
        );
    }

    Ok(Estimate {
        value,
        error,
        l1_norm: l1,
        levels: Some(level),
    })
}
