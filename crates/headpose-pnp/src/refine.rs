//! Levenberg–Marquardt pose refinement for PnP solutions.

use glam::DVec3;
use nalgebra::{Matrix6, Vector6};

use crate::ops::{intrinsics_as_vectors, project_camera_point, to_camera};
use crate::pnp::PnPError;
use crate::rotation::exp_so3;

/// Parameters controlling the LM pose refinement.
#[derive(Debug, Clone, PartialEq)]
pub struct LMParams {
    /// Maximum number of LM iterations.
    pub max_iters: usize,
    /// Convergence threshold on the relative decrease of the squared reprojection error.
    pub cost_tolerance: f64,
    /// Convergence threshold on the step norm, relative to the parameter norm.
    pub step_tolerance: f64,
    /// Initial damping factor (lambda).
    pub lambda_init: f64,
    /// Multiplicative factor to increase/decrease lambda.
    pub lambda_mul: f64,
}

impl Default for LMParams {
    fn default() -> Self {
        Self {
            max_iters: 50,
            cost_tolerance: 1e-10,
            step_tolerance: 1e-10,
            lambda_init: 1e-3,
            lambda_mul: 10.0,
        }
    }
}

/// Summary of an LM run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LMSummary {
    /// Root-mean-square reprojection error in pixels after refinement.
    pub rmse: f64,
    /// Number of iterations performed.
    pub iterations: usize,
    /// Whether a convergence criterion was met. False when the iteration cap
    /// was reached or no damping level produced a cost decrease.
    pub converged: bool,
}

const LAMBDA_MIN: f64 = 1e-12;
const LAMBDA_MAX: f64 = 1e12;
const H_ROT: f64 = 1e-6; // radians
const H_TRANS_REL: f64 = 1e-6;
const DAMPING_FLOOR: f64 = 1e-9;

/// Refine a pose (rvec, t) with Levenberg–Marquardt to minimize pixel reprojection error.
///
/// - `points_world`: World points (N,3)
/// - `points_image`: Pixel points (N,2)
/// - `k`: Intrinsics 3x3
/// - `rvec`: Initial axis-angle rotation (input/output)
/// - `t`: Initial translation (input/output)
///
/// The damping is scaled by the diagonal of `J^T J`, so rotation (radians) and
/// translation (world units) are weighted by their own curvature.
///
/// Returns an [`LMSummary`] and writes the refined `rvec` and `t` in place.
pub fn refine_pose_lm(
    points_world: &[[f64; 3]],
    points_image: &[[f64; 2]],
    k: &[[f64; 3]; 3],
    rvec: &mut [f64; 3],
    t: &mut [f64; 3],
    params: &LMParams,
) -> Result<LMSummary, PnPError> {
    if points_world.len() != points_image.len() {
        return Err(PnPError::MismatchedArrayLengths {
            left_name: "world points",
            left_len: points_world.len(),
            right_name: "image points",
            right_len: points_image.len(),
        });
    }

    let n = points_world.len();
    if n < 3 {
        return Err(PnPError::InsufficientCorrespondences {
            required: 3,
            actual: n,
        });
    }

    // Parameters vector x = [rx, ry, rz, tx, ty, tz]
    let mut x = [rvec[0], rvec[1], rvec[2], t[0], t[1], t[2]];

    let (intr_x, intr_y) = intrinsics_as_vectors(k);

    let mut residuals = vec![0.0f64; 2 * n];
    let mut residuals_p = vec![0.0f64; 2 * n];
    let mut residuals_m = vec![0.0f64; 2 * n];

    // Writes residuals in place and returns the squared error; points on the
    // camera plane make the cost infinite so such steps are rejected.
    let project_all_in_place = |x: &[f64; 6], out: &mut [f64]| -> f64 {
        let r_mat = exp_so3(DVec3::new(x[0], x[1], x[2]));
        let t_vec = DVec3::new(x[3], x[4], x[5]);

        let mut sum_sq = 0.0f64;
        for (i, (pw, uv)) in points_world.iter().zip(points_image.iter()).enumerate() {
            let pc = to_camera(pw, &r_mat, &t_vec);
            match project_camera_point(pc, &intr_x, &intr_y) {
                Some([u_hat, v_hat]) => {
                    let du = u_hat - uv[0];
                    let dv = v_hat - uv[1];
                    out[2 * i] = du;
                    out[2 * i + 1] = dv;
                    sum_sq += du.mul_add(du, dv * dv);
                }
                None => {
                    out[2 * i] = f64::INFINITY;
                    out[2 * i + 1] = f64::INFINITY;
                    sum_sq = f64::INFINITY;
                }
            }
        }
        sum_sq
    };

    let mut err_sq_base = project_all_in_place(&x, &mut residuals);
    if !err_sq_base.is_finite() {
        return Err(PnPError::NonFinite);
    }

    let mut lambda = params.lambda_init;
    let mut iters = 0usize;
    let mut converged = false;
    let mut stalled = false;

    let mut j = vec![0.0f64; 2 * n * 6];

    while iters < params.max_iters {
        iters += 1;

        if err_sq_base == 0.0 {
            converged = true;
            break;
        }

        let t_scale = x[3].abs().max(x[4].abs()).max(x[5].abs()).max(1.0);
        let h_trans = H_TRANS_REL * t_scale;

        // Central differences
        for k_idx in 0..6 {
            let h = if k_idx < 3 { H_ROT } else { h_trans };
            let mut x_plus = x;
            let mut x_minus = x;
            x_plus[k_idx] += h;
            x_minus[k_idx] -= h;
            let _ = project_all_in_place(&x_plus, &mut residuals_p);
            let _ = project_all_in_place(&x_minus, &mut residuals_m);
            for i in 0..(2 * n) {
                j[i * 6 + k_idx] = (residuals_p[i] - residuals_m[i]) / (2.0 * h);
            }
        }

        // Normal equations: (J^T J + lambda D) delta = -J^T r
        let mut jtj = Matrix6::<f64>::zeros();
        let mut jtr = Vector6::<f64>::zeros();
        for r_i in 0..(2 * n) {
            let r_val = residuals[r_i];
            for c in 0..6 {
                let j_ic = j[r_i * 6 + c];
                jtr[c] += j_ic * r_val;
                for d in 0..6 {
                    jtj[(c, d)] += j_ic * j[r_i * 6 + d];
                }
            }
        }
        if !jtj.iter().all(|v| v.is_finite()) {
            return Err(PnPError::NonFinite);
        }

        let x_norm = x.iter().map(|v| v * v).sum::<f64>().sqrt();

        // Inner loop: raise the damping until a step decreases the cost.
        loop {
            let mut a = jtj;
            for d in 0..6 {
                a[(d, d)] += lambda * jtj[(d, d)].max(DAMPING_FLOOR);
            }

            let Some(delta) = a.cholesky().map(|c| c.solve(&(-jtr))) else {
                lambda *= params.lambda_mul;
                if lambda > LAMBDA_MAX {
                    return Err(PnPError::SingularSystem { iterations: iters });
                }
                continue;
            };

            let step_small = delta.norm() <= params.step_tolerance * (x_norm + params.step_tolerance);

            let mut x_new = x;
            for i in 0..6 {
                x_new[i] += delta[i];
            }
            let err_sq_new = project_all_in_place(&x_new, &mut residuals_p);

            if err_sq_new < err_sq_base {
                let decrease = err_sq_base - err_sq_new;
                x = x_new;
                residuals.copy_from_slice(&residuals_p);
                err_sq_base = err_sq_new;
                lambda = (lambda / params.lambda_mul).max(LAMBDA_MIN);
                if step_small || decrease <= params.cost_tolerance * (err_sq_base + decrease) {
                    converged = true;
                }
                break;
            }

            // Already at the minimum up to numerical precision.
            if step_small {
                converged = true;
                break;
            }

            lambda *= params.lambda_mul;
            if lambda > LAMBDA_MAX {
                // no descent direction left at any damping
                stalled = true;
                break;
            }
        }

        if converged || stalled {
            break;
        }
    }

    if !x.iter().all(|v| v.is_finite()) {
        return Err(PnPError::NonFinite);
    }

    rvec.copy_from_slice(&x[0..3]);
    t.copy_from_slice(&x[3..6]);

    let rmse = (err_sq_base / n as f64).sqrt();
    Ok(LMSummary {
        rmse,
        iterations: iters,
        converged,
    })
}
