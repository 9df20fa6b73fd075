use approx::assert_abs_diff_eq;
use headpose_pnp::{
    matrix_to_rodrigues, project_points, solve_pnp, CameraIntrinsics, IterativeParams, PnPError,
    PnPMethod, PoseGuess,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_object(rng: &mut StdRng, n: usize) -> Vec<[f64; 3]> {
    (0..n)
        .map(|_| {
            [
                rng.random_range(-80.0..80.0),
                rng.random_range(-80.0..80.0),
                rng.random_range(-60.0..60.0),
            ]
        })
        .collect()
}

#[test]
fn recovers_random_poses_near_the_seed() -> Result<(), PnPError> {
    let mut rng = StdRng::seed_from_u64(7);
    let intrinsics = CameraIntrinsics::pinhole(900.0, 320.0, 240.0);
    let k = intrinsics.to_matrix();

    for _ in 0..10 {
        let world = random_object(&mut rng, 8);
        let rvec_gt = [
            rng.random_range(-0.4..0.4),
            rng.random_range(-0.4..0.4),
            rng.random_range(-0.4..0.4),
        ];
        let t_gt = [
            rng.random_range(-100.0..100.0),
            rng.random_range(-100.0..100.0),
            rng.random_range(600.0..1400.0),
        ];
        let image = project_points(&world, &rvec_gt, &t_gt, &intrinsics);

        let params = IterativeParams {
            guess: PoseGuess {
                rvec: [0.0; 3],
                tvec: [0.0, 0.0, 1000.0],
            },
            ..Default::default()
        };
        let res = solve_pnp(&world, &image, &k, PnPMethod::Iterative(params))?;

        let rvec = matrix_to_rodrigues(&res.rotation);
        for i in 0..3 {
            assert_abs_diff_eq!(rvec[i], rvec_gt[i], epsilon = 1e-5);
            assert_abs_diff_eq!(res.translation[i], t_gt[i], epsilon = 1e-3);
        }
        assert!(res.reproj_rmse.unwrap_or(f64::INFINITY) < 1e-6);
    }
    Ok(())
}
