use approx::assert_abs_diff_eq;
use headpose::model::landmarks_from_projection;
use headpose::{
    CameraModel, DetectedFace, DetectorError, EstimatorConfig, FaceRegion, FacialFeature,
    FacialLandmarkSet, HeadPose, HeadPoseError, HeadPoseEstimator, LandmarkDetector,
    OpticalCenter, Point2, ReplayDetector, SolverConfig, NUM_LANDMARKS,
};
use headpose_image::{Image, ImageSize};
use headpose_pnp::{matrix_to_rodrigues, project_point, CameraIntrinsics, PnPError};

// head X forward, Y left, Z up seen by a camera with x right, y down, z forward
const FRONTAL: [[f64; 3]; 3] = [[0.0, 1.0, 0.0], [0.0, 0.0, -1.0], [-1.0, 0.0, 0.0]];

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn frame(width: usize, height: usize) -> Image<u8, 3> {
    Image::from_size_val(ImageSize { width, height }, 0).expect("valid size")
}

fn project_face(
    intrinsics: &CameraIntrinsics,
    rotation: &[[f64; 3]; 3],
    t_mm: [f64; 3],
) -> FacialLandmarkSet {
    let rvec = matrix_to_rodrigues(rotation);
    landmarks_from_projection(|p| project_point(p, &rvec, &t_mm, intrinsics))
        .expect("face is in front of the camera")
}

/// Renders the reference model of each head under a known pose.
struct ProjectingDetector {
    intrinsics: CameraIntrinsics,
    heads: Vec<([[f64; 3]; 3], [f64; 3])>,
}

impl LandmarkDetector for ProjectingDetector {
    fn detect(&mut self, _image: &Image<u8, 3>) -> Result<Vec<DetectedFace>, DetectorError> {
        Ok(self
            .heads
            .iter()
            .map(|(r, t)| DetectedFace {
                region: FaceRegion::default(),
                landmarks: project_face(&self.intrinsics, r, *t),
            })
            .collect())
    }
}

/// Returns a fixed list of faces for every frame.
struct FixedDetector(Vec<DetectedFace>);

impl LandmarkDetector for FixedDetector {
    fn detect(&mut self, _image: &Image<u8, 3>) -> Result<Vec<DetectedFace>, DetectorError> {
        Ok(self.0.clone())
    }
}

fn assert_rotation_close(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3], epsilon: f64) {
    for i in 0..3 {
        for j in 0..3 {
            assert_abs_diff_eq!(a[i][j], b[i][j], epsilon = epsilon);
        }
    }
}

#[test]
fn frontal_face_one_meter_away() -> Result<(), HeadPoseError> {
    init_logger();
    let detector = ProjectingDetector {
        intrinsics: CameraIntrinsics::pinhole(500.0, 50.0, 50.0),
        heads: vec![(FRONTAL, [0.0, 0.0, 1000.0])],
    };
    let mut estimator = HeadPoseEstimator::with_focal_length(500.0, detector)?;
    assert_eq!(estimator.update(&frame(100, 100))?.len(), 1);
    assert_eq!(
        estimator.camera().optical_center(),
        OpticalCenter::Set { x: 50.0, y: 50.0 }
    );

    let mut poses = estimator.poses();
    assert_eq!(poses.len(), 1);
    let pose = poses.remove(0)?;

    let t = pose.translation();
    assert_abs_diff_eq!(t[0], 0.0, epsilon = 0.03);
    assert_abs_diff_eq!(t[1], 0.0, epsilon = 0.03);
    assert_abs_diff_eq!(t[2], 1.0, epsilon = 0.03);
    // a few degrees
    assert_rotation_close(&pose.rotation(), &FRONTAL, 0.05);
    assert_eq!(pose.as_matrix()[3], [0.0, 0.0, 0.0, 1.0]);
    Ok(())
}

#[test]
fn recovers_known_poses_of_several_faces() -> Result<(), HeadPoseError> {
    init_logger();
    let intrinsics = CameraIntrinsics::pinhole(1000.0, 320.0, 240.0);
    let tilted = headpose_pnp::rodrigues_to_matrix(&[0.15, -0.3, 0.1]);
    let tilted = mat_mul(&tilted, &FRONTAL);
    let heads = vec![
        (FRONTAL, [-150.0, 20.0, 900.0]),
        (tilted, [180.0, -40.0, 1300.0]),
    ];
    let detector = ProjectingDetector {
        intrinsics,
        heads: heads.clone(),
    };
    let mut estimator = HeadPoseEstimator::with_focal_length(1000.0, detector)?;
    estimator.update(&frame(640, 480))?;

    for (i, res) in estimator.poses().into_iter().enumerate() {
        let pose = res?;
        let (r0, t0) = &heads[i];
        assert_rotation_close(&pose.rotation(), r0, 1e-3);
        let t = pose.translation_mm();
        for k in 0..3 {
            assert_abs_diff_eq!(t[k], t0[k], epsilon = 1.0);
        }
    }
    Ok(())
}

fn mat_mul(a: &[[f64; 3]; 3], b: &[[f64; 3]; 3]) -> [[f64; 3]; 3] {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

#[test]
fn pose_is_idempotent() -> Result<(), HeadPoseError> {
    let detector = ProjectingDetector {
        intrinsics: CameraIntrinsics::pinhole(800.0, 160.0, 120.0),
        heads: vec![(FRONTAL, [10.0, 5.0, 700.0])],
    };
    let mut estimator = HeadPoseEstimator::with_focal_length(800.0, detector)?;
    estimator.update(&frame(320, 240))?;
    assert_eq!(estimator.pose(0)?, estimator.pose(0)?);
    Ok(())
}

#[test]
fn optical_center_is_fixed_by_first_frame() -> Result<(), HeadPoseError> {
    let mut estimator = HeadPoseEstimator::with_focal_length(1000.0, FixedDetector(vec![]))?;
    estimator.update(&frame(640, 480))?;
    estimator.update(&frame(100, 50))?;
    assert_eq!(
        estimator.camera().optical_center(),
        OpticalCenter::Set { x: 320.0, y: 240.0 }
    );
    assert_eq!(
        estimator.current_frame().map(|f| f.size()),
        Some(ImageSize {
            width: 100,
            height: 50
        })
    );
    Ok(())
}

#[test]
fn configured_optical_center_is_kept() -> Result<(), HeadPoseError> {
    let config = EstimatorConfig {
        optical_center: Some([12.5, 7.5]),
        ..Default::default()
    };
    let mut estimator = HeadPoseEstimator::new(config, FixedDetector(vec![]))?;
    estimator.update(&frame(640, 480))?;
    assert_eq!(
        *estimator.camera(),
        CameraModel::with_optical_center(1000.0, 12.5, 7.5)
    );
    Ok(())
}

#[test]
fn failed_face_does_not_abort_the_batch() -> Result<(), HeadPoseError> {
    init_logger();
    let intrinsics = CameraIntrinsics::pinhole(1000.0, 320.0, 240.0);
    let good = project_face(&intrinsics, &FRONTAL, [0.0, 0.0, 1000.0]);
    let mut points = good.points().to_vec();
    points[FacialFeature::Nose.index()] = Point2::new(f64::NAN, f64::NAN);
    let broken = FacialLandmarkSet::new(points)?;

    let faces = [broken, good]
        .into_iter()
        .map(|landmarks| DetectedFace {
            region: FaceRegion::default(),
            landmarks,
        })
        .collect();
    let mut estimator = HeadPoseEstimator::with_focal_length(1000.0, FixedDetector(faces))?;
    estimator.update(&frame(640, 480))?;

    let poses = estimator.poses();
    assert_eq!(poses.len(), 2);
    assert!(matches!(
        poses[0],
        Err(HeadPoseError::Solver { face: 0, .. })
    ));
    assert!(poses[1].is_ok());
    Ok(())
}

#[test]
fn unconverged_solve_is_reported_per_face() -> Result<(), HeadPoseError> {
    init_logger();
    let detector = ProjectingDetector {
        intrinsics: CameraIntrinsics::pinhole(1000.0, 320.0, 240.0),
        heads: vec![(FRONTAL, [150.0, -100.0, 600.0])],
    };
    let config = EstimatorConfig {
        focal_length: 1000.0,
        solver: SolverConfig {
            max_iterations: 1,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut estimator = HeadPoseEstimator::new(config, detector)?;
    estimator.update(&frame(640, 480))?;

    assert!(matches!(
        estimator.pose(0),
        Err(HeadPoseError::Solver {
            face: 0,
            source: PnPError::NotConverged { iterations: 1, .. },
        })
    ));
    Ok(())
}

#[test]
fn stored_state_is_replaced_each_frame() -> Result<(), Box<dyn std::error::Error>> {
    let face = |offset: f64| -> Result<DetectedFace, HeadPoseError> {
        Ok(DetectedFace {
            region: FaceRegion {
                x: offset,
                y: offset,
                width: 20.0,
                height: 20.0,
            },
            landmarks: FacialLandmarkSet::new(vec![Point2::new(offset, offset); NUM_LANDMARKS])?,
        })
    };
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("replay.json");
    std::fs::write(
        &path,
        serde_json::to_string(&[vec![face(1.0)?, face(2.0)?], vec![face(3.0)?]])?,
    )?;

    let detector = ReplayDetector::from_file(&path)?;
    let mut estimator = HeadPoseEstimator::with_focal_length(1000.0, detector)?;

    assert_eq!(estimator.update(&frame(64, 64))?.len(), 2);
    assert_eq!(estimator.faces().len(), 2);

    assert_eq!(estimator.update(&frame(64, 64))?.len(), 1);
    assert_eq!(estimator.faces()[0].x, 3.0);
    assert_eq!(
        estimator.coords_of(0, FacialFeature::Sellion)?,
        Point2::new(3.0, 3.0)
    );

    // the recording is exhausted, the detector failure is surfaced
    assert!(matches!(
        estimator.update(&frame(64, 64)),
        Err(HeadPoseError::Detector(_))
    ));
    Ok(())
}

#[test]
fn draw_detections_returns_annotated_copy() -> Result<(), HeadPoseError> {
    let detector = ProjectingDetector {
        intrinsics: CameraIntrinsics::pinhole(500.0, 50.0, 50.0),
        heads: vec![(FRONTAL, [0.0, 0.0, 1000.0])],
    };
    let mut estimator = HeadPoseEstimator::with_focal_length(500.0, detector)?;
    let base = frame(100, 100);
    let landmarks = estimator.update(&base)?.to_vec();
    let poses: Vec<HeadPose> = estimator.poses().into_iter().collect::<Result<_, _>>()?;

    let overlay = estimator.overlay(&landmarks, &poses);
    assert_eq!(overlay.segments.len(), 3);
    assert_eq!(overlay.labels.len(), 1);
    assert_eq!(
        overlay.labels[0].anchor,
        estimator.coords_of(0, FacialFeature::Sellion)?
    );

    let annotated = estimator.draw_detections(&base, &landmarks, &poses);
    assert_eq!(annotated.size(), base.size());
    assert!(base.as_slice().iter().all(|&v| v == 0));
    assert!(annotated.as_slice().iter().any(|&v| v != 0));
    Ok(())
}
