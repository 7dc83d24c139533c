use argh::FromArgs;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::PathBuf;

use dualplane::source::{acquire_first_available, ManualEntry, MarkerListFile, MarkerSource};
use dualplane::{run_pipeline_with_rng, DepthMap, Marker, PipelineConfig, PixelRect, Region};

const WIDTH: usize = 640;
const HEIGHT: usize = 480;

#[derive(FromArgs)]
/// Recover two synthetic calibration planes and validate the measurements
struct Args {
    /// path to a JSON pipeline configuration
    #[argh(option)]
    config: Option<PathBuf>,

    /// path to a marker list with one `x y id` line per marker
    #[argh(option)]
    markers: Option<PathBuf>,

    /// depth of the near plane in millimeters
    #[argh(option, default = "100.0")]
    near: f64,

    /// depth of the far plane in millimeters
    #[argh(option, default = "800.0")]
    far: f64,

    /// amplitude of the uniform depth noise in millimeters
    #[argh(option, default = "0.0")]
    noise: f64,

    /// fraction of depth samples replaced by gross outliers
    #[argh(option, default = "0.0")]
    outlier_ratio: f64,

    /// seed for the synthetic scene and the plane fitting
    #[argh(option)]
    seed: Option<u64>,
}

fn default_markers() -> Vec<Marker> {
    vec![
        Marker::new(0, 160.0, 240.0),
        Marker::new(1, 200.3, 180.6),
        Marker::new(2, 480.0, 240.0),
        Marker::new(3, 440.8, 300.2),
    ]
}

// near plane on the left half, far plane on the right half
fn synthetic_depth(args: &Args, rng: &mut StdRng) -> DepthMap<f32> {
    let noise = args.noise.abs();
    DepthMap::from_fn([WIDTH, HEIGHT].into(), |x, _| {
        let base = if x < WIDTH / 2 { args.near } else { args.far };
        let mut z = base;
        if noise > 0.0 {
            z += rng.random_range(-noise..=noise);
        }
        if args.outlier_ratio > 0.0 && rng.random_bool(args.outlier_ratio.min(1.0)) {
            z += rng.random_range(20.0..200.0);
        }
        z as f32
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut config = match &args.config {
        Some(path) => serde_json::from_str::<PipelineConfig>(&std::fs::read_to_string(path)?)?,
        None => PipelineConfig::default(),
    };
    if args.seed.is_some() {
        config.ransac.random_seed = args.seed;
    }
    config.measurement.expected_plane_distance = (args.far - args.near).abs();

    let mut rng = match config.ransac.random_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut sources: Vec<Box<dyn MarkerSource>> = Vec::new();
    if let Some(path) = &args.markers {
        sources.push(Box::new(MarkerListFile::new(path)));
    }
    sources.push(Box::new(ManualEntry::new(default_markers())));

    let Some((kind, markers)) = acquire_first_available(&mut sources) else {
        return Err("no markers available".into());
    };
    println!("Markers: #{} from {:?}", markers.len(), kind);

    let mut depth = synthetic_depth(&args, &mut rng);
    log::info!(
        "Synthetic depth map {} (near: {}, far: {}, noise: {}, outliers: {})",
        depth.size(),
        args.near,
        args.far,
        args.noise,
        args.outlier_ratio
    );
    // markers sit on holes of the depth map
    for marker in markers.iter().filter(|m| m.has_finite_position()) {
        let [x, y] = marker.pixel();
        if x >= 0 && y >= 0 {
            if let Some(v) = depth.get_mut(x as usize, y as usize) {
                *v = 0.0;
            }
        }
    }

    let regions = [
        Region::new(PixelRect::new(40, 120, 279, 359), 0),
        Region::new(PixelRect::new(360, 120, 599, 359), 1),
    ];

    let output = run_pipeline_with_rng(&depth, &regions, markers, &config, &mut rng)?;

    for fitted in &output.planes {
        println!(
            "Plane {}: {} ({}/{} inliers, {:.2}%)",
            fitted.index,
            fitted.plane(),
            fitted.fit.num_inliers,
            fitted.fit.num_points,
            fitted.fit.inlier_ratio() * 100.0
        );
    }

    for resolved in &output.resolution.resolved {
        println!(
            "Marker {} (plane {}): ({:.1}, {:.1}, {:.3}) {:?}",
            resolved.id,
            resolved.plane_index,
            resolved.point.x,
            resolved.point.y,
            resolved.point.z,
            resolved.source
        );
    }

    println!("{}", serde_json::to_string_pretty(&output.report)?);

    Ok(())
}
