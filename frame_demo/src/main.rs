//! Frame context demo
//!
//! Drives a few frames over batches of geometry placed on the surface of a
//! planet-sized scene, with the camera millions of units from the world
//! origin. Each batch stores its vertices relative to an RTC origin and draws
//! through the frame context's cached RTC view matrices. At the end the demo
//! compares the single-precision error of the RTC path against naive
//! absolute-coordinate transforms.
//!
//! Usage: `frame_demo [config.toml|config.ron]`

use rtc_render::foundation::logging;
use rtc_render::foundation::math::{gpu_bytes, to_gpu, DPoint3, Point3, Vec3};
use rtc_render::prelude::*;
use rtc_render::render::{ElementRange, FrontFace};

/// Radius of the demo planet, in scene units
const PLANET_RADIUS: f64 = 6_378_137.0;

/// Number of stereo passes per frame
const PASSES: u32 = 2;

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("usage: frame_demo [config.toml|config.ron], got {0} arguments")]
    Usage(usize),
}

/// Triangles stored relative to an RTC origin
struct RtcBatch {
    name: &'static str,
    origin: DVec3,
    origin_hash: OriginHash,
    program: u32,
    local_positions: Vec<Vec3>,
}

impl RtcBatch {
    fn new(name: &'static str, origin: DVec3, program: u32, world_positions: &[DVec3]) -> Self {
        let local_positions = world_positions
            .iter()
            .map(|p| (p - origin).cast::<f32>())
            .collect();

        Self {
            name,
            origin,
            origin_hash: OriginHash::from_origin(&origin),
            program,
            local_positions,
        }
    }
}

impl Drawable for RtcBatch {
    fn draw(&self, ctx: &mut FrameContext) {
        ctx.state.use_program(self.program);
        ctx.state.stats.bind_array += 1;

        let rtc_view = to_gpu(ctx.get_rtc_view_matrix(self.origin_hash, &self.origin));
        log::trace!(
            "{}: pass {} uploading {} bytes of RTC view matrix",
            self.name, ctx.state.pass, gpu_bytes(&rtc_view).len()
        );

        ctx.state.stats.draw_elements += 1;
    }

    fn draw_pick(&self, ctx: &mut FrameContext) {
        if self.local_positions.is_empty() {
            return;
        }
        ctx.state.use_program(self.program + 100);
        ctx.state.stats.bind_array += 1;

        let rtc_pick_view = to_gpu(ctx.get_rtc_pick_view_matrix(self.origin_hash, &self.origin));
        log::trace!("{}: pick upload of {} bytes", self.name, gpu_bytes(&rtc_pick_view).len());

        ctx.state.stats.draw_elements += 1;
    }
}

fn load_config() -> Result<ApplicationConfig, DemoError> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match args.as_slice() {
        [] => ApplicationConfig::default(),
        [path] => ApplicationConfig::load_from_file(path)?,
        _ => return Err(DemoError::Usage(args.len())),
    };
    config.validate()?;
    Ok(config)
}

fn surface_point(latitude_deg: f64, longitude_deg: f64, height: f64) -> DVec3 {
    let (lat, lon) = (latitude_deg.to_radians(), longitude_deg.to_radians());
    let radius = PLANET_RADIUS + height;
    DVec3::new(
        radius * lat.cos() * lon.cos(),
        radius * lat.sin(),
        radius * lat.cos() * lon.sin(),
    )
}

fn build_batches() -> Vec<RtcBatch> {
    let sites = [
        ("quay", 0.0, 0.0),
        ("depot", 0.0005, 0.0004),
        ("tower", -0.0003, 0.0008),
    ];

    let mut batches = Vec::new();
    for (program, (name, lat, lon)) in (1_u32..).zip(sites) {
        let origin = surface_point(lat, lon, 0.0);
        let triangle = [
            origin + DVec3::new(0.125, 0.0, 0.0),
            origin + DVec3::new(0.0, 0.375, 0.0),
            origin + DVec3::new(0.0, 0.0, 0.0625),
        ];
        batches.push(RtcBatch::new(name, origin, program, &triangle));
        // A second batch at the same site shares the cached RTC matrix.
        batches.push(RtcBatch::new(name, origin, program, &triangle.map(|p| p + DVec3::new(0.0, 1.0, 0.0))));
    }
    batches
}

/// Largest view-space error of single-precision transforms, RTC vs absolute
fn precision_report(context: &mut FrameContext, batches: &[RtcBatch]) -> (f64, f64) {
    let view = *context.camera_view_matrix();
    let naive_view = to_gpu(&view);
    let mut rtc_error: f64 = 0.0;
    let mut naive_error: f64 = 0.0;

    for batch in batches {
        let rtc_view = to_gpu(context.get_rtc_view_matrix(batch.origin_hash, &batch.origin));
        for local in &batch.local_positions {
            let world = DPoint3::from(batch.origin + local.cast::<f64>());
            let reference = view.transform_point(&world);

            let rtc = rtc_view.transform_point(&Point3::from(*local));
            let naive = naive_view.transform_point(&Point3::from(world.coords.cast::<f32>()));

            rtc_error = rtc_error.max((rtc.coords.cast::<f64>() - reference.coords).norm());
            naive_error = naive_error.max((naive.coords.cast::<f64>() - reference.coords).norm());
        }
    }

    (rtc_error, naive_error)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;

    logging::init_with_level(&config.log_level);

    log::info!("Starting frame context demo ({} frames)", config.frames);

    let site = surface_point(0.0, 0.0, 0.0);
    let mut camera = Camera::perspective(site + DVec3::new(40.0, 25.0, 30.0), 60.0, 16.0 / 9.0, 0.1, 5000.0);
    camera.set_target(site);
    let mut scene = Scene::new(SurfaceId(1), camera);

    let batches = build_batches();
    let mut context = FrameContext::new(&scene, config.frame.clone());

    for frame in 0..config.frames {
        let orbit = f64::from(frame) * 0.1;
        scene.camera.set_position(site + DVec3::new(40.0 * orbit.cos(), 25.0, 40.0 * orbit.sin()));

        context.reset(&scene);
        context.state.pbr_enabled = true;
        context.state.color_texture_enabled = true;
        context.state.front_face = FrontFace::CounterClockwise;

        for pass in 0..PASSES {
            context.state.pass = pass;
            for batch in &batches {
                batch.draw(&mut context);
            }
        }

        // Ray pick straight down onto the first site.
        context.state.pick_view_matrix = Some(DMat4::look_at(
            site + DVec3::new(0.0, 100.0, 0.0),
            site,
            DVec3::new(0.0, 0.0, -1.0),
        ));
        context.state.pick_elements = Some(ElementRange { count: 3, offset: 0 });
        for batch in &batches {
            batch.draw_pick(&mut context);
        }
        let layer = context.state.push_snap_pick_layer(site, DVec3::new(0.001, 0.001, 0.001));

        let stats = context.end_frame();
        log::info!(
            "Frame {}: {} draws, {} program binds, {} array binds, snap layer {}, pool {} buffers",
            context.frame_number(),
            stats.total_draws(),
            stats.use_program,
            stats.bind_array,
            layer,
            context.rtc_cache().pool().len()
        );
    }

    context.reset(&scene);
    let (rtc_error, naive_error) = precision_report(&mut context, &batches);
    context.end_frame();

    log::info!(
        "Max view-space error in f32: RTC {:.3e} units, absolute {:.3e} units",
        rtc_error, naive_error
    );

    Ok(())
}
