//! Progressive path tracer example.
//!
//! Builds the random-spheres demo scene, accumulates a number of frames and
//! saves the converged image as PNG.
//!
//! Usage: cargo run --example progressive -- [width] [height] [frames] [output.png]

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use image::RgbaImage;
use tray_renderer::{
    CameraRig, Color, FrameBuffer, Material, RandomSource, RenderConfig, Renderer, Sphere, Vec3,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let width: u32 = parse_arg(args.next(), 320, "width")?;
    let height: u32 = parse_arg(args.next(), 240, "height")?;
    let frames: u32 = parse_arg(args.next(), 16, "frames")?;
    let output = args.next().unwrap_or_else(|| "output.png".to_string());

    let config = RenderConfig::default().with_samples(1).with_max_bounces(5);
    let mut renderer = Renderer::new(width, height, config)?;

    let start = Instant::now();
    build_scene(&mut renderer)?;
    log::info!(
        "Scene built with {} objects in {:?}",
        renderer.scene().len(),
        start.elapsed()
    );

    let camera = CameraRig::default();
    renderer.set_view_matrix(camera.view_matrix())?;

    let mut buffer = FrameBuffer::new(width, height);
    let start = Instant::now();
    for _ in 0..frames {
        let frame_start = Instant::now();
        renderer.raytrace(&mut buffer)?;
        let micros = frame_start.elapsed().as_micros().max(1) as f64;
        let rays = width as u64 * height as u64 * renderer.config().samples_per_pixel as u64;
        log::info!(
            "Frame {}: {:.2} MRays/s",
            buffer.frames(),
            rays as f64 / micros
        );
    }
    log::info!("Accumulated {} frames in {:?}", buffer.frames(), start.elapsed());

    save_png(&buffer, &output)?;
    log::info!("Saved to {}", output);
    Ok(())
}

fn parse_arg<T: std::str::FromStr>(arg: Option<String>, default: T, name: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match arg {
        Some(value) => value
            .parse()
            .with_context(|| format!("invalid {name}: {value}")),
        None => Ok(default),
    }
}

/// Ground sphere plus twelve diffuse, metallic and dielectric spheres each.
fn build_scene(renderer: &mut Renderer) -> Result<()> {
    let ground = Arc::new(Material::diffuse(Color::new(0.5, 0.5, 0.5), 0.3));
    renderer.add_object(Sphere::new(Vec3::new(0.0, -1000.0, -1.0), 1000.0, ground)?);

    let mut random = RandomSource::new(123456);
    for _ in 0..12 {
        let diffuse = Material::diffuse(random_color(&mut random), random.next_f32());
        renderer.add_object(random_sphere(&mut random, 10.0, diffuse)?);

        let metallic = Material::metallic(random_color(&mut random), random.next_f32());
        renderer.add_object(random_sphere(&mut random, 30.0, metallic)?);

        let dielectric =
            Material::dielectric(random_color(&mut random), random.next_f32(), 1.65)?;
        renderer.add_object(random_sphere(&mut random, 25.0, dielectric)?);
    }

    Ok(())
}

fn random_color(random: &mut RandomSource) -> Color {
    Color::new(random.next_f32(), random.next_f32(), random.next_f32())
}

fn random_sphere(random: &mut RandomSource, span: f32, material: Material) -> Result<Sphere> {
    let radius = random.next_f32() * 0.7 + 0.2;
    let center = Vec3::new(
        random.next_f32() * span,
        random.next_f32() * span + 0.2,
        random.next_f32() * span,
    );
    Ok(Sphere::new(center, radius, Arc::new(material))?)
}

fn save_png(buffer: &FrameBuffer, filename: &str) -> Result<()> {
    let rgba = buffer.to_rgba8()?;
    let mut image = RgbaImage::from_raw(buffer.width(), buffer.height(), rgba)
        .context("frame buffer size does not match image size")?;
    // Row 0 of the buffer is the bottom of the picture
    image::imageops::flip_vertical_in_place(&mut image);
    image
        .save(filename)
        .with_context(|| format!("failed to save {filename}"))?;
    Ok(())
}
