//! The demo composition shown by `sketch-preview`.

use common::color::{Color, Gradient, RadialGradient};
use common::ease::Easing;
use common::error::{DrawError, DrawResult};
use common::geometry::Point;
use common::polygon::Polygon;
use common::probability::pick_with_probability;
use gpu::Uniform;
use render::{
    Border, CircularArc, Clip, CompositeOperation, Drawable, Fill, FrameDefinition, LineStyle, Overlay,
    RenderConfig, Seed, Shader, Shape, SmoothLine, SmoothShape, Stroke, Translate,
};
use std::f64::consts::{PI, TAU};

/// Darkens the frame towards its corners.
const VIGNETTE: &str = r#"
@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let color = textureSample(u_image, u_sampler, input.tex_coord);
    let d = distance(input.tex_coord, vec2<f32>(0.5, 0.5));
    let shade = clamp(1.0 - u.strength * d * d, 0.0, 1.0);
    return vec4<f32>(color.rgb * shade, color.a);
}
"#;

/// Frame shader applied by `--shader`.
pub fn vignette(strength: f64) -> Shader {
    Shader::fragment(VIGNETTE).with_uniform(Uniform::float("strength", strength as f32))
}

/// Palette weights for the scattered blobs.
const PALETTE_WEIGHTS: [f64; 3] = [0.6, 0.3, 0.1];

fn palette() -> [Color; 3] {
    [
        Color::new(0.58, 0.5, 0.85),
        Color::new(0.08, 0.7, 0.95),
        Color::new(0.95, 0.6, 0.7),
    ]
}

/// Wavy horizontal strokes, heavier towards the top.
fn waves(width: f64, height: f64) -> Seed {
    Seed::new(2, move |random| {
        Ok((0..12)
            .map(|row| {
                let t = row as f64 / 11.0;
                let y = height * (0.1 + 0.8 * t);
                let points: Vec<Point> = (0..=8)
                    .map(|step| {
                        let x = width * step as f64 / 8.0;
                        Point::weighted(x, y + random.range(-8.0, 8.0), random.range(0.5, 1.5))
                    })
                    .collect();
                let stroke = Stroke::new(Color::new(0.6, 0.2, 0.3), 0.6, 1.0 + 3.0 * Easing::InQuad.apply(t))
                    .with_style(LineStyle::Round);
                SmoothLine::new(points, 0.35).with_stroke(stroke).into()
            })
            .collect())
    })
}

/// Soft blobs sampled inside `area`.
fn blobs(area: Polygon, attempts: usize) -> Seed {
    Seed::new(1, move |random| {
        let colors = palette();
        (0..40)
            .map(|_| -> DrawResult<Drawable> {
                let center = area.sample(random, attempts)?;
                let index = pick_with_probability(&PALETTE_WEIGHTS, random.value())
                    .ok_or_else(|| DrawError::config("blob palette has no weights"))?;
                let radius = random.range(10.0, 40.0);
                let outline = Polygon::from_circle(center, radius, 7, random.range(0.0, TAU));
                let shape = SmoothShape::new(outline.points, 0.4).with_fill(Fill::new(colors[index].clone(), 0.7));
                Ok(Drawable::from(shape))
            })
            .collect()
    })
}

/// Full demo frame sized for `config`.
pub fn demo_frame(config: &RenderConfig) -> FrameDefinition {
    let (width, height) = (config.width, config.height);
    let center = Point::new(width / 2.0, height / 2.0);
    let inner = Polygon::from_rect(width * 0.1, height * 0.1, width * 0.8, height * 0.8);

    let sun = CircularArc::circle(center, width.min(height) * 0.25)
        .with_fill(common::ColorSource::from(RadialGradient::new(
            vec![Color::new(0.12, 0.8, 1.0), Color::new(0.02, 0.9, 0.8)],
            center,
            width.min(height) * 0.25,
        )))
        .with_stroke(Stroke::new(Color::white(), 0.8, 2.0));

    let halo = CircularArc::new(center, width.min(height) * 0.3, 0.0, PI)
        .with_stroke(Stroke::new(Color::white(), 0.4, 1.0).with_style(LineStyle::Square));

    let window = Clip::new(Shape::from_polygon(&inner), vec![waves(width, height).into()]);

    let shadow = Overlay::new(vec![Translate::new(
        6.0,
        -6.0,
        vec![Shape::from_polygon(&inner)
            .with_fill(Fill::new(Color::black(), 0.3).with_filter("blur(6px)"))
            .into()],
    )
    .into()])
    .with_composition(CompositeOperation::DestinationOver);

    FrameDefinition::new(vec![
        window.into(),
        blobs(inner, config.sample_attempts).into(),
        sun.into(),
        halo.into(),
        shadow.into(),
    ])
    .with_border(Border::new(Color::new(0.6, 0.3, 0.15), 12.0))
    .with_background(Gradient::new(
        vec![Color::new(0.6, 0.1, 0.98), Color::new(0.55, 0.25, 0.85)],
        PI / 2.0,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use render::{RecordingSurface, Renderer, Surface, SurfaceCommand};

    #[test]
    fn test_demo_renders() {
        let config = RenderConfig::headless().with_size(200.0, 150.0);
        let renderer = Renderer::new(config.clone()).with_seed(3);
        let mut surface = RecordingSurface::new(200, 150);
        let listeners = renderer.render_now(&mut surface, &demo_frame(&config)).unwrap();
        assert!(listeners.is_empty());
        assert_eq!(surface.depth(), 0);
        assert!(surface.commands().contains(&SurfaceCommand::Clip));
        assert!(surface.paints().len() > 10);
    }

    #[test]
    fn test_demo_is_deterministic() {
        let config = RenderConfig::headless().with_size(120.0, 120.0);
        let renderer = Renderer::new(config.clone());
        let frame = demo_frame(&config);
        let mut first = renderer.new_canvas().unwrap();
        let mut second = renderer.new_canvas().unwrap();
        renderer.render_now(&mut first, &frame).unwrap();
        renderer.render_now(&mut second, &frame).unwrap();
        assert_eq!(first.image_data(), second.image_data());
    }

    #[test]
    fn test_blob_sampling_failure_aborts_frame() {
        let config = RenderConfig::headless().with_size(50.0, 50.0);
        let collapsed = Polygon::new(vec![Point::new(10.0, 10.0); 3]);
        let frame = FrameDefinition::new(vec![blobs(collapsed, 3).into()]);
        let mut surface = RecordingSurface::new(50, 50);
        let err = Renderer::new(config).render_now(&mut surface, &frame).unwrap_err();
        assert!(matches!(err, DrawError::SamplingFailed { attempts: 3 }));
        assert!(surface.paints().is_empty());
        assert_eq!(surface.depth(), 0);
    }

    #[test]
    fn test_vignette_uniform() {
        let shader = vignette(1.5);
        assert_eq!(shader.uniforms.len(), 1);
        assert_eq!(shader.uniforms[0].name, "strength");
    }
}
