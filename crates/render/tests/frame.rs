//! End-to-end frames rendered on a raster canvas.

use common::color::Color;
use common::geometry::Point;
use common::polygon::Polygon;
use render::{
    Border, Canvas, Clip, CompositeOperation, Drawable, Fill, FrameDefinition, Overlay, RenderConfig, Renderer, Seed,
    Shape, Surface, Translate, UpdateImageData,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn renderer(width: f64, height: f64) -> Renderer {
    init_tracing();
    Renderer::new(RenderConfig::headless().with_size(width, height)).with_seed(7)
}

fn rect(x: f64, y: f64, width: f64, height: f64) -> Shape {
    Shape::from_polygon(&Polygon::from_rect(x, y, width, height))
}

fn rgb(color: &Color) -> [u8; 4] {
    let [r, g, b] = color.rgb().unwrap();
    [r, g, b, 255]
}

fn draw(renderer: &Renderer, frame: &FrameDefinition) -> Canvas {
    let mut canvas = renderer.new_canvas().unwrap();
    renderer.render_now(&mut canvas, frame).unwrap();
    canvas
}

#[test]
fn unit_square_fills_unit_frame() {
    let red = Color::new(0.0, 1.0, 1.0);
    let renderer = renderer(1.0, 1.0);
    let frame = FrameDefinition::new(vec![rect(0.0, 0.0, 1.0, 1.0).with_fill(red.clone()).into()]);
    let canvas = draw(&renderer, &frame);
    assert_eq!((canvas.width(), canvas.height()), (1, 1));
    assert_eq!(canvas.pixel(0, 0), Some(rgb(&red)));
}

#[test]
fn y_axis_points_up() {
    let renderer = renderer(10.0, 10.0);
    let frame = FrameDefinition::new(vec![rect(0.0, 0.0, 2.0, 2.0).with_fill(Color::white()).into()]);
    let canvas = draw(&renderer, &frame);
    // Frame origin is the bottom-left device corner.
    assert_eq!(canvas.pixel(0, 9), Some([255, 255, 255, 255]));
    assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 0]));
}

#[test]
fn resolution_scales_device_pixels() {
    init_tracing();
    let renderer = Renderer::new(RenderConfig::headless().with_size(2.0, 2.0).with_resolution(3.0));
    let frame = FrameDefinition::new(vec![rect(1.0, 1.0, 1.0, 1.0).with_fill(Color::white()).into()]);
    let canvas = draw(&renderer, &frame);
    assert_eq!((canvas.width(), canvas.height()), (6, 6));
    assert_eq!(canvas.pixel(4, 1).map(|p| p[3]), Some(255));
    assert_eq!(canvas.pixel(1, 4).map(|p| p[3]), Some(0));
}

#[test]
fn border_surrounds_background() {
    let renderer = renderer(10.0, 10.0);
    let frame = FrameDefinition::default()
        .with_border(Border::new(Color::black(), 2.0))
        .with_background(Color::white());
    let canvas = draw(&renderer, &frame);
    assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 255]));
    assert_eq!(canvas.pixel(5, 5), Some([255, 255, 255, 255]));
    assert_eq!(canvas.pixel(9, 5), Some([0, 0, 0, 255]));
}

#[test]
fn clip_and_translate() {
    let renderer = renderer(10.0, 10.0);
    let clipped = Clip::new(
        rect(0.0, 0.0, 5.0, 10.0),
        vec![rect(0.0, 0.0, 10.0, 10.0).with_fill(Color::white()).into()],
    );
    let moved = Translate::new(
        8.0,
        8.0,
        vec![rect(0.0, 0.0, 2.0, 2.0).with_fill(Color::black()).into()],
    );
    let canvas = draw(&renderer, &FrameDefinition::new(vec![clipped.into(), moved.into()]));
    assert_eq!(canvas.pixel(2, 5), Some([255, 255, 255, 255]));
    assert_eq!(canvas.pixel(7, 5).map(|p| p[3]), Some(0));
    // Top-right corner in device space.
    assert_eq!(canvas.pixel(9, 0), Some([0, 0, 0, 255]));
}

#[test]
fn overlay_punches_hole() {
    let renderer = renderer(10.0, 10.0);
    let hole = Overlay::new(vec![rect(0.0, 0.0, 5.0, 5.0).with_fill(Color::black()).into()])
        .with_composition(CompositeOperation::DestinationOut);
    let frame = FrameDefinition::new(vec![hole.into()]).with_background(Color::white());
    let canvas = draw(&renderer, &frame);
    assert_eq!(canvas.pixel(2, 7).map(|p| p[3]), Some(0));
    assert_eq!(canvas.pixel(7, 2), Some([255, 255, 255, 255]));
}

#[test]
fn pixel_covers_one_device_pixel() {
    let renderer = renderer(5.0, 5.0);
    let frame = FrameDefinition::new(vec![Shape::pixel(Point::new(2.0, 3.0), Color::white()).into()]);
    let canvas = draw(&renderer, &frame);
    assert_eq!(canvas.pixel(2, 1), Some([255, 255, 255, 255]));
    let lit = canvas.image_data().data.chunks(4).filter(|p| p[3] != 0).count();
    assert_eq!(lit, 1);
}

#[test]
fn fill_opacity() {
    let renderer = renderer(4.0, 4.0);
    let half = rect(0.0, 0.0, 4.0, 4.0).with_fill(Fill::new(Color::white(), 0.5));
    let canvas = draw(&renderer, &FrameDefinition::new(vec![half.into()]));
    let alpha = canvas.pixel(1, 1).map(|p| p[3]).unwrap();
    assert!((126..=129).contains(&alpha), "alpha {}", alpha);
}

#[test]
fn update_image_data_sees_painted_pixels() {
    let renderer = renderer(4.0, 4.0);
    let invert = UpdateImageData::new(|image| {
        for pixel in image.pixels_mut() {
            pixel[0] = 255 - pixel[0];
            pixel[1] = 255 - pixel[1];
            pixel[2] = 255 - pixel[2];
        }
    });
    let frame = FrameDefinition::new(vec![
        rect(0.0, 0.0, 4.0, 4.0).with_fill(Color::white()).into(),
        invert.into(),
    ]);
    let canvas = draw(&renderer, &frame);
    assert_eq!(canvas.pixel(2, 2), Some([0, 0, 0, 255]));
}

#[test]
fn seeded_frames_are_reproducible() {
    let renderer = renderer(20.0, 20.0);
    let scatter = Seed::new(11, |random| {
        Ok((0..5)
            .map(|_| {
                let origin = Point::new(random.range(0.0, 18.0), random.range(0.0, 18.0));
                Drawable::from(rect(origin.x, origin.y, 2.0, 2.0).with_fill(Color::white()))
            })
            .collect())
    });
    let frame = FrameDefinition::new(vec![scatter.into()]);
    let first = draw(&renderer, &frame).image_data();
    let second = draw(&renderer, &frame).image_data();
    assert_eq!(first, second);
    assert!(first.data.iter().any(|&byte| byte != 0));
}
