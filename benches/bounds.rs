use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sketch_solver::sketch::bounds;
use sketch_solver::sketch::model::{Point, StrokeStyle};
use sketch_solver::sketch::surface::StrokeSurface;

fn sketched_surface(width: u32, height: u32) -> StrokeSurface {
    let mut surface = StrokeSurface::new(StrokeStyle::default());
    surface.init(width, height);
    surface.begin_stroke(Point::new(300.0, 400.0));
    for step in 0..200 {
        let t = step as f32;
        surface.extend_stroke(Point::new(300.0 + t * 4.0, 400.0 + (t / 8.0).sin() * 120.0));
    }
    surface.end_stroke();
    surface
}

fn bench_extract(c: &mut Criterion) {
    let sketched = sketched_surface(1920, 1080).snapshot().unwrap();
    let mut blank = sketched_surface(1920, 1080);
    blank.clear();
    let blank = blank.snapshot().unwrap();

    c.bench_function("extract_sketched_1080p", |b| {
        b.iter(|| bounds::extract(black_box(&sketched)))
    });
    c.bench_function("extract_blank_1080p", |b| {
        b.iter(|| bounds::extract(black_box(&blank)))
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
