use criterion::{black_box, criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};
use seamscale::{build_resize_map, remove_object, Direction, Rect};

fn photo() -> RgbImage {
    RgbImage::from_fn(96, 64, |x, y| {
        Rgb([((x * 13 + y * 7) % 256) as u8, ((x * y) % 256) as u8, ((x ^ y) % 256) as u8])
    })
}

fn build(c: &mut Criterion) {
    let image = photo();
    c.bench_function("build horizontal map 96x64 @ 0.5", |b| {
        b.iter(|| build_resize_map(black_box(&image), 0.5, Direction::Horizontal))
    });
}

fn scale(c: &mut Criterion) {
    let image = photo();
    let map = build_resize_map(&image, 0.5, Direction::Horizontal).unwrap();
    c.bench_function("scale 96x64 to 1.3", |b| b.iter(|| map.scale(black_box(1.3))));
}

fn remove(c: &mut Criterion) {
    let image = photo();
    c.bench_function("remove 8x8 object", |b| {
        b.iter(|| remove_object(black_box(&image), Rect::new(40, 47, 20, 27)))
    });
}

criterion_group!(benches, build, scale, remove);
criterion_main!(benches);
