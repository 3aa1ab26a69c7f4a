use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, Rgba, RgbaImage};
use imgly_whitemask::{apply_mask, compute_mask, BackgroundMasker, ImageIOService};

const SIZES: &[u32] = &[256, 1024, 2048];

/// Half white background, half colored foreground
fn test_image(size: u32) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| {
        if x < size / 2 {
            Rgba([250, 252, 255, 255])
        } else {
            Rgba([(x % 256) as u8, (y % 256) as u8, 120, 255])
        }
    })
}

fn benchmark_mask_stages(c: &mut Criterion) {
    let mut group = c.benchmark_group("mask_stages");

    for &size in SIZES {
        let image = test_image(size);

        group.bench_with_input(BenchmarkId::new("compute_mask", size), &image, |b, image| {
            b.iter(|| compute_mask(black_box(image), 240).unwrap());
        });

        let mask = compute_mask(&image, 240).unwrap();
        group.bench_with_input(BenchmarkId::new("apply_mask", size), &image, |b, image| {
            b.iter_batched(
                || image.clone(),
                |mut target| apply_mask(&mut target, black_box(&mask)).unwrap(),
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

fn benchmark_end_to_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("end_to_end");
    group.sample_size(20);
    let masker = BackgroundMasker::default();

    for &size in SIZES {
        let image = test_image(size);
        let png_bytes = ImageIOService::encode_png(&image).unwrap();

        group.bench_with_input(BenchmarkId::new("mask_image", size), &image, |b, image| {
            b.iter(|| {
                masker
                    .mask_image(DynamicImage::ImageRgba8(image.clone()))
                    .unwrap()
            });
        });

        group.bench_with_input(
            BenchmarkId::new("bytes_to_png", size),
            &png_bytes,
            |b, bytes| {
                b.iter(|| {
                    let result = masker.process_bytes(black_box(bytes)).unwrap();
                    result.to_png_bytes().unwrap()
                });
            },
        );
    }

    group.finish();
}

criterion_group!(masking_benches, benchmark_mask_stages, benchmark_end_to_end);
criterion_main!(masking_benches);
