use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use lumen_image::pixel::{Rgba32, RgbaVector};
use lumen_image::Image;
use lumen_imgproc::filter::{
    bokeh_blur, box_blur, convolve_2d, detect_edges, gaussian_blur, kernels, BokehKernel,
    EdgeDetector, FilterOptions, KernelPair,
};
use lumen_imgproc::parallel::ExecutionStrategy;

fn bench_filters(c: &mut Criterion) {
    let mut group = c.benchmark_group("Gaussian Blur");

    for (width, height) in [(256, 224), (512, 448), (1024, 896)].iter() {
        for radius in [1, 2, 3, 4, 5, 8].iter() {
            let kernel_size = 2 * radius + 1;
            group.throughput(criterion::Throughput::Elements(
                (*width * *height * kernel_size) as u64,
            ));

            let parameter_string = format!("{}x{}x{}", width, height, kernel_size);

            // input image
            let image_size = [*width, *height].into();
            let image_u8 = Image::from_fn(image_size, |x, y| {
                Rgba32::new((x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255)
            });
            let image_f32 = image_u8.map::<RgbaVector>();

            // output image
            let output_u8 = Image::from_size_val(image_size, Rgba32::default());
            let output_f32 = Image::from_size_val(image_size, RgbaVector::default());

            let options = FilterOptions {
                strategy: ExecutionStrategy::ParallelRows,
                ..Default::default()
            };
            let sigma = *radius as f32 / 2.0;

            group.bench_with_input(
                BenchmarkId::new("gaussian_blur_u8", &parameter_string),
                &(&image_u8, &output_u8),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| {
                        black_box(gaussian_blur(src, &mut dst, sigma, Some(*radius), &options))
                    })
                },
            );

            group.bench_with_input(
                BenchmarkId::new("gaussian_blur_f32", &parameter_string),
                &(&image_f32, &output_f32),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| {
                        black_box(gaussian_blur(src, &mut dst, sigma, Some(*radius), &options))
                    })
                },
            );

            group.bench_with_input(
                BenchmarkId::new("box_blur_u8", &parameter_string),
                &(&image_u8, &output_u8),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(box_blur(src, &mut dst, *radius, &options)))
                },
            );

            // the same box blur as a single 2D kernel
            let Ok(kernel) =
                KernelPair::symmetric(&kernels::box_blur_kernel_1d(*radius)).and_then(|p| p.to_2d())
            else {
                continue;
            };
            group.bench_with_input(
                BenchmarkId::new("box_blur_direct_u8", &parameter_string),
                &(&image_u8, &output_u8),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(convolve_2d(src, &mut dst, &kernel, &options)))
                },
            );
        }
    }

    group.finish();
}

fn bench_edges(c: &mut Criterion) {
    let mut group = c.benchmark_group("Edge Detection");

    let image_size = [512, 448].into();
    let image = Image::from_fn(image_size, |x, y| {
        Rgba32::new((x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8, 255)
    });
    let output = Image::from_size_val(image_size, Rgba32::default());

    for (name, detector) in [
        ("laplacian_3x3", EdgeDetector::laplacian_3x3()),
        ("sobel", EdgeDetector::sobel()),
        ("kirsch", EdgeDetector::kirsch()),
    ] {
        for strategy in [ExecutionStrategy::Serial, ExecutionStrategy::ParallelRows] {
            let options = FilterOptions {
                strategy,
                ..Default::default()
            };
            group.bench_with_input(
                BenchmarkId::new(name, format!("{:?}", strategy)),
                &(&image, &output),
                |b, i| {
                    let (src, mut dst) = (i.0, i.1.clone());
                    b.iter(|| black_box(detect_edges(src, &mut dst, &detector, true, &options)))
                },
            );
        }
    }

    group.finish();
}

fn bench_bokeh(c: &mut Criterion) {
    let mut group = c.benchmark_group("Bokeh Blur");

    let image_size = [256, 224].into();
    let image = Image::from_fn(image_size, |x, y| {
        Rgba32::new((x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255)
    });
    let output = Image::from_size_val(image_size, Rgba32::default());
    let options = FilterOptions {
        strategy: ExecutionStrategy::ParallelRows,
        ..Default::default()
    };

    for components in [1, 2, 4] {
        let Ok(kernel) = BokehKernel::new(8, components) else {
            continue;
        };
        group.bench_with_input(
            BenchmarkId::new("bokeh_blur_u8", components),
            &(&image, &output),
            |b, i| {
                let (src, mut dst) = (i.0, i.1.clone());
                b.iter(|| black_box(bokeh_blur(src, &mut dst, &kernel, 3.0, &options)))
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_filters, bench_edges, bench_bokeh);
criterion_main!(benches);
