use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use lacquer_core::chroma::{chroma_key_alpha, shade_fragment};
use lacquer_core::material::{CpuMaterial, OverrideUniforms, RenderMaterial};

fn keyed() -> OverrideUniforms {
    OverrideUniforms {
        chroma_enable: true,
        chroma_color: [0.0, 1.0, 0.0],
        chroma_tolerance: 0.3,
        chroma_feather: 0.1,
        ..OverrideUniforms::INERT
    }
}

/// A row of diffuse colors sweeping from the key color to pure red.
fn gradient(len: usize) -> Vec<[f32; 3]> {
    (0..len)
        .map(|i| {
            let t = i as f32 / (len - 1) as f32;
            [t, 1.0 - t, 0.0]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Chroma key
// ---------------------------------------------------------------------------

fn bench_chroma_key_alpha(c: &mut Criterion) {
    let uniforms = keyed();
    let row = gradient(1024);
    c.bench_function("chroma_key_alpha_1024", |b| {
        b.iter(|| {
            row.iter()
                .map(|rgb| chroma_key_alpha(black_box(*rgb), &uniforms))
                .sum::<f32>()
        });
    });
}

fn bench_shade_fragment(c: &mut Criterion) {
    let mut group = c.benchmark_group("shade_fragment");
    let row = gradient(1024);

    for (name, uniforms) in [
        ("inert", OverrideUniforms::INERT),
        ("keyed", keyed()),
        (
            "keyed_unlit",
            OverrideUniforms {
                unlit: true,
                ..keyed()
            },
        ),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(name), &uniforms, |b, uniforms| {
            b.iter(|| {
                row.iter()
                    .filter(|rgb| {
                        let diffuse = [rgb[0], rgb[1], rgb[2], 1.0];
                        let lit = [rgb[0] * 0.8, rgb[1] * 0.8, rgb[2] * 0.8, 1.0];
                        shade_fragment(uniforms, black_box(lit), black_box(diffuse))
                            != lacquer_core::chroma::FragmentOutput::Discard
                    })
                    .count()
            });
        });
    }

    group.finish();
}

// ---------------------------------------------------------------------------
// CPU material
// ---------------------------------------------------------------------------

fn bench_material_shade(c: &mut Criterion) {
    let mut material = CpuMaterial::new()
        .with_name("Glass_01")
        .with_base_color([0.1, 0.9, 0.1, 1.0]);
    *material.override_uniforms_mut() = keyed();
    material.set_opacity(0.6);

    c.bench_function("cpu_material_shade", |b| {
        b.iter(|| material.shade(black_box([0.5, 0.5, 0.5])));
    });
}

criterion_group!(
    benches,
    bench_chroma_key_alpha,
    bench_shade_fragment,
    bench_material_shade,
);
criterion_main!(benches);
