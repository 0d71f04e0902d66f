use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use hopper_mesher::{Grid, LatticePoint};
use nalgebra::{Point3, Vector3};
use ndarray::{Array3, Zip};
use rand::{thread_rng, Rng};

fn random_sites(shape: [usize; 3], count: usize) -> Vec<LatticePoint> {
    let mut rng = thread_rng();
    (0..count)
        .map(|_| {
            Point3::new(
                rng.gen_range(0..shape[0]),
                rng.gen_range(0..shape[1]),
                rng.gen_range(0..shape[2]),
            )
        })
        .collect()
}

/// The field evaluated with a square root per grid point and source
fn direct_coulomb(shape: [usize; 3], spacing: f64, sources: &[LatticePoint]) -> Array3<f64> {
    let mut potential = Array3::zeros((shape[0], shape[1], shape[2]));
    for source in sources {
        Zip::indexed(&mut potential).for_each(|(i, j, k), value| {
            let dx = i.abs_diff(source.x) as f64 * spacing;
            let dy = j.abs_diff(source.y) as f64 * spacing;
            let dz = k.abs_diff(source.z) as f64 * spacing;
            let r = (dx * dx + dy * dy + dz * dz).sqrt();
            if r > 0.0 {
                *value += 1.0 / r;
            }
        });
    }
    potential
}

pub fn bench_coulomb_everywhere(c: &mut Criterion) {
    let shape = [32, 32, 32];
    let grid = Grid::from_spacing(Point3::origin(), Vector3::repeat(1.5), shape).unwrap();
    let mesh = grid.interaction_mesh();

    let mut group = c.benchmark_group("coulomb_everywhere");
    group.sample_size(10);

    for count in [1, 16, 128].into_iter() {
        let sources = random_sites(shape, count);
        group.bench_with_input(BenchmarkId::new("table", count), &count, |b, _| {
            b.iter(|| mesh.coulomb_everywhere(black_box(&sources), black_box(1.0)))
        });
        group.bench_with_input(BenchmarkId::new("direct", count), &count, |b, _| {
            b.iter(|| direct_coulomb(black_box(shape), black_box(1.5), black_box(&sources)))
        });
    }
}

pub fn bench_pair_energy(c: &mut Criterion) {
    let shape = [64, 64, 16];
    let grid = Grid::from_spacing(Point3::origin(), Vector3::repeat(1.0), shape).unwrap();
    let mesh = grid.interaction_mesh();

    let mut group = c.benchmark_group("pair_energy");
    for count in [100, 1000, 4000].into_iter() {
        let sites = random_sites(shape, count);
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| mesh.pair_energy(black_box(&sites), black_box(1.0)))
        });
    }
}

criterion_group!(interaction_mesh, bench_coulomb_everywhere, bench_pair_energy);
criterion_main!(interaction_mesh);
