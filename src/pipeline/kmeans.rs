use std::collections::HashSet;

use kmeans_colors::{Calculate, CentroidData, Sort};
use palette::Lab;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

/// Stop once the summed centroid movement drops below this.
pub const CONVERGENCE_THRESHOLD: f32 = 0.001;

/// Cluster indices are stored as `u8`.
pub const MAX_CLUSTERS: usize = 256;

/// Result of a k-means run: the frozen centroids and, for every input point,
/// the index of the centroid it was last assigned to.
#[derive(Debug, Clone, Default)]
pub struct Clustering {
    pub centroids: Vec<Lab>,
    pub indices: Vec<u8>,
    pub iterations: usize,
}

impl Clustering {
    /// Share of the points held by each centroid, ordered by lightness.
    pub fn weights(&self) -> Vec<CentroidData<Lab>> {
        if self.indices.is_empty() {
            return Vec::new();
        }
        <Lab as Sort>::sort_indexed_colors(&self.centroids, &self.indices)
    }
}

/// Lloyd's k-means over Lab points.
///
/// Centroids are seeded from the distinct input points (padded by repetition
/// when there are fewer than `k`). A centroid that loses all of its points
/// keeps its previous position. Iteration stops after `max_iter` rounds or
/// once the summed centroid movement falls below [`CONVERGENCE_THRESHOLD`].
pub fn kmeans<R: Rng + ?Sized>(
    points: &[Lab],
    k: usize,
    max_iter: usize,
    rng: &mut R,
) -> Clustering {
    if k == 0 {
        return Clustering::default();
    }
    let k = k.min(MAX_CLUSTERS);

    let mut centroids = seed_centroids(points, k, rng);
    let mut indices = Vec::with_capacity(points.len());
    if points.is_empty() {
        return Clustering {
            centroids,
            indices,
            iterations: 0,
        };
    }

    let mut iterations = 0;
    while iterations < max_iter {
        iterations += 1;
        assign(points, &centroids, &mut indices);
        let updated = recompute_centroids(points, &centroids, &indices);
        let movement: f32 = centroids
            .iter()
            .zip(&updated)
            .map(|(old, new)| <Lab as Calculate>::difference(old, new).sqrt())
            .sum();
        centroids = updated;
        if movement < CONVERGENCE_THRESHOLD {
            break;
        }
    }
    assign(points, &centroids, &mut indices);

    debug!(points = points.len(), k, iterations, "k-means finished");
    Clustering {
        centroids,
        indices,
        iterations,
    }
}

/// Nearest-centroid assignment; ties go to the lowest index.
fn assign(points: &[Lab], centroids: &[Lab], indices: &mut Vec<u8>) {
    indices.clear();
    <Lab as Calculate>::get_closest_centroid(points, centroids, indices);
}

fn recompute_centroids(points: &[Lab], centroids: &[Lab], indices: &[u8]) -> Vec<Lab> {
    let mut sums = vec![(0.0f64, 0.0f64, 0.0f64); centroids.len()];
    let mut counts = vec![0usize; centroids.len()];
    for (point, &idx) in points.iter().zip(indices) {
        let idx = idx as usize;
        sums[idx].0 += point.l as f64;
        sums[idx].1 += point.a as f64;
        sums[idx].2 += point.b as f64;
        counts[idx] += 1;
    }

    centroids
        .iter()
        .zip(sums.iter().zip(&counts))
        .map(|(old, (sum, &count))| {
            if count == 0 {
                *old
            } else {
                let n = count as f64;
                Lab::new((sum.0 / n) as f32, (sum.1 / n) as f32, (sum.2 / n) as f32)
            }
        })
        .collect()
}

/// Pick `k` starting centroids from the distinct points.
fn seed_centroids<R: Rng + ?Sized>(points: &[Lab], k: usize, rng: &mut R) -> Vec<Lab> {
    let mut seen = HashSet::new();
    let unique: Vec<Lab> = points
        .iter()
        .filter(|p| seen.insert((p.l.to_bits(), p.a.to_bits(), p.b.to_bits())))
        .copied()
        .collect();

    if unique.is_empty() {
        return gray_ramp(k);
    }

    if unique.len() >= k {
        let mut seeds = unique;
        seeds.shuffle(rng);
        seeds.truncate(k);
        return seeds;
    }

    debug!(
        unique = unique.len(),
        k, "fewer distinct colors than clusters, padding seeds"
    );
    let mut seeds = unique.clone();
    while seeds.len() < k {
        let mut extra = unique.clone();
        extra.shuffle(rng);
        seeds.extend(extra);
    }
    seeds.truncate(k);
    seeds
}

/// Evenly spaced neutral grays from L=10 to L=90.
fn gray_ramp(k: usize) -> Vec<Lab> {
    if k == 1 {
        return vec![Lab::new(50.0, 0.0, 0.0)];
    }
    (0..k)
        .map(|i| Lab::new(i as f32 * 80.0 / (k - 1) as f32 + 10.0, 0.0, 0.0))
        .collect()
}
