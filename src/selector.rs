// ------------------------------------------------------------
// Choosing the number of palette colors
// ------------------------------------------------------------

use log::{debug, info, warn};

use crate::clustering::{ClusterOptions, kmeans};
use crate::error::{PaletteError, Result};
use crate::sampler::Pixel;

/// Outcome of clustering with one candidate `k`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub k: usize,
    /// `None` when the candidate could not be scored.
    pub score: Option<f64>,
}

fn distance(a: &Pixel, b: &Pixel) -> f64 {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = x as f64 - y as f64;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// Mean silhouette over all points.
///
/// For every point, `a` is its mean distance to the rest of its own cluster
/// and `b` the smallest mean distance to another cluster; the point scores
/// `(b - a) / max(a, b)`. Returns `None` when the score is undefined: fewer
/// than two clusters, a singleton cluster, or a point with `max(a, b) == 0`.
pub fn silhouette_score(pixels: &[Pixel], labels: &[usize]) -> Option<f64> {
    if pixels.is_empty() || pixels.len() != labels.len() {
        return None;
    }
    let k = labels.iter().max().map_or(0, |&m| m + 1);
    let mut counts = vec![0usize; k];
    for &label in labels {
        counts[label] += 1;
    }
    let populated = counts.iter().filter(|&&n| n > 0).count();
    if populated < 2 || counts.iter().any(|&n| n == 1) {
        return None;
    }

    // sums[i * k + c]: total distance from point i to the members of cluster c
    let n = pixels.len();
    let mut sums = vec![0.0f64; n * k];
    for i in 0..n {
        for j in (i + 1)..n {
            let d = distance(&pixels[i], &pixels[j]);
            sums[i * k + labels[j]] += d;
            sums[j * k + labels[i]] += d;
        }
    }

    let mut total = 0.0;
    for (i, &own) in labels.iter().enumerate() {
        let row = &sums[i * k..(i + 1) * k];
        let a = row[own] / (counts[own] - 1) as f64;
        let b = row
            .iter()
            .zip(&counts)
            .enumerate()
            .filter(|&(c, (_, &n))| c != own && n > 0)
            .map(|(_, (&sum, &n))| sum / n as f64)
            .fold(f64::INFINITY, f64::min);
        let denom = a.max(b);
        if denom == 0.0 {
            return None;
        }
        total += (b - a) / denom;
    }
    Some(total / n as f64)
}

fn check_range(k_min: usize, k_max: usize) -> Result<()> {
    if k_min < 2 || k_max < k_min {
        return Err(PaletteError::InvalidRange { k_min, k_max });
    }
    Ok(())
}

/// Cluster and score every k in `k_min..=k_max`. Candidates the data cannot
/// support come back with `score: None`.
pub fn score_candidates(
    pixels: &[Pixel],
    k_min: usize,
    k_max: usize,
    options: &ClusterOptions,
) -> Result<Vec<Candidate>> {
    check_range(k_min, k_max)?;
    if pixels.is_empty() {
        return Err(PaletteError::InvalidInput("no pixels to score".into()));
    }

    let mut candidates = Vec::with_capacity(k_max - k_min + 1);
    for k in k_min..=k_max {
        let score = match kmeans(pixels, k, options) {
            Ok(run) => silhouette_score(pixels, &run.labels),
            Err(PaletteError::InvalidK { .. }) => None,
            Err(e) => return Err(e),
        };
        match score {
            Some(s) => debug!("k={k}, silhouette={s:.4}"),
            None => debug!("k={k} skipped: silhouette undefined"),
        }
        candidates.push(Candidate { k, score });
    }
    Ok(candidates)
}

/// Pick the cluster count with the highest silhouette score. Ties go to the
/// smaller k; if nothing can be scored, `k_min` is returned.
pub fn select_k(pixels: &[Pixel], k_min: usize, k_max: usize, options: &ClusterOptions) -> Result<usize> {
    let candidates = score_candidates(pixels, k_min, k_max, options)?;

    let mut best: Option<(usize, f64)> = None;
    for candidate in candidates {
        let Some(score) = candidate.score else { continue };
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((candidate.k, score));
        }
    }

    match best {
        Some((k, score)) => {
            info!("best k by silhouette: {k} (score {score:.4})");
            Ok(k)
        }
        None => {
            warn!("no k in [{k_min}, {k_max}] could be scored, falling back to {k_min}");
            Ok(k_min)
        }
    }
}
