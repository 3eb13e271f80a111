use std::collections::{BTreeMap, HashSet};

use kmeans_colors::get_kmeans;
use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_CONVERGENCE, DEFAULT_MAX_ITERATIONS, DEFAULT_SEED};
use crate::error::{PaletteError, Result};
use crate::sampler::Pixel;

/// The k-means backend stores labels as `u8`.
pub const MAX_CLUSTERS: usize = u8::MAX as usize;

/// Parameters of a single Lloyd run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterOptions {
    pub seed: u64,
    pub max_iterations: usize,
    pub convergence: f32,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence: DEFAULT_CONVERGENCE,
        }
    }
}

/// Per-pixel cluster labels from one k-means run.
#[derive(Debug, Clone)]
pub struct Assignment {
    pub k: usize,
    pub labels: Vec<usize>,
}

/// A non-empty cluster: the mean color of its members and how many there are.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    pub centroid: [f32; 3],
    pub member_count: usize,
}

impl Cluster {
    pub fn hex(&self) -> String {
        let [r, g, b] = self.centroid.map(channel_to_u8);
        format!("#{r:02x}{g:02x}{b:02x}")
    }
}

fn channel_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Hex color → share of the clustered pixels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Palette(BTreeMap<String, f64>);

impl Palette {
    pub fn get(&self, hex: &str) -> Option<f64> {
        self.0.get(hex).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(hex, share)| (hex.as_str(), *share))
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }
}

pub fn distinct_count(pixels: &[Pixel]) -> usize {
    pixels.iter().collect::<HashSet<_>>().len()
}

/// Run Lloyd's algorithm with k-means++ seeding and return one label per pixel.
pub fn kmeans(pixels: &[Pixel], k: usize, options: &ClusterOptions) -> Result<Assignment> {
    if pixels.is_empty() {
        return Err(PaletteError::InvalidInput("no pixels to cluster".into()));
    }
    let distinct = distinct_count(pixels);
    if k < 1 || k > distinct || k > MAX_CLUSTERS {
        return Err(PaletteError::InvalidK { k, distinct });
    }

    let buf: Vec<Srgb> = pixels
        .iter()
        .map(|&[r, g, b]| Srgb::<u8>::new(r, g, b).into_format::<f32>())
        .collect();
    let result = get_kmeans(
        k,
        options.max_iterations,
        options.convergence,
        false,
        &buf,
        options.seed,
    );

    Ok(Assignment {
        k,
        labels: result.indices.iter().map(|&i| i as usize).collect(),
    })
}

/// Cluster `pixels` into at most `k` groups. Groups that end up empty are
/// dropped, so fewer than `k` clusters may come back.
pub fn cluster(pixels: &[Pixel], k: usize, options: &ClusterOptions) -> Result<Vec<Cluster>> {
    let assignment = kmeans(pixels, k, options)?;
    Ok(summarize(pixels, &assignment))
}

fn summarize(pixels: &[Pixel], assignment: &Assignment) -> Vec<Cluster> {
    let mut sums = vec![[0u64; 3]; assignment.k];
    let mut counts = vec![0usize; assignment.k];
    for (pixel, &label) in pixels.iter().zip(&assignment.labels) {
        counts[label] += 1;
        for (acc, &c) in sums[label].iter_mut().zip(pixel) {
            *acc += c as u64;
        }
    }

    sums.iter()
        .zip(&counts)
        .filter(|&(_, &n)| n > 0)
        .map(|(sum, &n)| Cluster {
            centroid: (*sum).map(|s| (s as f64 / n as f64) as f32),
            member_count: n,
        })
        .collect()
}

/// Turn clusters into hex → fraction. Clusters that round to the same hex
/// string share one entry.
pub fn to_palette(clusters: &[Cluster]) -> Palette {
    let total: usize = clusters.iter().map(|c| c.member_count).sum();
    let mut shares = BTreeMap::new();
    if total == 0 {
        return Palette(shares);
    }
    for c in clusters.iter().filter(|c| c.member_count > 0) {
        *shares.entry(c.hex()).or_insert(0.0) += c.member_count as f64 / total as f64;
    }
    Palette(shares)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_hex(s: &str) -> bool {
        s.len() == 7
            && s.starts_with('#')
            && s[1..].chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    }

    fn two_tone(first: Pixel, n_first: usize, second: Pixel, n_second: usize) -> Vec<Pixel> {
        let mut pixels = vec![first; n_first];
        pixels.extend(std::iter::repeat_n(second, n_second));
        pixels
    }

    #[test]
    fn solid_red_is_one_full_cluster() {
        let pixels = vec![[255, 0, 0]; 100];
        let clusters = cluster(&pixels, 1, &ClusterOptions::default()).unwrap();
        let palette = to_palette(&clusters);
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.get("#ff0000"), Some(1.0));
    }

    #[test]
    fn shares_follow_member_counts() {
        let pixels = two_tone([0, 0, 255], 25, [255, 255, 255], 75);
        let palette = to_palette(&cluster(&pixels, 2, &ClusterOptions::default()).unwrap());
        assert_eq!(palette.get("#0000ff"), Some(0.25));
        assert_eq!(palette.get("#ffffff"), Some(0.75));
    }

    #[test]
    fn fractions_sum_to_one_and_keys_are_hex() {
        let pixels: Vec<Pixel> = (0..600u32)
            .map(|i| [(i * 7 % 256) as u8, (i * 13 % 256) as u8, (i * 29 % 256) as u8])
            .collect();
        for k in 1..=6 {
            let palette = to_palette(&cluster(&pixels, k, &ClusterOptions::default()).unwrap());
            assert!((palette.total() - 1.0).abs() < 1e-6, "k={k} total={}", palette.total());
            assert!(palette.iter().all(|(hex, share)| is_hex(hex) && share > 0.0 && share <= 1.0));
        }
    }

    #[test]
    fn centroid_is_member_mean() {
        let pixels = vec![[10, 20, 30], [12, 22, 32], [200, 200, 200], [202, 202, 202]];
        let mut clusters = cluster(&pixels, 2, &ClusterOptions::default()).unwrap();
        clusters.sort_by(|a, b| a.centroid[0].total_cmp(&b.centroid[0]));
        assert_eq!(clusters[0].centroid, [11.0, 21.0, 31.0]);
        assert_eq!(clusters[1].centroid, [201.0, 201.0, 201.0]);
        assert!(clusters.iter().all(|c| c.member_count == 2));
    }

    #[test]
    fn fixed_point_stop_terminates_with_clean_split() {
        let options = ClusterOptions { convergence: 0.0, max_iterations: 300, seed: 7 };
        let mut pixels = two_tone([250, 10, 10], 30, [10, 10, 250], 20);
        pixels.extend(std::iter::repeat_n([245, 12, 8], 10));
        let palette = to_palette(&cluster(&pixels, 2, &options).unwrap());
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.get("#0a0afa"), Some(20.0 / 60.0));
        assert!((palette.total() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn same_seed_same_labels() {
        let pixels: Vec<Pixel> = (0..300u32).map(|i| [(i % 256) as u8, (i / 2 % 256) as u8, 40]).collect();
        let options = ClusterOptions::default();
        let a = kmeans(&pixels, 4, &options).unwrap();
        let b = kmeans(&pixels, 4, &options).unwrap();
        assert_eq!(a.labels, b.labels);
    }

    #[test]
    fn impossible_k_is_rejected() {
        let pixels = two_tone([0, 0, 0], 10, [255, 255, 255], 10);
        let options = ClusterOptions::default();
        assert_eq!(
            cluster(&pixels, 0, &options).unwrap_err(),
            PaletteError::InvalidK { k: 0, distinct: 2 }
        );
        assert_eq!(
            cluster(&pixels, 3, &options).unwrap_err(),
            PaletteError::InvalidK { k: 3, distinct: 2 }
        );
        assert!(matches!(cluster(&[], 1, &options), Err(PaletteError::InvalidInput(_))));
    }

    #[test]
    fn hex_rounds_and_clamps() {
        let c = Cluster { centroid: [254.6, -3.0, 15.49], member_count: 1 };
        assert_eq!(c.hex(), "#ff000f");
        let c = Cluster { centroid: [300.0, 0.5, 127.5], member_count: 1 };
        assert_eq!(c.hex(), "#ff0180");
    }

    #[test]
    fn colliding_hex_keys_are_merged() {
        let clusters = [
            Cluster { centroid: [10.2, 10.0, 10.0], member_count: 1 },
            Cluster { centroid: [9.8, 10.0, 10.0], member_count: 3 },
        ];
        let palette = to_palette(&clusters);
        assert_eq!(palette.len(), 1);
        assert_eq!(palette.get("#0a0a0a"), Some(1.0));
    }
}
