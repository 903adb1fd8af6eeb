//! Binary label clean-up.
//!
//! Turns a propagated probability map into one solid structure: threshold,
//! fill enclosed holes, keep the largest face-connected component.

use std::collections::VecDeque;
use burn::tensor::backend::Backend;
use crate::image::{Image, PixelType};

/// Face-connected neighbours of `offset` in a `[Z, Y, X]` grid.
fn neighbours(offset: usize, shape: [usize; 3]) -> impl Iterator<Item = usize> {
    let [d, h, w] = shape;
    let x = offset % w;
    let y = (offset / w) % h;
    let z = offset / (w * h);
    let plane = w * h;

    let candidates = [
        (x > 0).then(|| offset - 1),
        (x + 1 < w).then(|| offset + 1),
        (y > 0).then(|| offset - w),
        (y + 1 < h).then(|| offset + w),
        (z > 0).then(|| offset - plane),
        (z + 1 < d).then(|| offset + plane),
    ];
    candidates.into_iter().flatten()
}

fn on_border(offset: usize, shape: [usize; 3]) -> bool {
    let [d, h, w] = shape;
    let x = offset % w;
    let y = (offset / w) % h;
    let z = offset / (w * h);
    x == 0 || y == 0 || z == 0 || x + 1 == w || y + 1 == h || z + 1 == d
}

/// Flood from `seeds` through voxels where `passable` holds; returns the visited set.
fn flood(mask: &[bool], shape: [usize; 3], seeds: impl IntoIterator<Item = usize>, passable: bool) -> Vec<bool> {
    let mut visited = vec![false; mask.len()];
    let mut queue = VecDeque::new();
    for seed in seeds {
        if mask[seed] == passable && !visited[seed] {
            visited[seed] = true;
            queue.push_back(seed);
        }
    }
    while let Some(offset) = queue.pop_front() {
        for next in neighbours(offset, shape) {
            if mask[next] == passable && !visited[next] {
                visited[next] = true;
                queue.push_back(next);
            }
        }
    }
    visited
}

/// `t <= v <= 1` becomes foreground.
pub fn binary_threshold(values: &[f32], threshold: f32) -> Vec<bool> {
    values.iter().map(|&v| v >= threshold && v <= 1.0).collect()
}

/// Background not reachable from the volume border becomes foreground.
pub fn fill_holes(mask: &[bool], shape: [usize; 3]) -> Vec<bool> {
    let border = (0..mask.len()).filter(|&o| on_border(o, shape));
    let outside = flood(mask, shape, border, false);
    mask.iter()
        .zip(outside)
        .map(|(&fg, reached)| fg || !reached)
        .collect()
}

/// Keep only the largest face-connected foreground component.
///
/// Ties keep the component found first in tensor order.
pub fn largest_component(mask: &[bool], shape: [usize; 3]) -> Vec<bool> {
    let mut labels = vec![0u32; mask.len()];
    let mut best = (0u32, 0usize);
    let mut next_label = 0u32;
    let mut queue = VecDeque::new();

    for start in 0..mask.len() {
        if !mask[start] || labels[start] != 0 {
            continue;
        }
        next_label += 1;
        labels[start] = next_label;
        queue.push_back(start);
        let mut count = 0usize;
        while let Some(offset) = queue.pop_front() {
            count += 1;
            for next in neighbours(offset, shape) {
                if mask[next] && labels[next] == 0 {
                    labels[next] = next_label;
                    queue.push_back(next);
                }
            }
        }
        if count > best.1 {
            best = (next_label, count);
        }
    }

    labels.into_iter().map(|l| l != 0 && l == best.0).collect()
}

/// Threshold, fill holes and keep the largest component; output is Int32 {0, 1}.
pub fn clean_probability_map<B: Backend>(image: &Image<B, 3>, threshold: f32) -> Image<B, 3> {
    let shape = image.shape();
    let mask = binary_threshold(&image.to_vec(), threshold);
    let filled = fill_holes(&mask, shape);
    let largest = largest_component(&filled, shape);

    let (foreground, total) = (largest.iter().filter(|&&v| v).count(), largest.len());
    tracing::debug!(foreground, total, "probability map cleaned");

    let values = largest.into_iter().map(|v| if v { 1.0 } else { 0.0 }).collect();
    Image::from_values(values, shape, *image.metadata(), PixelType::Int32, &image.data().device())
}
