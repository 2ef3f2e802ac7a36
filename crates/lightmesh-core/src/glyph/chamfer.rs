//! Two-pass 4-neighbor chamfer distance transform
//!
//! Distances are Manhattan steps to the nearest covered pixel. Exact along
//! axis-aligned paths, an overestimate along diagonals.

/// Initial distance for uncovered pixels
pub const FAR: f32 = 1e4;

/// Compute the chamfer distance for a row-major coverage mask
///
/// Covered pixels get 0. Uncovered pixels with no covered pixel anywhere in
/// the grid keep [`FAR`].
pub fn chamfer_distance(coverage: &[bool], width: usize, height: usize) -> Vec<f32> {
    debug_assert_eq!(coverage.len(), width * height);

    let mut dist: Vec<f32> = coverage
        .iter()
        .map(|&covered| if covered { 0.0 } else { FAR })
        .collect();

    // Forward: top-left to bottom-right
    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            if dist[idx] > 0.0 {
                if y > 0 {
                    dist[idx] = dist[idx].min(dist[idx - width] + 1.0);
                }
                if x > 0 {
                    dist[idx] = dist[idx].min(dist[idx - 1] + 1.0);
                }
            }
        }
    }

    // Backward: bottom-right to top-left
    for y in (0..height).rev() {
        for x in (0..width).rev() {
            let idx = y * width + x;
            if dist[idx] > 0.0 {
                if y + 1 < height {
                    dist[idx] = dist[idx].min(dist[idx + width] + 1.0);
                }
                if x + 1 < width {
                    dist[idx] = dist[idx].min(dist[idx + 1] + 1.0);
                }
            }
        }
    }

    dist
}
