//! Two-dimensional Geometric Moments

/// Number of moments of total order `0..=order`
pub fn moment_count(order: usize) -> usize {
    (order + 1) * (order + 2) / 2
}

/// Normalised geometric moments of a non-negative 2-D image.
///
/// `rows[t][b]` is treated as mass at `(t, b)`, with coordinates scaled to
/// `[0, 1]`. Moments are emitted by increasing total order `p + q`, and by
/// decreasing `p` within an order: `m00, m10, m01, m20, m11, m02, …`.
/// `m00` is the total mass, every other moment is divided by it.
/// Ragged rows are truncated to the shortest; an empty or massless image
/// yields zeros.
pub fn area_moments(rows: &[&[f64]], order: usize) -> Vec<f64> {
    let count = moment_count(order);
    let height = rows.len();
    let width = rows.iter().map(|r| r.len()).min().unwrap_or(0);
    if height == 0 || width == 0 {
        return vec![0.0; count];
    }

    let total: f64 = rows.iter().flat_map(|r| r[..width].iter()).sum();
    if total.abs() <= crate::SILENCE_FLOOR {
        return vec![0.0; count];
    }

    let scale = |i: usize, n: usize| if n > 1 { i as f64 / (n - 1) as f64 } else { 0.0 };
    let mut result = Vec::with_capacity(count);
    for total_order in 0..=order {
        for q in 0..=total_order {
            let p = total_order - q;
            if total_order == 0 {
                result.push(total);
                continue;
            }
            let mut moment = 0.0;
            for (t, row) in rows.iter().enumerate() {
                let x = scale(t, height).powi(p as i32);
                for (b, &mass) in row[..width].iter().enumerate() {
                    moment += x * scale(b, width).powi(q as i32) * mass;
                }
            }
            result.push(moment / total);
        }
    }
    result
}
