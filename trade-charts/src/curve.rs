//! Monotone cubic interpolation along x, used to smooth band edges.
//!
//! Tangents follow Steffen's method, so the curve never overshoots the data:
//! adjacent stacked bands share identical knots and therefore identical edges.

fn sign(value: f64) -> f64 {
    if value < 0.0 {
        -1.0
    } else if value > 0.0 {
        1.0
    } else {
        0.0
    }
}

fn tangents(points: &[(f64, f64)]) -> Vec<f64> {
    let n = points.len();
    let secants: Vec<f64> = points
        .windows(2)
        .map(|w| {
            let h = w[1].0 - w[0].0;
            if h == 0.0 {
                0.0
            } else {
                (w[1].1 - w[0].1) / h
            }
        })
        .collect();
    let mut tangents = vec![0.0; n];
    tangents[0] = secants[0];
    tangents[n - 1] = secants[n - 2];
    for k in 1..n - 1 {
        let (s0, s1) = (secants[k - 1], secants[k]);
        let h0 = points[k].0 - points[k - 1].0;
        let h1 = points[k + 1].0 - points[k].0;
        let p = if h0 + h1 == 0.0 {
            0.0
        } else {
            (s0 * h1 + s1 * h0) / (h0 + h1)
        };
        tangents[k] = (sign(s0) + sign(s1)) * s0.abs().min(s1.abs()).min(0.5 * p.abs());
    }
    tangents
}

/// Samples the monotone curve through `points` (sorted by x) with
/// `samples_per_segment` points per interval. The knots themselves are always
/// part of the output.
pub fn monotone_x(points: &[(f64, f64)], samples_per_segment: usize) -> Vec<(f64, f64)> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let samples = samples_per_segment.max(1);
    let m = tangents(points);
    let mut out = Vec::with_capacity(1 + (points.len() - 1) * samples);
    out.push(points[0]);
    for (k, w) in points.windows(2).enumerate() {
        let ((x0, y0), (x1, y1)) = (w[0], w[1]);
        let h = x1 - x0;
        for s in 1..samples {
            let t = s as f64 / samples as f64;
            let (t2, t3) = (t * t, t * t * t);
            let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
            let h10 = t3 - 2.0 * t2 + t;
            let h01 = -2.0 * t3 + 3.0 * t2;
            let h11 = t3 - t2;
            out.push((
                x0 + t * h,
                h00 * y0 + h10 * h * m[k] + h01 * y1 + h11 * h * m[k + 1],
            ));
        }
        out.push(w[1]);
    }
    out
}
