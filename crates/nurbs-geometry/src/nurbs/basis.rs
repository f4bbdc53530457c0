//! B-spline basis functions and their derivatives.

// Knot and basis arrays keep the single-letter names of the textbook
// recurrences they implement.
#![allow(non_snake_case)]

/// `num / den`, treating a zero denominator as a zero term.
#[inline]
fn ratio(num: f64, den: f64) -> f64 {
    if den == 0.0 {
        0.0
    } else {
        num / den
    }
}

/// Evaluate the single basis function `N_{i,p}(u)` over `knots`.
///
/// Cox–de Boor on a triangular table of `p + 1` entries rather than the
/// recursive definition. The first basis function is 1 at `knots[0]` and the
/// last is 1 at `knots[m]`, closing the half-open support at both ends.
pub fn basis_function(i: usize, degree: usize, u: f64, knots: &[f64]) -> f64 {
    let p = degree;
    let U = knots;
    if U.len() < p + 2 || i + p + 1 >= U.len() {
        return 0.0;
    }
    let m = U.len() - 1;

    if (i == 0 && u == U[0]) || (i == m - p - 1 && u == U[m]) {
        return 1.0;
    }
    // Local support
    if u < U[i] || u >= U[i + p + 1] {
        return 0.0;
    }

    // Degree 0 functions
    let mut N: Vec<f64> = (0..=p)
        .map(|j| {
            if u >= U[i + j] && u < U[i + j + 1] {
                1.0
            } else {
                0.0
            }
        })
        .collect();

    for k in 1..=p {
        let mut saved = if N[0] == 0.0 {
            0.0
        } else {
            ratio((u - U[i]) * N[0], U[i + k] - U[i])
        };
        for j in 0..(p - k + 1) {
            let u_left = U[i + j + 1];
            let u_right = U[i + j + k + 1];
            if N[j + 1] == 0.0 {
                N[j] = saved;
                saved = 0.0;
            } else {
                let temp = ratio(N[j + 1], u_right - u_left);
                N[j] = saved + (u_right - u) * temp;
                saved = (u - u_left) * temp;
            }
        }
    }

    N[0]
}

/// Values of every basis function `N_{0..n,p}(u)` for a vector supporting
/// `count` control points.
pub fn basis_row(count: usize, degree: usize, u: f64, knots: &[f64]) -> Vec<f64> {
    (0..count)
        .map(|i| basis_function(i, degree, u, knots))
        .collect()
}

/// Compute the non-vanishing basis functions on `span` and their derivatives
/// up to and including order `order`.
///
/// Returns `ders[k][j]`, the `k`-th derivative of `N_{span-degree+j,degree}`
/// at `t`, for `k` in `0..=order` and `j` in `0..=degree`. Rows above
/// `degree` are zero.
///
/// # Arguments
/// * `span` - The knot span index (from `find_span`)
/// * `degree` - Degree of the B-spline
/// * `order` - Highest derivative order requested
/// * `knots` - The knot vector
/// * `t` - Parameter value
pub fn basis_function_derivatives(
    span: usize,
    degree: usize,
    order: usize,
    knots: &[f64],
    t: f64,
) -> Vec<Vec<f64>> {
    let p = degree;
    let n = order.min(p);
    let mut ders = vec![vec![0.0; p + 1]; order + 1];

    // ndu[j][r] holds basis values in the upper triangle and knot
    // differences in the lower triangle.
    let mut ndu = vec![vec![0.0; p + 1]; p + 1];
    let mut left = vec![0.0; p + 1];
    let mut right = vec![0.0; p + 1];
    ndu[0][0] = 1.0;

    for j in 1..=p {
        left[j] = t - knots[span + 1 - j];
        right[j] = knots[span + j] - t;
        let mut saved = 0.0;

        for r in 0..j {
            // Lower triangle
            ndu[j][r] = right[r + 1] + left[j - r];
            let temp = ratio(ndu[r][j - 1], ndu[j][r]);

            // Upper triangle
            ndu[r][j] = saved + right[r + 1] * temp;
            saved = left[j - r] * temp;
        }
        ndu[j][j] = saved;
    }

    for j in 0..=p {
        ders[0][j] = ndu[j][p];
    }

    // Two alternating rows of derivative coefficients.
    let mut a = vec![vec![0.0; p + 1]; 2];
    for r in 0..=p {
        let mut s1 = 0;
        let mut s2 = 1;
        a[0][0] = 1.0;

        for k in 1..=n {
            let mut d = 0.0;
            let rk = r as isize - k as isize;
            let pk = p - k;

            if rk >= 0 {
                let rk = rk as usize;
                a[s2][0] = ratio(a[s1][0], ndu[pk + 1][rk]);
                d = a[s2][0] * ndu[rk][pk];
            }

            let j1 = if rk >= -1 { 1 } else { (-rk) as usize };
            let j2 = if r as isize - 1 <= pk as isize { k - 1 } else { p - r };

            for j in j1..=j2 {
                let idx = (rk + j as isize) as usize;
                a[s2][j] = ratio(a[s1][j] - a[s1][j - 1], ndu[pk + 1][idx]);
                d += a[s2][j] * ndu[idx][pk];
            }

            if r <= pk {
                a[s2][k] = ratio(-a[s1][k - 1], ndu[pk + 1][r]);
                d += a[s2][k] * ndu[r][pk];
            }

            ders[k][r] = d;
            std::mem::swap(&mut s1, &mut s2);
        }
    }

    // Multiply through by p (p-1) ... (p-k+1)
    let mut factor = p as f64;
    for k in 1..=n {
        for d in &mut ders[k] {
            *d *= factor;
        }
        factor *= (p - k) as f64;
    }

    ders
}
