use {
    crate::{Matrix, MatrixError, Result},
    serde::Serialize,
    std::time::Instant,
};

/// One timing line, same fields as the GPU and ScaLAPACK runners print.
#[derive(Debug, Clone, Serialize)]
pub struct BenchResult {
    pub method: &'static str,
    pub n: usize,
    pub iters: u32,
    pub time_ms: f64,
}

impl BenchResult {
    pub fn to_json(&self) -> String {
        // only plain numbers and a static str
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// `A * A^T + n * I` in row-major `f64`, symmetric positive definite for
/// any square `A`.
pub fn spd_from(m: &Matrix) -> Result<Vec<f64>> {
    let n = m.rows();
    if m.cols() != n {
        return Err(MatrixError::Shape {
            expected: n,
            rows: n,
            cols: m.cols(),
        });
    }

    let v = m.values();
    let mut s = vec![0.0; n * n];
    for i in 0..n {
        for j in 0..=i {
            let dot: f64 = (0..n)
                .map(|k| f64::from(v[i * n + k]) * f64::from(v[j * n + k]))
                .sum();
            s[i * n + j] = dot;
            s[j * n + i] = dot;
        }
        s[i * n + i] += n as f64;
    }
    Ok(s)
}

/// In-place lower Cholesky of a row-major `n x n` matrix. Only the lower
/// triangle is read; on success it holds `L` and the strict upper
/// triangle is zeroed.
pub fn factor_lower(a: &mut [f64], n: usize) -> Result<()> {
    for j in 0..n {
        let mut d = a[j * n + j];
        for k in 0..j {
            d -= a[j * n + k] * a[j * n + k];
        }
        if d.is_nan() || d <= 0.0 {
            return Err(MatrixError::NotPositiveDefinite { order: j + 1 });
        }
        let d = d.sqrt();
        a[j * n + j] = d;

        for i in j + 1..n {
            let mut s = a[i * n + j];
            for k in 0..j {
                s -= a[i * n + k] * a[j * n + k];
            }
            a[i * n + j] = s / d;
        }
        for k in j + 1..n {
            a[j * n + k] = 0.0;
        }
    }
    Ok(())
}

/// Factors `spd_from(m)` `iters` times and reports the mean wall time.
pub fn bench(m: &Matrix, iters: u32) -> Result<BenchResult> {
    let spd = spd_from(m)?;
    let n = m.rows();

    let mut total_ms = 0.0;
    for _ in 0..iters {
        let mut a = spd.clone();
        let start = Instant::now();
        factor_lower(&mut a, n)?;
        total_ms += start.elapsed().as_secs_f64() * 1e3;
    }
    log::debug!("factored {n}x{n} {iters} times in {total_ms:.3} ms");

    Ok(BenchResult {
        method: "cpu",
        n,
        iters,
        time_ms: total_ms / f64::from(iters.max(1)),
    })
}
