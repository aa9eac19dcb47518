//! Radix-2 FFT and FFT-based correlation.

use std::f64::consts::PI;

/// Returns the smallest power of two `>= n` (and at least 1).
pub fn next_pow2(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// In-place forward FFT. `re` and `im` must share a power-of-two length.
pub fn fft(re: &mut [f64], im: &mut [f64]) {
    transform(re, im, false);
}

/// In-place inverse FFT, scaled by `1/n`.
pub fn ifft(re: &mut [f64], im: &mut [f64]) {
    transform(re, im, true);
    let scale = 1.0 / re.len().max(1) as f64;
    for v in re.iter_mut().chain(im.iter_mut()) {
        *v *= scale;
    }
}

/// Linear cross-correlation `c[k] = sum_j a[j] * b[j + k]` for
/// `k in 0..=max_lag`.
///
/// Zero padding to `next_pow2(a.len() + b.len())` keeps the circular
/// product from wrapping.
pub fn cross_correlate(a: &[f64], b: &[f64], max_lag: usize) -> Vec<f64> {
    let n = next_pow2(a.len() + b.len());

    let mut a_re = vec![0.0; n];
    let mut a_im = vec![0.0; n];
    let mut b_re = vec![0.0; n];
    let mut b_im = vec![0.0; n];
    a_re[..a.len()].copy_from_slice(a);
    b_re[..b.len()].copy_from_slice(b);

    fft(&mut a_re, &mut a_im);
    fft(&mut b_re, &mut b_im);

    // conj(A) * B
    for i in 0..n {
        let (ar, ai) = (a_re[i], -a_im[i]);
        let (br, bi) = (b_re[i], b_im[i]);
        a_re[i] = ar * br - ai * bi;
        a_im[i] = ar * bi + ai * br;
    }
    ifft(&mut a_re, &mut a_im);

    a_re.truncate((max_lag + 1).min(n));
    a_re
}

fn transform(re: &mut [f64], im: &mut [f64], inverse: bool) {
    let n = re.len();
    debug_assert_eq!(n, im.len());
    if n <= 1 {
        return;
    }

    // Bit-reversal permutation
    let mut j = 0usize;
    for i in 0..n - 1 {
        if i < j {
            re.swap(i, j);
            im.swap(i, j);
        }
        let mut k = n >> 1;
        while k <= j {
            j -= k;
            k >>= 1;
        }
        j += k;
    }

    let sign = if inverse { 1.0 } else { -1.0 };
    let mut size = 2;
    while size <= n {
        let half = size >> 1;
        let angle = sign * 2.0 * PI / size as f64;
        let (w_r, w_i) = (angle.cos(), angle.sin());

        for start in (0..n).step_by(size) {
            let (mut t_r, mut t_i) = (1.0, 0.0);
            for k in 0..half {
                let u = start + k;
                let v = u + half;

                let x_r = t_r * re[v] - t_i * im[v];
                let x_i = t_r * im[v] + t_i * re[v];
                re[v] = re[u] - x_r;
                im[v] = im[u] - x_i;
                re[u] += x_r;
                im[u] += x_i;

                let next_r = t_r * w_r - t_i * w_i;
                t_i = t_r * w_i + t_i * w_r;
                t_r = next_r;
            }
        }
        size <<= 1;
    }
}
