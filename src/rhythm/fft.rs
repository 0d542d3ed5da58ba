//! Radix-2 FFT and Hilbert envelope extraction.
//!
//! Small in-crate Cooley-Tukey implementation; envelope extraction needs the
//! full complex transform once per assessment, so no external FFT dependency
//! is warranted.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    fn add(self, other: Self) -> Self {
        Self::new(self.re + other.re, self.im + other.im)
    }

    fn sub(self, other: Self) -> Self {
        Self::new(self.re - other.re, self.im - other.im)
    }

    fn mul(self, other: Self) -> Self {
        Self::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re,
        )
    }

    fn scale(self, k: f64) -> Self {
        Self::new(self.re * k, self.im * k)
    }

    pub fn abs(self) -> f64 {
        self.re.hypot(self.im)
    }
}

/// In-place iterative Cooley-Tukey FFT. `buf.len()` must be a power of two.
pub(crate) fn fft_in_place(buf: &mut [Complex], inverse: bool) {
    let n = buf.len();
    debug_assert!(n.is_power_of_two());

    // Bit-reversal permutation
    let mut j = 0;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j |= bit;
        if i < j {
            buf.swap(i, j);
        }
    }

    let sign = if inverse { 1.0 } else { -1.0 };
    let mut len = 2;
    while len <= n {
        let angle = sign * 2.0 * std::f64::consts::PI / len as f64;
        let w_len = Complex::new(angle.cos(), angle.sin());
        for start in (0..n).step_by(len) {
            let mut w = Complex::new(1.0, 0.0);
            for k in 0..len / 2 {
                let u = buf[start + k];
                let v = buf[start + k + len / 2].mul(w);
                buf[start + k] = u.add(v);
                buf[start + k + len / 2] = u.sub(v);
                w = w.mul(w_len);
            }
        }
        len <<= 1;
    }

    if inverse {
        let norm = 1.0 / n as f64;
        for c in buf.iter_mut() {
            *c = c.scale(norm);
        }
    }
}

/// Magnitude of the analytic signal (Hilbert envelope) of `samples`.
///
/// The input is zero-padded to the next power of two for the transform; only
/// the first `samples.len()` envelope values are returned.
pub(crate) fn hilbert_envelope(samples: &[f64]) -> Vec<f64> {
    let n = samples.len();
    let size = n.next_power_of_two();

    let mut buf: Vec<Complex> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    buf.resize(size, Complex::default());
    fft_in_place(&mut buf, false);

    // Analytic signal: keep DC and Nyquist, double positive frequencies,
    // zero the negative half.
    for value in buf.iter_mut().take(size / 2).skip(1) {
        *value = value.scale(2.0);
    }
    for value in buf.iter_mut().skip(size / 2 + 1) {
        *value = Complex::default();
    }

    fft_in_place(&mut buf, true);
    buf[..n].iter().map(|c| c.abs()).collect()
}
