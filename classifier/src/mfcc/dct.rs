//! Orthonormal DCT-II basis for cepstral decorrelation.

use std::f64::consts::PI;

/// Precomputes an orthonormal DCT-II basis.
///
/// Returns `[n_out][n_in]`; multiplying a length-`n_in` log-mel row by the
/// basis yields the first `n_out` cepstral coefficients.
pub fn dct_basis(n_out: usize, n_in: usize) -> Vec<Vec<f64>> {
    let mut basis = Vec::with_capacity(n_out);
    for k in 0..n_out {
        let scale = if k == 0 {
            (1.0 / n_in as f64).sqrt()
        } else {
            (2.0 / n_in as f64).sqrt()
        };
        let row: Vec<f64> = (0..n_in)
            .map(|m| scale * (PI * k as f64 * (2 * m + 1) as f64 / (2 * n_in) as f64).cos())
            .collect();
        basis.push(row);
    }
    basis
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constant_input_maps_to_first_coefficient() {
        let basis = dct_basis(4, 8);
        let input = vec![3.0f64; 8];

        let coeffs: Vec<f64> = basis
            .iter()
            .map(|row| row.iter().zip(input.iter()).map(|(b, x)| b * x).sum())
            .collect();

        // c0 = 3 * sqrt(8), all higher coefficients vanish.
        assert!((coeffs[0] - 3.0 * 8.0_f64.sqrt()).abs() < 1e-10);
        for &c in &coeffs[1..] {
            assert!(c.abs() < 1e-10);
        }
    }

    #[test]
    fn basis_rows_are_orthonormal() {
        let n = 16;
        let basis = dct_basis(n, n);
        for i in 0..n {
            for j in 0..n {
                let dot: f64 = basis[i]
                    .iter()
                    .zip(basis[j].iter())
                    .map(|(a, b)| a * b)
                    .sum();
                let expect = if i == j { 1.0 } else { 0.0 };
                assert!(
                    (dot - expect).abs() < 1e-10,
                    "rows {i},{j}: dot {dot}, expected {expect}"
                );
            }
        }
    }
}
