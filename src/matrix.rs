//! Basis matrices for the (2,2) pixel expansion scheme

use nalgebra::Matrix2x4;
use rand::{seq::SliceRandom, Rng};

/// Rows are shares, columns are the four sub-pixels of a 2x2 block
pub type BasisMatrix = Matrix2x4<u8>;

/// Sub-pixels per expanded block
pub const SUBPIXELS: usize = 4;

/// Both shares get the same half-black pattern
pub fn white_matrix() -> BasisMatrix {
    BasisMatrix::new(
        1, 1, 0, 0, //
        1, 1, 0, 0,
    )
}

/// The shares get complementary half-black patterns
pub fn black_matrix() -> BasisMatrix {
    BasisMatrix::new(
        1, 1, 0, 0, //
        0, 0, 1, 1,
    )
}

/// Pick the basis for an internal secret bit (1 = black)
pub fn basis_for(bit: u8) -> BasisMatrix {
    if bit == 1 {
        black_matrix()
    } else {
        white_matrix()
    }
}

/// Apply one uniformly random column permutation to both rows
pub fn permute_columns<R>(matrix: &BasisMatrix, rng: &mut R) -> BasisMatrix
where
    R: Rng + ?Sized,
{
    let mut columns: [usize; SUBPIXELS] = [0, 1, 2, 3];
    columns.shuffle(rng);
    BasisMatrix::from_fn(|row, col| matrix[(row, columns[col])])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn row_sum(matrix: &BasisMatrix, row: usize) -> u8 {
        matrix.row(row).iter().sum()
    }

    #[test]
    fn test_basis_shapes() {
        let white = white_matrix();
        let black = black_matrix();
        assert_eq!(white.nrows(), 2);
        assert_eq!(white.ncols(), SUBPIXELS);

        // Every row is half black
        for row in 0..2 {
            assert_eq!(row_sum(&white, row), 2);
            assert_eq!(row_sum(&black, row), 2);
        }

        // White rows coincide, black rows are complements
        assert_eq!(white.row(0), white.row(1));
        for col in 0..SUBPIXELS {
            assert_eq!(black[(0, col)] + black[(1, col)], 1);
        }
    }

    #[test]
    fn test_basis_for() {
        assert_eq!(basis_for(0), white_matrix());
        assert_eq!(basis_for(1), black_matrix());
    }

    #[test]
    fn test_permutation_keeps_row_correspondence() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..32 {
            let white = permute_columns(&white_matrix(), &mut rng);
            assert_eq!(white.row(0), white.row(1));
            assert_eq!(row_sum(&white, 0), 2);

            let black = permute_columns(&black_matrix(), &mut rng);
            for col in 0..SUBPIXELS {
                assert_eq!(black[(0, col)] | black[(1, col)], 1);
            }
        }
    }

    #[test]
    fn test_permutation_covers_all_arrangements() {
        // C(4,2) = 6 half-black arrangements should all show up.
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..500 {
            let m = permute_columns(&white_matrix(), &mut rng);
            seen.insert([m[(0, 0)], m[(0, 1)], m[(0, 2)], m[(0, 3)]]);
        }
        assert_eq!(seen.len(), 6);
    }
}
