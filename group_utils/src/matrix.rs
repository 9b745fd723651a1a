//! A fixed-width engine computing a two-dimensional array of pairing-products.
//! Tasks are enqueued with the cell they target; `result` drains the queue on a
//! dedicated worker pool and returns the filled matrix. Each task owns its cell,
//! so no synchronization beyond joining the pool is needed, and nothing is
//! observable until every task has finished.

use ark_ec::pairing::{Pairing, PairingOutput};
use ark_std::{vec, vec::Vec};

#[cfg(feature = "parallel")]
use ark_std::string::ToString;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::error::GroupError;
use crate::pairing_product::{pairing_product, PairingProductMode, PairingTerm};

/// Rectangular sparse matrix of target-group elements.
pub type GtMatrix<E> = Vec<Vec<Option<PairingOutput<E>>>>;

struct Task<E: Pairing> {
    terms: Vec<Option<PairingTerm<E>>>,
    row: usize,
    col: usize,
}

pub struct PairingMatrixComputer<E: Pairing> {
    width: usize,
    tasks: Vec<Task<E>>,
    matrix: GtMatrix<E>,
}

impl<E: Pairing> PairingMatrixComputer<E> {
    /// `width` is the number of workers the tasks will be spread over.
    pub fn new(width: usize, rows: usize, cols: usize) -> Self {
        Self {
            width: width.max(1),
            tasks: Vec::new(),
            matrix: vec![vec![None; cols]; rows],
        }
    }

    /// Submits a task computing `matrix[row][col]`. Cells must be distinct
    /// across submissions; rows and cols must fit the dimensions given to
    /// [`Self::new`].
    pub fn enqueue(&mut self, terms: Vec<Option<PairingTerm<E>>>, row: usize, col: usize) {
        debug_assert!(row < self.matrix.len() && col < self.matrix[row].len());
        self.tasks.push(Task { terms, row, col });
    }

    /// Closes the queue, evaluates every pending task and returns the matrix.
    pub fn result(mut self) -> Result<GtMatrix<E>, GroupError> {
        #[cfg(feature = "parallel")]
        let cells = {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.width)
                .build()
                .map_err(|e| GroupError::WorkerPool(e.to_string()))?;
            pool.install(|| {
                self.tasks
                    .into_par_iter()
                    .map(|t| {
                        (
                            t.row,
                            t.col,
                            pairing_product(&t.terms, PairingProductMode::UnrolledPairs),
                        )
                    })
                    .collect::<Vec<_>>()
            })
        };
        #[cfg(not(feature = "parallel"))]
        let cells = self
            .tasks
            .into_iter()
            .map(|t| {
                (
                    t.row,
                    t.col,
                    pairing_product(&t.terms, PairingProductMode::UnrolledPairs),
                )
            })
            .collect::<Vec<_>>();

        for (row, col, value) in cells {
            self.matrix[row][col] = Some(value);
        }
        Ok(self.matrix)
    }
}

/// Flattens the matrix row by row, stopping at the first empty cell of each
/// row. Row lengths stay implicit, which keeps the flattened form stable for
/// transcript hashing.
pub fn compact_cells<E: Pairing>(matrix: &GtMatrix<E>) -> Vec<PairingOutput<E>> {
    matrix
        .iter()
        .flat_map(|row| row.iter().take_while(|c| c.is_some()).flatten().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::group::{GroupElem, SourceGroup};
    use ark_bls12_381::Bls12_381;
    use ark_std::rand::{rngs::StdRng, SeedableRng};
    use ark_std::UniformRand;

    type Fr = <Bls12_381 as Pairing>::ScalarField;
    type G = GroupElem<Bls12_381>;

    fn rand_task(rng: &mut StdRng, n: usize) -> Vec<Option<PairingTerm<Bls12_381>>> {
        (0..n)
            .map(|_| {
                let a = G::rand(rng, SourceGroup::G1);
                let b = G::rand(rng, SourceGroup::G2);
                Some(PairingTerm::new(&a, &b, Some(Fr::rand(rng))).unwrap())
            })
            .collect()
    }

    #[test]
    fn matches_sequential_reference() {
        let mut rng = StdRng::seed_from_u64(0u64);
        let (rows, cols) = (3usize, 4usize);

        let mut tasks = Vec::new();
        for i in 0..rows {
            for j in 0..cols - i {
                tasks.push((rand_task(&mut rng, 1 + (i + j) % 3), i, j));
            }
        }

        let mut reference: GtMatrix<Bls12_381> = vec![vec![None; cols]; rows];
        for (terms, i, j) in &tasks {
            reference[*i][*j] =
                Some(pairing_product(terms, PairingProductMode::UnrolledPairs));
        }

        let mut ec = PairingMatrixComputer::new(rows, rows, cols);
        for (terms, i, j) in tasks {
            ec.enqueue(terms, i, j);
        }
        let result = ec.result().unwrap();
        assert_eq!(result, reference);
    }

    #[test]
    fn compact_stops_at_first_hole() {
        let mut rng = StdRng::seed_from_u64(1u64);

        let mut ec = PairingMatrixComputer::new(2, 2, 3);
        let t00 = rand_task(&mut rng, 1);
        let t01 = rand_task(&mut rng, 2);
        let t12 = rand_task(&mut rng, 1);
        let c00 = pairing_product(&t00, PairingProductMode::UnrolledPairs);
        let c01 = pairing_product(&t01, PairingProductMode::UnrolledPairs);
        ec.enqueue(t00, 0, 0);
        ec.enqueue(t01, 0, 1);
        // Row 1 starts with a hole, so its later cell must not be hashed.
        ec.enqueue(t12, 1, 2);

        let matrix = ec.result().unwrap();
        assert_eq!(compact_cells(&matrix), vec![c00, c01]);
    }
}
