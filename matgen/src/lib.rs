pub mod cholesky;
pub mod error;
pub mod models;

pub use error::{MatrixError, Result};

use {
    models::{MatrixModel, csv_reader, csv_writer},
    rand::Rng,
    rand_distr::{Distribution, StandardNormal},
    std::{
        fs::File,
        path::{Path, PathBuf},
    },
};

pub const MATRIX_SIZE: usize = 32;

pub const DATA_DIR: &str = "data";
pub const FIRST_FILE: &str = "data1.csv";
pub const SECOND_FILE: &str = "data2.csv";

/// Dense row-major grid of `f32`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl Matrix {
    /// Every entry drawn independently from N(0, 1).
    pub fn standard_normal<R>(rows: usize, cols: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        log::debug!("sampling {rows}x{cols} standard normal matrix");
        let data = (0..rows * cols)
            .map(|_| -> f32 { StandardNormal.sample(&mut *rng) })
            .collect();
        Self { rows, cols, data }
    }

    /// Same as [`Matrix::standard_normal`] with the thread-local, OS-seeded RNG.
    pub fn random_standard_normal(rows: usize, cols: usize) -> Self {
        Self::standard_normal(rows, cols, &mut rand::rng())
    }

    pub fn from_rows(lines: Vec<Vec<f32>>) -> Result<Self> {
        let rows = lines.len();
        let cols = lines.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows * cols);
        for (row, line) in lines.into_iter().enumerate() {
            if line.len() != cols {
                return Err(MatrixError::RaggedRow {
                    row,
                    expected: cols,
                    found: line.len(),
                });
            }
            data.extend(line);
        }
        Ok(Self { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f32]> {
        // chunks_exact panics on 0
        self.data.chunks_exact(self.cols.max(1)).take(self.rows)
    }

    pub fn values(&self) -> &[f32] {
        &self.data
    }

    pub fn is_square(&self, size: usize) -> bool {
        self.rows == size && self.cols == size
    }

    /// `None` for an empty matrix.
    pub fn summary(&self) -> Option<Summary> {
        if self.data.is_empty() {
            return None;
        }
        let n = self.data.len() as f64;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut sum = 0.0;
        for &v in &self.data {
            let v = f64::from(v);
            min = min.min(v);
            max = max.max(v);
            sum += v;
        }
        let mean = sum / n;
        let var = self
            .data
            .iter()
            .map(|&v| (f64::from(v) - mean).powi(2))
            .sum::<f64>()
            / n;

        Some(Summary {
            min,
            max,
            mean,
            std_dev: var.sqrt(),
        })
    }
}

/// Truncates or creates `path`; the parent directory must already exist.
pub fn save_csv(path: &Path, matrix: &Matrix) -> Result<()> {
    let file = File::create(path).map_err(|source| MatrixError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    MatrixModel::from(matrix).serialize_csv(&mut csv_writer(file))?;
    log::info!(
        "wrote {}x{} matrix to {}",
        matrix.rows,
        matrix.cols,
        path.display()
    );
    Ok(())
}

pub fn load_csv(path: &Path) -> Result<Matrix> {
    let file = File::open(path).map_err(|source| MatrixError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    MatrixModel::deserialize_csv(&mut csv_reader(file))?.try_into()
}

/// What lands in the second output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SecondOutput {
    /// The second, independently sampled matrix.
    #[default]
    Fresh,
    /// The first matrix again; the second is still sampled and dropped.
    /// Matches the behavior of the script this tool replaces.
    RepeatFirst,
}

#[derive(Debug, Clone)]
pub struct Generator {
    pub out_dir: PathBuf,
    pub second: SecondOutput,
}

impl Default for Generator {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DATA_DIR),
            second: SecondOutput::default(),
        }
    }
}

impl Generator {
    pub fn new(out_dir: impl Into<PathBuf>, second: SecondOutput) -> Self {
        Self {
            out_dir: out_dir.into(),
            second,
        }
    }

    pub fn first_path(&self) -> PathBuf {
        self.out_dir.join(FIRST_FILE)
    }

    pub fn second_path(&self) -> PathBuf {
        self.out_dir.join(SECOND_FILE)
    }

    pub fn run(&self) -> Result<[PathBuf; 2]> {
        self.run_with(&mut rand::rng())
    }

    pub fn run_with<R>(&self, rng: &mut R) -> Result<[PathBuf; 2]>
    where
        R: Rng + ?Sized,
    {
        let first = self.first_path();
        let second = self.second_path();

        let a = Matrix::standard_normal(MATRIX_SIZE, MATRIX_SIZE, rng);
        save_csv(&first, &a)?;

        let b = Matrix::standard_normal(MATRIX_SIZE, MATRIX_SIZE, rng);
        match self.second {
            SecondOutput::Fresh => save_csv(&second, &b)?,
            SecondOutput::RepeatFirst => save_csv(&second, &a)?,
        }

        Ok([first, second])
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        rand::{SeedableRng, rngs::StdRng},
        std::{fs, io::ErrorKind},
    };

    fn check_grid(path: &Path) {
        let text = fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), MATRIX_SIZE);
        for line in lines {
            let fields: Vec<&str> = line.split(',').collect();
            assert_eq!(fields.len(), MATRIX_SIZE);
            for f in fields {
                f.parse::<f64>().unwrap();
            }
        }
    }

    #[test]
    fn samples_have_both_signs_and_stay_in_tail_bound() {
        let mut rng = StdRng::seed_from_u64(0x533D);
        let m = Matrix::standard_normal(MATRIX_SIZE, MATRIX_SIZE, &mut rng);

        assert!(m.is_square(MATRIX_SIZE));
        assert!(m.values().iter().any(|v| *v > 0.0));
        assert!(m.values().iter().any(|v| *v < 0.0));
        assert!(m.values().iter().all(|v| v.abs() < 6.0));
    }

    #[test]
    fn summary_looks_standard_normal() {
        let mut rng = StdRng::seed_from_u64(7);
        let s = Matrix::standard_normal(MATRIX_SIZE, MATRIX_SIZE, &mut rng)
            .summary()
            .unwrap();

        assert!(s.mean.abs() < 0.2, "mean {}", s.mean);
        assert!((s.std_dev - 1.0).abs() < 0.2, "std_dev {}", s.std_dev);
        assert!(s.min < 0.0 && s.max > 0.0);
    }

    #[test]
    fn thread_rng_draws_are_not_repeated() {
        let a = Matrix::random_standard_normal(MATRIX_SIZE, MATRIX_SIZE);
        let b = Matrix::random_standard_normal(MATRIX_SIZE, MATRIX_SIZE);
        assert_ne!(a, b);
    }

    #[test]
    fn from_rows_keeps_row_order() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        assert_eq!((m.rows(), m.cols()), (3, 2));
        assert_eq!(m.iter_rows().nth(1), Some(&[3.0, 4.0][..]));
        assert_eq!(m.iter_rows().count(), 3);
    }

    #[test]
    fn empty_matrix_has_no_summary() {
        let m = Matrix::from_rows(Vec::new()).unwrap();
        assert_eq!((m.rows(), m.cols()), (0, 0));
        assert_eq!(m.summary(), None);
    }

    #[test]
    fn writes_two_grids() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(dir.path(), SecondOutput::Fresh);

        let [first, second] = generator.run().unwrap();

        assert_eq!(first, dir.path().join(FIRST_FILE));
        assert_eq!(second, dir.path().join(SECOND_FILE));
        check_grid(&first);
        check_grid(&second);
        assert_ne!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn repeat_first_writes_identical_files() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(dir.path(), SecondOutput::RepeatFirst);

        let [first, second] = generator.run().unwrap();

        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
    }

    #[test]
    fn fresh_second_matches_second_draw() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(dir.path(), SecondOutput::Fresh);
        generator.run_with(&mut StdRng::seed_from_u64(3)).unwrap();

        let mut rng = StdRng::seed_from_u64(3);
        let a = Matrix::standard_normal(MATRIX_SIZE, MATRIX_SIZE, &mut rng);
        let b = Matrix::standard_normal(MATRIX_SIZE, MATRIX_SIZE, &mut rng);

        assert_eq!(load_csv(&generator.first_path()).unwrap(), a);
        assert_eq!(load_csv(&generator.second_path()).unwrap(), b);
    }

    #[test]
    fn consecutive_runs_differ() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(dir.path(), SecondOutput::Fresh);

        generator.run().unwrap();
        let before = fs::read(generator.first_path()).unwrap();
        generator.run().unwrap();
        let after = fs::read(generator.first_path()).unwrap();

        assert_ne!(before, after);
    }

    #[test]
    fn missing_directory_fails_without_creating_files() {
        let dir = tempfile::tempdir().unwrap();
        let out_dir = dir.path().join(DATA_DIR);
        let generator = Generator::new(&out_dir, SecondOutput::Fresh);

        match generator.run() {
            Err(MatrixError::Create { path, source }) => {
                assert_eq!(path, out_dir.join(FIRST_FILE));
                assert_eq!(source.kind(), ErrorKind::NotFound);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(!out_dir.exists());
    }

    #[test]
    fn overwrites_existing_output() {
        let dir = tempfile::tempdir().unwrap();
        let generator = Generator::new(dir.path(), SecondOutput::Fresh);
        fs::write(generator.first_path(), "stale\n").unwrap();

        generator.run().unwrap();

        check_grid(&generator.first_path());
    }

    #[test]
    fn load_rejects_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_csv(&dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, MatrixError::Open { .. }));
    }
}
