pub use csv;

use {
    crate::{Matrix, MatrixError, Result},
    std::io,
};

/// Writes a value the way `numpy.savetxt` does by default (`%.18e`):
/// widened to `f64`, 18 fractional digits, signed exponent of at least
/// two digits.
pub fn format_value(value: f32) -> String {
    let value = f64::from(value);
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let s = format!("{value:.18e}");
    match s.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => s,
    }
}

pub fn csv_writer<W>(inner: W) -> csv::Writer<W>
where
    W: io::Write,
{
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}

pub fn csv_reader<R>(inner: R) -> csv::Reader<R>
where
    R: io::Read,
{
    csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(inner)
}

/// Text-level view of a matrix: one `Vec` per CSV record.
#[derive(Debug, Clone, PartialEq)]
pub struct MatrixModel(pub Vec<Vec<f32>>);

impl From<&Matrix> for MatrixModel {
    fn from(m: &Matrix) -> Self {
        MatrixModel(m.iter_rows().map(<[f32]>::to_vec).collect())
    }
}

impl TryFrom<MatrixModel> for Matrix {
    type Error = MatrixError;

    fn try_from(model: MatrixModel) -> Result<Self> {
        Matrix::from_rows(model.0)
    }
}

impl MatrixModel {
    pub fn serialize_csv<W>(&self, writer: &mut csv::Writer<W>) -> Result<()>
    where
        W: io::Write,
    {
        for line in &self.0 {
            writer.write_record(line.iter().map(|v| format_value(*v)))?;
        }
        writer.flush()?;

        Ok(())
    }

    pub fn deserialize_csv<R>(reader: &mut csv::Reader<R>) -> Result<Self>
    where
        R: io::Read,
    {
        let mut lines = Vec::new();
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            let line = record
                .iter()
                .enumerate()
                .map(|(col, field)| {
                    field.parse::<f32>().map_err(|_| MatrixError::Parse {
                        row,
                        col,
                        value: field.to_string(),
                    })
                })
                .collect::<Result<Vec<f32>>>()?;
            lines.push(line);
        }

        Ok(Self(lines))
    }
}
