use crate::binning::{HistogramBin, HistogramSummary};
use crate::boxplot::BoxplotSample;
use crate::correlation::CorrelationMatrix;
use crate::flights::FlightSummaryRow;
use arrow::array::{Array, ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::compute::{cast, concat_batches};
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, SchemaRef};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use flight_lens_common::{FlightLensError, Result};
use memmap2::Mmap;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::io::Seek;
use std::path::Path;
use std::sync::Arc;

// rows scanned for CSV type inference
const INFER_RECORDS: usize = 1000;

/// One input file materialised as a single record batch.
#[derive(Debug, Clone)]
pub struct Table {
    pub name: String,
    pub batch: RecordBatch,
}

pub fn is_parquet(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"))
        .unwrap_or(false)
}

pub fn load_table(path: &Path) -> Result<Table> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let (schema, batches) = if is_parquet(path) { read_parquet(path)? } else { read_csv(path)? };
    let batch = concat_batches(&schema, &batches)?;
    tracing::debug!(file = %name, rows = batch.num_rows(), cols = batch.num_columns(), "loaded table");
    Ok(Table { name, batch })
}

fn read_csv(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let mut file = std::fs::File::open(path)?;
    let format = Format::default().with_header(true);
    let (schema, _) = format.infer_schema(&mut file, Some(INFER_RECORDS))?;
    file.rewind()?;
    let schema = Arc::new(schema);
    let reader = arrow::csv::ReaderBuilder::new(schema.clone())
        .with_format(format)
        .build(file)?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((schema, batches))
}

fn read_parquet(path: &Path) -> Result<(SchemaRef, Vec<RecordBatch>)> {
    let file = std::fs::File::open(path)?;
    // summaries are small; map once and hand the reader an owned buffer
    let mmap: Mmap = unsafe { Mmap::map(&file)? };
    let bytes = Bytes::copy_from_slice(&mmap);
    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;
    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((schema, batches))
}

impl Table {
    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn column(&self, col: &str) -> Result<&ArrayRef> {
        self.batch.column_by_name(col).ok_or_else(|| FlightLensError::MissingColumn {
            table: self.name.clone(),
            column: col.to_string(),
        })
    }

    /// nulls become NaN
    pub fn f64_column(&self, col: &str) -> Result<Vec<f64>> {
        let arr = cast(self.column(col)?, &DataType::Float64)?;
        let arr = arr
            .as_any()
            .downcast_ref::<Float64Array>()
            .ok_or_else(|| self.type_err(col, "float"))?;
        Ok((0..arr.len()).map(|i| if arr.is_null(i) { f64::NAN } else { arr.value(i) }).collect())
    }

    pub fn i64_column(&self, col: &str) -> Result<Vec<i64>> {
        let arr = cast(self.column(col)?, &DataType::Int64)?;
        let arr = arr
            .as_any()
            .downcast_ref::<Int64Array>()
            .ok_or_else(|| self.type_err(col, "integer"))?;
        (0..arr.len())
            .map(|i| {
                if arr.is_null(i) {
                    Err(FlightLensError::Other(format!("{}: null in integer column {col} at row {i}", self.name)))
                } else {
                    Ok(arr.value(i))
                }
            })
            .collect()
    }

    pub fn string_column(&self, col: &str) -> Result<Vec<String>> {
        let arr = cast(self.column(col)?, &DataType::Utf8)?;
        let arr = arr
            .as_any()
            .downcast_ref::<StringArray>()
            .ok_or_else(|| self.type_err(col, "string"))?;
        Ok((0..arr.len()).map(|i| if arr.is_null(i) { String::new() } else { arr.value(i).to_string() }).collect())
    }

    fn year_column(&self, col: &str) -> Result<Vec<i32>> {
        self.i64_column(col)?
            .into_iter()
            .map(|y| {
                i32::try_from(y).map_err(|_| FlightLensError::Other(format!("{}: year {y} out of range", self.name)))
            })
            .collect()
    }

    fn type_err(&self, col: &str, want: &str) -> FlightLensError {
        FlightLensError::Other(format!("{}: column {col} is not {want}", self.name))
    }
}

// --- typed readers for each summary table ---

pub fn load_flight_summary(path: &Path) -> Result<Vec<FlightSummaryRow>> {
    let t = load_table(path)?;
    let years = t.year_column("YEAR")?;
    let configs = t.string_column("AIRCRAFT_CONFIG_DESC")?;
    let totals = t.i64_column("total_flights")?;
    let avgs = t.f64_column("average_ground_time")?;
    Ok(years
        .into_iter()
        .zip(configs)
        .zip(totals)
        .zip(avgs)
        .map(|(((year, aircraft_config), total_flights), average_ground_time)| FlightSummaryRow {
            year,
            aircraft_config,
            total_flights,
            average_ground_time,
        })
        .collect())
}

/// Header row holds the feature names. A leading string column, if present, is taken
/// as the row index and must name the same features.
pub fn load_correlation_matrix(path: &Path) -> Result<CorrelationMatrix> {
    let t = load_table(path)?;
    let schema = t.batch.schema();
    let fields = schema.fields();
    let has_index = fields.first().map(|f| f.data_type() == &DataType::Utf8).unwrap_or(false);
    let labels: Vec<String> = fields.iter().skip(usize::from(has_index)).map(|f| f.name().clone()).collect();
    let columns: Vec<Vec<f64>> = labels.iter().map(|l| t.f64_column(l)).collect::<Result<_>>()?;
    let n = t.num_rows();
    let row_order: Vec<usize> = if has_index {
        let index = t.string_column(fields[0].name())?;
        labels
            .iter()
            .map(|l| {
                index.iter().position(|i| i == l).ok_or_else(|| {
                    FlightLensError::InvalidArgument(format!("{}: feature '{l}' has no row in the index column", t.name))
                })
            })
            .collect::<Result<_>>()?
    } else {
        (0..n).collect()
    };
    let values: Vec<Vec<f64>> = row_order
        .iter()
        .map(|&r| columns.iter().map(|c| c[r]).collect())
        .collect();
    if has_index && n != labels.len() {
        return Err(FlightLensError::InvalidArgument(format!(
            "{}: {} index rows for {} features",
            t.name,
            n,
            labels.len()
        )));
    }
    CorrelationMatrix::new(labels, values)
}

pub fn load_histogram_summary(path: &Path) -> Result<HistogramSummary> {
    let t = load_table(path)?;
    let edges = t.f64_column("bin_edges")?;
    let freqs = frequency_column(&t)?;
    let bins = edges
        .into_iter()
        .zip(freqs)
        .map(|(left_edge, frequency)| HistogramBin { left_edge, frequency })
        .collect();
    HistogramSummary::new(bins)
}

// integer columns are read exactly; float columns must hold whole numbers
fn frequency_column(t: &Table) -> Result<Vec<u64>> {
    let bad = |i: usize, v: String| {
        FlightLensError::InvalidArgument(format!(
            "{}: frequency at row {i} must be a non-negative integer, got {v}",
            t.name
        ))
    };
    if t.column("frequency")?.data_type().is_integer() {
        return t
            .i64_column("frequency")?
            .into_iter()
            .enumerate()
            .map(|(i, f)| u64::try_from(f).map_err(|_| bad(i, f.to_string())))
            .collect();
    }
    t.f64_column("frequency")?
        .into_iter()
        .enumerate()
        .map(|(i, f)| {
            if !(f >= 0.0) || f.fract() != 0.0 {
                return Err(bad(i, f.to_string()));
            }
            Ok(f as u64)
        })
        .collect()
}

pub fn load_boxplot_samples(path: &Path) -> Result<Vec<BoxplotSample>> {
    let t = load_table(path)?;
    let years = t.year_column("YEAR")?;
    let configs = t.string_column("AIRCRAFT_CONFIG_DESC")?;
    let vals = t.f64_column("LOG_GROUND_TIME")?;
    Ok(years
        .into_iter()
        .zip(configs)
        .zip(vals)
        .map(|((year, aircraft_config), log_ground_time)| BoxplotSample { year, aircraft_config, log_ground_time })
        .collect())
}

pub fn load_qq_sample(path: &Path) -> Result<Vec<f64>> {
    load_table(path)?.f64_column("LOG_GROUND_TIME")
}
