use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, ArrayRef, AsArray, Date32Array, Float32Array, Float64Array, Int32Array, Int64Array,
    StringArray, TimestampMicrosecondArray, TimestampMillisecondArray,
    TimestampNanosecondArray,
};
use arrow::datatypes::{DataType, TimeUnit};
use arrow::record_batch::RecordBatch;
use arrow::temporal_conversions::{
    date32_to_datetime, timestamp_ms_to_datetime, timestamp_ns_to_datetime,
    timestamp_us_to_datetime,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{RawRecord, RentalDataset, RentalRecord};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a rental dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – combined day/hour export with a header row (recommended)
/// * `.json`    – `[{ "dteday": "2011-01-01", "season": 1, ... }, ...]`
/// * `.parquet` – same columns as primitive Arrow types
///
/// Every row is validated; the first bad row aborts the load with its row
/// number in the error chain.
pub fn load_file(path: &Path) -> Result<RentalDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    if dataset.is_empty() {
        bail!("{} contains no records", path.display());
    }
    Ok(dataset)
}

fn validate(raw: RawRecord, row: usize) -> Result<RentalRecord> {
    RentalRecord::try_from(raw).with_context(|| format!("Row {row}: invalid record"))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row with column names; columns beyond the ones in [`RawRecord`]
/// are ignored. Daily rows leave `hr` and `cnt_hour` empty.
fn load_csv(path: &Path) -> Result<RentalDataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

/// Parse CSV from any reader (used directly by tests).
pub fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<RentalDataset> {
    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<RawRecord>().enumerate() {
        let raw = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(validate(raw, row_no)?);
    }
    Ok(RentalDataset::new(records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, i.e. `df.to_json(orient='records', date_format='iso')`.
fn load_json(path: &Path) -> Result<RentalDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    parse_json(&text)
}

pub fn parse_json(text: &str) -> Result<RentalDataset> {
    let rows: Vec<RawRecord> = serde_json::from_str(text).context("parsing JSON")?;
    let records = rows
        .into_iter()
        .enumerate()
        .map(|(i, raw)| validate(raw, i))
        .collect::<Result<Vec<_>>>()?;
    Ok(RentalDataset::new(records))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one primitive column per field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): `dteday` may be a string, `Date32` or a
/// timestamp; integer columns may be stored as floats when they contain nulls.
fn load_parquet(path: &Path) -> Result<RentalDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let offset = records.len();
        for row in 0..batch.num_rows() {
            let raw = raw_record_at(&batch, row)
                .with_context(|| format!("Row {}", offset + row))?;
            records.push(validate(raw, offset + row)?);
        }
    }
    Ok(RentalDataset::new(records))
}

fn raw_record_at(batch: &RecordBatch, row: usize) -> Result<RawRecord> {
    let required_int = |names: &[&str]| -> Result<i64> {
        int_at(column(batch, names)?, row)?
            .with_context(|| format!("null value in '{}'", names[0]))
    };
    let optional_int = |name: &str| -> Result<Option<i64>> {
        match batch.column_by_name(name) {
            Some(col) => int_at(col, row),
            None => Ok(None),
        }
    };

    let temp_col = column(batch, &["temp_day", "temp"])?;
    Ok(RawRecord {
        dteday: date_at(column(batch, &["dteday"])?, row)?,
        season: required_int(&["season", "season_day"])?,
        workingday: required_int(&["workingday", "workingday_day"])?,
        weathersit: required_int(&["weathersit", "weathersit_day"])?,
        temp_day: float_at(temp_col, row)?.context("null value in 'temp_day'")?,
        hr: optional_int("hr")?,
        cnt_day: required_int(&["cnt_day"])?,
        cnt_hour: optional_int("cnt_hour")?,
    })
}

// -- Parquet / Arrow helpers --

/// First column present under any of `names`.
fn column<'a>(batch: &'a RecordBatch, names: &[&str]) -> Result<&'a ArrayRef> {
    names
        .iter()
        .find_map(|n| batch.column_by_name(n))
        .with_context(|| format!("Parquet file missing '{}' column", names[0]))
}

fn int_at(col: &ArrayRef, row: usize) -> Result<Option<i64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Int32 => i64::from(downcast::<Int32Array>(col)?.value(row)),
        DataType::Int64 => downcast::<Int64Array>(col)?.value(row),
        DataType::Float32 | DataType::Float64 => {
            let f = float_at(col, row)?.unwrap_or(f64::NAN);
            if f.fract() != 0.0 || !f.is_finite() {
                bail!("expected a whole number, got {f}");
            }
            f as i64
        }
        other => bail!("Expected an integer column, got {other:?}"),
    };
    Ok(Some(value))
}

fn float_at(col: &ArrayRef, row: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let value = match col.data_type() {
        DataType::Float64 => downcast::<Float64Array>(col)?.value(row),
        DataType::Float32 => f64::from(downcast::<Float32Array>(col)?.value(row)),
        DataType::Int32 => f64::from(downcast::<Int32Array>(col)?.value(row)),
        DataType::Int64 => downcast::<Int64Array>(col)?.value(row) as f64,
        other => bail!("Expected a numeric column, got {other:?}"),
    };
    Ok(Some(value))
}

/// Render the date cell as `YYYY-MM-DD` text for [`RawRecord`].
fn date_at(col: &ArrayRef, row: usize) -> Result<String> {
    if col.is_null(row) {
        bail!("null value in 'dteday'");
    }
    let datetime = match col.data_type() {
        DataType::Utf8 => return Ok(downcast::<StringArray>(col)?.value(row).to_string()),
        DataType::LargeUtf8 => return Ok(col.as_string::<i64>().value(row).to_string()),
        DataType::Date32 => date32_to_datetime(downcast::<Date32Array>(col)?.value(row)),
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            timestamp_ns_to_datetime(downcast::<TimestampNanosecondArray>(col)?.value(row))
        }
        DataType::Timestamp(TimeUnit::Microsecond, _) => {
            timestamp_us_to_datetime(downcast::<TimestampMicrosecondArray>(col)?.value(row))
        }
        DataType::Timestamp(TimeUnit::Millisecond, _) => {
            timestamp_ms_to_datetime(downcast::<TimestampMillisecondArray>(col)?.value(row))
        }
        other => bail!("Expected a string, date or timestamp 'dteday' column, got {other:?}"),
    };
    let datetime = datetime.context("date out of range")?;
    Ok(datetime.date().format("%Y-%m-%d").to_string())
}

fn downcast<T: Array + 'static>(col: &ArrayRef) -> Result<&T> {
    col.as_any()
        .downcast_ref::<T>()
        .with_context(|| format!("unexpected array type {:?}", col.data_type()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Season, Weather};

    const SAMPLE: &str = "\
dteday,season,workingday,weathersit,temp_day,hr,cnt_day,cnt_hour,yr
2011-01-01,1,0,2,0.344167,0,985,16,0
2011-01-01,1,0,2,0.344167,1,985,40,0
2011-07-04,3,1,1,0.7,,5000,,0
";

    #[test]
    fn reads_hourly_and_daily_rows() {
        let ds = read_csv(csv::Reader::from_reader(SAMPLE.as_bytes())).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.records[0].hour, Some(0));
        assert_eq!(ds.records[1].hourly_count, Some(40));
        assert_eq!(ds.records[2].season, Season::Fall);
        assert_eq!(ds.records[2].weather, Weather::Clear);
        assert_eq!(ds.records[2].hour, None);
        assert_eq!(ds.records[2].hourly_count, None);
        assert!(ds.records[2].working_day);
    }

    #[test]
    fn accepts_pandas_float_integers() {
        let text = "dteday,season,workingday,weathersit,temp_day,hr,cnt_day,cnt_hour\n\
                    2011-01-01 00:00:00,1,0,1,0.2,5.0,985,16.0\n";
        let ds = read_csv(csv::Reader::from_reader(text.as_bytes())).unwrap();
        assert_eq!(ds.records[0].hour, Some(5));
        assert_eq!(ds.records[0].hourly_count, Some(16));
    }

    #[test]
    fn bad_code_reports_row() {
        let text = "dteday,season,workingday,weathersit,temp_day,cnt_day\n\
                    2011-01-01,1,0,1,0.2,10\n\
                    2011-01-02,9,0,1,0.2,10\n";
        let err = read_csv(csv::Reader::from_reader(text.as_bytes())).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("Row 1"), "{chain}");
        assert!(chain.contains("unknown season code 9"), "{chain}");
    }

    #[test]
    fn missing_column_is_an_error() {
        let text = "dteday,season,workingday\n2011-01-01,1,0\n";
        assert!(read_csv(csv::Reader::from_reader(text.as_bytes())).is_err());
    }

    #[test]
    fn parses_records_json() {
        let text = r#"[
            {"dteday": "2011-01-01T00:00:00.000", "season": 1, "workingday": 0,
             "weathersit": 2, "temp_day": 0.34, "hr": null, "cnt_day": 985, "cnt_hour": null},
            {"dteday": "2011-01-02", "season": 1, "workingday": 1,
             "weathersit": 1, "temp": 0.36, "cnt_day": 801}
        ]"#;
        let ds = parse_json(text).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records[0].hour, None);
        assert!(ds.records[1].working_day);
        assert_eq!(ds.records[1].temperature, 0.36);
    }

    #[test]
    fn unsupported_extension() {
        let err = load_file(Path::new("data.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }
}
