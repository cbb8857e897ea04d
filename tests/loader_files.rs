use std::io::Write;
use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use bike_dashboard::data::filter::FilterSpec;
use bike_dashboard::data::loader::load_file;
use bike_dashboard::data::model::{Season, Weather};
use bike_dashboard::report::TextReport;
use bike_dashboard::view::{DashboardView, Presenter, ViewOptions};
use parquet::arrow::ArrowWriter;

const CSV: &str = "\
instant,dteday,season,yr,mnth,workingday,weathersit,temp_day,hr,cnt_day,cnt_hour
1,2011-01-01,1,0,1,0,2,0.344167,0,985,16
2,2011-01-01,1,0,1,0,2,0.344167,1,985,40
3,2011-06-15,2,0,6,1,1,0.71,8,6000,550
4,2011-06-15,2,0,6,1,1,0.71,17,6000,700
";

fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_csv_from_disk() {
    let file = write_temp(".csv", CSV);
    let ds = load_file(file.path()).unwrap();
    assert_eq!(ds.len(), 4);
    assert_eq!(ds.records[2].season, Season::Summer);
    assert_eq!(ds.records[3].hour, Some(17));
    let (lo, hi) = ds.date_bounds().unwrap();
    assert_eq!(lo.to_string(), "2011-01-01");
    assert_eq!(hi.to_string(), "2011-06-15");
}

#[test]
fn missing_file_is_fatal_with_path_in_message() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("combined_data.csv");
    let err = load_file(&path).unwrap_err();
    assert!(format!("{err:#}").contains("combined_data.csv"));
}

#[test]
fn header_only_file_is_rejected() {
    let file = write_temp(".csv", "dteday,season,workingday,weathersit,temp_day,cnt_day\n");
    let err = load_file(file.path()).unwrap_err();
    assert!(err.to_string().contains("no records"));
}

#[test]
fn weather_code_four_is_rejected() {
    let file = write_temp(
        ".csv",
        "dteday,season,workingday,weathersit,temp_day,cnt_day\n2011-01-26,1,1,4,0.22,431\n",
    );
    let err = load_file(file.path()).unwrap_err();
    assert!(format!("{err:#}").contains("unknown weather code 4"));
}

#[test]
fn loads_parquet_from_disk() {
    let schema = Arc::new(Schema::new(vec![
        Field::new("dteday", DataType::Utf8, false),
        Field::new("season", DataType::Int64, false),
        Field::new("workingday", DataType::Int64, false),
        Field::new("weathersit", DataType::Int64, false),
        Field::new("temp_day", DataType::Float64, false),
        Field::new("hr", DataType::Float64, true),
        Field::new("cnt_day", DataType::Int64, false),
        Field::new("cnt_hour", DataType::Float64, true),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(vec!["2012-03-01", "2012-12-24"])),
            Arc::new(Int64Array::from(vec![1, 4])),
            Arc::new(Int64Array::from(vec![1, 0])),
            Arc::new(Int64Array::from(vec![3, 1])),
            Arc::new(Float64Array::from(vec![0.3, 0.25])),
            Arc::new(Float64Array::from(vec![Some(9.0), None])),
            Arc::new(Int64Array::from(vec![3000, 1200])),
            Arc::new(Float64Array::from(vec![Some(210.0), None])),
        ],
    )
    .unwrap();

    let file = tempfile::Builder::new().suffix(".parquet").tempfile().unwrap();
    let mut writer = ArrowWriter::try_new(file.reopen().unwrap(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let ds = load_file(file.path()).unwrap();
    assert_eq!(ds.len(), 2);
    assert_eq!(ds.records[0].weather, Weather::LightPrecipitation);
    assert_eq!(ds.records[0].hour, Some(9));
    assert_eq!(ds.records[0].hourly_count, Some(210));
    assert_eq!(ds.records[1].season, Season::Winter);
    assert!(!ds.records[1].working_day);
    assert_eq!(ds.records[1].hour, None);
}

#[test]
fn text_report_from_loaded_file() {
    let file = write_temp(".csv", CSV);
    let ds = load_file(file.path()).unwrap();
    let view = DashboardView::compute(&ds, &FilterSpec::match_all(), ViewOptions::default());

    let mut report = TextReport::new(Vec::new());
    report.present(&view).unwrap();
    let text = String::from_utf8(report.into_inner()).unwrap();

    assert!(text.contains("4 of 4 records selected"));
    assert!(text.contains("Summer"));
    assert!(text.contains("17:00"));
    assert!(!text.contains("Fall"));
}
