//! Parquet encoding of feature frames.

use arrow::array::{Array, Float64Array, StringArray, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use barloom_features::{FeatureColumn, FeatureFrame};
use chrono::DateTime;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use parquet::file::reader::ChunkReader;
use std::io::Write;
use std::sync::Arc;

use crate::FormatError;
use crate::bars::{f64_column, timestamp_column};

fn frame_schema(frame: &FeatureFrame) -> Schema {
    let mut fields = vec![
        Field::new(
            "timestamp",
            DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
            false,
        ),
        Field::new("symbol", DataType::Utf8, false),
    ];
    for col in frame.columns() {
        fields.push(Field::new(&col.name, DataType::Float64, false));
    }
    Schema::new(fields)
}

/// Writes a feature frame as parquet.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_frame<W: Write + Send>(frame: &FeatureFrame, writer: W) -> Result<(), FormatError> {
    let schema = Arc::new(frame_schema(frame));
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let timestamps: Vec<_> = frame
        .timestamps()
        .iter()
        .map(|ts| ts.timestamp_micros())
        .collect();
    let symbols: Vec<&str> = frame.symbols().iter().map(String::as_str).collect();

    let mut arrays: Vec<Arc<dyn Array>> = vec![
        Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC")),
        Arc::new(StringArray::from(symbols)),
    ];
    for col in frame.columns() {
        arrays.push(Arc::new(Float64Array::from(col.values.clone())));
    }

    let batch = RecordBatch::try_new(schema.clone(), arrays)
        .map_err(|e| FormatError::Parquet(e.to_string()))?;

    let mut arrow_writer = ArrowWriter::try_new(writer, schema, Some(props))
        .map_err(|e| FormatError::Parquet(e.to_string()))?;
    arrow_writer
        .write(&batch)
        .map_err(|e| FormatError::Parquet(e.to_string()))?;
    arrow_writer
        .close()
        .map_err(|e| FormatError::Parquet(e.to_string()))?;
    Ok(())
}

/// Reads a feature frame from parquet.
///
/// Data columns are discovered from the file schema: every Float64
/// field other than the timestamp index and the symbol column.
///
/// # Errors
///
/// Returns an error if the data is not a valid frame.
pub fn read_frame<R: ChunkReader + 'static>(reader: R) -> Result<FeatureFrame, FormatError> {
    let batch_reader = ParquetRecordBatchReaderBuilder::try_new(reader)
        .map_err(|e| FormatError::Parquet(e.to_string()))?
        .build()
        .map_err(|e| FormatError::Parquet(e.to_string()))?;

    let mut timestamps = Vec::new();
    let mut symbols = Vec::new();
    let mut names: Vec<String> = Vec::new();
    let mut values: Vec<Vec<f64>> = Vec::new();

    for batch in batch_reader {
        let batch = batch.map_err(|e| FormatError::Parquet(e.to_string()))?;

        if names.is_empty() {
            names = batch
                .schema()
                .fields()
                .iter()
                .filter(|f| f.name() != "timestamp" && f.name() != "symbol")
                .map(|f| f.name().clone())
                .collect();
            values = vec![Vec::new(); names.len()];
        }

        let ts_col = timestamp_column(&batch)?;
        let sym_col = batch
            .column_by_name("symbol")
            .and_then(|col| col.as_any().downcast_ref::<StringArray>())
            .ok_or_else(|| FormatError::Column("symbol".to_string()))?;

        for i in 0..batch.num_rows() {
            let micros = ts_col.value(i);
            timestamps.push(
                DateTime::from_timestamp_micros(micros).ok_or(FormatError::Timestamp(micros))?,
            );
            symbols.push(sym_col.value(i).to_string());
        }
        for (name, out) in names.iter().zip(values.iter_mut()) {
            let col = f64_column(&batch, name)?;
            out.extend((0..batch.num_rows()).map(|i| col.value(i)));
        }
    }

    let columns = names
        .into_iter()
        .zip(values)
        .map(|(name, values)| FeatureColumn { name, values })
        .collect();
    FeatureFrame::from_parts(timestamps, symbols, columns)
        .map_err(|e| FormatError::Column(e.to_string()))
}
