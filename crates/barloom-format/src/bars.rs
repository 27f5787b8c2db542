//! Parquet encoding of OHLCV bar tables.

use arrow::array::{Array, Float64Array, TimestampMicrosecondArray};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use barloom_types::{Bar, BarTable};
use chrono::DateTime;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use parquet::file::reader::ChunkReader;
use std::io::Write;
use std::sync::Arc;

use crate::FormatError;

const ROW_GROUP_SIZE: usize = 100_000;

/// Arrow schema for bar tables: a UTC timestamp index plus the
/// canonical OHLCV columns.
fn bar_schema() -> Schema {
    let mut fields = vec![Field::new(
        "timestamp",
        DataType::Timestamp(TimeUnit::Microsecond, Some("UTC".into())),
        false,
    )];
    for name in BarTable::COLUMNS {
        fields.push(Field::new(name, DataType::Float64, false));
    }
    Schema::new(fields)
}

fn bars_to_batch(bars: &[Bar]) -> Result<RecordBatch, FormatError> {
    let timestamps: Vec<_> = bars.iter().map(|b| b.timestamp.timestamp_micros()).collect();
    let opens: Vec<_> = bars.iter().map(|b| b.open).collect();
    let highs: Vec<_> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<_> = bars.iter().map(|b| b.low).collect();
    let closes: Vec<_> = bars.iter().map(|b| b.close).collect();
    let volumes: Vec<_> = bars.iter().map(|b| b.volume).collect();

    RecordBatch::try_new(
        Arc::new(bar_schema()),
        vec![
            Arc::new(TimestampMicrosecondArray::from(timestamps).with_timezone("UTC")),
            Arc::new(Float64Array::from(opens)),
            Arc::new(Float64Array::from(highs)),
            Arc::new(Float64Array::from(lows)),
            Arc::new(Float64Array::from(closes)),
            Arc::new(Float64Array::from(volumes)),
        ],
    )
    .map_err(|e| FormatError::Parquet(e.to_string()))
}

/// Writes a bar table as parquet.
///
/// # Errors
///
/// Returns an error if encoding or writing fails.
pub fn write_bars<W: Write + Send>(table: &BarTable, writer: W) -> Result<(), FormatError> {
    let schema = Arc::new(bar_schema());
    let props = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .set_max_row_group_size(ROW_GROUP_SIZE)
        .build();

    let mut arrow_writer = ArrowWriter::try_new(writer, schema, Some(props))
        .map_err(|e| FormatError::Parquet(e.to_string()))?;

    for chunk in table.bars().chunks(ROW_GROUP_SIZE.max(1)) {
        let batch = bars_to_batch(chunk)?;
        arrow_writer
            .write(&batch)
            .map_err(|e| FormatError::Parquet(e.to_string()))?;
    }

    arrow_writer
        .close()
        .map_err(|e| FormatError::Parquet(e.to_string()))?;
    Ok(())
}

/// Reads a bar table from parquet.
///
/// # Errors
///
/// Returns an error if the data is not a valid bar table.
pub fn read_bars<R: ChunkReader + 'static>(reader: R) -> Result<BarTable, FormatError> {
    let batch_reader = ParquetRecordBatchReaderBuilder::try_new(reader)
        .map_err(|e| FormatError::Parquet(e.to_string()))?
        .build()
        .map_err(|e| FormatError::Parquet(e.to_string()))?;

    let mut bars = Vec::new();
    for batch in batch_reader {
        let batch = batch.map_err(|e| FormatError::Parquet(e.to_string()))?;
        let timestamps = timestamp_column(&batch)?;
        let opens = f64_column(&batch, "open")?;
        let highs = f64_column(&batch, "high")?;
        let lows = f64_column(&batch, "low")?;
        let closes = f64_column(&batch, "close")?;
        let volumes = f64_column(&batch, "volume")?;

        for i in 0..batch.num_rows() {
            let micros = timestamps.value(i);
            let ts = DateTime::from_timestamp_micros(micros)
                .ok_or(FormatError::Timestamp(micros))?;
            bars.push(Bar::new(
                ts,
                opens.value(i),
                highs.value(i),
                lows.value(i),
                closes.value(i),
                volumes.value(i),
            ));
        }
    }
    Ok(BarTable::from_bars(bars))
}

pub(crate) fn timestamp_column(
    batch: &RecordBatch,
) -> Result<&TimestampMicrosecondArray, FormatError> {
    batch
        .column_by_name("timestamp")
        .and_then(|col| col.as_any().downcast_ref::<TimestampMicrosecondArray>())
        .ok_or_else(|| FormatError::Column("timestamp".to_string()))
}

pub(crate) fn f64_column<'a>(
    batch: &'a RecordBatch,
    name: &str,
) -> Result<&'a Float64Array, FormatError> {
    batch
        .column_by_name(name)
        .and_then(|col| col.as_any().downcast_ref::<Float64Array>())
        .ok_or_else(|| FormatError::Column(name.to_string()))
}
