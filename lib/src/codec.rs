use async_trait::async_trait;
use eyre::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt as _, AsyncWrite, AsyncWriteExt as _};

use crate::point::TimePoint;

/// Line-oriented encoding of a point stream.
#[async_trait]
pub trait Codec {
    async fn encode<W: AsyncWrite + Unpin + Send>(
        &self,
        writer: &mut W,
        point: &TimePoint,
    ) -> Result<()>;
    async fn decode<R: AsyncBufRead + Unpin + Send>(&self, reader: &mut R) -> Result<TimePoint>;
}

/// Newline-delimited JSON objects: `{"timestamp":..,"value":..}`.
pub struct JsonCodec;

#[async_trait]
impl Codec for JsonCodec {
    async fn encode<W: AsyncWrite + Unpin + Send>(
        &self,
        writer: &mut W,
        point: &TimePoint,
    ) -> Result<()> {
        writer.write_all(&serde_json::to_vec(point)?).await?;
        writer.write_all(b"\n").await?;
        Ok(())
    }

    async fn decode<R: AsyncBufRead + Unpin + Send>(&self, reader: &mut R) -> Result<TimePoint> {
        let mut buf = Vec::new();
        reader.read_until(b'\n', &mut buf).await?;
        serde_json::from_slice(&buf).map_err(|e| eyre::eyre!(e))
    }
}

/// One `timestamp,value` CSV record per line, no header.
pub struct CsvCodec;

#[async_trait]
impl Codec for CsvCodec {
    async fn encode<W: AsyncWrite + Unpin + Send>(
        &self,
        writer: &mut W,
        point: &TimePoint,
    ) -> Result<()> {
        let mut record = Vec::new();
        {
            let mut wtr = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(&mut record);
            wtr.serialize(point)?;
            wtr.flush()?;
        }
        writer.write_all(&record).await?;
        Ok(())
    }

    async fn decode<R: AsyncBufRead + Unpin + Send>(&self, reader: &mut R) -> Result<TimePoint> {
        let mut line = String::new();
        reader.read_line(&mut line).await?;

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(line.as_bytes());
        match rdr.deserialize().next() {
            Some(record) => record.map_err(|e| eyre::eyre!(e)),
            None => Err(eyre::eyre!("no record found")),
        }
    }
}
