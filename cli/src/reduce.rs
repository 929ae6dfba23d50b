use clap::Args;
use eyre::Result;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::fs::File;
use tokio::io::{
    AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
    BufWriter, ReadBuf,
};
use whittle::{Codec, CsvCodec, JsonCodec, TimePoint, VISVALINGAM_ALG};

#[derive(Args, Debug)]
pub struct Opts {
    /// Number of points to keep
    #[clap(long)]
    min_keep: usize,

    /// Number of parallel chunks for large inputs
    #[clap(long, default_value_t = num_cpus::get())]
    chunks: usize,

    /// Reduction algorithm
    #[clap(long, default_value = VISVALINGAM_ALG)]
    algorithm: String,

    /// Output encoding (json, csv)
    #[clap(long, default_value = "json")]
    to: String,

    /// Output file [default: stdout]
    #[clap(long, default_value = "stdout")]
    output: String,

    /// Input files [default: stdin]
    pub files: Vec<String>,
}

pub async fn reduce(opts: &Opts) -> Result<()> {
    let sources: Vec<String> = if opts.files.is_empty() {
        vec!["stdin".to_string()]
    } else {
        opts.files.clone()
    };

    let mut points: Vec<TimePoint> = Vec::new();
    for source in &sources {
        let mut input = Input::from_filename(source).await?;
        read_points(&mut input, &mut points).await?;
    }

    let kept = whittle::reduce(points, opts.min_keep, opts.chunks, &opts.algorithm).await?;

    let mut output = Output::from_filename(&opts.output).await?;
    let to_csv = opts.to == "csv";
    for point in &kept {
        if to_csv {
            CsvCodec.encode(&mut output, point).await?;
        } else {
            JsonCodec.encode(&mut output, point).await?;
        }
    }
    output.flush().await?;

    Ok(())
}

/// Read a whole source of points into `points`, auto-detecting the encoding
/// from the first byte: `[` is a JSON array document, `{` is JSON lines,
/// anything else is CSV. A record that fails to decode before end of input
/// is an error, not a shorter series.
async fn read_points<R>(input: &mut R, points: &mut Vec<TimePoint>) -> Result<()>
where
    R: AsyncBufRead + Unpin + Send,
{
    let buf = input.fill_buf().await?;
    if buf.is_empty() {
        return Ok(());
    }

    match buf[0] {
        b'[' => {
            let mut doc = String::new();
            input.read_to_string(&mut doc).await?;
            let value: serde_json::Value = serde_json::from_str(&doc)?;
            points.extend(whittle::convert(&value)?);
        }
        b'{' => {
            while !input.fill_buf().await?.is_empty() {
                points.push(JsonCodec.decode(input).await?);
            }
        }
        _ => {
            while !input.fill_buf().await?.is_empty() {
                points.push(CsvCodec.decode(input).await?);
            }
        }
    }

    Ok(())
}

#[derive(Debug)]
pub enum Input {
    Stdin(BufReader<tokio::io::Stdin>),
    File(BufReader<File>),
}

impl Input {
    pub async fn from_filename(name: &str) -> Result<Self> {
        match name {
            "stdin" => Ok(Input::Stdin(BufReader::new(tokio::io::stdin()))),
            _ => {
                let f = File::open(name).await?;
                Ok(Input::File(BufReader::new(f)))
            }
        }
    }
}

impl AsyncRead for Input {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.get_mut() {
            Input::Stdin(reader) => Pin::new(reader).poll_read(cx, buf),
            Input::File(reader) => Pin::new(reader).poll_read(cx, buf),
        }
    }
}

impl AsyncBufRead for Input {
    fn poll_fill_buf(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<io::Result<&[u8]>> {
        match self.get_mut() {
            Input::Stdin(reader) => Pin::new(reader).poll_fill_buf(cx),
            Input::File(reader) => Pin::new(reader).poll_fill_buf(cx),
        }
    }

    fn consume(self: Pin<&mut Self>, amt: usize) {
        match self.get_mut() {
            Input::Stdin(reader) => Pin::new(reader).consume(amt),
            Input::File(reader) => Pin::new(reader).consume(amt),
        }
    }
}

#[derive(Debug)]
pub enum Output {
    Stdout(BufWriter<tokio::io::Stdout>),
    File(BufWriter<File>),
}

impl Output {
    pub async fn from_filename(name: &str) -> Result<Self> {
        match name {
            "stdout" => Ok(Output::Stdout(BufWriter::new(tokio::io::stdout()))),
            _ => {
                let f = File::create(name).await?;
                Ok(Output::File(BufWriter::new(f)))
            }
        }
    }
}

impl AsyncWrite for Output {
    fn poll_write(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &[u8],
    ) -> Poll<Result<usize, io::Error>> {
        match self.get_mut() {
            Output::Stdout(writer) => Pin::new(writer).poll_write(cx, buf),
            Output::File(writer) => Pin::new(writer).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        match self.get_mut() {
            Output::Stdout(writer) => Pin::new(writer).poll_flush(cx),
            Output::File(writer) => Pin::new(writer).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Result<(), io::Error>> {
        match self.get_mut() {
            Output::Stdout(writer) => Pin::new(writer).poll_shutdown(cx),
            Output::File(writer) => Pin::new(writer).poll_shutdown(cx),
        }
    }
}
