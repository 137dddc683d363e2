use std::fmt::Display;
use std::io::Write;
use std::path::Path;

use axum::body::Bytes;
use futures::{Stream, StreamExt};
use tempfile::NamedTempFile;

/// Uploads are consumed in slices of this size.
pub const CHUNK_SIZE: usize = 8 * 1024;

pub const ALLOWED_EXTENSIONS: [&str; 3] = ["wav", "mp3", "m4a"];

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Upload exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("Failed to read upload: {0}")]
    Read(String),
}

/// Lower-cased extension of `filename` when it is one of the accepted audio formats.
pub fn accepted_extension(filename: &str) -> Option<&'static str> {
    let extension = Path::new(filename).extension()?.to_str()?.to_ascii_lowercase();
    ALLOWED_EXTENSIONS
        .into_iter()
        .find(|allowed| *allowed == extension)
}

/// Drain `stream` into memory, CHUNK_SIZE bytes at a time, giving up as soon as
/// the running total passes `max_bytes`. Nothing past the offending chunk is read.
pub async fn read_capped<S, E>(stream: S, max_bytes: usize) -> Result<Vec<u8>, UploadError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: Display,
{
    let mut stream = std::pin::pin!(stream);
    let mut contents = Vec::new();
    let mut total = 0usize;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| UploadError::Read(e.to_string()))?;
        for piece in chunk.chunks(CHUNK_SIZE) {
            total += piece.len();
            if total > max_bytes {
                return Err(UploadError::TooLarge { limit: max_bytes });
            }
            contents.extend_from_slice(piece);
        }
    }

    Ok(contents)
}

/// Write `contents` to a uniquely named temporary file. The file is removed
/// when the returned handle is dropped.
pub fn persist_temp(contents: &[u8], extension: &str) -> std::io::Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .prefix("moodtune-")
        .suffix(&format!(".{extension}"))
        .tempfile()?;
    file.write_all(contents)?;
    file.flush()?;
    Ok(file)
}
