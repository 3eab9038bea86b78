//! File-backed range reader
//!
//! All reads against one file handle are serialized through a dedicated read
//! task; callers submit a range over a channel and await the reply. Dropping
//! the reader closes the request channel and ends the task.

use std::io::{self, SeekFrom};
use std::path::Path;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

use crate::error::ReadError;
use crate::interval::ByteRange;
use crate::reader::traits::{RangeRead, ReadFuture};

/// Default depth of the read request queue.
pub const DEFAULT_QUEUE_DEPTH: usize = 32;

enum Request {
    Read {
        range: ByteRange,
        reply: oneshot::Sender<Result<Vec<u8>, ReadError>>,
    },
    Size {
        reply: oneshot::Sender<io::Result<u64>>,
    },
}

/// Reader that serves byte ranges from a single file.
pub struct FileRangeReader {
    requests: mpsc::Sender<Request>,
}

impl FileRangeReader {
    /// Open `path` and spawn the read task.
    pub async fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Self::open_with_queue_depth(path, DEFAULT_QUEUE_DEPTH).await
    }

    /// Open `path` with an explicit request queue depth.
    pub async fn open_with_queue_depth(
        path: impl AsRef<Path>,
        queue_depth: usize,
    ) -> io::Result<Self> {
        let file = File::open(path).await?;
        let (requests, incoming) = mpsc::channel(queue_depth.max(1));
        tokio::spawn(read_task(file, incoming));
        Ok(Self { requests })
    }
}

impl RangeRead for FileRangeReader {
    fn read_range(&self, range: ByteRange) -> ReadFuture<'_, Result<Vec<u8>, ReadError>> {
        Box::pin(async move {
            let (reply, response) = oneshot::channel();
            self.requests
                .send(Request::Read { range, reply })
                .await
                .map_err(|_| ReadError::ChannelClosed)?;
            response.await.map_err(|_| ReadError::ChannelClosed)?
        })
    }

    fn size(&self) -> ReadFuture<'_, io::Result<u64>> {
        Box::pin(async move {
            let (reply, response) = oneshot::channel();
            self.requests
                .send(Request::Size { reply })
                .await
                .map_err(|_| io::Error::other("read task closed"))?;
            response
                .await
                .map_err(|_| io::Error::other("read task closed"))?
        })
    }
}

async fn read_task(mut file: File, mut incoming: mpsc::Receiver<Request>) {
    while let Some(request) = incoming.recv().await {
        match request {
            Request::Read { range, reply } => {
                let _ = reply.send(read_exact_range(&mut file, range).await);
            }
            Request::Size { reply } => {
                let _ = reply.send(file.metadata().await.map(|m| m.len()));
            }
        }
    }
    debug!("read task finished");
}

async fn read_exact_range(file: &mut File, range: ByteRange) -> Result<Vec<u8>, ReadError> {
    let mut buffer = vec![0u8; range.len() as usize];
    if buffer.is_empty() {
        return Ok(buffer);
    }

    file.seek(SeekFrom::Start(range.start())).await?;
    match file.read_exact(&mut buffer).await {
        Ok(_) => Ok(buffer),
        Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => Err(ReadError::UnexpectedEof {
            offset: range.start(),
            wanted: range.len(),
        }),
        Err(err) => Err(err.into()),
    }
}
