use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::parser::headers_complete;
use crate::http::response::Response;
use crate::http::writer::ResponseWriter;
use crate::server::handler::FileService;

/// One accepted connection, driven through a single request/response cycle.
pub struct Connection<S> {
    stream: S,
    buffer: BytesMut,
    read_budget: usize,
    service: FileService,
    state: ConnectionState,
}

pub enum ConnectionState {
    Reading,
    Processing,
    Writing(ResponseWriter),
    Closed,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, service: FileService, read_budget: usize) -> Self {
        Self {
            stream,
            buffer: BytesMut::with_capacity(read_budget),
            read_budget,
            service,
            state: ConnectionState::Reading,
        }
    }

    /// Runs the connection to completion. There is no keep-alive: after one
    /// response the write half is shut down and the state is `Closed`.
    ///
    /// The stream is owned, so returning (successfully or not) drops and
    /// closes it.
    pub async fn run(&mut self) -> anyhow::Result<()> {
        loop {
            match &mut self.state {
                ConnectionState::Reading => {
                    self.read_request().await?;

                    self.state = if self.buffer.is_empty() {
                        // Peer went away without sending anything.
                        ConnectionState::Closed
                    } else {
                        ConnectionState::Processing
                    };
                }

                ConnectionState::Processing => {
                    let response = self.service.respond(&self.buffer).await?;
                    log_response(&response);

                    self.state = ConnectionState::Writing(ResponseWriter::new(&response));
                }

                ConnectionState::Writing(writer) => {
                    writer.write_to_stream(&mut self.stream).await?;
                    self.stream.shutdown().await?;

                    self.state = ConnectionState::Closed;
                }

                ConnectionState::Closed => {
                    break;
                }
            }
        }

        Ok(())
    }

    /// Reads until the header block is complete, the budget is used up, or
    /// the peer stops sending.
    async fn read_request(&mut self) -> anyhow::Result<()> {
        while self.buffer.len() < self.read_budget && !headers_complete(&self.buffer) {
            let remaining = self.read_budget - self.buffer.len();
            let n = (&mut self.stream)
                .take(remaining as u64)
                .read_buf(&mut self.buffer)
                .await?;

            if n == 0 {
                break;
            }
        }

        Ok(())
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }
}

fn log_response(response: &Response) {
    tracing::info!(
        status = response.status.as_u16(),
        length = response.body.len(),
        "Response"
    );
}
