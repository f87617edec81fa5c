/*!
shared.rs - the call/stream/print cycle every RPC subcommand follows.

Focus:
  - runtime: the single-threaded tokio runtime a process runs its one command on
  - with_deadline: bound a call by RPC_TIMEOUT, failing with DEADLINE_EXCEEDED
  - drain: pull a server stream to its end, handing each item to a printer

Stream handling is at-most-once per item: items already printed stay printed
when a later receive fails, and the failure is returned as-is.
*/

use std::future::Future;
use std::io;
use std::time::Duration;

use futures::StreamExt;
use tokio::runtime::Runtime;
use tonic::Status;
use tracing::{debug, trace};

use crate::error::{CliError, Result};
use crate::rpc::uenib::ItemStream;

/// Deadline for unary calls and for opening a stream.
pub const RPC_TIMEOUT: Duration = Duration::from_secs(15);

/* ---- Runtime ---- */

/// One command per process, no background work: a current-thread runtime is enough.
pub fn runtime() -> io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/* ---- Calls ---- */

/// Run `call` under [`RPC_TIMEOUT`].
pub async fn with_deadline<T>(
    call: impl Future<Output = Result<T, Status>>,
) -> Result<T, Status> {
    match tokio::time::timeout(RPC_TIMEOUT, call).await {
        Ok(result) => result,
        Err(_) => Err(Status::deadline_exceeded("context deadline exceeded")),
    }
}

/* ---- Streams ---- */

/// Receive until end of stream, calling `on_item` once per item.
///
/// Returns the number of items handled. A receive error maps to
/// `CliError::Rpc` with `action`; a failure from `on_item` is a write error.
pub async fn drain<T>(
    mut stream: ItemStream<T>,
    action: &'static str,
    mut on_item: impl FnMut(T) -> io::Result<()>,
) -> Result<usize> {
    let mut count = 0usize;
    loop {
        match stream.next().await {
            Some(Ok(item)) => {
                on_item(item)?;
                count += 1;
                trace!(count, "stream item");
            }
            Some(Err(status)) => {
                debug!(count, code = ?status.code(), "stream failed");
                return Err(CliError::rpc(action, status));
            }
            None => {
                debug!(count, "end of stream");
                return Ok(count);
            }
        }
    }
}

/* ---- Tests ---- */
