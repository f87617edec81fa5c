/*!
`uenib.rs`

`onos uenib ...`: commands against the UE information base.

  - get ue <ue-id> : unary GetUE (15s deadline), one UE
  - get ues        : streaming ListUEs, one row per UE until end of stream
  - watch ues      : streaming WatchUEs, one row per event aspect, no deadline
  - config ...     : see `config.rs`

Flow for the RPC commands:
  resolve config -> connect -> header (unless suppressed) -> call -> print
The connection is held by `holding` for the length of the call and dropped
on every return path.

`get` is also reachable as `list`.
*/

use std::future::Future;
use std::io::Write;
use std::path::Path;

use clap::builder::NonEmptyStringValueParser;
use clap::{Args, Subcommand};
use tracing::debug;

use crate::cmd::config::{ConfigCommands, run_config};
use crate::cmd::format::{
    RenderContext, write_ue, write_ue_event, write_ue_header, write_watch_header,
};
use crate::cmd::shared::{drain, with_deadline};
use crate::config::{ConnectionArgs, ConnectionConfig, UENIB};
use crate::error::{CliError, Result};
use crate::rpc::{self, Connection};
use crate::rpc::uenib::{GetUeRequest, ListUeRequest, UeService, UeServiceClient, WatchUeRequest};

/// CLI arguments for `onos uenib`
#[derive(Args, Debug)]
pub struct UenibArgs {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: UenibCommands,
}

#[derive(Subcommand, Debug)]
pub enum UenibCommands {
    /// Get UE information
    #[command(alias = "list")]
    Get {
        #[command(subcommand)]
        command: GetCommands,
    },

    /// Watch UE changes
    Watch {
        #[command(subcommand)]
        command: WatchCommands,
    },

    /// Manage the CLI configuration for the UE-NIB
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum GetCommands {
    /// Get UE information
    Ue(GetUeArgs),
    /// Get list of UE information
    Ues(GetUesArgs),
}

#[derive(Subcommand, Debug)]
pub enum WatchCommands {
    /// Watch UE changes
    Ues(WatchUesArgs),
}

/// Output flags shared by `get ue` and `get ues`.
#[derive(Args, Debug, Clone, Default)]
pub struct OutputArgs {
    /// UE aspects to get (repeatable, or comma-separated)
    #[arg(short = 'a', long = "aspect", value_name = "ASPECT", value_delimiter = ',')]
    pub aspects: Vec<String>,

    /// Disables output headers
    #[arg(long)]
    pub no_headers: bool,

    /// Print each UE with all aspect values
    #[arg(short, long)]
    pub verbose: bool,
}

impl OutputArgs {
    pub fn render_context(&self) -> RenderContext {
        RenderContext::new(self.verbose, self.no_headers)
    }
}

/// `get ue <ue-id>`
#[derive(Args, Debug, Clone)]
pub struct GetUeArgs {
    /// UE identifier
    #[arg(value_name = "UE-ID", value_parser = NonEmptyStringValueParser::new())]
    pub id: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

impl GetUeArgs {
    pub fn request(&self) -> GetUeRequest {
        GetUeRequest {
            id: self.id.clone(),
            aspect_types: self.output.aspects.clone(),
        }
    }
}

/// `get ues`
#[derive(Args, Debug, Clone, Default)]
pub struct GetUesArgs {
    #[command(flatten)]
    pub output: OutputArgs,
}

impl GetUesArgs {
    pub fn request(&self) -> ListUeRequest {
        ListUeRequest {
            aspect_types: self.output.aspects.clone(),
        }
    }
}

/// `watch ues`
#[derive(Args, Debug, Clone, Default)]
pub struct WatchUesArgs {
    /// UE aspects to watch (repeatable, or comma-separated)
    #[arg(short = 'a', long = "aspect", value_name = "ASPECT", value_delimiter = ',')]
    pub aspects: Vec<String>,

    /// Disables output headers
    #[arg(long)]
    pub no_headers: bool,

    /// Skip the initial replay of existing UEs
    #[arg(long)]
    pub no_replay: bool,
}

impl WatchUesArgs {
    pub fn request(&self) -> WatchUeRequest {
        WatchUeRequest {
            noreplay: self.no_replay,
            aspect_types: self.aspects.clone(),
        }
    }
}

/// Entry point for `onos uenib`.
pub async fn execute_uenib(args: UenibArgs, out: &mut impl Write) -> Result<()> {
    let path = UENIB.config_path()?;
    run_uenib(&args, &path, UENIB.address_from_env(), out).await
}

async fn run_uenib(
    args: &UenibArgs,
    path: &Path,
    env_address: Option<String>,
    out: &mut impl Write,
) -> Result<()> {
    match &args.command {
        UenibCommands::Config { command } => {
            run_config(command, UENIB, &args.connection, env_address, path, out)
        }
        UenibCommands::Get {
            command: GetCommands::Ue(a),
        } => {
            let config = ConnectionConfig::load(UENIB, &args.connection, env_address, path)?;
            let (conn, mut client) = connect(&config).await?;
            holding(conn, get_ue(&mut client, a, out)).await
        }
        UenibCommands::Get {
            command: GetCommands::Ues(a),
        } => {
            let config = ConnectionConfig::load(UENIB, &args.connection, env_address, path)?;
            let (conn, mut client) = connect(&config).await?;
            holding(conn, list_ues(&mut client, a, out)).await
        }
        UenibCommands::Watch {
            command: WatchCommands::Ues(a),
        } => {
            let config = ConnectionConfig::load(UENIB, &args.connection, env_address, path)?;
            let (conn, mut client) = connect(&config).await?;
            holding(conn, watch_ues(&mut client, a, out)).await
        }
    }
}

/// Open the UE-NIB channel. The returned `Connection` must outlive the client's calls.
async fn connect(config: &ConnectionConfig) -> Result<(Connection, UeServiceClient)> {
    let conn = rpc::establish(config).await?;
    debug!(address = %conn.target(), "uenib connection ready");
    let client = UeServiceClient::new(conn.channel());
    Ok((conn, client))
}

/// Await `call` with `conn` held, then release the connection whatever the outcome.
async fn holding<T>(conn: Connection, call: impl Future<Output = Result<T>>) -> Result<T> {
    let result = call.await;
    drop(conn);
    result
}

/* -------------------------------------------------------------------------- */
/* Handlers                                                                   */
/* -------------------------------------------------------------------------- */

/// `get ue`: one unary call, one rendered UE.
pub async fn get_ue<S: UeService>(
    service: &mut S,
    args: &GetUeArgs,
    out: &mut impl Write,
) -> Result<()> {
    let ctx = args.output.render_context();
    if ctx.show_headers() {
        write_ue_header(out)?;
    }

    let response = with_deadline(service.get_ue(args.request()))
        .await
        .map_err(|status| CliError::rpc("get UE aspects", status))?;

    write_ue(out, &response.ue.unwrap_or_default(), &ctx)?;
    Ok(())
}

/// `get ues`: print each streamed UE as it arrives.
pub async fn list_ues<S: UeService>(
    service: &mut S,
    args: &GetUesArgs,
    out: &mut impl Write,
) -> Result<()> {
    let ctx = args.output.render_context();
    if ctx.show_headers() {
        write_ue_header(out)?;
    }

    let stream = with_deadline(service.list_ues(args.request()))
        .await
        .map_err(|status| CliError::rpc("list UEs", status))?;

    drain(stream, "read UE", |resp| {
        write_ue(out, &resp.ue.unwrap_or_default(), &ctx)
    })
    .await?;
    Ok(())
}

/// `watch ues`: print events until the server ends the stream.
pub async fn watch_ues<S: UeService>(
    service: &mut S,
    args: &WatchUesArgs,
    out: &mut impl Write,
) -> Result<()> {
    if !args.no_headers {
        write_watch_header(out)?;
    }

    let stream = service
        .watch_ues(args.request())
        .await
        .map_err(|status| CliError::rpc("watch UEs", status))?;

    drain(stream, "watch UEs", |resp| match resp.event {
        Some(event) => {
            write_ue_event(out, &event)?;
            out.flush()
        }
        None => Ok(()),
    })
    .await?;
    Ok(())
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */
