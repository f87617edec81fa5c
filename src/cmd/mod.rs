/*!
Command modules.

  src/cmd/
    mod.rs          (this file)
    uenib.rs        (UenibArgs + execute_uenib: get ue / get ues / watch ues)
    e2t.rs          (E2tArgs + execute_e2t)
    config.rs       (ConfigCommands shared by every subsystem root)
    completion.rs   (CompletionArgs + execute_completion)
    shell.rs        (Shell enum + helpers)
    format.rs       (RenderContext + row / block writers)
    shared.rs       (runtime, deadlines, stream draining)

Conventions:
  - Each subcommand module exposes one public `execute_*` function that
    returns `crate::error::Result<()>` and writes to a caller-supplied writer.
  - Argument structs derive `clap::Args` and build their request records.
*/

pub mod completion;
pub mod config;
pub mod e2t;
pub mod format;
pub mod shared;
pub mod shell;
pub mod uenib;

pub use completion::{CompletionArgs, execute_completion};
pub use e2t::{E2tArgs, execute_e2t};
pub use uenib::{UenibArgs, execute_uenib};
