/*!
format.rs

Text rendering for UE-NIB results.

Two modes, picked per invocation by `RenderContext`:
  - tabular : optional header line, then one fixed-width row per UE
              (`UE ID` padded to 16, aspect types comma-joined)
  - verbose : a self-labelled block per UE; never a header

Column widths are minimums: long values push the row out, they are
never truncated.

Aspect ordering is whatever the source map yields; nothing here sorts.

Public API Summary:
  - RenderContext::new(verbose, no_headers)
  - write_ue_header / write_ue
  - write_watch_header / write_ue_event

All writers return `io::Result` and emit nothing else; the caller decides
what a write failure means.
*/

use std::borrow::Cow;
use std::io::{self, Write};

use crate::rpc::uenib::{Ue, UeEvent};

/* -------------------------------------------------------------------------- */
/* Render Context                                                             */
/* -------------------------------------------------------------------------- */

/// Per-invocation formatting flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderContext {
    verbose: bool,
    headers: bool,
}

impl RenderContext {
    /// Verbose output labels every field, so it always suppresses the header.
    pub fn new(verbose: bool, no_headers: bool) -> Self {
        Self {
            verbose,
            headers: !verbose && !no_headers,
        }
    }

    pub fn verbose(&self) -> bool {
        self.verbose
    }

    pub fn show_headers(&self) -> bool {
        self.headers
    }
}

/* -------------------------------------------------------------------------- */
/* UE rows                                                                    */
/* -------------------------------------------------------------------------- */

pub fn write_ue_header(w: &mut impl Write) -> io::Result<()> {
    writeln!(w, "{:<16}\t{:<20}", "UE ID", "Aspect Types")
}

pub fn write_ue(w: &mut impl Write, ue: &Ue, ctx: &RenderContext) -> io::Result<()> {
    if !ctx.verbose() {
        let aspect_types: Vec<&str> = ue.aspect_types().collect();
        writeln!(w, "{:<16}\t{}", ue.id, aspect_types.join(","))
    } else {
        writeln!(w, "ID: {}", ue.id)?;
        writeln!(w, "Aspects:")?;
        for (aspect_type, value) in &ue.aspects {
            writeln!(w, "- {}={}", aspect_type, aspect_value(value))?;
        }
        Ok(())
    }
}

/* -------------------------------------------------------------------------- */
/* Watch events                                                               */
/* -------------------------------------------------------------------------- */

pub fn write_watch_header(w: &mut impl Write) -> io::Result<()> {
    writeln!(
        w,
        "{:<12}\t{:<16}\t{:<20}\t{}",
        "Event Type", "UE ID", "Aspect Type", "Aspect Value"
    )
}

/// One row per aspect carried by the event's UE; a UE without aspects still
/// gets one row so the event is visible.
pub fn write_ue_event(w: &mut impl Write, event: &UeEvent) -> io::Result<()> {
    let event_type = event.event_type().as_str_name();
    let ue = event.ue.clone().unwrap_or_default();

    if ue.aspects.is_empty() {
        return writeln!(w, "{:<12}\t{:<16}\t{:<20}\t", event_type, ue.id, "");
    }
    for (aspect_type, value) in &ue.aspects {
        writeln!(
            w,
            "{:<12}\t{:<16}\t{:<20}\t{}",
            event_type,
            ue.id,
            aspect_type,
            aspect_value(value)
        )?;
    }
    Ok(())
}

/// Aspect payloads are opaque bytes; show them as text.
fn aspect_value(any: &prost_types::Any) -> Cow<'_, str> {
    String::from_utf8_lossy(&any.value)
}

/* -------------------------------------------------------------------------- */
/* Tests                                                                      */
/* -------------------------------------------------------------------------- */
