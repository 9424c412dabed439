use std::io::{self, Write};

use serde::Serialize;

use crate::dashboard::ViewState;
use crate::error::CliError;

/// Write `value` as one JSON document on stdout.
pub fn render<T: Serialize>(value: &T, pretty: bool) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value, pretty)
}

pub fn write_json<W: Write, T: Serialize>(
    writer: &mut W,
    value: &T,
    pretty: bool,
) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value)?;
    } else {
        serde_json::to_writer(&mut *writer, value)?;
    }
    writeln!(writer)?;
    Ok(())
}

/// Render a view: data on stdout, loading and error banners on stderr.
pub fn render_view<T: Serialize>(state: &ViewState<T>, pretty: bool) -> Result<(), CliError> {
    match state {
        ViewState::Loading => {
            eprintln!("loading...");
            Ok(())
        }
        ViewState::Failed(error) => {
            eprintln!("error: {}", error.banner());
            Ok(())
        }
        ViewState::Loaded(data) => render(data, pretty),
    }
}
