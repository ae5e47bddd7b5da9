// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

//! Shows a counter that a background thread advances once per period. Press `Ctrl+C`
//! to quit.
//!
//! ```text
//! tick_timer --period-ms 500 --max-ticks 10 -l
//! ```

#[cfg(target_os = "linux")]
fn main() -> miette::Result<()> {
    use clap::Parser;
    use miette::Context;
    use tick_relay::{CLIArg, StdoutLabelSink, TimerApp, try_initialize_logging_global};

    let cli_arg = CLIArg::parse();

    let enable_logging = cli_arg.global_options.enable_logging;
    if enable_logging {
        try_initialize_logging_global(cli_arg.tracing_config())
            .context("Failed to initialize logging")?;
        // % is Display, ? is Debug.
        tracing::debug!(message = "Start logging...", cli_arg = ?cli_arg);
    }

    let mut app = TimerApp::activate(cli_arg.timer_app_config(), Box::new(StdoutLabelSink))?;
    app.run()?;
    let ticker_exit = app.shutdown()?;

    if enable_logging {
        tracing::debug!(message = "Stop logging...", ?ticker_exit);
    }

    Ok(())
}

#[cfg(not(target_os = "linux"))]
fn main() {
    eprintln!("tick_timer needs Linux: it is built on eventfd(2) and epoll(7)");
    std::process::exit(1);
}
