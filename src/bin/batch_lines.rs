use clap::Parser;
use flush_buffer::{Buffer, BufferError, Options};
use log::{debug, error, warn};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Read lines from STDIN and print them in batches, one batch per line
#[derive(Debug, Parser)]
#[command(name = "batch_lines")]
#[command(version)]
struct Cli {
    /// Maximum number of lines in single batch
    #[arg(long, env = "FLUSH_BUFFER_SIZE", default_value = "5")]
    size: usize,

    /// Flush outstanding lines this often in milliseconds; 0 disables
    #[arg(long, env = "FLUSH_BUFFER_FLUSH_INTERVAL_MS", default_value = "0")]
    flush_interval_ms: u64,

    /// How long to wait for the buffer to take a line in milliseconds
    #[arg(long, env = "FLUSH_BUFFER_PUSH_TIMEOUT_MS", default_value = "1000")]
    push_timeout_ms: u64,

    /// Request flush after every N lines; 0 never
    #[arg(long, env = "FLUSH_BUFFER_FLUSH_EVERY", default_value = "0")]
    flush_every: usize,

    /// String to join lines of single batch together
    #[arg(long, env = "FLUSH_BUFFER_JOIN", default_value = " ")]
    join: String,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Cli::parse();
    let join = args.join.clone();

    let options = Options::default()
        .with_size(args.size)
        .with_flush_interval(Duration::from_millis(args.flush_interval_ms))
        .with_push_timeout(Duration::from_millis(args.push_timeout_ms));

    let buffer = match Buffer::new(
        move |lines: Vec<String>| {
            let mut stdout = io::stdout().lock();
            if let Err(err) = writeln!(stdout, "{}", lines.join(&join)) {
                error!("failed to write batch of {} lines: {}", lines.len(), err);
            }
        },
        options,
    ) {
        Ok(buffer) => buffer,
        Err(err) => {
            error!("failed to start buffer: {}", err);
            return ExitCode::FAILURE;
        }
    };

    for (i, line) in io::stdin().lock().lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                error!("failed to read line from STDIN: {}", err);
                break;
            }
        };

        debug!("read line {}", i + 1);
        if let Err(err) = buffer.push(line) {
            warn!("line {} dropped: {}", i + 1, err);
        }

        if args.flush_every > 0 && (i + 1) % args.flush_every == 0 {
            if let Err(err) = buffer.flush() {
                warn!("flush request failed: {}", err);
            }
        }
    }

    loop {
        match buffer.close() {
            Ok(()) | Err(BufferError::Closed) => return ExitCode::SUCCESS,
            Err(BufferError::TimedOut) => warn!("still waiting for last batch to be written"),
        }
    }
}
