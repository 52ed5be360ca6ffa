//! `bidfetch run` – run the pipeline on a worker while this task draws output.

use anyhow::{Context, Result};
use bidfetch_core::config::FetchConfig;
use bidfetch_core::observer::{RunEvent, RunObserver};
use bidfetch_core::pipeline::{parse_source_list, run_sources, PipelineOptions, SourceStatus};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedSender};

/// Forwards every observer call to the presentation task.
struct ChannelObserver {
    tx: UnboundedSender<RunEvent>,
}

impl ChannelObserver {
    fn send(&self, event: RunEvent) {
        // Receiver gone means the CLI is exiting; nothing left to show.
        let _ = self.tx.send(event);
    }
}

impl RunObserver for ChannelObserver {
    fn log(&self, line: String) {
        self.send(RunEvent::Log(line));
    }

    fn progress(&self, current: usize, total: usize) {
        self.send(RunEvent::Progress { current, total });
    }

    fn reset_progress(&self) {
        self.send(RunEvent::ResetProgress);
    }

    fn finish(&self) {
        self.send(RunEvent::Finished);
    }
}

/// Source paths from arguments, then from `list` ("-" = stdin). With
/// neither, the list is read from stdin.
pub fn collect_sources(paths: &[PathBuf], list: Option<&Path>) -> Result<Vec<PathBuf>> {
    let mut sources = paths.to_vec();
    match list {
        Some(p) if p == Path::new("-") => sources.extend(parse_source_list(&read_stdin()?)),
        Some(p) => {
            let text = std::fs::read_to_string(p)
                .with_context(|| format!("read source list {}", p.display()))?;
            sources.extend(parse_source_list(&text));
        }
        None if sources.is_empty() => sources.extend(parse_source_list(&read_stdin()?)),
        None => {}
    }
    Ok(sources)
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("read source list from stdin")?;
    Ok(text)
}

/// `HH:MM:SS`; hours are not wrapped.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
}

/// Terminal state: log lines scroll, one status line (progress and elapsed
/// time) is redrawn in place beneath them.
struct Screen<W: Write> {
    out: W,
    progress: Option<(usize, usize)>,
    elapsed: Duration,
    status_width: usize,
}

impl<W: Write> Screen<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            progress: None,
            elapsed: Duration::ZERO,
            status_width: 0,
        }
    }

    fn apply(&mut self, event: RunEvent) -> io::Result<()> {
        match event {
            RunEvent::Log(line) => {
                self.clear_status()?;
                writeln!(self.out, "{}", line)?;
            }
            RunEvent::Progress { current, total } => self.progress = Some((current, total)),
            RunEvent::ResetProgress => self.progress = None,
            RunEvent::Finished => {}
        }
        self.draw_status()
    }

    fn tick(&mut self, elapsed: Duration) -> io::Result<()> {
        self.elapsed = elapsed;
        self.draw_status()
    }

    fn status_line(&self) -> String {
        let elapsed = format!("Elapsed Time: {}", format_elapsed(self.elapsed));
        match self.progress {
            Some((current, total)) if total > 0 => format!(
                "[{}/{}] {:>3}%  {}",
                current,
                total,
                current * 100 / total,
                elapsed
            ),
            _ => elapsed,
        }
    }

    fn draw_status(&mut self) -> io::Result<()> {
        let line = self.status_line();
        write!(self.out, "\r{:<width$}", line, width = self.status_width)?;
        self.status_width = line.len();
        self.out.flush()
    }

    fn clear_status(&mut self) -> io::Result<()> {
        if self.status_width > 0 {
            write!(self.out, "\r{:width$}\r", "", width = self.status_width)?;
            self.status_width = 0;
        }
        Ok(())
    }

    /// Leaves the final status on its own line.
    fn close(&mut self) -> io::Result<()> {
        self.progress = None;
        self.draw_status()?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

pub async fn run_pipeline(sources: Vec<PathBuf>, cfg: &FetchConfig) -> Result<()> {
    if sources.is_empty() {
        println!("No source documents given.");
        return Ok(());
    }

    let opts = PipelineOptions::from(cfg);
    let (tx, mut rx) = mpsc::unbounded_channel::<RunEvent>();
    let worker = tokio::task::spawn_blocking(move || {
        let observer = ChannelObserver { tx };
        run_sources(&sources, &opts, &observer)
    });

    let started = Instant::now();
    let mut screen = Screen::new(io::stdout());
    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        tokio::select! {
            event = rx.recv() => match event {
                Some(RunEvent::Finished) | None => break,
                Some(event) => screen.apply(event)?,
            },
            _ = ticker.tick() => screen.tick(started.elapsed())?,
        }
    }
    screen.tick(started.elapsed())?;
    screen.close()?;

    let reports = worker.await.context("pipeline worker panicked")?;
    let processed = reports
        .iter()
        .filter(|r| matches!(r.status, SourceStatus::Processed { .. }))
        .count();
    tracing::info!(
        sources = reports.len(),
        processed,
        elapsed = %format_elapsed(started.elapsed()),
        "run completed"
    );
    Ok(())
}
