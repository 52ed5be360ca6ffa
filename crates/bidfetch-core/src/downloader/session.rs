//! A persistent libcurl handle for one batch.
//!
//! Reusing the same `Easy` handle keeps connections to the portal alive
//! between items. Each fetch streams the body straight to its destination,
//! which is only created once the response is known to be a 2xx PDF.

use super::FetchError;
use crate::config::{FetchConfig, HeaderConfig};
use curl::easy::{Easy, List};
use std::cell::RefCell;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::str;
use std::time::Duration;

/// Connection settings shared by every request of a batch.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub timeout: Duration,
    pub verify_tls: bool,
    pub buffer_size: Option<usize>,
    pub headers: HeaderConfig,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for SessionOptions {
    fn from(cfg: &FetchConfig) -> Self {
        Self {
            timeout: cfg.timeout(),
            verify_tls: cfg.verify_tls,
            buffer_size: cfg.buffer_size,
            headers: cfg.headers.clone(),
        }
    }
}

pub struct HttpSession {
    easy: Easy,
}

impl HttpSession {
    pub fn new(opts: &SessionOptions) -> Result<Self, FetchError> {
        let mut easy = Easy::new();
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        // Idle timeout, not a whole-transfer cap.
        easy.connect_timeout(opts.timeout)?;
        easy.low_speed_limit(1)?;
        easy.low_speed_time(opts.timeout)?;
        if !opts.verify_tls {
            easy.ssl_verify_peer(false)?;
            easy.ssl_verify_host(false)?;
        }
        if let Some(sz) = opts.buffer_size {
            easy.buffer_size(sz)?;
        }
        easy.useragent(&opts.headers.user_agent)?;

        let mut list = List::new();
        list.append(&format!("Accept: {}", opts.headers.accept.trim()))?;
        list.append(&format!(
            "Accept-Language: {}",
            opts.headers.accept_language.trim()
        ))?;
        list.append(&format!("Referer: {}", opts.headers.referer.trim()))?;
        easy.http_headers(list)?;

        Ok(Self { easy })
    }

    /// GETs `url` into `dest`, which must not exist yet. Returns bytes written.
    ///
    /// On any error the partially written file is removed; on a wrong
    /// content type or non-2xx status no file is created at all.
    pub fn fetch_pdf(&mut self, url: &str, dest: &Path) -> Result<u64, FetchError> {
        self.easy.url(url)?;
        let state = RefCell::new(ResponseState::default());

        let performed = {
            let mut transfer = self.easy.transfer();
            transfer.header_function(|line| {
                state.borrow_mut().on_header(line);
                true
            })?;
            transfer.write_function(|data| Ok(state.borrow_mut().on_body(data, dest)))?;
            transfer.perform()
        };

        let mut state = state.into_inner();
        if let Err(e) = performed {
            state.discard(dest);
            return Err(state.abort.take().unwrap_or(FetchError::Curl(e)));
        }

        let code = self.easy.response_code()?;
        if !(200..300).contains(&code) {
            state.discard(dest);
            return Err(FetchError::Http(code));
        }

        if state.file.is_none() {
            // Empty body: nothing reached the write callback.
            state.accept()?;
            state.file = Some(create_new(dest)?);
        }
        if let Err(e) = state.flush() {
            state.discard(dest);
            return Err(FetchError::Storage(e));
        }
        state.file = None;
        Ok(state.written)
    }
}

fn create_new(dest: &Path) -> Result<File, FetchError> {
    Ok(File::options().write(true).create_new(true).open(dest)?)
}

#[derive(Default)]
struct ResponseState {
    status: Option<u32>,
    content_type: Option<String>,
    file: Option<File>,
    written: u64,
    abort: Option<FetchError>,
}

impl ResponseState {
    /// Header lines arrive per response; a status line starts a new one (redirects).
    fn on_header(&mut self, line: &[u8]) {
        let Ok(line) = str::from_utf8(line) else {
            return;
        };
        let line = line.trim_end();
        if line.starts_with("HTTP/") {
            self.status = line.split_whitespace().nth(1).and_then(|c| c.parse().ok());
            self.content_type = None;
        } else if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-type") {
                self.content_type = Some(value.trim().to_lowercase());
            }
        }
    }

    /// Checks the final response before anything is written.
    fn accept(&self) -> Result<(), FetchError> {
        if let Some(code) = self.status {
            if !(200..300).contains(&code) {
                return Err(FetchError::Http(code));
            }
        }
        let content_type = self.content_type.as_deref().unwrap_or("");
        if !content_type.contains("pdf") {
            return Err(FetchError::NotPdf(content_type.to_string()));
        }
        Ok(())
    }

    /// Returns the number of bytes consumed; anything short aborts the transfer.
    fn on_body(&mut self, data: &[u8], dest: &Path) -> usize {
        if self.abort.is_some() {
            return 0;
        }
        if self.file.is_none() {
            let opened = self.accept().and_then(|()| create_new(dest));
            match opened {
                Ok(f) => self.file = Some(f),
                Err(e) => {
                    self.abort = Some(e);
                    return 0;
                }
            }
        }
        let Some(file) = self.file.as_mut() else {
            return 0;
        };
        match file.write_all(data) {
            Ok(()) => {
                self.written += data.len() as u64;
                data.len()
            }
            Err(e) => {
                self.abort = Some(FetchError::Storage(e));
                0
            }
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }

    /// Drops and deletes the destination if this response created it.
    fn discard(&mut self, dest: &Path) {
        if self.file.take().is_some() {
            if let Err(e) = std::fs::remove_file(dest) {
                tracing::warn!("could not remove partial file {}: {}", dest.display(), e);
            }
        }
    }
}
