//! Scoped substitution of the process's standard streams.
//!
//! [`TestContext::with_stdin`] and [`TestContext::expect_stdout`] point file
//! descriptor 0 or 1 at an anonymous temporary file while a closure runs.
//! Reads through `std::io::stdin()` and writes through `std::io::stdout()` or
//! `print!` are redirected alike, as are the context's own `input` and
//! `print` helpers. A drop guard puts the original descriptor back on early
//! return and while unwinding.
//!
//! Scopes of one kind are serialized across threads, and nesting two scopes
//! of the same kind on one thread is an error.
//!
//! Under libtest's default output capture, `print!` is intercepted before it
//! reaches descriptor 1, and libtest's own progress lines may land inside a
//! capture. Output assertions belong in a `harness = false` test target or a
//! binary driving its suites with [`crate::Suite::run`].
//!
//! Redirection needs a unix platform; elsewhere both helpers fail with an
//! `Unsupported` error.

use std::cell::Cell;
use std::fs::File;
use std::io::{self, BufRead, Read, Seek, SeekFrom, Write};
use std::panic::Location;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::thread::LocalKey;

use lazy_static::lazy_static;

use crate::context::Span;
use crate::diff::diff_text;
use crate::failure::{FailureRecord, Fault, TestResult};
use crate::palette::Palette;

use super::TestContext;

lazy_static! {
    static ref STDIN_SCOPE: Mutex<()> = Mutex::new(());
    static ref STDOUT_SCOPE: Mutex<()> = Mutex::new(());
}

thread_local! {
    static STDIN_ACTIVE: Cell<bool> = Cell::new(false);
    static STDOUT_ACTIVE: Cell<bool> = Cell::new(false);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdin,
    Stdout,
}

impl Stream {
    fn name(self) -> &'static str {
        match self {
            Stream::Stdin => "stdin",
            Stream::Stdout => "stdout",
        }
    }

    fn descriptor(self) -> i32 {
        match self {
            Stream::Stdin => 0,
            Stream::Stdout => 1,
        }
    }

    fn serial(self) -> &'static Mutex<()> {
        match self {
            Stream::Stdin => &*STDIN_SCOPE,
            Stream::Stdout => &*STDOUT_SCOPE,
        }
    }

    fn active(self) -> &'static LocalKey<Cell<bool>> {
        match self {
            Stream::Stdin => &STDIN_ACTIVE,
            Stream::Stdout => &STDOUT_ACTIVE,
        }
    }
}

// ============================================================================
// DESCRIPTOR REDIRECTION
// ============================================================================

/// A descriptor pointed at another file until dropped.
#[cfg(unix)]
struct Redirect {
    target: i32,
    saved: i32,
}

#[cfg(unix)]
impl Redirect {
    fn new(target: i32, file: &File) -> io::Result<Self> {
        use std::os::unix::io::AsRawFd;

        // SAFETY: dup and dup2 only touch the descriptor table, and `saved`
        // is owned by the returned guard.
        let saved = check(unsafe { libc::dup(target) })?;
        if let Err(err) = check(unsafe { libc::dup2(file.as_raw_fd(), target) }) {
            unsafe { libc::close(saved) };
            return Err(err);
        }
        Ok(Self { target, saved })
    }
}

#[cfg(unix)]
impl Drop for Redirect {
    fn drop(&mut self) {
        // SAFETY: `saved` was opened by `Redirect::new` and is closed once.
        unsafe {
            libc::dup2(self.saved, self.target);
            libc::close(self.saved);
        }
    }
}

#[cfg(unix)]
fn check(ret: libc::c_int) -> io::Result<libc::c_int> {
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(ret)
}

#[cfg(not(unix))]
struct Redirect;

#[cfg(not(unix))]
impl Redirect {
    fn new(_target: i32, _file: &File) -> io::Result<Self> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "stream redirection needs a unix platform",
        ))
    }
}

/// One redirected stream, held while a helper's body runs.
struct Scope {
    stream: Stream,
    redirect: Option<Redirect>,
    _serial: MutexGuard<'static, ()>,
}

impl Scope {
    fn enter(stream: Stream, file: &File) -> io::Result<Self> {
        if stream.active().with(Cell::get) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("{} is already redirected on this thread", stream.name()),
            ));
        }
        let serial = stream
            .serial()
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if stream == Stream::Stdout {
            io::stdout().flush()?;
        }
        let redirect = Redirect::new(stream.descriptor(), file)?;
        stream.active().with(|active| active.set(true));
        Ok(Self {
            stream,
            redirect: Some(redirect),
            _serial: serial,
        })
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        match self.stream {
            Stream::Stdin => discard_buffered_input(),
            Stream::Stdout => {
                let _ = io::stdout().flush();
            }
        }
        drop(self.redirect.take());
        self.stream.active().with(|active| active.set(false));
    }
}

/// Empties the stdin buffer so no substituted text outlives its scope.
fn discard_buffered_input() {
    let mut input = io::stdin().lock();
    while let Ok(buffer) = input.fill_buf() {
        let len = buffer.len();
        if len == 0 {
            break;
        }
        input.consume(len);
    }
}

// ============================================================================
// HELPERS
// ============================================================================

impl TestContext {
    /// Runs `body` with the process's stdin replaced by `text`.
    ///
    /// ```rust
    /// soaper::test! {
    ///     fn greets(ctx) {
    ///         ctx.with_stdin("Ada\n", |ctx| {
    ///             let name = ctx.input()?;
    ///             ctx.expect(name.as_str()).equals("Ada")
    ///         })
    ///     }
    /// }
    /// ```
    #[track_caller]
    pub fn with_stdin(
        &self,
        text: impl AsRef<str>,
        body: impl FnOnce(&TestContext) -> TestResult,
    ) -> TestResult {
        let mut file = tempfile::tempfile()?;
        file.write_all(text.as_ref().as_bytes())?;
        file.seek(SeekFrom::Start(0))?;
        let _scope = Scope::enter(Stream::Stdin, &file)?;
        body(self)
    }

    /// Runs `body` while capturing the process's stdout, then compares the
    /// captured text with `expected`.
    ///
    /// A fault returned by `body` is propagated as is, without comparing.
    #[track_caller]
    pub fn expect_stdout(
        &self,
        expected: &str,
        body: impl FnOnce(&TestContext) -> TestResult,
    ) -> TestResult {
        let at = Location::caller();
        let mut file = tempfile::tempfile()?;
        let result = {
            let _scope = Scope::enter(Stream::Stdout, &file)?;
            body(self)
        };
        result?;

        let mut captured = Vec::new();
        file.seek(SeekFrom::Start(0))?;
        file.read_to_end(&mut captured)?;
        let actual = String::from_utf8_lossy(&captured);
        if actual == expected {
            return Ok(());
        }

        Err(Fault::Assertion(FailureRecord::new(
            self.context_at(at, Span::from_call_site(at)),
            stdout_mismatch(expected, &actual, self.palette()),
        )))
    }
}

fn stdout_mismatch(expected: &str, actual: &str, palette: &Palette) -> String {
    let (expected, actual) = diff_text(
        &expected.escape_debug().to_string(),
        &actual.escape_debug().to_string(),
        palette.inverse,
    );
    format!(
        "expected stdout to equal\n\n{}\n{}",
        palette.expected.wrap(&format!("- {expected}")),
        palette.received.wrap(&format!("+ {actual}")),
    )
}
