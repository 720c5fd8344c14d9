//! Shell process hosting over a pseudo-terminal.
//!
//! Spawns the user's shell attached to a PTY, exposes the master file
//! descriptor for the event loop's poller, and forwards window size
//! changes. The master is switched to non-blocking mode so reads and
//! writes surface `WouldBlock` instead of stalling the loop.

use std::io::{self, Read, Write};
use std::os::fd::RawFd;

use portable_pty::{native_pty_system, Child, CommandBuilder, MasterPty, PtySize};

use crate::error::{Error, Result};

pub struct Pty {
    master: Box<dyn MasterPty + Send>,
    child: Box<dyn Child + Send + Sync>,
    reader: Box<dyn Read + Send>,
    writer: Box<dyn Write + Send>,
    fd: RawFd,
}

impl Pty {
    /// Open a PTY of the given dimensions and start `$SHELL` (fallback
    /// `/bin/sh`) on the slave side.
    pub fn spawn(cols: u16, rows: u16, pixel_width: u16, pixel_height: u16) -> Result<Self> {
        let pty_system = native_pty_system();
        let pair = pty_system
            .openpty(PtySize { rows, cols, pixel_width, pixel_height })
            .map_err(|e| Error::Pty(e.to_string()))?;

        let shell = std::env::var("SHELL").unwrap_or_else(|_| "/bin/sh".into());
        let mut cmd = CommandBuilder::new(&shell);
        cmd.env("TERM", "xterm-256color");

        let child = pair
            .slave
            .spawn_command(cmd)
            .map_err(|e| Error::Pty(format!("cannot start {shell}: {e}")))?;
        drop(pair.slave);

        let reader = pair
            .master
            .try_clone_reader()
            .map_err(|e| Error::Pty(e.to_string()))?;
        let writer = pair
            .master
            .take_writer()
            .map_err(|e| Error::Pty(e.to_string()))?;
        let fd = pair
            .master
            .as_raw_fd()
            .ok_or_else(|| Error::Pty("master file descriptor unavailable".into()))?;
        set_nonblocking(fd)?;

        Ok(Self { master: pair.master, child, reader, writer, fd })
    }

    /// The master file descriptor, for the event loop's poller.
    pub fn fd(&self) -> RawFd {
        self.fd
    }

    pub fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reader.read(buf)
    }

    pub fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    /// Tell the kernel (and through it the shell) about a new window size.
    pub fn resize(&self, cols: u16, rows: u16, pixel_width: u16, pixel_height: u16) {
        if let Err(e) = self.master.resize(PtySize { rows, cols, pixel_width, pixel_height }) {
            log::warn!("pty resize failed: {e}");
        }
    }

    /// Whether the child shell has exited.
    pub fn child_exited(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(Some(_)))
    }
}

/// Put the master fd into non-blocking mode. The reader and writer handles
/// share the open file description, so the flag covers both.
fn set_nonblocking(fd: RawFd) -> Result<()> {
    // SAFETY: fcntl on a valid owned fd with F_GETFL/F_SETFL.
    unsafe {
        let flags = libc::fcntl(fd, libc::F_GETFL);
        if flags < 0 || libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
            return Err(Error::Io(io::Error::last_os_error()));
        }
    }
    Ok(())
}
