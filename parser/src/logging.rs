use std::fmt::Write;

use crate::ViewError;

pub const LEVEL_WARNING: u32 = 1;
pub const LEVEL_INFO: u32 = 2;

/// Level-filtered log sink. Messages go to an in-memory buffer (shown next
/// to the view) and/or stderr, each with its own threshold; 0 disables.
pub struct Logger {
    effective_level: u32,
    buffer_level: u32,
    stderr_level: u32,
    buffer: String,
    num_warnings: usize,
}

impl Clone for Logger {
    fn clone(&self) -> Self {
        Self {
            effective_level: self.effective_level,
            buffer_level: self.buffer_level,
            stderr_level: self.stderr_level,
            buffer: String::new(), // clean logs on clone
            num_warnings: 0,
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Logger::new(0, LEVEL_WARNING)
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("buffer_level", &self.buffer_level)
            .field("stderr_level", &self.stderr_level)
            .finish()
    }
}

impl Logger {
    pub fn new(buffer_level: u32, stderr_level: u32) -> Self {
        Self {
            buffer_level,
            stderr_level,
            effective_level: std::cmp::max(buffer_level, stderr_level),
            buffer: String::new(),
            num_warnings: 0,
        }
    }

    /// Nothing anywhere.
    pub fn quiet() -> Self {
        Self::new(0, 0)
    }

    pub fn warn(&mut self, s: &str) {
        if self.level_enabled(LEVEL_WARNING) {
            self.num_warnings += 1;
            self.write_at(LEVEL_WARNING, "Warning: ");
            self.write_at(LEVEL_WARNING, s);
            self.write_at(LEVEL_WARNING, "\n");
        }
    }

    pub fn info(&mut self, s: &str) {
        if self.level_enabled(LEVEL_INFO) {
            self.write_at(LEVEL_INFO, s);
            self.write_at(LEVEL_INFO, "\n");
        }
    }

    /// Report a recoverable problem found while decoding or rendering.
    pub fn diagnostic(&mut self, err: &ViewError) {
        self.warn(&err.to_string());
    }

    fn write_at(&mut self, level: u32, s: &str) {
        if level <= self.buffer_level {
            self.buffer.push_str(s);
        }
        if level <= self.stderr_level {
            eprint!("{}", s);
        }
    }

    #[inline(always)]
    pub fn level_enabled(&self, level: u32) -> bool {
        level <= self.effective_level
    }

    #[inline(always)]
    pub fn effective_level(&self) -> u32 {
        self.effective_level
    }

    #[inline(always)]
    pub fn buffer_level(&self) -> u32 {
        self.buffer_level
    }

    #[inline(always)]
    pub fn stderr_level(&self) -> u32 {
        self.stderr_level
    }

    pub fn set_buffer_level(&mut self, buffer_level: u32) {
        self.buffer_level = buffer_level;
        self.effective_level = std::cmp::max(self.stderr_level, self.buffer_level);
    }

    pub fn set_stderr_level(&mut self, stderr_level: u32) {
        self.stderr_level = stderr_level;
        self.effective_level = std::cmp::max(self.stderr_level, self.buffer_level);
    }

    pub fn num_warnings(&self) -> usize {
        self.num_warnings
    }

    pub fn get_buffer(&self) -> &str {
        &self.buffer
    }

    pub fn get_and_clear_logs(&mut self) -> String {
        std::mem::take(&mut self.buffer)
    }
}

/// Writes at info level; used by `infoln!`.
impl Write for Logger {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.write_at(LEVEL_INFO, s);
        Ok(())
    }
}
