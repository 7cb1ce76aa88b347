use std::ffi::OsString;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Split newline-separated bytes into lines.
///
/// A trailing newline does not produce an empty final line.
pub fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    if bytes.is_empty() {
        return Vec::new();
    }
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    body.split(|b| *b == b'\n').collect()
}

/// Join lines back into bytes, terminating every line with `\n`
pub fn join_lines<L: AsRef<[u8]>>(lines: &[L]) -> Vec<u8> {
    let mut out = Vec::new();
    for line in lines {
        out.extend_from_slice(line.as_ref());
        out.push(b'\n');
    }
    out
}

/// Line-oriented save file next to the game.
///
/// Lines are raw bytes with no escaping; a line cannot contain `\n`.
#[derive(Debug, Clone)]
pub struct SaveStore {
    path: PathBuf,
}

impl SaveStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every line; a missing file reads as no lines
    pub fn read_lines(&self) -> io::Result<Vec<Vec<u8>>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        Ok(split_lines(&bytes).into_iter().map(<[u8]>::to_vec).collect())
    }

    /// Replace the file contents with `lines`
    pub fn write_lines<L: AsRef<[u8]>>(&self, lines: &[L]) -> io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = match self.path.file_name() {
            Some(name) => {
                let mut tmp_name = OsString::from(name);
                tmp_name.push(".tmp");
                self.path.with_file_name(tmp_name)
            }
            None => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "save store path has no file name",
                ));
            }
        };

        {
            let mut f = fs::File::create(&tmp_path)?;
            f.write_all(&join_lines(lines))?;
            f.sync_all()?;
        }

        #[cfg(windows)]
        {
            if self.path.exists() {
                // Windows rename fails if destination exists.
                fs::remove_file(&self.path)?;
            }
        }

        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}
