//! Output file helpers
//!
//! - `atomic_rename`: replace a file in one step (Windows needs an explicit delete)
//! - `write_atomic`: write through a sibling temp file so readers never see a partial file
//! - `open_output`: `-` means stdout, anything else a file

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Cross-platform atomic rename that handles Windows file replacement.
///
/// On Unix, `fs::rename` atomically replaces the target if it exists.
/// On Windows, `fs::rename` fails if the target exists, so the target is
/// deleted first.
///
/// ```no_run
/// use std::path::Path;
/// use semfora_tags::fs_utils::atomic_rename;
///
/// std::fs::write("TAGS.tmp", "(tags-format-version 2)\n")?;
/// atomic_rename(Path::new("TAGS.tmp"), Path::new("TAGS"))?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn atomic_rename(src: &Path, dst: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        if dst.exists() {
            fs::remove_file(dst)?;
        }
    }
    fs::rename(src, dst)
}

/// Write `content` to `path` via `<path>.tmp` and an atomic rename.
pub fn write_atomic(path: &Path, content: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = Path::new(&temp);
    fs::write(temp, content)?;
    atomic_rename(temp, path)
}

/// Open an output target. `-` is stdout; `append` keeps existing content.
pub fn open_output(target: &str, append: bool) -> io::Result<Box<dyn Write>> {
    if target == "-" {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    let file: File = OpenOptions::new()
        .write(true)
        .create(true)
        .append(append)
        .truncate(!append)
        .open(target)?;
    Ok(Box::new(BufWriter::new(file)))
}
