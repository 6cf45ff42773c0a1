//! Output target handling

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Create `path`, or truncate it if it exists, for writing.
pub fn create_truncate(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o777);
    }
    options.open(path)
}

/// Write `text` followed by a single newline, then flush.
pub fn write_line<W: Write>(mut target: W, text: &str) -> io::Result<()> {
    writeln!(target, "{}", text)?;
    target.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_create_truncate_overwrites_existing_file() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("out.txt");
        fs::write(&path, "a much longer previous content\n").expect("write");

        let file = create_truncate(&path).expect("open");
        write_line(file, "short").expect("write");

        assert_eq!(fs::read_to_string(&path).expect("read"), "short\n");
    }

    #[test]
    fn test_create_truncate_fails_in_missing_directory() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("missing").join("out.txt");
        assert!(create_truncate(&path).is_err());
    }

    #[test]
    fn test_write_line_empty_text_is_blank_line() {
        let mut buf = Vec::new();
        write_line(&mut buf, "").expect("write");
        assert_eq!(buf, b"\n");
    }
}
