//! Line-stream plumbing between commands: files when a path is given,
//! stdio otherwise. `-` means stdin, following the usual convention.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

pub fn reader(path: Option<&Path>) -> io::Result<Box<dyn BufRead>> {
    match path {
        Some(path) if path != Path::new("-") => {
            Ok(Box::new(BufReader::new(File::open(path)?)))
        }
        _ => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

pub fn writer(path: Option<&Path>) -> io::Result<Box<dyn Write>> {
    match path {
        Some(path) => Ok(Box::new(BufWriter::new(File::create(path)?))),
        None => Ok(Box::new(io::stdout())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_roundtrip() {
        let path = std::env::temp_dir().join(format!("survivor-stream-{}", std::process::id()));

        {
            let mut out = writer(Some(&path)).unwrap();
            writeln!(out, "line one").unwrap();
            writeln!(out, "line two").unwrap();
        }

        let lines: Vec<String> =
            reader(Some(&path)).unwrap().lines().collect::<Result<_, _>>().unwrap();
        assert_eq!(lines, vec!["line one", "line two"]);

        std::fs::remove_file(path).unwrap();
    }

    #[test]
    fn missing_infile_is_an_error() {
        assert!(reader(Some(Path::new("/definitely/not/here"))).is_err());
    }
}
