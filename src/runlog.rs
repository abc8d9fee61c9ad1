use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunLogError {
    #[error("run log file {path} does not exist")]
    NotFound { path: Utf8PathBuf },
    #[error("reading run log \"{path}\"")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads all lines of a run log, keeping line terminators.
///
/// Invalid UTF-8 is replaced rather than rejected.
pub fn read_lines(path: &Utf8Path) -> Result<Vec<String>, RunLogError> {
    if !path.is_file() {
        return Err(RunLogError::NotFound {
            path: path.to_owned(),
        });
    }

    let data = std::fs::read(path).map_err(|source| RunLogError::Read {
        path: path.to_owned(),
        source,
    })?;

    Ok(String::from_utf8_lossy(&data)
        .split_inclusive('\n')
        .map(String::from)
        .collect())
}
