//! Data dictionary file

use std::path::Path;
use tracing::info;

use domain_claims::DataDictionary;

use crate::error::PipelineError;

/// Writes the rendered dictionary to `path`, replacing any previous file
pub async fn write_dictionary(path: &Path, dictionary: &DataDictionary) -> Result<(), PipelineError> {
    tokio::fs::write(path, dictionary.render())
        .await
        .map_err(|source| PipelineError::Write {
            path: path.to_path_buf(),
            source,
        })?;

    info!(path = %path.display(), "Data dictionary written");
    Ok(())
}
