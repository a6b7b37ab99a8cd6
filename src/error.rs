/// Fatal errors that abort a whole conversion run.
///
/// Problems confined to a single row are never reported through this type,
/// see [`crate::SkipReason`].
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("CSV input is empty")]
    EmptyInput,
    #[error(
        "could not map any columns, CSV headers: {headers:?} \
         (expected at least something like 'Task/Subject' or 'Due Date/Start Date/Date')"
    )]
    UnmappedColumns { headers: Vec<String> },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
