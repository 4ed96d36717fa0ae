/// History traversal errors.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("traversal ceiling exceeded: more than {max_processes} processes visited")]
    TraversalCeiling { max_processes: usize },

    #[error("invalid argument: {reason}")]
    InvalidArgument { reason: String },
}
