/// Pipeline materialization errors.
///
/// Individual invalid connections are warned and skipped, not raised;
/// these variants cover conflicts the graph cannot recover from.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid connection {src}.{src_param} -> {dst}.{dst_param}: {reason}")]
    InvalidConnection {
        src: String,
        src_param: String,
        dst: String,
        dst_param: String,
        reason: String,
    },

    #[error("duplicate node identifier: {id}")]
    DuplicateNode { id: String },
}
