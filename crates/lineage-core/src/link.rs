//! Provenance links between process parameters.

/// A directed edge connecting an output parameter of one process to an
/// input parameter of another. A `None` endpoint is the external boundary:
/// data flowing in from outside the reconstructed history, or the final
/// output exposed to the caller.
///
/// Links compare by value and live in sets; duplicates collapse.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Link {
    pub src: Option<String>,
    pub src_param: String,
    pub dst: Option<String>,
    pub dst_param: String,
}

impl Link {
    /// Edge between two recorded processes.
    pub fn between(src: &str, src_param: &str, dst: &str, dst_param: &str) -> Self {
        Self {
            src: Some(src.to_string()),
            src_param: src_param.to_string(),
            dst: Some(dst.to_string()),
            dst_param: dst_param.to_string(),
        }
    }

    /// Boundary edge: `param` flows into `dst` from outside the history.
    pub fn from_boundary(param: &str, dst: &str) -> Self {
        Self {
            src: None,
            src_param: param.to_string(),
            dst: Some(dst.to_string()),
            dst_param: param.to_string(),
        }
    }

    /// Boundary edge: `param` of `src` is exposed to the caller.
    pub fn to_boundary(src: &str, param: &str) -> Self {
        Self {
            src: Some(src.to_string()),
            src_param: param.to_string(),
            dst: None,
            dst_param: param.to_string(),
        }
    }

    /// Whether either endpoint is the external boundary.
    pub fn is_boundary(&self) -> bool {
        self.src.is_none() || self.dst.is_none()
    }
}
