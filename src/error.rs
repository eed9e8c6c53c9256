use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PodError>;

/// Errors raised by pod configuration, pod sources, and the sequencer runtime.
#[derive(Error, Debug)]
pub enum PodError {
    /// A trueX choice-card ad was delivered somewhere other than the head of
    /// the pod. The sequencer never reorders input.
    #[error("trueX ad \"{ad_id}\" at index {index}; a trueX ad must open the pod")]
    TruexNotFirst { ad_id: String, index: usize },

    /// More than one trueX ad in a single pod.
    #[error("pod contains {count} trueX ads; at most one is supported")]
    MultipleTruex { count: usize },

    /// Failed to read a pod file from disk.
    #[error("failed to read pod file {path}: {source}")]
    PodFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Pod file contents were not a valid JSON array of ad items.
    #[error("invalid pod JSON: {0}")]
    PodFileParse(#[from] serde_json::Error),

    /// The sequencer event loop has shut down and can no longer accept input.
    #[error("sequencer is no longer running")]
    SequencerGone,
}
