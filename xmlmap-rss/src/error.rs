use std::fmt;

use xmlmap_node::NodeError;
use xmlmap_stream::StreamError;

/// Error returned when reading a feed.
#[derive(Debug)]
pub enum RssError {
    /// The streaming path failed.
    Stream(StreamError),
    /// The tree path failed to parse or decode.
    Node(NodeError),
    /// The document has no `<channel>`.
    MissingChannel,
}

impl From<StreamError> for RssError {
    fn from(e: StreamError) -> Self {
        match e {
            StreamError::Incomplete { .. } => RssError::MissingChannel,
            e => RssError::Stream(e),
        }
    }
}

impl From<NodeError> for RssError {
    fn from(e: NodeError) -> Self {
        RssError::Node(e)
    }
}

impl fmt::Display for RssError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RssError::Stream(e) => write!(f, "{e}"),
            RssError::Node(e) => write!(f, "{e}"),
            RssError::MissingChannel => write!(f, "feed has no <channel> element"),
        }
    }
}

impl std::error::Error for RssError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RssError::Stream(e) => Some(e),
            RssError::Node(e) => Some(e),
            RssError::MissingChannel => None,
        }
    }
}
