use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataProcessingError {
    ExpectedNonEmptyData {
        context: Option<String>,
    },
    ExpectedSlicesSameLength {
        expected: usize,
        other: usize,
        context: String,
    },
    ExpectedVectorSameLength,
    KeyNotFound {
        key: String,
        context: String,
    },
}

impl Display for DataProcessingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl DataProcessingError {
    pub fn append_to_context(mut self, context: &str) -> Self {
        match &mut self {
            DataProcessingError::ExpectedNonEmptyData {
                context: owned_context,
            } => match owned_context {
                Some(x) => x.push_str(context),
                None => *owned_context = Some(context.to_string()),
            },
            DataProcessingError::ExpectedSlicesSameLength {
                context: owned_context,
                ..
            } => {
                owned_context.push_str(context);
            }
            DataProcessingError::ExpectedVectorSameLength => {}
            DataProcessingError::KeyNotFound {
                context: owned_context,
                ..
            } => {
                owned_context.push_str(context);
            }
        }
        self
    }
}

pub type Result<T> = std::result::Result<T, DataProcessingError>;
