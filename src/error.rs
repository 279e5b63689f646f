use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{}", unavailable_message(.package_id, .region))]
    Unavailable {
        package_id: String,
        region: Option<String>,
    },
    #[error("Extraction error on `{field}`: {snippet}")]
    Extraction { field: &'static str, snippet: String },
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Selector error: {0}")]
    Selector(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

fn unavailable_message(package_id: &str, region: &Option<String>) -> String {
    match region {
        Some(region) => format!("Application {package_id} unavailable in country {region}"),
        None => format!("Application {package_id} unavailable"),
    }
}

impl StoreError {
    pub(crate) fn extraction(field: &'static str, snippet: impl Into<String>) -> Self {
        let mut snippet = snippet.into();
        if snippet.chars().count() > 80 {
            snippet = snippet.chars().take(80).collect::<String>() + "...";
        }
        StoreError::Extraction { field, snippet }
    }

    /// Name of the required field that failed, if this is an extraction error.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            StoreError::Extraction { field, .. } => Some(*field),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_message_names_region_when_known() {
        let err = StoreError::Unavailable {
            package_id: "com.example.app".to_string(),
            region: Some("de".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Application com.example.app unavailable in country de"
        );

        let err = StoreError::Unavailable {
            package_id: "com.example.app".to_string(),
            region: None,
        };
        assert_eq!(err.to_string(), "Application com.example.app unavailable");
    }

    #[test]
    fn extraction_snippet_is_truncated() {
        let err = StoreError::extraction("title", "x".repeat(200));
        match &err {
            StoreError::Extraction { field, snippet } => {
                assert_eq!(*field, "title");
                assert_eq!(snippet.chars().count(), 83);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.field(), Some("title"));
    }
}
