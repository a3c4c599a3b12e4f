// Response bodies for the HTTP API

use serde::Serialize;

/// Body of every failed request
#[derive(Serialize, Debug, Clone)]
pub struct ErrorBody {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            error: "file not found".into(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({ "error": "file not found" })
        );
    }
}
