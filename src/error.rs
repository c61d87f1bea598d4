//! App error type for card operations. Implements Display and Serialize for the host.

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Unknown cardId: {0}")]
    UnknownCard(String),

    #[error("{0}")]
    InvalidRequest(String),
}

impl AppError {
    pub fn unknown_card(card_id: impl Into<String>) -> Self {
        Self::UnknownCard(card_id.into())
    }
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::InvalidRequest(s)
    }
}

impl From<&str> for AppError {
    fn from(s: &str) -> Self {
        s.to_string().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_is_invalid_request() {
        let e = AppError::from("bad payload".to_string());
        match &e {
            AppError::InvalidRequest(msg) => assert_eq!(msg, "bad payload"),
            _ => panic!("expected InvalidRequest"),
        }
    }

    #[test]
    fn unknown_card_mentions_id() {
        let e = AppError::unknown_card("card-7");
        assert_eq!(e.to_string(), "Unknown cardId: card-7");
    }

    #[test]
    fn serializes_as_display_string() {
        let e: AppError = "oops".into();
        let json = serde_json::to_string(&e).expect("serialize");
        assert_eq!(json, "\"oops\"");
    }
}
