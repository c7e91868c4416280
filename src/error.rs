//! Error kinds surfaced by the portal. None of them are fatal to the page:
//! every path degrades to a retry, a placeholder, or a logged no-op.

use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum PortalError {
    /// Catalog never became available within the retry budget.
    #[error("game catalog unavailable after {attempts} retries")]
    CatalogUnavailable { attempts: u32 },
    /// Expected container element is not in the page.
    #[error("render target #{0} not found")]
    RenderTargetMissing(String),
    /// Card identity did not resolve against the catalog.
    #[error("no catalog entry for '{0}'")]
    LoadDispatchFailure(String),
    #[error("invalid data file: {0}")]
    InvalidExport(&'static str),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<PortalError> for JsValue {
    fn from(err: PortalError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T, E = PortalError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_failure() {
        let e = PortalError::CatalogUnavailable { attempts: 30 };
        assert_eq!(e.to_string(), "game catalog unavailable after 30 retries");
        let e = PortalError::RenderTargetMissing("carousel-track-top".into());
        assert!(e.to_string().contains("carousel-track-top"));
    }

    #[test]
    fn test_json_errors_convert() {
        let bad = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e: PortalError = bad.into();
        assert!(matches!(e, PortalError::Json(_)));
    }
}
