//! Version-aware response decoding

use reqwest::StatusCode;
use tracing::debug;

use crate::core::endpoint::Variant;
use crate::core::errors::{Result, TranslationError};
use crate::core::models::{TranslationResult, TranslationResultV1, TranslationResultV2};
use crate::core::transport::HttpResponse;

/// Decode `response` into the shape selected by `variant`.
///
/// Any status other than 200 becomes [`TranslationError::ApiError`] before the
/// body is looked at.
pub fn decode_response(variant: Variant, response: &HttpResponse) -> Result<TranslationResult> {
    if response.status != StatusCode::OK {
        return Err(status_error(response));
    }

    debug!("Decoding {} byte {} response", response.body.len(), variant);
    let result = match variant {
        Variant::V1 => TranslationResult::V1(
            serde_json::from_slice::<TranslationResultV1>(&response.body)
                .map_err(TranslationError::DecodeError)?,
        ),
        Variant::V2 => TranslationResult::V2(
            serde_json::from_slice::<TranslationResultV2>(&response.body)
                .map_err(TranslationError::DecodeError)?,
        ),
    };

    Ok(result)
}

/// Typed error for a non-200 response, keyed by its status code
pub fn status_error(response: &HttpResponse) -> TranslationError {
    let body = response.text();
    let message = if body.trim().is_empty() {
        response
            .status
            .canonical_reason()
            .unwrap_or("unknown status")
            .to_string()
    } else {
        body
    };

    TranslationError::ApiError {
        status: response.status.as_u16(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok(body: &str) -> HttpResponse {
        HttpResponse::new(StatusCode::OK, body)
    }

    #[test]
    fn test_decode_v1() {
        let response = ok(r#"{"code":200,"id":1,"data":"Hallo","alternatives":["Servus"],"source_lang":"EN","target_lang":"DE","method":"Free"}"#);
        match decode_response(Variant::V1, &response).unwrap() {
            TranslationResult::V1(result) => {
                assert_eq!(result.data, "Hallo");
                assert_eq!(result.alternatives, vec!["Servus"]);
                assert_eq!(result.method, "Free");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_decode_v2() {
        let response = ok(r#"{"translations":[{"detected_source_language":"EN","text":"Hallo"},{"detected_source_language":"EN","text":"Welt"}]}"#);
        let result = decode_response(Variant::V2, &response).unwrap();
        assert_eq!(result.variant(), Variant::V2);
        assert_eq!(result.into_text(), "HalloWelt");
    }

    #[test]
    fn test_variant_is_never_mixed() {
        // A V1 body is not a valid V2 result
        let response = ok(r#"{"code":200,"data":"Hallo"}"#);
        let err = decode_response(Variant::V2, &response).unwrap_err();
        assert!(matches!(err, TranslationError::DecodeError(_)));

        // A V2 body is not a valid V1 result, nor is an empty object
        for body in [
            r#"{"translations":[{"detected_source_language":"EN","text":"Hallo"}]}"#,
            "{}",
        ] {
            let err = decode_response(Variant::V1, &ok(body)).unwrap_err();
            assert!(matches!(err, TranslationError::DecodeError(_)), "{body}");
        }
    }

    #[test]
    fn test_v1_optional_fields_default() {
        match decode_response(Variant::V1, &ok(r#"{"data":"Hallo"}"#)).unwrap() {
            TranslationResult::V1(result) => {
                assert_eq!(result.data, "Hallo");
                assert_eq!(result.code, 0);
                assert!(result.alternatives.is_empty());
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = decode_response(Variant::V1, &ok("not json")).unwrap_err();
        assert!(matches!(err, TranslationError::DecodeError(_)));
        assert!(err.to_string().starts_with("error decoding response"));
    }

    #[test]
    fn test_non_200_is_status_error() {
        let response = HttpResponse::new(StatusCode::FORBIDDEN, "");
        let err = decode_response(Variant::V2, &response).unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.to_string(), "API error: 403 - Forbidden");

        // Non-200 success codes are still rejected
        let response = HttpResponse::new(StatusCode::ACCEPTED, r#"{"translations":[]}"#);
        let err = decode_response(Variant::V2, &response).unwrap_err();
        assert_eq!(err.status(), Some(202));
    }

    #[test]
    fn test_status_error_keeps_body() {
        let response = HttpResponse::new(StatusCode::TOO_MANY_REQUESTS, "slow down");
        let err = status_error(&response);
        assert!(err.is_retriable());
        assert_eq!(err.to_string(), "API error: 429 - slow down");
    }
}
