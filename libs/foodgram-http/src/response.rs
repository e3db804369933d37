use axum::{
    Json,
    http::{StatusCode, header},
    response::IntoResponse,
};

/// Short aliases for JSON responses
pub type JsonBody<T> = Json<T>;
pub type JsonPage<T> = Json<crate::pagination::Page<T>>;

/// 200 OK + JSON
pub fn ok_json<T: serde::Serialize>(value: T) -> impl IntoResponse {
    (StatusCode::OK, Json(value))
}

/// 201 Created + JSON
pub fn created_json<T: serde::Serialize>(value: T) -> impl IntoResponse {
    (StatusCode::CREATED, Json(value))
}

/// 204 No Content
#[must_use]
pub fn no_content() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}

/// 200 OK + `text/plain` body served as a download named `filename`.
pub fn text_attachment(filename: &str, body: String) -> impl IntoResponse + use<> {
    let disposition = format!("attachment; filename=\"{filename}\"");
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_owned()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn attachment_sets_disposition_and_type() {
        let resp = text_attachment("shopping_list.txt", "salt (g) - 5".to_owned()).into_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"shopping_list.txt\""
        );
        assert_eq!(resp.headers()[header::CONTENT_TYPE], "text/plain; charset=utf-8");
        let body = resp.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"salt (g) - 5");
    }

    #[test]
    fn created_and_no_content_statuses() {
        assert_eq!(
            created_json(serde_json::json!({"id": 1})).into_response().status(),
            StatusCode::CREATED
        );
        assert_eq!(no_content().into_response().status(), StatusCode::NO_CONTENT);
    }
}
