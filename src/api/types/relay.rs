use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::infrastructure::gateway::RelayedBody;

/// Backend bytes go out untouched, labelled as JSON
impl IntoResponse for RelayedBody {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )],
            self.into_bytes(),
        )
            .into_response()
    }
}
