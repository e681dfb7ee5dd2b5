use axum::response::Html;

use crate::render;

/// 空のフォームページを返す。
pub(crate) async fn index() -> Html<String> {
    Html(render::form_page())
}
