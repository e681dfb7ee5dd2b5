//! 結果ページの組み立て。単一テンプレートにマーカー置換で値を差し込む。
use crate::clients::WebSource;

const PAGE_TEMPLATE: &str = include_str!("resources/index.html");

/// 初期表示用の空フォームページ。結果セクションは描画しない。
pub(crate) fn form_page() -> String {
    PAGE_TEMPLATE
        .replace("{{input_text}}", "")
        .replace("{{result_section}}", "")
}

/// 判定結果と Web ソース一覧を含むページ。
///
/// 入力テキストはそのまま HTML に入るためエスケープ必須。
pub(crate) fn results_page(input_text: &str, verdict: &str, sources: &[WebSource]) -> String {
    let mut section = String::new();
    section.push_str("  <section class=\"result\">\n    <h2>Result</h2>\n");
    // 判定メッセージは閉じた集合の定数なのでエスケープ不要。
    section.push_str(&format!("    <p class=\"verdict\">{verdict}</p>\n"));
    section.push_str("    <h3>Possible web sources</h3>\n");

    if sources.is_empty() {
        section.push_str("    <p class=\"empty\">No matching web sources found.</p>\n");
    } else {
        section.push_str("    <ul class=\"sources\">\n");
        for source in sources {
            section.push_str("      <li>");
            let title = source.title.as_deref().unwrap_or("(untitled)");
            match source.link.as_deref() {
                Some(link) => section.push_str(&format!(
                    "<a href=\"{}\">{}</a>",
                    escape(link),
                    escape(title)
                )),
                None => section.push_str(&escape(title)),
            }
            if let Some(snippet) = source.snippet.as_deref() {
                section.push_str(&format!(
                    "<br><span class=\"snippet\">{}</span>",
                    escape(snippet)
                ));
            }
            section.push_str("</li>\n");
        }
        section.push_str("    </ul>\n");
    }
    section.push_str("  </section>");

    // 入力テキストの置換は最後に行う。ユーザ入力にマーカー文字列が
    // 含まれていても、それがさらに置換されることはない。
    PAGE_TEMPLATE
        .replace("{{result_section}}", &section)
        .replace("{{input_text}}", &escape(input_text))
}

/// HTML として意味を持つ文字だけを実体参照へ置き換える。
/// 空白やスラッシュはそのまま通す。
fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
