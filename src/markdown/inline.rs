//! インライン要素の変換

use once_cell::sync::Lazy;
use regex::Regex;

/// 置換規則（適用順）
///
/// `**` を `*` より先に処理する必要があるため、順序は固定です。
static INLINE_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\*\*(.+?)\*\*", "<strong>${1}</strong>"),
        (r"__(.+?)__", "<strong>${1}</strong>"),
        (r"\*(.+?)\*", "<em>${1}</em>"),
        (r"_(.+?)_", "<em>${1}</em>"),
        (
            r"\[(.+?)\]\((https?://[^\s)]+)\)",
            "<a href='${2}' target='_blank' rel='noopener'>${1}</a>",
        ),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// 1行分のテキストをHTMLに変換する
///
/// 先にHTMLエスケープを行い、その後で強調・リンクのマークアップを導入します。
/// 元のテキスト中の `<script>` などはエスケープされたまま残ります。
/// 対応しない記号はそのまま出力されます。
///
/// ```rust
/// use sheetpost::render_inline;
///
/// assert_eq!(
///     render_inline("**bold** and *em*"),
///     "<strong>bold</strong> and <em>em</em>"
/// );
/// ```
pub fn render_inline(text: &str) -> String {
    let mut html = html_escape::encode_quoted_attribute(text).into_owned();
    for (regex, replacement) in INLINE_RULES.iter() {
        html = regex.replace_all(&html, *replacement).into_owned();
    }
    html.replace('\n', "<br/>")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bold_and_emphasis() {
        assert_eq!(
            render_inline("**bold** and *em*"),
            "<strong>bold</strong> and <em>em</em>"
        );
        assert_eq!(
            render_inline("__bold__ and _em_"),
            "<strong>bold</strong> and <em>em</em>"
        );
    }

    #[test]
    fn test_all_rules_compile_in_order() {
        let replacements: Vec<&str> = INLINE_RULES.iter().map(|(_, r)| *r).collect();
        assert_eq!(replacements.len(), 5);
        assert!(replacements[0].starts_with("<strong>"));
        assert!(replacements[1].starts_with("<strong>"));
        assert!(replacements[2].starts_with("<em>"));
        assert!(replacements[3].starts_with("<em>"));
        assert!(replacements[4].starts_with("<a "));
    }

    #[test]
    fn test_non_greedy_matches() {
        assert_eq!(
            render_inline("**a** b **c**"),
            "<strong>a</strong> b <strong>c</strong>"
        );
    }

    #[test]
    fn test_link() {
        assert_eq!(
            render_inline("veja [o site](https://example.com/page) agora"),
            "veja <a href='https://example.com/page' target='_blank' rel='noopener'>o site</a> agora"
        );
    }

    #[test]
    fn test_link_requires_http_scheme() {
        assert_eq!(render_inline("[x](ftp://host)"), "[x](ftp://host)");
    }

    #[test]
    fn test_escaping_happens_first() {
        let html = render_inline("<script>alert(1)</script> & **ok**");
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("&amp;"));
        assert!(html.ends_with("<strong>ok</strong>"));
    }

    #[test]
    fn test_quotes_are_escaped() {
        let html = render_inline(r#"say "hi" and 'bye'"#);
        assert!(!html.contains('"'));
        assert!(!html.contains('\''));
    }

    #[test]
    fn test_unmatched_markup_passes_through() {
        assert_eq!(render_inline("2 * 3 = 6"), "2 * 3 = 6");
        assert_eq!(render_inline("**open"), "**open");
        assert_eq!(render_inline("[label](no-url)"), "[label](no-url)");
    }

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(render_inline("one\ntwo"), "one<br/>two");
    }

    #[test]
    fn test_markup_does_not_span_lines() {
        assert_eq!(render_inline("*a\nb*"), "*a<br/>b*");
    }
}
