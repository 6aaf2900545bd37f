//! ブロック要素の変換（見出し・リスト・区切り線・段落）

use super::inline::render_inline;

/// 番号付きリストのマーカー（数字・`.`・空白1文字）を取り除く
///
/// `12. item` -> `Some("item")`、`1.5` や `1.item` -> `None`
fn strip_ordered_marker(line: &str) -> Option<&str> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = line[digits..].strip_prefix('.')?;
    let space = rest.chars().next().filter(|c| c.is_whitespace())?;
    Some(&rest[space.len_utf8()..])
}

/// 現在開いているリストの種類
///
/// 2種類のリストが同時に開くことはありません。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ListState {
    #[default]
    NoList,
    Unordered,
    Ordered,
}

impl ListState {
    fn open_tag(self) -> Option<&'static str> {
        match self {
            ListState::NoList => None,
            ListState::Unordered => Some("<ul>"),
            ListState::Ordered => Some("<ol>"),
        }
    }

    fn close_tag(self) -> Option<&'static str> {
        match self {
            ListState::NoList => None,
            ListState::Unordered => Some("</ul>"),
            ListState::Ordered => Some("</ol>"),
        }
    }
}

/// 1行ずつ処理するレンダラー
#[derive(Debug, Default)]
struct BlockRenderer {
    state: ListState,
    fragments: Vec<String>,
}

impl BlockRenderer {
    fn close_list(&mut self) {
        if let Some(tag) = self.state.close_tag() {
            self.fragments.push(tag.to_string());
        }
        self.state = ListState::NoList;
    }

    /// 指定した種類のリストに入る（別の種類が開いていれば先に閉じる）
    fn enter_list(&mut self, kind: ListState) {
        if self.state == kind {
            return;
        }
        self.close_list();
        if let Some(tag) = kind.open_tag() {
            self.fragments.push(tag.to_string());
        }
        self.state = kind;
    }

    fn push_block(&mut self, tag: &str, content: &str) {
        self.close_list();
        self.fragments
            .push(format!("<{tag}>{}</{tag}>", render_inline(content)));
    }

    fn push_item(&mut self, kind: ListState, content: &str) {
        self.enter_list(kind);
        self.fragments
            .push(format!("<li>{}</li>", render_inline(content)));
    }

    fn push_line(&mut self, raw_line: &str) {
        let line = raw_line.trim();

        if line.is_empty() {
            self.close_list();
        } else if let Some(rest) = line.strip_prefix("### ") {
            self.push_block("h3", rest);
        } else if let Some(rest) = line
            .strip_prefix("## ")
            .or_else(|| line.strip_prefix("# "))
        {
            self.push_block("h2", rest);
        } else if let Some(rest) = line.strip_prefix("- ") {
            self.push_item(ListState::Unordered, rest);
        } else if let Some(rest) = strip_ordered_marker(line) {
            self.push_item(ListState::Ordered, rest);
        } else if line.starts_with("---") {
            self.close_list();
            self.fragments.push("<hr/>".to_string());
        } else {
            self.push_block("p", line);
        }
    }

    fn finish(mut self) -> Vec<String> {
        self.close_list();
        self.fragments
    }
}

/// 行の列をHTMLフラグメントの列に変換する
///
/// 各行は前後の空白を除いてから分類されます。分類の優先順位は
/// 見出し → 箇条書き → 番号付きリスト → 区切り線 → 段落 の順です。
/// リストは空行・リスト以外の行・入力の終端で必ず閉じられます。
pub fn render<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut renderer = BlockRenderer::default();
    for line in lines {
        renderer.push_line(line.as_ref());
    }
    renderer.finish()
}

/// Markdownテキスト全体をHTMLに変換する（フラグメントは改行で連結）
pub fn markdown_to_html(text: &str) -> String {
    render(text.lines()).join("\n")
}
