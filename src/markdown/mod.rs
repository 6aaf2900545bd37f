//! Markdown Module
//!
//! ブログ投稿用の限定的なMarkdown方言をHTMLフラグメントに変換するモジュール。
//!
//! 対応する記法は見出し（`#`, `##`, `###`）、箇条書き（`- `）、番号付きリスト（`1. `）、
//! 区切り線（`---`）、段落、強調（`**`, `__`, `*`, `_`）、HTTP(S)リンクのみです。
//! 対応しない記法はエスケープされたテキストとしてそのまま出力されます。

mod block;
mod document;
mod inline;

pub use block::{markdown_to_html, render};
pub use document::{read_markdown, split_title, UNTITLED};
pub use inline::render_inline;
