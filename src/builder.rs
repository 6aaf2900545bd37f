//! Builder Module
//!
//! Fluent Builder APIを提供し、`PostComposer`インスタンスを段階的に構築する。

use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::debug;
use serde::Serialize;

use crate::api::SourceEncoding;
use crate::error::SheetpostError;
use crate::markdown::{markdown_to_html, read_markdown, split_title};

/// Blogger APIに送信する新規投稿
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewPost {
    /// 常に `blogger#post`
    pub kind: String,
    pub title: String,
    /// HTML本文
    pub content: String,
    /// ラベル（空の場合は送信しない）
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

/// 投稿組み立ての設定を保持する内部構造体
#[derive(Debug, Clone, Default)]
pub(crate) struct CompositionConfig {
    /// 見出しより優先するタイトル
    pub title: Option<String>,

    /// ラベル
    pub labels: Vec<String>,

    /// 本文の先頭に埋め込む画像
    pub image: Option<PathBuf>,

    /// Markdownファイルのエンコーディング戦略
    pub encoding: SourceEncoding,
}

/// Fluent Builder APIを提供する構造体
///
/// `PostComposer`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetpost::PostBuilder;
///
/// # fn main() -> Result<(), sheetpost::SheetpostError> {
/// let composer = PostBuilder::new()
///     .with_labels(["novidades", "credito"])
///     .with_image("capa.png")
///     .build()?;
/// let post = composer.compose_file("post.md")?;
/// println!("{}", post.title);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PostBuilder {
    /// 内部設定（構築中）
    config: CompositionConfig,
}

impl PostBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - タイトル: 文書の最初の `# ` 見出し
    /// - ラベル: なし
    /// - 画像: なし
    /// - エンコーディング: UTF-8、失敗時は `windows-1252`
    pub fn new() -> Self {
        Self::default()
    }

    /// タイトルを上書きする
    ///
    /// 空白のみのタイトルは無視され、文書の見出しが使われます。
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        let title = title.into().trim().to_string();
        self.config.title = if title.is_empty() { None } else { Some(title) };
        self
    }

    /// ラベルを指定する（空白のみのラベルは除外）
    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.labels = labels
            .into_iter()
            .map(Into::into)
            .map(|label: String| label.trim().to_string())
            .filter(|label| !label.is_empty())
            .collect();
        self
    }

    /// 本文の先頭に埋め込む画像を指定する
    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.image = Some(path.into());
        self
    }

    /// Markdownファイルのエンコーディング戦略を指定する
    pub fn with_encoding(mut self, encoding: SourceEncoding) -> Self {
        self.config.encoding = encoding;
        self
    }

    /// 設定を検証し、`PostComposer`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Err(SheetpostError::FileNotFound)` - 指定した画像が存在しない場合
    pub fn build(self) -> Result<PostComposer, SheetpostError> {
        if let Some(image) = &self.config.image {
            if !image.is_file() {
                return Err(SheetpostError::FileNotFound(image.clone()));
            }
        }

        Ok(PostComposer {
            config: self.config,
        })
    }
}

/// Markdown文書から投稿を組み立てるファサード
#[derive(Debug)]
pub struct PostComposer {
    config: CompositionConfig,
}

impl PostComposer {
    /// Markdownファイルを読み込んで投稿を組み立てる
    pub fn compose_file<P: AsRef<Path>>(&self, path: P) -> Result<NewPost, SheetpostError> {
        let markdown = read_markdown(path, &self.config.encoding)?;
        self.compose_str(&markdown)
    }

    /// Markdownテキストから投稿を組み立てる
    ///
    /// ```rust
    /// use sheetpost::PostBuilder;
    ///
    /// # fn main() -> Result<(), sheetpost::SheetpostError> {
    /// let post = PostBuilder::new().build()?.compose_str("# Ola\n\n- um\n- dois")?;
    /// assert_eq!(post.title, "Ola");
    /// assert_eq!(post.content, "<ul>\n<li>um</li>\n<li>dois</li>\n</ul>");
    /// # Ok(())
    /// # }
    /// ```
    pub fn compose_str(&self, markdown: &str) -> Result<NewPost, SheetpostError> {
        let (heading, body) = split_title(markdown);
        let title = self.config.title.clone().unwrap_or(heading);

        let mut content = markdown_to_html(&body);
        if let Some(image) = &self.config.image {
            content = format!("{}{}", image_tag(image, &title)?, content);
        }

        Ok(NewPost {
            kind: "blogger#post".to_string(),
            title: title.trim().to_string(),
            content,
            labels: self.config.labels.clone(),
        })
    }
}

/// 画像をdata URIとして埋め込む中央寄せのブロックを作る
fn image_tag(path: &Path, title: &str) -> Result<String, SheetpostError> {
    if !path.is_file() {
        return Err(SheetpostError::FileNotFound(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    debug!(
        "embedding {} ({}, {} bytes)",
        path.display(),
        mime,
        bytes.len()
    );

    Ok(format!(
        "<div class='separator' style='text-align:center;'>\
         <img src='data:{};base64,{}' alt='{}' style='max-width:100%; height:auto;'/>\
         </div>\n",
        mime,
        STANDARD.encode(&bytes),
        html_escape::encode_quoted_attribute(title)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_compose_uses_heading_as_title() {
        let composer = PostBuilder::new().build().unwrap();
        let post = composer
            .compose_str("# Taxas de Março\n\nTexto **importante**.")
            .unwrap();
        assert_eq!(post.kind, "blogger#post");
        assert_eq!(post.title, "Taxas de Março");
        assert_eq!(post.content, "<p>Texto <strong>importante</strong>.</p>");
        assert!(post.labels.is_empty());
    }

    #[test]
    fn test_title_override() {
        let composer = PostBuilder::new().with_title("  Outro  ").build().unwrap();
        let post = composer.compose_str("# Rascunho\nbody").unwrap();
        assert_eq!(post.title, "Outro");
        assert_eq!(post.content, "<p>body</p>");
    }

    #[test]
    fn test_blank_title_override_is_ignored() {
        let composer = PostBuilder::new().with_title("   ").build().unwrap();
        assert_eq!(composer.compose_str("# Rascunho").unwrap().title, "Rascunho");
    }

    #[test]
    fn test_labels_are_trimmed_and_filtered() {
        let composer = PostBuilder::new()
            .with_labels(vec![" a ", "", "b"])
            .build()
            .unwrap();
        assert_eq!(composer.compose_str("x").unwrap().labels, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_image_fails_at_build() {
        let result = PostBuilder::new().with_image("no/such/cover.png").build();
        assert!(matches!(result, Err(SheetpostError::FileNotFound(_))));
    }

    #[test]
    fn test_image_is_embedded_as_data_uri() {
        let mut image = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        image.write_all(&[0x89, b'P', b'N', b'G']).unwrap();

        let composer = PostBuilder::new()
            .with_image(image.path())
            .build()
            .unwrap();
        let post = composer.compose_str("# Tom & \"Jerry\"\nbody").unwrap();

        assert!(post.content.starts_with(
            "<div class='separator' style='text-align:center;'><img src='data:image/png;base64,iVBORw=='"
        ));
        assert!(post.content.contains("alt='Tom &amp; &quot;Jerry&quot;'"));
        assert!(post.content.ends_with("</div>\n<p>body</p>"));
    }

    #[test]
    fn test_serialized_payload_omits_empty_labels() {
        let composer = PostBuilder::new().build().unwrap();
        let json = serde_json::to_value(composer.compose_str("# T\nb").unwrap()).unwrap();
        assert_eq!(json["kind"], "blogger#post");
        assert!(json.get("labels").is_none());
    }
}
