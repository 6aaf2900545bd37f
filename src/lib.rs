//! sheetpost - Google Sheets / Blogger command-line tools with a dependency-light XLSX previewer
//!
//! This crate provides the building blocks behind the `sheetpost` and `xlsx-preview`
//! binaries:
//!
//! - a restricted Markdown dialect rendered to HTML fragments for blog posts,
//! - an XLSX cell reader that works directly on the zipped OOXML package,
//! - thin Google Sheets and Blogger REST clients driven by an explicit [`Config`].
//!
//! The Markdown renderer and the XLSX reader are pure and independent of each other.
//!
//! # Quick Start
//!
//! ```rust
//! use sheetpost::markdown_to_html;
//!
//! let html = markdown_to_html("## Novidades\n- **taxa** reduzida\n- [site](https://example.com)");
//! assert_eq!(
//!     html,
//!     "<h2>Novidades</h2>\n<ul>\n<li><strong>taxa</strong> reduzida</li>\n\
//!      <li><a href='https://example.com' target='_blank' rel='noopener'>site</a></li>\n</ul>"
//! );
//! ```
//!
//! # Reading a Workbook
//!
//! ```rust,no_run
//! use sheetpost::{preview_rows, XlsxPackage};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut package = XlsxPackage::open("planilha.xlsx")?;
//!     for sheet in package.list_sheets()? {
//!         println!("{}", sheet.name);
//!     }
//!
//!     let rows = package.sheet_rows("Clientes")?;
//!     println!("{}", serde_json::to_string_pretty(&preview_rows(rows, 10))?);
//!     Ok(())
//! }
//! ```
//!
//! # Publishing a Post
//!
//! ```rust,no_run
//! use sheetpost::{submit_post, BloggerClient, Config, PostBuilder};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let blog_id = config.resolve_blog_id(None)?;
//!
//!     let post = PostBuilder::new()
//!         .with_labels(["novidades"])
//!         .with_encoding(config.markdown_encoding)
//!         .build()?
//!         .compose_file("post.md")?;
//!
//!     let client = BloggerClient::connect(&config.blogger_credentials()?)?;
//!     let published = submit_post(&client, &blog_id, &post, false)?;
//!     println!("{:?}", published.url);
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod config;
mod error;
pub mod google;
pub mod logging;
pub mod markdown;
mod output;
mod parser;
mod security;
mod types;

// 公開API
pub use api::{OutputFormat, SourceEncoding};
pub use builder::{NewPost, PostBuilder, PostComposer};
pub use config::{BloggerCredentials, Config, SheetsAccess, ENV_CANDIDATES};
pub use error::SheetpostError;
pub use google::{submit_post, AccessToken, BlogService, BloggerClient, Post, SheetsClient};
pub use markdown::{markdown_to_html, read_markdown, render_inline, split_title};
pub use output::{JsonFormatter, OutputFormatter, TextFormatter, NO_DATA_NOTICE};
pub use parser::{preview_rows, XlsxPackage};
pub use types::{CellValue, Row, SheetInfo};
