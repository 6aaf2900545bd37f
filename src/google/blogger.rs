//! Blogger API v3（ブログ情報・投稿の一覧・投稿の作成と公開）

use log::{debug, info};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_LENGTH;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::auth::{refresh_access_token, AccessToken, BLOGGER_SCOPE};
use super::check_response;
use crate::builder::NewPost;
use crate::config::BloggerCredentials;
use crate::error::SheetpostError;

const BLOGGER_API: &str = "https://www.googleapis.com/blogger/v3/blogs";

/// Blogger APIが返す投稿（必要なフィールドのみ）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub title: String,
    /// 公開済みの投稿のURL（下書きにはない）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PostList {
    #[serde(default)]
    items: Vec<Post>,
}

/// 投稿の作成と公開を行うサービス
///
/// [`submit_post`] はこのトレイトを通じて呼び出すため、テストでは実際のAPIの代わりに
/// 任意の実装を渡せます。
pub trait BlogService {
    /// 投稿を作成する（`is_draft` が真なら下書きとして）
    fn insert_post(
        &self,
        blog_id: &str,
        post: &NewPost,
        is_draft: bool,
    ) -> Result<Post, SheetpostError>;

    /// 下書きの投稿を公開する
    fn publish_post(&self, blog_id: &str, post_id: &str) -> Result<Post, SheetpostError>;
}

/// 投稿を作成し、必要であれば公開する
///
/// 下書きでない投稿の作成結果にURLがない場合（ブログ側で下書き扱いになった場合）は、
/// 続けて公開を要求し、その結果を返します。
pub fn submit_post<S: BlogService + ?Sized>(
    service: &S,
    blog_id: &str,
    post: &NewPost,
    draft: bool,
) -> Result<Post, SheetpostError> {
    let inserted = service.insert_post(blog_id, post, draft)?;
    info!("created post {} on blog {}", inserted.id, blog_id);

    if draft || inserted.url.is_some() {
        return Ok(inserted);
    }

    debug!("post {} has no URL yet, publishing", inserted.id);
    service.publish_post(blog_id, &inserted.id)
}

/// リフレッシュトークンで認証済みのBloggerクライアント
#[derive(Debug)]
pub struct BloggerClient {
    http: Client,
    token: AccessToken,
}

impl BloggerClient {
    /// リフレッシュトークンを交換してクライアントを作成する
    pub fn connect(credentials: &BloggerCredentials) -> Result<Self, SheetpostError> {
        let http = Client::new();
        let token = refresh_access_token(&http, credentials, BLOGGER_SCOPE)?;
        Ok(Self { http, token })
    }

    /// 取得したアクセストークン
    pub fn token(&self) -> &AccessToken {
        &self.token
    }

    /// ブログの情報を取得する（レスポンスのフィールドをそのまま返す）
    pub fn get_blog(&self, blog_id: &str) -> Result<Map<String, Value>, SheetpostError> {
        let url = blog_url(blog_id);
        debug!("GET {}", url);
        let response = self.http.get(&url).bearer_auth(&self.token.token).send()?;
        Ok(check_response(response)?.json()?)
    }

    /// 最近の投稿を本文なしで取得する
    pub fn list_posts(&self, blog_id: &str, max_results: u32) -> Result<Vec<Post>, SheetpostError> {
        let url = format!("{}/posts", blog_url(blog_id));
        debug!("GET {} (maxResults={})", url, max_results);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token.token)
            .query(&[
                ("fetchBodies", "false".to_string()),
                ("maxResults", max_results.to_string()),
            ])
            .send()?;
        let list: PostList = check_response(response)?.json()?;
        Ok(list.items)
    }
}

impl BlogService for BloggerClient {
    fn insert_post(
        &self,
        blog_id: &str,
        post: &NewPost,
        is_draft: bool,
    ) -> Result<Post, SheetpostError> {
        let url = format!("{}/posts/", blog_url(blog_id));
        debug!("POST {} (isDraft={})", url, is_draft);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token.token)
            .query(&[("isDraft", is_draft)])
            .json(post)
            .send()?;
        Ok(check_response(response)?.json()?)
    }

    fn publish_post(&self, blog_id: &str, post_id: &str) -> Result<Post, SheetpostError> {
        let url = format!(
            "{}/posts/{}/publish",
            blog_url(blog_id),
            urlencoding::encode(post_id)
        );
        debug!("POST {}", url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token.token)
            .header(CONTENT_LENGTH, 0)
            .send()?;
        Ok(check_response(response)?.json()?)
    }
}

fn blog_url(blog_id: &str) -> String {
    format!("{}/{}", BLOGGER_API, urlencoding::encode(blog_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blog_url() {
        assert_eq!(
            blog_url("123456"),
            "https://www.googleapis.com/blogger/v3/blogs/123456"
        );
    }

    #[test]
    fn test_post_list_without_items() {
        let list: PostList = serde_json::from_str(r#"{"kind": "blogger#postList"}"#).unwrap();
        assert!(list.items.is_empty());
    }

    #[test]
    fn test_post_deserialization_ignores_unknown_fields() {
        let post: Post = serde_json::from_str(
            r#"{"kind": "blogger#post", "id": "77", "title": "Ola", "status": "DRAFT", "labels": ["a"]}"#,
        )
        .unwrap();
        assert_eq!(post.id, "77");
        assert_eq!(post.title, "Ola");
        assert_eq!(post.status.as_deref(), Some("DRAFT"));
        assert!(post.url.is_none());
    }
}
