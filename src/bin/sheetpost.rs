//! Google Sheets / Blogger command-line tool

use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::Value;
use sheetpost::logging::init_logging;
use sheetpost::{
    submit_post, BloggerClient, Config, OutputFormat, OutputFormatter, PostBuilder,
    SheetpostError, SheetsClient, SourceEncoding,
};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Text,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser)]
#[command(name = "sheetpost", version, about = "Tools for Google Sheets and Blogger.")]
struct Cli {
    /// Env file to load instead of `.env` / `.env.example`.
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Print debug logs on stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch cell values from the configured spreadsheet.
    FetchRange {
        /// Range in A1 notation (e.g. 'Aba!A1:C5').
        #[arg(long, default_value = "A1:D10")]
        range: String,

        /// Output format.
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
    },

    /// Refresh the access token and show the blog metadata.
    ShowBlogInfo {
        /// Blog ID. Defaults to BLOGGER_BLOG_ID.
        #[arg(long)]
        blog_id: Option<String>,
    },

    /// List recent posts.
    ListPosts {
        /// Blog ID. Defaults to BLOGGER_BLOG_ID.
        #[arg(long)]
        blog_id: Option<String>,

        /// Number of posts to list.
        #[arg(long, default_value_t = 5)]
        limit: u32,
    },

    /// Publish a new post from a Markdown file.
    PublishPost {
        /// Markdown file with the post.
        #[arg(long)]
        content: PathBuf,

        /// Featured image (png, jpg, webp), embedded at the top of the post.
        #[arg(long)]
        image: Option<PathBuf>,

        /// Post labels.
        #[arg(long, num_args = 0..)]
        labels: Vec<String>,

        /// Title override. Defaults to the first `# ` heading of the Markdown file.
        #[arg(long)]
        title: Option<String>,

        /// Blog ID. Defaults to BLOGGER_BLOG_ID.
        #[arg(long)]
        blog_id: Option<String>,

        /// Create the post as a draft.
        #[arg(long)]
        draft: bool,

        /// Fallback encoding for non-UTF-8 Markdown ('none' for strict UTF-8).
        /// Defaults to MARKDOWN_FALLBACK_ENCODING, then windows-1252.
        #[arg(long)]
        encoding: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli) {
        handle_error(e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), SheetpostError> {
    let config = Config::load(cli.env_file.as_deref())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Command::FetchRange { range, format } => {
            let access = config.sheets_access()?;
            let client = SheetsClient::connect(&access)?;
            let rows = client.fetch_values(&range)?;
            OutputFormatter::from_format(format.into()).render_rows(&rows, &mut out)?;
        }
        Command::ShowBlogInfo { blog_id } => {
            let blog_id = config.resolve_blog_id(blog_id.as_deref())?;
            let client = BloggerClient::connect(&config.blogger_credentials()?)?;
            let blog = client.get_blog(&blog_id)?;

            let token = client.token();
            writeln!(out, "Access token refreshed. Store it if you need it outside this tool.")?;
            writeln!(out, "Expires at: {}", token.expiry_display())?;
            writeln!(out, "Token (start): {}", token.preview(12))?;
            writeln!(out, "Blog information:")?;
            for (key, value) in &blog {
                writeln!(out, "- {}: {}", key, display_value(value))?;
            }
        }
        Command::ListPosts { blog_id, limit } => {
            let blog_id = config.resolve_blog_id(blog_id.as_deref())?;
            let client = BloggerClient::connect(&config.blogger_credentials()?)?;
            let posts = client.list_posts(&blog_id, limit)?;

            if posts.is_empty() {
                writeln!(out, "No posts found.")?;
            } else {
                let token = client.token();
                writeln!(out, "Access token refreshed (partial): {}", token.preview(8))?;
                writeln!(out, "Expires at: {}", token.expiry_display())?;
                for post in &posts {
                    writeln!(out, "- {} (ID: {})", post.title, post.id)?;
                }
            }
        }
        Command::PublishPost {
            content,
            image,
            labels,
            title,
            blog_id,
            draft,
            encoding,
        } => {
            let blog_id = config.resolve_blog_id(blog_id.as_deref())?;
            let credentials = config.blogger_credentials()?;
            let encoding = match encoding {
                Some(label) => SourceEncoding::from_label(&label)?,
                None => config.markdown_encoding,
            };

            let mut builder = PostBuilder::new().with_labels(labels).with_encoding(encoding);
            if let Some(title) = title {
                builder = builder.with_title(title);
            }
            if let Some(image) = image {
                builder = builder.with_image(image);
            }
            let post = builder.build()?.compose_file(&content)?;

            let client = BloggerClient::connect(&credentials)?;
            let published = submit_post(&client, &blog_id, &post, draft)?;

            let status = if draft { "saved as draft" } else { "published" };
            writeln!(out, "Post {} successfully! ID: {}", status, published.id)?;
            if let Some(url) = &published.url {
                writeln!(out, "URL: {}", url)?;
            }
        }
    }

    out.flush()?;
    Ok(())
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn handle_error(error: SheetpostError) {
    match error {
        SheetpostError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
            eprintln!("Check your .env file (or --env-file) and the process environment.");
        }
        SheetpostError::FileNotFound(path) => {
            eprintln!("File Not Found: {}", path.display());
        }
        SheetpostError::Credential(msg) => {
            eprintln!("Credential Error: {}", msg);
            eprintln!("GOOGLE_SERVICE_ACCOUNT_PRIVATE_KEY must hold the complete service account JSON.");
        }
        SheetpostError::Token(err) => {
            eprintln!("Credential Error: {}", err);
            eprintln!("The service account private_key could not be used to sign the token request.");
        }
        SheetpostError::Encoding(msg) => {
            eprintln!("Encoding Error: {}", msg);
            eprintln!("Save the file as UTF-8 or pass --encoding with the file's encoding.");
        }
        SheetpostError::Api { status, message } => {
            eprintln!("Google API Error ({}): {}", status, message);
        }
        SheetpostError::Http(err) => {
            eprintln!("HTTP Error: {}", err);
            eprintln!("Check your network connection.");
        }
        other => {
            eprintln!("Error: {}", other);
        }
    }
}
