use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use social_client::{
    Attachment, Feed, Post, Profile, SearchResult, SocialClient, SocialClientError,
};

const SESSION_FILE: &str = ".social_session";
const DEFAULT_SERVER: &str = "http://127.0.0.1:5050";
const SERVER_ENV: &str = "SOCIAL_SERVER";

#[derive(Debug, Parser)]
#[command(name = "social-cli", version, about = "Command-line client for social-server")]
struct Cli {
    /// Server address. Falls back to $SOCIAL_SERVER, then the local default.
    #[arg(long, global = true)]
    server: Option<String>,

    /// Print responses as JSON.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create an account and log in.
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
        /// Avatar image to upload.
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
    /// Log in.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long)]
        password: String,
    },
    /// End the stored session.
    Logout,
    /// Show the feed (requires a session).
    Feed,
    /// Publish a post (requires a session).
    Post {
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    /// Comment on a post (requires a session).
    Comment {
        #[arg(long)]
        post_id: i64,
        #[arg(long)]
        text: String,
    },
    /// Show a user's profile.
    Profile { username: String },
    /// Change bio and, optionally, upload a new avatar (requires a session).
    EditProfile {
        #[arg(long, default_value = "")]
        bio: String,
        #[arg(long)]
        avatar: Option<PathBuf>,
    },
    /// Change bio and, optionally, set the avatar to a URL (requires a session).
    Account {
        #[arg(long, default_value = "")]
        bio: String,
        #[arg(long)]
        avatar_url: Option<String>,
    },
    /// Search users by a fragment of their name.
    Search { query: String },
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {err}");
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let server = resolve_server(cli.server, std::env::var(SERVER_ENV).ok());
    let mut client = SocialClient::new(server).map_err(map_client_error)?;

    if let Some(session) =
        load_session(Path::new(SESSION_FILE)).context("failed to read .social_session")?
    {
        client.set_session(session);
    }

    match cli.command {
        Command::Register {
            username,
            password,
            avatar,
        } => {
            let avatar = avatar.as_deref().map(read_attachment).transpose()?;
            client
                .register(&username, &password, avatar)
                .await
                .map_err(map_client_error)?;
            persist_session(&client, Path::new(SESSION_FILE))
                .context("failed to save the session")?;
            println!("Registered and logged in as {username}");
        }
        Command::Login { username, password } => {
            client
                .login(&username, &password)
                .await
                .map_err(map_client_error)?;
            persist_session(&client, Path::new(SESSION_FILE))
                .context("failed to save the session")?;
            println!("Logged in as {username}");
        }
        Command::Logout => {
            client.logout().await.map_err(map_client_error)?;
            forget_session(Path::new(SESSION_FILE)).context("failed to remove the session")?;
            println!("Logged out");
        }
        Command::Feed => {
            let feed = client.feed().await.map_err(map_client_error)?;
            if cli.json {
                print_json(&feed)?;
            } else {
                print_feed(&feed);
            }
        }
        Command::Post { text, image } => {
            let image = image.as_deref().map(read_attachment).transpose()?;
            client
                .create_post(text.as_deref(), image)
                .await
                .map_err(map_client_error)?;
            println!("Post published");
        }
        Command::Comment { post_id, text } => {
            let comment = client
                .comment(post_id, &text)
                .await
                .map_err(map_client_error)?;
            if cli.json {
                print_json(&comment)?;
            } else {
                println!("Comment #{} added to post #{}", comment.id, comment.post_id);
            }
        }
        Command::Profile { username } => {
            let profile = client.profile(&username).await.map_err(map_client_error)?;
            if cli.json {
                print_json(&profile)?;
            } else {
                print_profile(&profile);
            }
        }
        Command::EditProfile { bio, avatar } => {
            let avatar = avatar.as_deref().map(read_attachment).transpose()?;
            client
                .update_profile(&bio, avatar)
                .await
                .map_err(map_client_error)?;
            println!("Profile updated");
        }
        Command::Account { bio, avatar_url } => {
            client
                .update_account(&bio, avatar_url.as_deref())
                .await
                .map_err(map_client_error)?;
            println!("Account updated");
        }
        Command::Search { query } => {
            let result = client.search(&query).await.map_err(map_client_error)?;
            if cli.json {
                print_json(&result)?;
            } else {
                print_search(&result);
            }
        }
    }

    Ok(())
}

fn resolve_server(flag: Option<String>, env: Option<String>) -> String {
    let raw = flag
        .or(env)
        .filter(|server| !server.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_SERVER.to_string());
    normalize_server(raw)
}

fn normalize_server(server: String) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        return server;
    }

    format!("http://{server}")
}

fn parse_session_content(raw: &str) -> Option<String> {
    let session = raw.trim().to_string();
    if session.is_empty() {
        return None;
    }
    Some(session)
}

fn load_session(path: &Path) -> io::Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = fs::read_to_string(path)?;
    Ok(parse_session_content(&raw))
}

fn persist_session(client: &SocialClient, path: &Path) -> io::Result<()> {
    if let Some(session) = client.session() {
        fs::write(path, session)?;
    }
    Ok(())
}

fn forget_session(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() != io::ErrorKind::NotFound => Err(err),
        _ => Ok(()),
    }
}

fn read_attachment(path: &Path) -> Result<Attachment> {
    let bytes = fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?
        .to_string();

    Ok(Attachment { file_name, bytes })
}

fn map_client_error(err: SocialClientError) -> anyhow::Error {
    let message = match err {
        SocialClientError::Unauthorized => {
            "not logged in: run `social-cli login ...` or `social-cli register ...`".to_string()
        }
        SocialClientError::NotFound => "not found".to_string(),
        SocialClientError::Conflict(message) => format!("conflict: {message}"),
        SocialClientError::InvalidRequest(message) => format!("invalid request: {message}"),
        SocialClientError::Http(err) => format!("HTTP error: {err}"),
    };
    anyhow::anyhow!(message)
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn post_line(post: &Post) -> String {
    let mut line = format!("[{}] {}", post.id, post.author);
    if let Some(text) = &post.text {
        line.push_str(&format!(": {text}"));
    }
    if let Some(image) = &post.image {
        line.push_str(&format!(" (image: {image})"));
    }
    line
}

fn print_feed(feed: &Feed) {
    println!("Feed for {} ({} posts)", feed.viewer, feed.posts.len());
    for entry in &feed.posts {
        println!("- {}", post_line(&entry.post));
        for comment in &entry.comments {
            println!("    {}: {}", comment.author, comment.text);
        }
    }
}

fn print_profile(profile: &Profile) {
    println!("username: {}", profile.user.username);
    println!(
        "avatar: {}",
        profile.user.avatar.as_deref().unwrap_or("(none)")
    );
    println!("bio: {}", profile.user.bio);
    println!("joined: {}", profile.user.created_at);
    println!("posts: {}", profile.posts.len());
    for post in &profile.posts {
        println!("- {}", post_line(post));
    }
}

fn print_search(result: &SearchResult) {
    if result.users.is_empty() {
        println!("No users match '{}'", result.query);
        return;
    }
    for user in &result.users {
        println!("- {}", user.username);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_server_keeps_scheme() {
        let s = normalize_server("https://example.com:5050".to_string());
        assert_eq!(s, "https://example.com:5050");
    }

    #[test]
    fn normalize_server_adds_http_scheme() {
        let s = normalize_server("127.0.0.1:5050".to_string());
        assert_eq!(s, "http://127.0.0.1:5050");
    }

    #[test]
    fn resolve_server_prefers_flag_then_env() {
        assert_eq!(resolve_server(None, None), DEFAULT_SERVER);
        assert_eq!(
            resolve_server(None, Some("social.test".to_string())),
            "http://social.test"
        );
        assert_eq!(
            resolve_server(
                Some("localhost:9999".to_string()),
                Some("social.test".to_string())
            ),
            "http://localhost:9999"
        );
    }

    #[test]
    fn parse_session_content_trims_whitespace() {
        let session = parse_session_content("  3f2b-uuid \n");
        assert_eq!(session.as_deref(), Some("3f2b-uuid"));
    }

    #[test]
    fn parse_session_content_rejects_blank() {
        assert!(parse_session_content("   ").is_none());
    }

    #[test]
    fn session_file_round_trip_and_removal() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(SESSION_FILE);
        assert!(load_session(&path).expect("load").is_none());

        let mut client = SocialClient::new(DEFAULT_SERVER).expect("client must build");
        client.set_session("abc");
        persist_session(&client, &path).expect("persist");
        assert_eq!(load_session(&path).expect("load").as_deref(), Some("abc"));

        forget_session(&path).expect("forget");
        forget_session(&path).expect("forgetting twice is fine");
        assert!(load_session(&path).expect("load").is_none());
    }

    #[test]
    fn attachment_takes_the_file_name() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("cat.png");
        fs::write(&path, b"meow").expect("write");

        let attachment = read_attachment(&path).expect("attachment");
        assert_eq!(attachment.file_name, "cat.png");
        assert_eq!(attachment.bytes, b"meow");
    }
}
