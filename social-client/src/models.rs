use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Public view of a user.
pub struct User {
    /// Login name.
    pub username: String,
    /// Avatar URL, if one is set.
    pub avatar: Option<String>,
    /// Free-form biography, possibly empty.
    pub bio: String,
    /// Registration time (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A post as it appears in the feed and on profiles.
pub struct Post {
    /// Post id.
    pub id: i64,
    /// Username of the author.
    pub author: String,
    /// Text body, absent for image-only posts.
    pub text: Option<String>,
    /// Image URL, if an image was attached.
    pub image: Option<String>,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A comment under a post.
pub struct Comment {
    /// Comment id.
    pub id: i64,
    /// Post the comment belongs to.
    pub post_id: i64,
    /// Username of the author.
    pub author: String,
    /// Comment text.
    pub text: String,
    /// Creation time (UTC).
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One feed item: the post, its author's current avatar and its comments.
pub struct FeedEntry {
    /// The post itself.
    #[serde(flatten)]
    pub post: Post,
    /// Avatar URL of the author.
    pub author_avatar: Option<String>,
    /// Comments in the order they were written.
    pub comments: Vec<Comment>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// The global feed, newest post first.
pub struct Feed {
    /// Username of the logged-in caller.
    pub viewer: String,
    /// Every post.
    pub posts: Vec<FeedEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A user together with their posts.
pub struct Profile {
    /// The user.
    #[serde(flatten)]
    pub user: User,
    /// Posts authored by the user, newest first.
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Result of a username search.
pub struct SearchResult {
    /// The query as received by the server.
    pub query: String,
    /// Matching users, possibly none.
    pub users: Vec<User>,
}

#[derive(Debug, Clone)]
/// A file to upload as an avatar or a post image.
pub struct Attachment {
    /// Original file name; the server keeps only its last path segment.
    pub file_name: String,
    /// File content.
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::{Feed, Profile};

    #[test]
    fn feed_entries_flatten_the_post() {
        let feed: Feed = serde_json::from_str(
            r#"{
                "viewer": "alice",
                "posts": [{
                    "id": 2,
                    "author": "bob",
                    "text": null,
                    "image": "/uploads/cat.png",
                    "created_at": "2024-01-01T10:00:00Z",
                    "author_avatar": null,
                    "comments": [{
                        "id": 1,
                        "post_id": 2,
                        "author": "alice",
                        "text": "nice",
                        "created_at": "2024-01-01T10:05:00Z"
                    }]
                }]
            }"#,
        )
        .expect("feed must decode");

        assert_eq!(feed.posts[0].post.id, 2);
        assert!(feed.posts[0].post.text.is_none());
        assert_eq!(feed.posts[0].comments[0].text, "nice");
    }

    #[test]
    fn profile_flattens_the_user() {
        let profile: Profile = serde_json::from_str(
            r#"{
                "username": "alice",
                "avatar": "https://cdn.example.com/a.png",
                "bio": "",
                "created_at": "2024-01-01T10:00:00Z",
                "posts": []
            }"#,
        )
        .expect("profile must decode");

        assert_eq!(profile.user.username, "alice");
        assert!(profile.posts.is_empty());
    }
}
