use utoipa::OpenApi;

use crate::presentation::http::handlers::comments::{CommentDto, CreateCommentDto};
use crate::presentation::http::handlers::feed::{FeedEntryDto, FeedResponseDto, PostDto};
use crate::presentation::http::handlers::profiles::{ProfileDto, SearchResponseDto, UserDto};

/// The JSON views. Form endpoints answer with redirects and are left out.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::feed::index,
        crate::presentation::http::handlers::comments::create_comment,
        crate::presentation::http::handlers::profiles::profile,
        crate::presentation::http::handlers::profiles::search
    ),
    components(
        schemas(
            PostDto,
            FeedEntryDto,
            FeedResponseDto,
            CreateCommentDto,
            CommentDto,
            UserDto,
            ProfileDto,
            SearchResponseDto
        )
    ),
    tags(
        (name = "feed", description = "Global feed"),
        (name = "comments", description = "Comment endpoints"),
        (name = "profiles", description = "Profiles and user search")
    )
)]
pub(crate) struct ApiDoc;

#[cfg(test)]
mod tests {
    use utoipa::OpenApi;

    use super::ApiDoc;

    #[test]
    fn document_lists_json_views() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/api/comment/{post_id}", "/profil/{username}", "/search"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
