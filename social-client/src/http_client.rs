use reqwest::header::{COOKIE, HeaderMap, LOCATION, SET_COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode, Url, redirect};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::error::{SocialClientError, SocialClientResult};
use crate::models::{Attachment, Comment, Feed, Profile, SearchResult};

const SESSION_COOKIE: &str = "session_id";

#[derive(Debug, Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct AccountForm<'a> {
    bio: &'a str,
    avatar_url: &'a str,
}

#[derive(Debug, Serialize)]
struct CommentRequestDto<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SearchQuery<'a> {
    q: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponseDto {
    error: Option<String>,
}

#[derive(Debug, Clone)]
/// Raw HTTP calls against `social-server`.
///
/// Redirects are not followed: form endpoints answer with `303 See Other`
/// and the target tells whether the call succeeded.
pub(crate) struct HttpClient {
    base_url: String,
    client: Client,
}

impl HttpClient {
    pub(crate) fn new(base_url: impl Into<String>) -> SocialClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(15))
            .redirect(redirect::Policy::none())
            .build()?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Builds a URL from raw path segments, percent-encoding each one.
    fn segments_url(&self, segments: &[&str]) -> SocialClientResult<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| SocialClientError::InvalidRequest(format!("invalid base url: {err}")))?;
        url.path_segments_mut()
            .map_err(|()| {
                SocialClientError::InvalidRequest("base url cannot hold a path".to_string())
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn with_session(request: RequestBuilder, session: Option<&str>) -> RequestBuilder {
        match session {
            Some(session) => request.header(COOKIE, format!("{SESSION_COOKIE}={session}")),
            None => request,
        }
    }

    async fn decode_error(response: Response) -> SocialClientError {
        let status = response.status();

        // /api routes answer with JSON, page routes with plain text
        let message = match response.text().await {
            Ok(body) if !body.trim().is_empty() => {
                match serde_json::from_str::<ErrorResponseDto>(&body) {
                    Ok(dto) => dto.error.unwrap_or(body),
                    Err(_) => body,
                }
            }
            _ => format!("http status {status}"),
        };
        SocialClientError::from_http_status(status, Some(message))
    }

    async fn send(request: RequestBuilder) -> SocialClientResult<Response> {
        let response = request
            .send()
            .await
            .map_err(SocialClientError::from_reqwest)?;

        let status = response.status();
        if status.is_redirection() {
            if redirect_target(response.headers()) == Some("/login") {
                return Err(SocialClientError::Unauthorized);
            }
            return Ok(response);
        }
        if !status.is_success() {
            return Err(Self::decode_error(response).await);
        }
        Ok(response)
    }

    async fn json<T: DeserializeOwned>(response: Response) -> SocialClientResult<T> {
        response
            .json::<T>()
            .await
            .map_err(SocialClientError::from_reqwest)
    }

    /// Sends a form and returns the session id the server set, if any.
    async fn submit(&self, request: RequestBuilder) -> SocialClientResult<Option<String>> {
        let response = Self::send(request).await?;
        if response.status() != StatusCode::SEE_OTHER {
            return Err(SocialClientError::InvalidRequest(format!(
                "unexpected status {}",
                response.status()
            )));
        }
        Ok(session_from_headers(response.headers()))
    }

    pub(crate) async fn register(
        &self,
        username: &str,
        password: &str,
        avatar: Option<Attachment>,
    ) -> SocialClientResult<String> {
        let form = Form::new()
            .text("username", username.to_string())
            .text("password", password.to_string());
        let form = attach(form, "avatar", avatar);

        let request = self.client.post(self.endpoint("/register")).multipart(form);
        self.submit(request).await?.ok_or_else(|| {
            SocialClientError::InvalidRequest("register response has no session".to_string())
        })
    }

    pub(crate) async fn login(&self, username: &str, password: &str) -> SocialClientResult<String> {
        let form = LoginForm { username, password };
        let request = self.client.post(self.endpoint("/login")).form(&form);

        self.submit(request).await?.ok_or_else(|| {
            SocialClientError::InvalidRequest("login response has no session".to_string())
        })
    }

    pub(crate) async fn logout(&self, session: &str) -> SocialClientResult<()> {
        let request = Self::with_session(self.client.get(self.endpoint("/logout")), Some(session));

        // the server answers with a redirect to /login on success
        match Self::send(request).await {
            Ok(_) | Err(SocialClientError::Unauthorized) => Ok(()),
            Err(err) => Err(err),
        }
    }

    pub(crate) async fn feed(&self, session: &str) -> SocialClientResult<Feed> {
        let request = Self::with_session(self.client.get(self.endpoint("/")), Some(session));
        Self::json(Self::send(request).await?).await
    }

    pub(crate) async fn create_post(
        &self,
        session: &str,
        text: Option<&str>,
        image: Option<Attachment>,
    ) -> SocialClientResult<()> {
        let mut form = Form::new();
        if let Some(text) = text {
            form = form.text("text", text.to_string());
        }
        let form = attach(form, "image", image);

        let request = Self::with_session(
            self.client.post(self.endpoint("/post")).multipart(form),
            Some(session),
        );
        self.submit(request).await.map(|_| ())
    }

    pub(crate) async fn comment(
        &self,
        session: &str,
        post_id: i64,
        text: &str,
    ) -> SocialClientResult<Comment> {
        let request = Self::with_session(
            self.client
                .post(self.endpoint(&format!("/api/comment/{post_id}")))
                .json(&CommentRequestDto { text }),
            Some(session),
        );
        Self::json(Self::send(request).await?).await
    }

    pub(crate) async fn profile(&self, username: &str) -> SocialClientResult<Profile> {
        let request = self.client.get(self.segments_url(&["profil", username])?);
        Self::json(Self::send(request).await?).await
    }

    pub(crate) async fn update_profile(
        &self,
        session: &str,
        bio: &str,
        avatar: Option<Attachment>,
    ) -> SocialClientResult<()> {
        let form = Form::new().text("bio", bio.to_string());
        let form = attach(form, "avatar", avatar);

        let request = Self::with_session(
            self.client
                .post(self.endpoint("/modifier-profil"))
                .multipart(form),
            Some(session),
        );
        self.submit(request).await.map(|_| ())
    }

    pub(crate) async fn update_account(
        &self,
        session: &str,
        bio: &str,
        avatar_url: Option<&str>,
    ) -> SocialClientResult<()> {
        let form = AccountForm {
            bio,
            avatar_url: avatar_url.unwrap_or_default(),
        };
        let request = Self::with_session(
            self.client.post(self.endpoint("/modify_account")).form(&form),
            Some(session),
        );
        self.submit(request).await.map(|_| ())
    }

    pub(crate) async fn search(&self, query: &str) -> SocialClientResult<SearchResult> {
        let request = self
            .client
            .get(self.endpoint("/search"))
            .query(&SearchQuery { q: query });
        Self::json(Self::send(request).await?).await
    }
}

fn attach(form: Form, name: &'static str, attachment: Option<Attachment>) -> Form {
    match attachment {
        Some(attachment) => form.part(
            name,
            Part::bytes(attachment.bytes).file_name(attachment.file_name),
        ),
        None => form,
    }
}

fn redirect_target(headers: &HeaderMap) -> Option<&str> {
    headers.get(LOCATION).and_then(|value| value.to_str().ok())
}

/// Session id from a `Set-Cookie: session_id=...` header. A removal cookie
/// (empty value) does not count.
pub(crate) fn session_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}
