//! Request schemas for the multipart forms.
//!
//! Each form is collected into [`MultipartFields`] first and then converted into
//! a typed struct, so a missing field fails with a 400 before any handler logic
//! runs.

use std::collections::HashMap;

use axum::extract::Multipart;
use validator::Validate;

use crate::domain::media::Upload;
use crate::presentation::http::app_error::AppError;

#[derive(Debug, Default)]
pub(crate) struct MultipartFields {
    texts: HashMap<String, String>,
    files: HashMap<String, Upload>,
}

impl MultipartFields {
    pub(crate) async fn collect(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut fields = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|err| AppError::BadRequest(err.body_text()))?;
                    // an unselected file input arrives as an empty part
                    if let Some(upload) = Upload::non_empty(Some(file_name), bytes.to_vec()) {
                        fields.files.insert(name, upload);
                    }
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|err| AppError::BadRequest(err.body_text()))?;
                    fields.texts.insert(name, text);
                }
            }
        }

        Ok(fields)
    }

    fn text(&mut self, name: &str) -> Option<String> {
        self.texts.remove(name)
    }

    fn required_text(&mut self, name: &str) -> Result<String, AppError> {
        self.text(name)
            .ok_or_else(|| AppError::BadRequest(format!("missing field '{name}'")))
    }

    fn file(&mut self, name: &str) -> Option<Upload> {
        self.files.remove(name)
    }
}

#[derive(Debug, Validate)]
pub(crate) struct RegisterForm {
    #[validate(length(min = 1, max = 64))]
    pub(crate) username: String,
    #[validate(length(min = 1, max = 128))]
    pub(crate) password: String,
    pub(crate) avatar: Option<Upload>,
}

impl TryFrom<MultipartFields> for RegisterForm {
    type Error = AppError;

    fn try_from(mut fields: MultipartFields) -> Result<Self, Self::Error> {
        let form = Self {
            username: fields.required_text("username")?,
            password: fields.required_text("password")?,
            avatar: fields.file("avatar"),
        };
        form.validate()?;
        Ok(form)
    }
}

#[derive(Debug)]
pub(crate) struct PostForm {
    pub(crate) text: Option<String>,
    pub(crate) image: Option<Upload>,
}

impl From<MultipartFields> for PostForm {
    fn from(mut fields: MultipartFields) -> Self {
        Self {
            text: fields.text("text"),
            image: fields.file("image"),
        }
    }
}

#[derive(Debug, Validate)]
pub(crate) struct ProfileForm {
    #[validate(length(max = 4000))]
    pub(crate) bio: String,
    pub(crate) avatar: Option<Upload>,
}

impl TryFrom<MultipartFields> for ProfileForm {
    type Error = AppError;

    fn try_from(mut fields: MultipartFields) -> Result<Self, Self::Error> {
        let form = Self {
            bio: fields.text("bio").unwrap_or_default(),
            avatar: fields.file("avatar"),
        };
        form.validate()?;
        Ok(form)
    }
}
