//! Typed view of the two forms posted to `/profile`.
//!
//! Both forms share one endpoint and are told apart by the `form_type`
//! field. Text-only submissions arrive url-encoded, picture uploads as
//! multipart; [`ProfileForm`] accepts either.

use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Form,
};

pub const PROFILE_UPDATE: &str = "profile_update";
pub const PHOTO_UPDATE: &str = "photo_update";
const PICTURE_FIELD: &str = "profile_pic";
const DELETE_FIELD: &str = "delete_profile_pic";

#[derive(Debug)]
pub enum ProfileForm {
    ProfileUpdate(ProfileUpdateForm),
    PhotoUpdate(PhotoUpdateForm),
}

#[derive(Debug, Default, PartialEq)]
pub struct ProfileUpdateForm {
    pub username: String,
    pub email: String,
    pub bio: String,
    pub profession: String,
    pub password: Option<String>,
}

#[derive(Debug, Default)]
pub struct PhotoUpdateForm {
    pub picture: Option<UploadedFile>,
    pub delete: bool,
}

#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProfileFormError {
    #[error("Missing form type")]
    MissingFormType,
    #[error("Unknown form type: {0}")]
    UnknownFormType(String),
}

impl ProfileForm {
    pub fn from_fields(
        mut fields: HashMap<String, String>,
        picture: Option<UploadedFile>,
    ) -> Result<Self, ProfileFormError> {
        let form_type = fields
            .remove("form_type")
            .ok_or(ProfileFormError::MissingFormType)?;

        let mut take = |name: &str| fields.remove(name).unwrap_or_default();

        match form_type.as_str() {
            PROFILE_UPDATE => Ok(ProfileForm::ProfileUpdate(ProfileUpdateForm {
                username: take("username"),
                email: take("email"),
                bio: take("bio"),
                profession: take("profession"),
                password: Some(take("password")).filter(|p| !p.is_empty()),
            })),
            PHOTO_UPDATE => {
                let delete = matches!(
                    take(DELETE_FIELD).to_ascii_lowercase().as_str(),
                    "yes" | "on" | "true" | "1"
                );
                Ok(ProfileForm::PhotoUpdate(PhotoUpdateForm { picture, delete }))
            }
            other => Err(ProfileFormError::UnknownFormType(other.to_string())),
        }
    }
}

fn is_multipart(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.starts_with("multipart/form-data"))
        .unwrap_or(false)
}

impl<S> FromRequest<S> for ProfileForm
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let mut fields = HashMap::new();
        let mut picture = None;

        if is_multipart(&req) {
            let mut multipart = Multipart::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;

            while let Some(field) = multipart
                .next_field()
                .await
                .map_err(IntoResponse::into_response)?
            {
                let name = field.name().unwrap_or_default().to_string();

                match field.file_name().map(str::to_string) {
                    Some(file_name) => {
                        let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;
                        // Browsers send an empty part when no file was chosen.
                        if name == PICTURE_FIELD && !file_name.is_empty() && !bytes.is_empty() {
                            picture = Some(UploadedFile { file_name, bytes });
                        }
                    }
                    None => {
                        let text = field.text().await.map_err(IntoResponse::into_response)?;
                        fields.insert(name, text);
                    }
                }
            }
        } else {
            let Form(map) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            fields = map;
        }

        ProfileForm::from_fields(fields, picture)
            .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()).into_response())
    }
}
