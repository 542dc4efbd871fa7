use crate::auth::CurrentUser;
use crate::error::AppError;
use crate::flash::{self, Flash};
use crate::handlers::profile_form::{PhotoUpdateForm, ProfileForm, ProfileUpdateForm};
use crate::models::user::User;
use crate::services::{user_service::ProfileUpdateRequest, UploadError};
use crate::AppState;
use askama::Template;
use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
};
use tower_sessions::Session;

#[derive(Template)]
#[template(path = "profile.html")]
struct ProfileTemplate {
    flashes: Vec<Flash>,
    user: User,
}

fn render_profile(user: User, flashes: Vec<Flash>) -> Result<Response, AppError> {
    let template = ProfileTemplate { flashes, user };
    Ok(Html(template.render()?).into_response())
}

/// `/profile/{id}` only ever addresses the signed-in user's own profile.
fn ensure_own_profile(user: &User, id: i64) -> Result<(), AppError> {
    if user.id != id {
        tracing::warn!(user_id = user.id, target_id = id, "Profile access denied");
        return Err(AppError::Forbidden);
    }
    Ok(())
}

/// GET /profile
pub async fn show_profile(
    session: Session,
    CurrentUser(user): CurrentUser,
) -> Result<Response, AppError> {
    render_profile(user, flash::take(&session).await?)
}

/// GET /profile/{id}
pub async fn show_profile_by_id(
    session: Session,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
) -> Result<Response, AppError> {
    ensure_own_profile(&user, id)?;
    render_profile(user, flash::take(&session).await?)
}

/// POST /profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    form: ProfileForm,
) -> Result<Response, AppError> {
    apply_profile_form(&state, user, form).await
}

/// POST /profile/{id}
pub async fn update_profile_by_id(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<i64>,
    form: ProfileForm,
) -> Result<Response, AppError> {
    ensure_own_profile(&user, id)?;
    apply_profile_form(&state, user, form).await
}

async fn apply_profile_form(
    state: &AppState,
    user: User,
    form: ProfileForm,
) -> Result<Response, AppError> {
    match form {
        ProfileForm::ProfileUpdate(fields) => update_fields(state, user, fields).await,
        ProfileForm::PhotoUpdate(photo) => update_photo(state, user, photo).await,
    }
}

async fn update_fields(
    state: &AppState,
    user: User,
    fields: ProfileUpdateForm,
) -> Result<Response, AppError> {
    let request = ProfileUpdateRequest {
        user_id: user.id,
        email: fields.email,
        username: fields.username,
        bio: fields.bio,
        profession: fields.profession,
        password: fields.password,
    };

    match state.user_service.update_profile(request).await {
        Ok(updated) => render_profile(
            updated,
            vec![Flash::success("Profile updated successfully")],
        ),
        Err(err) if err.is_validation() => render_profile(user, vec![Flash::error(err.to_string())]),
        Err(err) => Err(err.into()),
    }
}

async fn update_photo(
    state: &AppState,
    user: User,
    photo: PhotoUpdateForm,
) -> Result<Response, AppError> {
    let (previous, message) = if let Some(picture) = photo.picture {
        let stored = match state
            .upload_service
            .store_picture(user.id, &picture.file_name, &picture.bytes)
            .await
        {
            Ok(path) => path,
            Err(e @ UploadError::Io(_)) => return Err(e.into()),
            Err(e) => return render_profile(user, vec![Flash::error(e.to_string())]),
        };

        match state.user_service.set_profile_picture(user.id, &stored).await {
            Ok(previous) => (previous, "Profile picture updated successfully"),
            Err(e) => {
                discard_picture(state, &stored).await;
                return Err(e.into());
            }
        }
    } else if photo.delete {
        let previous = state.user_service.reset_profile_picture(user.id).await?;
        (previous, "Profile picture deleted successfully")
    } else {
        return render_profile(user, vec![Flash::error(UploadError::Empty.to_string())]);
    };

    discard_picture(state, &previous).await;

    let updated = state.auth_service.get_user_by_id(user.id).await?;
    render_profile(updated, vec![Flash::success(message)])
}

/// Best effort; a leftover file never fails the request.
async fn discard_picture(state: &AppState, path: &str) {
    if let Err(e) = state.upload_service.remove_picture(path).await {
        tracing::warn!(path, "Failed to remove old profile picture: {}", e);
    }
}
