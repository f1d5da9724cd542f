//! User profile endpoints. All require an authenticated user.

use axum::extract::{Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

use crate::db::users::UserRepository;
use crate::error::AppError;
use crate::http::Envelope;
use crate::middleware::CurrentUser;
use crate::models::user::{ProfileUpdate, User};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/perfil", get(profile).put(update_profile))
        .route("/upload-foto", post(upload_photo))
}

async fn profile(CurrentUser(user): CurrentUser) -> Json<Envelope<User>> {
    Envelope::success(user)
}

async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<ProfileUpdate>,
) -> Result<Json<Envelope<User>>, AppError> {
    if let Some(tema_cor) = &body.tema_cor
        && !is_hex_color(tema_cor)
    {
        return Err(AppError::Validation(
            "Cor do tema deve ser um código hexadecimal".to_string(),
        ));
    }

    let updated = UserRepository::new(state.pool())
        .update_profile(user.id, &body)
        .await?;

    Ok(Envelope::success_with_message(
        updated,
        "Perfil atualizado com sucesso",
    ))
}

/// Upload a profile photo as multipart form data.
///
/// The image is stored inline as a base64 data URI on the user row.
async fn upload_photo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    mut multipart: Multipart,
) -> Result<Json<Envelope<User>>, AppError> {
    let mut photo: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Upload inválido: {e}")))?
    {
        if field.name() != Some("foto") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(ToString::to_string)
            .ok_or_else(|| AppError::Validation("Arquivo sem tipo de conteúdo".to_string()))?;

        if !content_type.starts_with("image/") {
            return Err(AppError::Validation(
                "O arquivo deve ser uma imagem".to_string(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Falha ao ler o arquivo: {e}")))?;

        photo = Some(format!(
            "data:{content_type};base64,{}",
            BASE64.encode(&bytes)
        ));
    }

    let Some(foto) = photo else {
        return Err(AppError::Validation(
            "Campo 'foto' não encontrado no upload".to_string(),
        ));
    };

    let updated = UserRepository::new(state.pool())
        .update_profile(
            user.id,
            &ProfileUpdate {
                foto: Some(foto),
                ..ProfileUpdate::default()
            },
        )
        .await?;

    Ok(Envelope::success_with_message(
        updated,
        "Foto atualizada com sucesso",
    ))
}

fn is_hex_color(value: &str) -> bool {
    value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_color_accepted() {
        assert!(is_hex_color("#000000"));
        assert!(is_hex_color("#A1b2C3"));
    }

    #[test]
    fn test_hex_color_rejected() {
        assert!(!is_hex_color("000000"));
        assert!(!is_hex_color("#00"));
        assert!(!is_hex_color("#GGGGGG"));
        assert!(!is_hex_color("#0000000"));
    }
}
