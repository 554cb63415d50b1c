use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::collections::HashMap;

use super::views::OrphanageView;
use super::AppState;
use crate::db::models::NewOrphanage;
use crate::db::queries;
use crate::error::ApiError;

const IMAGE_FIELD: &str = "images";

pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<OrphanageView>>, ApiError> {
    let orphanages = queries::list_orphanages(&state.pool).await?;
    Ok(Json(OrphanageView::render_many(orphanages, &state.public_url)))
}

pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrphanageView>, ApiError> {
    let orphanage = queries::find_orphanage(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Orphanage {id} not found")))?;
    Ok(Json(OrphanageView::render(orphanage, &state.public_url)))
}

pub async fn create(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<OrphanageView>), ApiError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut images = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == IMAGE_FIELD {
            let file_name = field.file_name().unwrap_or("upload").to_owned();
            images.push((file_name, field.bytes().await?));
        } else {
            fields.insert(name, field.text().await?);
        }
    }

    // Nothing touches the uploads directory until the fields decode
    let mut new = parse_fields(&mut fields)?;
    for (file_name, bytes) in &images {
        match state.uploads.save(file_name, bytes).await {
            Ok(stored) => new.image_paths.push(stored),
            Err(e) => {
                state.uploads.remove_all(&new.image_paths).await;
                return Err(e.into());
            }
        }
    }

    let id = match queries::insert_orphanage(&state.pool, &new).await {
        Ok(id) => id,
        Err(e) => {
            state.uploads.remove_all(&new.image_paths).await;
            return Err(e.into());
        }
    };
    tracing::info!(id, name = %new.name, images = new.image_paths.len(), "created orphanage");

    let created = queries::find_orphanage(&state.pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Orphanage {id} not found")))?;
    Ok((
        StatusCode::CREATED,
        Json(OrphanageView::render(created, &state.public_url)),
    ))
}

fn parse_fields(fields: &mut HashMap<String, String>) -> Result<NewOrphanage, ApiError> {
    let mut take = |key: &str| {
        fields
            .remove(key)
            .ok_or_else(|| ApiError::BadRequest(format!("Missing field `{key}`")))
    };

    let name = take("name")?;
    let latitude = parse_coordinate("latitude", &take("latitude")?)?;
    let longitude = parse_coordinate("longitude", &take("longitude")?)?;
    let about = take("about")?;
    let instructions = take("instructions")?;
    let opening_hours = take("opening_hours")?;
    let open_on_weekends = match take("open_on_weekends")?.trim() {
        "true" => true,
        "false" => false,
        other => {
            return Err(ApiError::BadRequest(format!(
                "Invalid `open_on_weekends`: {other}"
            )))
        }
    };
    let whatsapp_number = fields
        .remove("whatsapp_number")
        .map(|n| n.trim().to_owned())
        .filter(|n| !n.is_empty());

    Ok(NewOrphanage {
        name,
        latitude,
        longitude,
        about,
        instructions,
        opening_hours,
        open_on_weekends,
        whatsapp_number,
        image_paths: Vec::new(),
    })
}

fn parse_coordinate(key: &str, raw: &str) -> Result<f64, ApiError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ApiError::BadRequest(format!("Invalid `{key}`: {raw}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Migrator;
    use crate::routes::router;
    use crate::uploads::UploadDir;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::Value;
    use sqlx::sqlite::SqlitePoolOptions;
    use tower::ServiceExt;

    const BOUNDARY: &str = "happy-test-boundary";

    struct Harness {
        app: axum::Router,
        uploads: tempfile::TempDir,
    }

    async fn harness() -> Result<Harness, Box<dyn std::error::Error>> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Migrator::default().run(&pool).await?;

        let uploads = tempfile::tempdir()?;
        let state = AppState::new(pool, UploadDir::new(uploads.path()), "http://test.local/");
        Ok(Harness {
            app: router(state, 1024 * 1024),
            uploads,
        })
    }

    fn multipart_body(texts: &[(&str, &str)], files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut body = Vec::new();
        for (name, value) in texts {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
                )
                .as_bytes(),
            );
        }
        for (file_name, bytes) in files {
            body.extend_from_slice(
                format!(
                    "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{file_name}\"\r\nContent-Type: image/png\r\n\r\n"
                )
                .as_bytes(),
            );
            body.extend_from_slice(bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn create_request(body: Vec<u8>) -> Result<Request<Body>, axum::http::Error> {
        Request::builder()
            .method("POST")
            .uri("/orphanages")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
    }

    async fn json_body(response: axum::response::Response) -> Result<Value, Box<dyn std::error::Error>> {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    const LAR_FELIZ: &[(&str, &str)] = &[
        ("name", "Lar Feliz"),
        ("about", "desc"),
        ("latitude", "-22.9"),
        ("longitude", "-47.0"),
        ("instructions", "bring ID"),
        ("opening_hours", "9-5"),
        ("open_on_weekends", "false"),
    ];

    #[tokio::test]
    async fn test_create_list_and_show_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let h = harness().await?;

        let body = multipart_body(LAR_FELIZ, &[("a.png", b"first"), ("b.png", b"second")]);
        let response = h.app.clone().oneshot(create_request(body)?).await?;
        assert_eq!(response.status(), StatusCode::CREATED);

        let created = json_body(response).await?;
        assert_eq!(created["name"], "Lar Feliz");
        assert_eq!(created["open_on_weekends"], false);
        assert_eq!(created["whatsapp_number"], Value::Null);
        let images = created["images"].as_array().ok_or("images array")?;
        assert_eq!(images.len(), 2);
        let first_url = images[0]["url"].as_str().ok_or("url")?;
        assert!(first_url.starts_with("http://test.local/uploads/"));
        assert!(first_url.ends_with("-a.png"));

        let id = created["id"].as_i64().ok_or("id")?;
        let response = h
            .app
            .clone()
            .oneshot(Request::builder().uri(format!("/orphanages/{id}")).body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await?, created);

        let response = h
            .app
            .clone()
            .oneshot(Request::builder().uri("/orphanages").body(Body::empty())?)
            .await?;
        let list = json_body(response).await?;
        assert_eq!(list.as_array().map(Vec::len), Some(1));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_keeps_whatsapp_number() -> Result<(), Box<dyn std::error::Error>> {
        let h = harness().await?;

        let mut texts = LAR_FELIZ.to_vec();
        texts.push(("whatsapp_number", "5519999999999"));
        let response = h
            .app
            .clone()
            .oneshot(create_request(multipart_body(&texts, &[]))?)
            .await?;
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(json_body(response).await?["whatsapp_number"], "5519999999999");
        Ok(())
    }

    #[tokio::test]
    async fn test_create_rejects_missing_and_invalid_fields() -> Result<(), Box<dyn std::error::Error>> {
        let h = harness().await?;

        let missing: Vec<_> = LAR_FELIZ.iter().copied().filter(|(k, _)| *k != "about").collect();
        let response = h
            .app
            .clone()
            .oneshot(create_request(multipart_body(&missing, &[]))?)
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await?["error"], "Missing field `about`");

        let mut invalid = LAR_FELIZ.to_vec();
        invalid[2] = ("latitude", "north");
        let response = h
            .app
            .clone()
            .oneshot(create_request(multipart_body(&invalid, &[]))?)
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let mut invalid = LAR_FELIZ.to_vec();
        invalid[6] = ("open_on_weekends", "maybe");
        let response = h
            .app
            .clone()
            .oneshot(create_request(multipart_body(&invalid, &[]))?)
            .await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        Ok(())
    }

    fn stored_files(dir: &std::path::Path) -> std::io::Result<Vec<String>> {
        let mut names = std::fs::read_dir(dir)?
            .map(|entry| entry.map(|e| e.file_name().to_string_lossy().into_owned()))
            .collect::<std::io::Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }

    #[tokio::test]
    async fn test_same_named_images_are_both_kept() -> Result<(), Box<dyn std::error::Error>> {
        let h = harness().await?;

        let body = multipart_body(LAR_FELIZ, &[("photo.jpg", b"FIRST"), ("photo.jpg", b"SECOND")]);
        let response = h.app.clone().oneshot(create_request(body)?).await?;
        assert_eq!(response.status(), StatusCode::CREATED);

        let created = json_body(response).await?;
        let urls: Vec<&str> = created["images"]
            .as_array()
            .ok_or("images array")?
            .iter()
            .filter_map(|i| i["url"].as_str())
            .collect();
        assert_eq!(urls.len(), 2);
        assert_ne!(urls[0], urls[1]);

        let prefix = "http://test.local/uploads/";
        let mut contents = Vec::new();
        for url in &urls {
            let stored = url.strip_prefix(prefix).ok_or("upload url")?;
            contents.push(std::fs::read(h.uploads.path().join(stored))?);
        }
        assert_eq!(contents, [b"FIRST".to_vec(), b"SECOND".to_vec()]);
        assert_eq!(stored_files(h.uploads.path())?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_rejected_create_stores_no_images() -> Result<(), Box<dyn std::error::Error>> {
        let h = harness().await?;

        let missing: Vec<_> = LAR_FELIZ.iter().copied().filter(|(k, _)| *k != "name").collect();
        let body = multipart_body(&missing, &[("a.png", b"bytes")]);
        let response = h.app.clone().oneshot(create_request(body)?).await?;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        assert!(stored_files(h.uploads.path())?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_show_missing_is_not_found() -> Result<(), Box<dyn std::error::Error>> {
        let h = harness().await?;
        let response = h
            .app
            .oneshot(Request::builder().uri("/orphanages/99").body(Body::empty())?)
            .await?;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        Ok(())
    }
}
