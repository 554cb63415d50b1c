use sqlx::{query, query_as, SqlitePool};
use std::collections::BTreeMap;

use crate::db::models::{ImageRecord, NewOrphanage, OrphanageRecord, OrphanageWithImages};

const ORPHANAGE_COLUMNS: &str = "id, name, latitude, longitude, about, instructions, \
                                 opening_hours, open_on_weekends, whatsapp_number";

/// Inserts an orphanage and its images in one transaction, returning the new id
pub async fn insert_orphanage(pool: &SqlitePool, params: &NewOrphanage) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let id = query(
        "INSERT INTO orphanages \
         (name, latitude, longitude, about, instructions, opening_hours, open_on_weekends, whatsapp_number) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(&params.name)
    .bind(params.latitude)
    .bind(params.longitude)
    .bind(&params.about)
    .bind(&params.instructions)
    .bind(&params.opening_hours)
    .bind(params.open_on_weekends)
    .bind(&params.whatsapp_number)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    for path in &params.image_paths {
        query("INSERT INTO images (path, orphanage_id) VALUES (?, ?)")
            .bind(path)
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    Ok(id)
}

/// Retrieves a single orphanage row by id
pub async fn get_orphanage_by_id(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<OrphanageRecord>, sqlx::Error> {
    query_as::<_, OrphanageRecord>(&format!(
        "SELECT {ORPHANAGE_COLUMNS} FROM orphanages WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Retrieves one orphanage with its images
pub async fn find_orphanage(
    pool: &SqlitePool,
    id: i64,
) -> Result<Option<OrphanageWithImages>, sqlx::Error> {
    let Some(orphanage) = get_orphanage_by_id(pool, id).await? else {
        return Ok(None);
    };

    let images = query_as::<_, ImageRecord>(
        "SELECT id, path, orphanage_id FROM images WHERE orphanage_id = ? ORDER BY id",
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(OrphanageWithImages { orphanage, images }))
}

/// Retrieves every orphanage with its images, ordered by id
pub async fn list_orphanages(pool: &SqlitePool) -> Result<Vec<OrphanageWithImages>, sqlx::Error> {
    let orphanages = query_as::<_, OrphanageRecord>(&format!(
        "SELECT {ORPHANAGE_COLUMNS} FROM orphanages ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;

    let mut images_by_orphanage: BTreeMap<i64, Vec<ImageRecord>> = BTreeMap::new();
    for image in query_as::<_, ImageRecord>(
        "SELECT id, path, orphanage_id FROM images ORDER BY id",
    )
    .fetch_all(pool)
    .await?
    {
        images_by_orphanage
            .entry(image.orphanage_id)
            .or_default()
            .push(image);
    }

    Ok(orphanages
        .into_iter()
        .map(|orphanage| {
            let images = images_by_orphanage
                .remove(&orphanage.id)
                .unwrap_or_default();
            OrphanageWithImages { orphanage, images }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Migrator;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup_test_db() -> Result<SqlitePool, Box<dyn std::error::Error>> {
        // A single connection keeps the in-memory database alive across queries
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Migrator::default().run(&pool).await?;
        Ok(pool)
    }

    fn lar_feliz() -> NewOrphanage {
        NewOrphanage {
            name: "Lar Feliz".to_string(),
            latitude: -22.9,
            longitude: -47.0,
            about: "desc".to_string(),
            instructions: "bring ID".to_string(),
            opening_hours: "9-5".to_string(),
            open_on_weekends: false,
            whatsapp_number: None,
            image_paths: vec!["1-a.png".to_string(), "1-b.png".to_string()],
        }
    }

    #[tokio::test]
    async fn test_insert_and_find_orphanage() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        let id = insert_orphanage(&pool, &lar_feliz()).await?;
        let found = find_orphanage(&pool, id).await?.ok_or("missing orphanage")?;

        assert_eq!(found.orphanage.name, "Lar Feliz");
        assert!((found.orphanage.latitude - -22.9).abs() < f64::EPSILON);
        assert!(!found.orphanage.open_on_weekends);
        assert_eq!(found.orphanage.whatsapp_number, None);
        let paths: Vec<&str> = found.images.iter().map(|i| i.path.as_str()).collect();
        assert_eq!(paths, ["1-a.png", "1-b.png"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_groups_images_per_orphanage() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;

        let first = insert_orphanage(&pool, &lar_feliz()).await?;
        let second = insert_orphanage(
            &pool,
            &NewOrphanage {
                name: "Casa Aberta".to_string(),
                whatsapp_number: Some("5519999999999".to_string()),
                image_paths: Vec::new(),
                ..lar_feliz()
            },
        )
        .await?;

        let all = list_orphanages(&pool).await?;
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].orphanage.id, first);
        assert_eq!(all[0].images.len(), 2);
        assert_eq!(all[1].orphanage.id, second);
        assert!(all[1].images.is_empty());
        assert_eq!(
            all[1].orphanage.whatsapp_number.as_deref(),
            Some("5519999999999")
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_find_missing_orphanage() -> Result<(), Box<dyn std::error::Error>> {
        let pool = setup_test_db().await?;
        assert!(find_orphanage(&pool, 42).await?.is_none());
        Ok(())
    }
}
