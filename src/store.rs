use sea_orm::{
    ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::{
    entities::movie,
    input::MovieInput,
    models::{Movie, encode_reviews},
};

/// Persistence for the `movies` table. Each call checks a connection out of
/// the pool for the duration of its statement.
#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// All movies, newest first.
    pub async fn list(&self) -> Result<Vec<Movie>, DbErr> {
        let rows = movie::Entity::find().order_by_desc(movie::Column::Id).all(&self.db).await?;
        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Movie>, DbErr> {
        let row = movie::Entity::find_by_id(id).one(&self.db).await?;
        Ok(row.map(Movie::from))
    }

    /// Inserts a movie and returns its generated id.
    pub async fn create(&self, input: &MovieInput) -> Result<i32, DbErr> {
        let now = now_sec();
        let model = movie::ActiveModel {
            id: NotSet,
            created_at: Set(now),
            ..columns(input, now)
        };

        let res = movie::Entity::insert(model).exec(&self.db).await?;
        Ok(res.last_insert_id)
    }

    /// Overwrites every mutable column of `id`. There is no existence check,
    /// so an unknown id simply affects no rows.
    pub async fn update(&self, id: i32, input: &MovieInput) -> Result<u64, DbErr> {
        let res = movie::Entity::update_many()
            .set(columns(input, now_sec()))
            .filter(movie::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected)
    }

    pub async fn delete(&self, id: i32) -> Result<u64, DbErr> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected)
    }
}

fn columns(input: &MovieInput, now: i64) -> movie::ActiveModel {
    movie::ActiveModel {
        id: NotSet,
        title: Set(input.title.clone()),
        description: Set(Some(input.description.clone())),
        plot: Set(Some(input.plot.clone())),
        actors: Set(Some(input.actors.clone())),
        rating: Set(input.rating),
        reviews: Set(Some(encode_reviews(&input.reviews))),
        poster_url: Set(Some(input.poster_url.clone())),
        created_at: NotSet,
        updated_at: Set(now),
    }
}

fn now_sec() -> i64 {
    jiff::Timestamp::now().as_second()
}
