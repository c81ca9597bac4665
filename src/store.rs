use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    SqlErr, TransactionTrait, sea_query::Expr,
};

use crate::{
    entities::movie,
    error::{AppError, AppResult},
    models::NewMovie,
};

#[derive(Clone)]
pub struct MovieStore {
    db: DatabaseConnection,
}

impl MovieStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(&self, movie: NewMovie) -> AppResult<i32> {
        let title = movie.title.clone();
        let model = movie::ActiveModel {
            title: Set(movie.title),
            year: Set(movie.year),
            description: Set(movie.description),
            img_url: Set(movie.img_url),
            ..Default::default()
        };

        match movie::Entity::insert(model).exec(&self.db).await {
            Ok(res) => Ok(res.last_insert_id),
            Err(err) => match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => Err(AppError::DuplicateTitle(title)),
                _ => Err(err.into()),
            },
        }
    }

    pub async fn get(&self, id: i32) -> AppResult<movie::Model> {
        movie::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound { id })
    }

    pub async fn find_by_title(&self, title: &str) -> AppResult<Option<movie::Model>> {
        Ok(movie::Entity::find()
            .filter(movie::Column::Title.eq(title))
            .one(&self.db)
            .await?)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let res = movie::Entity::delete_by_id(id).exec(&self.db).await?;
        if res.rows_affected == 0 {
            return Err(AppError::NotFound { id });
        }
        Ok(())
    }

    /// Ascending by rating; SQLite sorts unrated rows first.
    pub async fn list_by_rating(&self) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find()
            .order_by_asc(movie::Column::Rating)
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?)
    }

    /// Highest rank first.
    pub async fn list_by_ranking(&self) -> AppResult<Vec<movie::Model>> {
        Ok(movie::Entity::find()
            .order_by_desc(movie::Column::Ranking)
            .order_by_asc(movie::Column::Id)
            .all(&self.db)
            .await?)
    }

    pub async fn update_review(
        &self,
        id: i32,
        rating: f64,
        review: String,
    ) -> AppResult<movie::Model> {
        let mut model: movie::ActiveModel = self.get(id).await?.into();
        model.rating = Set(Some(rating));
        model.review = Set(Some(review));
        Ok(model.update(&self.db).await?)
    }

    pub async fn set_rankings(&self, ranks: &[(i32, i32)]) -> AppResult<()> {
        if ranks.is_empty() {
            return Ok(());
        }

        let txn = self.db.begin().await?;
        for &(id, rank) in ranks {
            movie::Entity::update_many()
                .col_expr(movie::Column::Ranking, Expr::value(rank))
                .filter(movie::Column::Id.eq(id))
                .exec(&txn)
                .await?;
        }
        txn.commit().await?;

        Ok(())
    }
}
