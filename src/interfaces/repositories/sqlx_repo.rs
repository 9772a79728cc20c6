use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxWardrobeRepo {
    pub pool: PgPool,
}
