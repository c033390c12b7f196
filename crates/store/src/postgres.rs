use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder, Row, postgres::PgRow};
use uuid::Uuid;

use crate::{
    CartLine, CartLineId, Item, ItemId, ItemOrderCount, LineQuery, LineStatus, LineView, Money,
    Result, Review, ReviewId, StoreError, Totals, UserId, store::ShopStore,
};

const ITEM_COLUMNS: &str = "i.id AS item_id, i.slug, i.title, i.price_minor, i.hours, \
     i.description, i.instructions, i.image, i.labels, i.label_colour, i.created_by, \
     i.created_at AS item_created_at";

const LINE_COLUMNS: &str = "l.id AS line_id, l.buyer_id, l.quantity, l.ordered, l.status, \
     l.ordered_date, l.delivery_date, l.created_at AS line_created_at";

/// PostgreSQL-backed shop store implementation.
#[derive(Clone)]
pub struct PostgresShopStore {
    pool: PgPool,
}

impl PostgresShopStore {
    /// Creates a new PostgreSQL shop store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_item(row: &PgRow) -> Result<Item> {
        Ok(Item {
            id: ItemId::from_uuid(row.try_get::<Uuid, _>("item_id")?),
            slug: row.try_get("slug")?,
            title: row.try_get("title")?,
            price: Money::from_minor(row.try_get("price_minor")?),
            hours: row.try_get("hours")?,
            description: row.try_get("description")?,
            instructions: row.try_get("instructions")?,
            image: row.try_get("image")?,
            labels: row.try_get("labels")?,
            label_colour: row.try_get("label_colour")?,
            created_by: UserId::from_uuid(row.try_get::<Uuid, _>("created_by")?),
            created_at: row.try_get("item_created_at")?,
        })
    }

    fn row_to_line(row: &PgRow) -> Result<CartLine> {
        let status = row
            .try_get::<Option<String>, _>("status")?
            .map(|s| s.parse::<LineStatus>())
            .transpose()
            .map_err(|e| StoreError::Corrupt(e.to_string()))?;

        Ok(CartLine {
            id: CartLineId::from_uuid(row.try_get::<Uuid, _>("line_id")?),
            item_id: ItemId::from_uuid(row.try_get::<Uuid, _>("item_id")?),
            buyer_id: UserId::from_uuid(row.try_get::<Uuid, _>("buyer_id")?),
            quantity: row.try_get("quantity")?,
            ordered: row.try_get("ordered")?,
            status,
            ordered_date: row.try_get("ordered_date")?,
            delivery_date: row.try_get("delivery_date")?,
            created_at: row.try_get("line_created_at")?,
        })
    }

    fn row_to_view(row: PgRow) -> Result<LineView> {
        Ok(LineView {
            line: Self::row_to_line(&row)?,
            item: Self::row_to_item(&row)?,
        })
    }

    fn row_to_review(row: PgRow) -> Result<Review> {
        Ok(Review {
            id: ReviewId::from_uuid(row.try_get::<Uuid, _>("id")?),
            user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id")?),
            item_id: ItemId::from_uuid(row.try_get::<Uuid, _>("item_id")?),
            slug: row.try_get("slug")?,
            body: row.try_get("body")?,
            created_at: row.try_get("created_at")?,
        })
    }

    fn map_slug_conflict(e: sqlx::Error, slug: &str) -> StoreError {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.constraint() == Some("items_slug_key")
        {
            return StoreError::DuplicateSlug(slug.to_string());
        }
        StoreError::Database(e)
    }

    fn map_missing_item(e: sqlx::Error, item_id: ItemId) -> StoreError {
        if let sqlx::Error::Database(ref db_err) = e
            && matches!(
                db_err.constraint(),
                Some("cart_lines_item_id_fkey" | "reviews_item_id_fkey")
            )
        {
            return StoreError::UnknownItem(item_id);
        }
        StoreError::Database(e)
    }

    /// Appends the join and WHERE clause shared by every line query.
    fn push_line_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &LineQuery) {
        builder.push(" FROM cart_lines l JOIN items i ON i.id = l.item_id WHERE TRUE");
        if let Some(buyer) = query.buyer {
            builder.push(" AND l.buyer_id = ").push_bind(buyer.as_uuid());
        }
        if let Some(seller) = query.seller {
            builder.push(" AND i.created_by = ").push_bind(seller.as_uuid());
        }
        if let Some(ordered) = query.ordered {
            builder.push(" AND l.ordered = ").push_bind(ordered);
        }
        if let Some(status) = query.status {
            builder.push(" AND l.status = ").push_bind(status.as_str());
        }
    }

    async fn items_where(&self, seller: Option<UserId>) -> Result<Vec<Item>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(ITEM_COLUMNS).push(" FROM items i");
        if let Some(seller) = seller {
            builder
                .push(" WHERE i.created_by = ")
                .push_bind(seller.as_uuid());
        }
        builder.push(" ORDER BY i.title ASC, i.id ASC");

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.iter().map(Self::row_to_item).collect()
    }
}

#[async_trait]
impl ShopStore for PostgresShopStore {
    async fn insert_item(&self, item: Item) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO items (id, slug, title, price_minor, hours, description, instructions,
                               image, labels, label_colour, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.slug)
        .bind(&item.title)
        .bind(item.price.minor())
        .bind(item.hours)
        .bind(&item.description)
        .bind(&item.instructions)
        .bind(&item.image)
        .bind(&item.labels)
        .bind(&item.label_colour)
        .bind(item.created_by.as_uuid())
        .bind(item.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_slug_conflict(e, &item.slug))?;

        Ok(())
    }

    async fn update_item(&self, item: Item) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE items
            SET slug = $2, title = $3, price_minor = $4, hours = $5, description = $6,
                instructions = $7, image = $8, labels = $9, label_colour = $10
            WHERE id = $1
            "#,
        )
        .bind(item.id.as_uuid())
        .bind(&item.slug)
        .bind(&item.title)
        .bind(item.price.minor())
        .bind(item.hours)
        .bind(&item.description)
        .bind(&item.instructions)
        .bind(&item.image)
        .bind(&item.labels)
        .bind(&item.label_colour)
        .execute(&mut *tx)
        .await
        .map_err(|e| Self::map_slug_conflict(e, &item.slug))?;

        if result.rows_affected() != 1 {
            return Ok(false);
        }

        sqlx::query("UPDATE reviews SET slug = $2 WHERE item_id = $1 AND slug <> $2")
            .bind(item.id.as_uuid())
            .bind(&item.slug)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    async fn delete_item(&self, item_id: ItemId) -> Result<bool> {
        // Lines and reviews go with it through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(item_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn get_item(&self, item_id: ItemId) -> Result<Option<Item>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder
            .push(ITEM_COLUMNS)
            .push(" FROM items i WHERE i.id = ")
            .push_bind(item_id.as_uuid());

        let row = builder.build().fetch_optional(&self.pool).await?;
        row.as_ref().map(Self::row_to_item).transpose()
    }

    async fn get_item_by_slug(&self, slug: &str) -> Result<Option<Item>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder
            .push(ITEM_COLUMNS)
            .push(" FROM items i WHERE i.slug = ")
            .push_bind(slug);

        let row = builder.build().fetch_optional(&self.pool).await?;
        row.as_ref().map(Self::row_to_item).transpose()
    }

    async fn list_items(&self) -> Result<Vec<Item>> {
        self.items_where(None).await
    }

    async fn list_items_by_seller(&self, seller: UserId) -> Result<Vec<Item>> {
        self.items_where(Some(seller)).await
    }

    async fn insert_review(&self, review: Review) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reviews (id, user_id, item_id, slug, body, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(review.id.as_uuid())
        .bind(review.user_id.as_uuid())
        .bind(review.item_id.as_uuid())
        .bind(&review.slug)
        .bind(&review.body)
        .bind(review.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_missing_item(e, review.item_id))?;

        Ok(())
    }

    async fn latest_reviews(&self, item_id: ItemId, limit: usize) -> Result<Vec<Review>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, item_id, slug, body, created_at
            FROM reviews
            WHERE item_id = $1
            ORDER BY seq DESC
            LIMIT $2
            "#,
        )
        .bind(item_id.as_uuid())
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_review).collect()
    }

    async fn insert_line(&self, line: CartLine) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cart_lines (id, item_id, buyer_id, quantity, ordered, status,
                                    ordered_date, delivery_date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(line.id.as_uuid())
        .bind(line.item_id.as_uuid())
        .bind(line.buyer_id.as_uuid())
        .bind(line.quantity)
        .bind(line.ordered)
        .bind(line.status.map(|s| s.as_str()))
        .bind(line.ordered_date)
        .bind(line.delivery_date)
        .bind(line.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Self::map_missing_item(e, line.item_id))?;

        Ok(())
    }

    async fn get_line(&self, line_id: CartLineId) -> Result<Option<CartLine>> {
        let row = sqlx::query(
            r#"
            SELECT id AS line_id, item_id, buyer_id, quantity, ordered, status,
                   ordered_date, delivery_date, created_at AS line_created_at
            FROM cart_lines
            WHERE id = $1
            "#,
        )
        .bind(line_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::row_to_line).transpose()
    }

    async fn delete_cart_line(&self, line_id: CartLineId, buyer: UserId) -> Result<bool> {
        let result = sqlx::query(
            "DELETE FROM cart_lines WHERE id = $1 AND buyer_id = $2 AND ordered = FALSE",
        )
        .bind(line_id.as_uuid())
        .bind(buyer.as_uuid())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn query_lines(&self, query: LineQuery) -> Result<Vec<LineView>> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT ");
        builder.push(LINE_COLUMNS).push(", ").push(ITEM_COLUMNS);
        Self::push_line_filters(&mut builder, &query);

        if query.newest_first {
            builder.push(" ORDER BY l.ordered_date DESC NULLS LAST, l.created_at DESC, l.seq DESC");
        } else {
            builder.push(" ORDER BY l.seq ASC");
        }

        let rows = builder.build().fetch_all(&self.pool).await?;
        rows.into_iter().map(Self::row_to_view).collect()
    }

    async fn line_totals(&self, query: LineQuery) -> Result<Totals> {
        let mut builder = QueryBuilder::<Postgres>::new(
            "SELECT COALESCE(SUM(i.price_minor), 0)::BIGINT, \
             COALESCE(SUM(l.quantity), 0)::BIGINT, \
             COALESCE(SUM(i.hours), 0)::BIGINT",
        );
        Self::push_line_filters(&mut builder, &query);

        let (price, quantity, hours) = builder
            .build_query_as::<(i64, i64, i64)>()
            .fetch_one(&self.pool)
            .await?;

        Ok(Totals {
            price: Money::from_minor(price),
            quantity,
            hours,
        })
    }

    async fn count_lines(&self, query: LineQuery) -> Result<u64> {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*)");
        Self::push_line_filters(&mut builder, &query);

        let count = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn item_order_counts(&self, seller: UserId) -> Result<Vec<ItemOrderCount>> {
        let rows = sqlx::query(
            r#"
            SELECT i.id, i.slug, i.title, COUNT(l.id) AS orders
            FROM items i
            LEFT JOIN cart_lines l ON l.item_id = i.id AND l.ordered
            WHERE i.created_by = $1
            GROUP BY i.id, i.slug, i.title
            ORDER BY i.title ASC, i.id ASC
            "#,
        )
        .bind(seller.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(ItemOrderCount {
                    item_id: ItemId::from_uuid(row.try_get::<Uuid, _>("id")?),
                    slug: row.try_get("slug")?,
                    title: row.try_get("title")?,
                    orders: row.try_get("orders")?,
                })
            })
            .collect()
    }

    async fn place_order(&self, buyer: UserId, at: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE cart_lines
            SET ordered = TRUE, status = 'Active', ordered_date = $2
            WHERE buyer_id = $1 AND ordered = FALSE
            "#,
        )
        .bind(buyer.as_uuid())
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn mark_delivered(
        &self,
        line_id: CartLineId,
        seller: UserId,
        at: DateTime<Utc>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE cart_lines l
            SET status = 'Delivered', delivery_date = $3
            FROM items i
            WHERE l.id = $1
              AND l.item_id = i.id
              AND i.created_by = $2
              AND l.ordered
              AND l.status = 'Active'
            "#,
        )
        .bind(line_id.as_uuid())
        .bind(seller.as_uuid())
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
