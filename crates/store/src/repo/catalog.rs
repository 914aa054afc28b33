use std::collections::HashMap;

use contaerp_catalog::{Category, MeasurementUnit, Product, ProductKind};
use contaerp_core::{AuditContext, EntityId};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{StoreResult, map_sqlx_error};
use crate::repo::{count_active_references, count_references, ensure_unreferenced, read_stamp};

#[derive(Debug, Clone)]
pub struct CategoryRepo {
    pool: PgPool,
}

impl CategoryRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, category: &Category) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO categories \
             (id, name, description, parent_id, \
              created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(Uuid::from(category.id))
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.parent_id.map(Uuid::from))
        .bind(category.audit.created_at)
        .bind(category.audit.updated_at)
        .bind(category.audit.created_by.map(Uuid::from))
        .bind(category.audit.updated_by.map(Uuid::from))
        .bind(category.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "category"))?;
        Ok(())
    }

    pub async fn update(&self, category: &Category) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE categories SET \
             name = $2, description = $3, parent_id = $4, \
             updated_at = $5, updated_by = $6, active = $7 \
             WHERE id = $1",
        )
        .bind(Uuid::from(category.id))
        .bind(&category.name)
        .bind(&category.description)
        .bind(category.parent_id.map(Uuid::from))
        .bind(category.audit.updated_at)
        .bind(category.audit.updated_by.map(Uuid::from))
        .bind(category.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "category"))?;
        if result.rows_affected() == 0 {
            return Err(map_sqlx_error(sqlx::Error::RowNotFound, "category"));
        }
        Ok(())
    }

    pub async fn find(&self, id: EntityId) -> StoreResult<Option<Category>> {
        let row = sqlx::query("SELECT * FROM categories WHERE id = $1 AND active")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_category(&r)).transpose().map_err(Into::into)
    }

    pub async fn list(&self) -> StoreResult<Vec<Category>> {
        let rows = sqlx::query("SELECT * FROM categories WHERE active ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(map_category)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    /// Child → parent map of all active categories, used for ancestry (cycle)
    /// checks before a reparent.
    pub async fn parent_map(&self) -> StoreResult<HashMap<EntityId, Option<EntityId>>> {
        let rows = sqlx::query("SELECT id, parent_id FROM categories WHERE active")
            .fetch_all(&self.pool)
            .await?;
        let mut map = HashMap::with_capacity(rows.len());
        for row in &rows {
            let id = EntityId::from(row.try_get::<Uuid, _>("id")?);
            let parent = row
                .try_get::<Option<Uuid>, _>("parent_id")?
                .map(EntityId::from);
            map.insert(id, parent);
        }
        Ok(map)
    }

    pub async fn deactivate(&self, id: EntityId, ctx: &AuditContext) -> StoreResult<()> {
        let children =
            count_active_references(&self.pool, "categories", "parent_id", id).await?;
        ensure_unreferenced(children, "category has active children")?;
        let products = count_active_references(&self.pool, "products", "category_id", id).await?;
        ensure_unreferenced(products, "category is referenced by active products")?;
        deactivate_shared(&self.pool, "categories", id, ctx, "category").await
    }
}

fn map_category(row: &PgRow) -> Result<Category, sqlx::Error> {
    Ok(Category {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        parent_id: row
            .try_get::<Option<Uuid>, _>("parent_id")?
            .map(EntityId::from),
        audit: read_stamp(row)?,
    })
}

async fn deactivate_shared(
    pool: &PgPool,
    table: &str,
    id: EntityId,
    ctx: &AuditContext,
    what: &str,
) -> StoreResult<()> {
    let sql = format!(
        "UPDATE {table} SET active = FALSE, updated_at = $2, updated_by = $3 \
         WHERE id = $1 AND active"
    );
    let result = sqlx::query(&sql)
        .bind(Uuid::from(id))
        .bind(ctx.at)
        .bind(Uuid::from(ctx.user))
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(map_sqlx_error(sqlx::Error::RowNotFound, what));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct UnitRepo {
    pool: PgPool,
}

impl UnitRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, unit: &MeasurementUnit) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO units \
             (id, name, abbreviation, description, \
              created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
        )
        .bind(Uuid::from(unit.id))
        .bind(&unit.name)
        .bind(&unit.abbreviation)
        .bind(&unit.description)
        .bind(unit.audit.created_at)
        .bind(unit.audit.updated_at)
        .bind(unit.audit.created_by.map(Uuid::from))
        .bind(unit.audit.updated_by.map(Uuid::from))
        .bind(unit.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "unit"))?;
        Ok(())
    }

    pub async fn find(&self, id: EntityId) -> StoreResult<Option<MeasurementUnit>> {
        let row = sqlx::query("SELECT * FROM units WHERE id = $1 AND active")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_unit(&r)).transpose().map_err(Into::into)
    }

    pub async fn list(&self) -> StoreResult<Vec<MeasurementUnit>> {
        let rows = sqlx::query("SELECT * FROM units WHERE active ORDER BY abbreviation")
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(map_unit)
            .collect::<Result<_, _>>()
            .map_err(Into::into)
    }

    pub async fn deactivate(&self, id: EntityId, ctx: &AuditContext) -> StoreResult<()> {
        let products = count_active_references(&self.pool, "products", "unit_id", id).await?;
        ensure_unreferenced(products, "unit is referenced by active products")?;
        deactivate_shared(&self.pool, "units", id, ctx, "unit").await
    }
}

fn map_unit(row: &PgRow) -> Result<MeasurementUnit, sqlx::Error> {
    Ok(MeasurementUnit {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        name: row.try_get("name")?,
        abbreviation: row.try_get("abbreviation")?,
        description: row.try_get("description")?,
        audit: read_stamp(row)?,
    })
}

#[derive(Debug, Clone)]
pub struct ProductRepo {
    pool: PgPool,
}

impl ProductRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, product: &Product) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO products \
             (id, code, name, description, category_id, unit_id, weight, dimensions, \
              barcode, cost_price, sale_price, margin, min_stock, max_stock, \
              tracks_stock, kind, \
              created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, \
                     $15, $16, $17, $18, $19, $20, $21)",
        )
        .bind(Uuid::from(product.id))
        .bind(&product.code)
        .bind(&product.name)
        .bind(&product.description)
        .bind(Uuid::from(product.category_id))
        .bind(Uuid::from(product.unit_id))
        .bind(product.weight)
        .bind(&product.dimensions)
        .bind(&product.barcode)
        .bind(product.cost_price)
        .bind(product.sale_price)
        .bind(product.margin)
        .bind(product.min_stock)
        .bind(product.max_stock)
        .bind(product.tracks_stock)
        .bind(product.kind.as_str())
        .bind(product.audit.created_at)
        .bind(product.audit.updated_at)
        .bind(product.audit.created_by.map(Uuid::from))
        .bind(product.audit.updated_by.map(Uuid::from))
        .bind(product.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "product"))?;
        Ok(())
    }

    pub async fn update(&self, product: &Product) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE products SET \
             code = $2, name = $3, description = $4, category_id = $5, unit_id = $6, \
             weight = $7, dimensions = $8, barcode = $9, cost_price = $10, \
             sale_price = $11, margin = $12, min_stock = $13, max_stock = $14, \
             tracks_stock = $15, kind = $16, \
             updated_at = $17, updated_by = $18, active = $19 \
             WHERE id = $1",
        )
        .bind(Uuid::from(product.id))
        .bind(&product.code)
        .bind(&product.name)
        .bind(&product.description)
        .bind(Uuid::from(product.category_id))
        .bind(Uuid::from(product.unit_id))
        .bind(product.weight)
        .bind(&product.dimensions)
        .bind(&product.barcode)
        .bind(product.cost_price)
        .bind(product.sale_price)
        .bind(product.margin)
        .bind(product.min_stock)
        .bind(product.max_stock)
        .bind(product.tracks_stock)
        .bind(product.kind.as_str())
        .bind(product.audit.updated_at)
        .bind(product.audit.updated_by.map(Uuid::from))
        .bind(product.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "product"))?;
        if result.rows_affected() == 0 {
            return Err(map_sqlx_error(sqlx::Error::RowNotFound, "product"));
        }
        Ok(())
    }

    pub async fn find(&self, id: EntityId) -> StoreResult<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE id = $1 AND active")
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_product(&r)).transpose()
    }

    pub async fn find_by_code(&self, code: &str) -> StoreResult<Option<Product>> {
        let row = sqlx::query("SELECT * FROM products WHERE code = $1 AND active")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_product(&r)).transpose()
    }

    pub async fn list(&self) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query("SELECT * FROM products WHERE active ORDER BY code")
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(map_product).collect()
    }

    pub async fn deactivate(&self, id: EntityId, ctx: &AuditContext) -> StoreResult<()> {
        // Stock rows are audit history, deactivated or not.
        let stock = count_references(&self.pool, "stock_records", "product_id", id).await?;
        ensure_unreferenced(stock, "product has stock records")?;
        deactivate_shared(&self.pool, "products", id, ctx, "product").await
    }
}

fn map_product(row: &PgRow) -> StoreResult<Product> {
    Ok(Product {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        code: row.try_get("code")?,
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        category_id: EntityId::from(row.try_get::<Uuid, _>("category_id")?),
        unit_id: EntityId::from(row.try_get::<Uuid, _>("unit_id")?),
        weight: row.try_get("weight")?,
        dimensions: row.try_get("dimensions")?,
        barcode: row.try_get("barcode")?,
        cost_price: row.try_get("cost_price")?,
        sale_price: row.try_get("sale_price")?,
        margin: row.try_get("margin")?,
        min_stock: row.try_get("min_stock")?,
        max_stock: row.try_get("max_stock")?,
        tracks_stock: row.try_get("tracks_stock")?,
        kind: ProductKind::parse(row.try_get::<&str, _>("kind")?)?,
        audit: read_stamp(row)?,
    })
}
