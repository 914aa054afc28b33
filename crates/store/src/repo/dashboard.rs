//! Dashboard aggregates, computed in SQL on demand.

use chrono::{Datelike, Months, NaiveDate};
use contaerp_core::TenantId;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::Row;
use sqlx::postgres::PgPool;
use uuid::Uuid;

use crate::database::Database;
use crate::error::StoreResult;

/// Snapshot of the figures the dashboard shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub active_customers: i64,
    pub active_suppliers: i64,
    pub active_products: i64,
    /// Sum of open receivable original amounts due in the next 30 days.
    pub receivables_due_soon: Decimal,
    /// Sum of open payable original amounts due in the next 30 days.
    pub payables_due_soon: Decimal,
    pub overdue_receivables: i64,
    pub overdue_payables: i64,
    /// Cash inflow total for the current month.
    pub month_inflow: Decimal,
    /// Cash outflow total for the current month.
    pub month_outflow: Decimal,
    /// Inflow minus outflow for the current month.
    pub month_net: Decimal,
}

#[derive(Debug, Clone)]
pub struct DashboardRepo {
    pool: PgPool,
}

impl DashboardRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn summary(&self, tenant: TenantId, today: NaiveDate) -> StoreResult<DashboardSummary> {
        let tenant_id = Uuid::from(tenant);
        let horizon = due_horizon(today);
        let (month_start, next_month) = month_bounds(today);

        let counts = sqlx::query(
            "SELECT \
               (SELECT COUNT(*) FROM customers c \
                  JOIN people p ON p.id = c.person_id \
                  WHERE p.tenant_id = $1 AND c.active) AS customers, \
               (SELECT COUNT(*) FROM suppliers s \
                  JOIN people p ON p.id = s.person_id \
                  WHERE p.tenant_id = $1 AND s.active) AS suppliers, \
               (SELECT COUNT(*) FROM products WHERE active) AS products",
        )
        .bind(tenant_id)
        .fetch_one(&self.pool)
        .await?;

        let documents = sqlx::query(
            "SELECT \
               COALESCE((SELECT SUM(original_amount) FROM receivables \
                  WHERE tenant_id = $1 AND status = 'aberto' AND active \
                    AND due_date BETWEEN $2 AND $3), 0) AS receivables_due_soon, \
               COALESCE((SELECT SUM(original_amount) FROM payables \
                  WHERE tenant_id = $1 AND status = 'aberto' AND active \
                    AND due_date BETWEEN $2 AND $3), 0) AS payables_due_soon, \
               (SELECT COUNT(*) FROM receivables \
                  WHERE tenant_id = $1 AND status = 'aberto' AND active \
                    AND due_date < $2) AS overdue_receivables, \
               (SELECT COUNT(*) FROM payables \
                  WHERE tenant_id = $1 AND status = 'aberto' AND active \
                    AND due_date < $2) AS overdue_payables",
        )
        .bind(tenant_id)
        .bind(today)
        .bind(horizon)
        .fetch_one(&self.pool)
        .await?;

        let cash = sqlx::query(
            "SELECT \
               COALESCE(SUM(amount) FILTER (WHERE direction = 'entrada'), 0) AS inflow, \
               COALESCE(SUM(amount) FILTER (WHERE direction = 'saida'), 0) AS outflow \
             FROM cash_movements \
             WHERE tenant_id = $1 AND active AND date >= $2 AND date < $3",
        )
        .bind(tenant_id)
        .bind(month_start)
        .bind(next_month)
        .fetch_one(&self.pool)
        .await?;

        let month_inflow: Decimal = cash.try_get("inflow")?;
        let month_outflow: Decimal = cash.try_get("outflow")?;

        Ok(DashboardSummary {
            active_customers: counts.try_get("customers")?,
            active_suppliers: counts.try_get("suppliers")?,
            active_products: counts.try_get("products")?,
            receivables_due_soon: documents.try_get("receivables_due_soon")?,
            payables_due_soon: documents.try_get("payables_due_soon")?,
            overdue_receivables: documents.try_get("overdue_receivables")?,
            overdue_payables: documents.try_get("overdue_payables")?,
            month_inflow,
            month_outflow,
            month_net: month_inflow - month_outflow,
        })
    }
}

/// Last due date still inside the rolling window, inclusive.
fn due_horizon(today: NaiveDate) -> NaiveDate {
    today + chrono::Duration::days(30)
}

/// Current calendar month as a half-open `[start, next_month)` range.
fn month_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = today.with_day(1).unwrap_or(today);
    (start, start + Months::new(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_window_includes_day_thirty_but_not_beyond() {
        let today = date(2026, 8, 30);
        let horizon = due_horizon(today);
        assert_eq!(horizon, date(2026, 9, 29));
        // a document due 45 days out falls past the horizon
        assert!(today + chrono::Duration::days(45) > horizon);
    }

    #[test]
    fn month_bounds_cover_the_whole_month() {
        let (start, end) = month_bounds(date(2026, 8, 30));
        assert_eq!(start, date(2026, 8, 1));
        assert_eq!(end, date(2026, 9, 1));
    }

    #[test]
    fn month_bounds_roll_over_year_end() {
        let (start, end) = month_bounds(date(2026, 12, 15));
        assert_eq!(start, date(2026, 12, 1));
        assert_eq!(end, date(2027, 1, 1));
    }
}
