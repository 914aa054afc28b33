use contaerp_core::{AuditContext, EntityId, TenantId};
use contaerp_parties::{Customer, Employee, EmploymentStatus, Person, PersonKind, Supplier};
use sqlx::Row;
use sqlx::postgres::{PgPool, PgRow};
use uuid::Uuid;

use crate::database::Database;
use crate::error::{StoreResult, map_sqlx_error};
use crate::repo::read_stamp;

#[derive(Debug, Clone)]
pub struct PersonRepo {
    pool: PgPool,
}

impl PersonRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, person: &Person) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO people \
             (id, tenant_id, name, kind, tax_id, state_id, address, phone, mobile, \
              email, birth_date, notes, \
              created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, \
                     $13, $14, $15, $16, $17)",
        )
        .bind(Uuid::from(person.id))
        .bind(Uuid::from(person.tenant_id))
        .bind(&person.name)
        .bind(person.kind.as_str())
        .bind(&person.tax_id)
        .bind(&person.state_id)
        .bind(&person.address)
        .bind(&person.phone)
        .bind(&person.mobile)
        .bind(&person.email)
        .bind(person.birth_date)
        .bind(&person.notes)
        .bind(person.audit.created_at)
        .bind(person.audit.updated_at)
        .bind(person.audit.created_by.map(Uuid::from))
        .bind(person.audit.updated_by.map(Uuid::from))
        .bind(person.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "person"))?;
        Ok(())
    }

    pub async fn update(&self, person: &Person) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE people SET \
             name = $2, kind = $3, tax_id = $4, state_id = $5, address = $6, \
             phone = $7, mobile = $8, email = $9, birth_date = $10, notes = $11, \
             updated_at = $12, updated_by = $13, active = $14 \
             WHERE id = $1",
        )
        .bind(Uuid::from(person.id))
        .bind(&person.name)
        .bind(person.kind.as_str())
        .bind(&person.tax_id)
        .bind(&person.state_id)
        .bind(&person.address)
        .bind(&person.phone)
        .bind(&person.mobile)
        .bind(&person.email)
        .bind(person.birth_date)
        .bind(&person.notes)
        .bind(person.audit.updated_at)
        .bind(person.audit.updated_by.map(Uuid::from))
        .bind(person.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "person"))?;
        if result.rows_affected() == 0 {
            return Err(map_sqlx_error(sqlx::Error::RowNotFound, "person"));
        }
        Ok(())
    }

    pub async fn find(&self, tenant: TenantId, id: EntityId) -> StoreResult<Option<Person>> {
        let row =
            sqlx::query("SELECT * FROM people WHERE id = $1 AND tenant_id = $2 AND active")
                .bind(Uuid::from(id))
                .bind(Uuid::from(tenant))
                .fetch_optional(&self.pool)
                .await?;
        row.map(|r| map_person(&r)).transpose()
    }

    pub async fn find_by_tax_id(&self, tax_id: &str) -> StoreResult<Option<Person>> {
        let row = sqlx::query("SELECT * FROM people WHERE tax_id = $1 AND active")
            .bind(tax_id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(|r| map_person(&r)).transpose()
    }

    pub async fn list(&self, tenant: TenantId) -> StoreResult<Vec<Person>> {
        let rows =
            sqlx::query("SELECT * FROM people WHERE tenant_id = $1 AND active ORDER BY name")
                .bind(Uuid::from(tenant))
                .fetch_all(&self.pool)
                .await?;
        rows.iter().map(map_person).collect()
    }

    pub async fn deactivate(
        &self,
        tenant: TenantId,
        id: EntityId,
        ctx: &AuditContext,
    ) -> StoreResult<()> {
        deactivate_row(&self.pool, "people", tenant, id, ctx, "person").await
    }
}

fn map_person(row: &PgRow) -> StoreResult<Person> {
    Ok(Person {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        tenant_id: TenantId::from(row.try_get::<Uuid, _>("tenant_id")?),
        name: row.try_get("name")?,
        kind: PersonKind::parse(row.try_get::<&str, _>("kind")?)?,
        tax_id: row.try_get("tax_id")?,
        state_id: row.try_get("state_id")?,
        address: row.try_get("address")?,
        phone: row.try_get("phone")?,
        mobile: row.try_get("mobile")?,
        email: row.try_get("email")?,
        birth_date: row.try_get("birth_date")?,
        notes: row.try_get("notes")?,
        audit: read_stamp(row)?,
    })
}

/// Soft-delete a row in a table with a direct `tenant_id` column.
async fn deactivate_row(
    pool: &PgPool,
    table: &str,
    tenant: TenantId,
    id: EntityId,
    ctx: &AuditContext,
    what: &str,
) -> StoreResult<()> {
    let sql = format!(
        "UPDATE {table} SET active = FALSE, updated_at = $3, updated_by = $4 \
         WHERE id = $1 AND tenant_id = $2 AND active"
    );
    let result = sqlx::query(&sql)
        .bind(Uuid::from(id))
        .bind(Uuid::from(tenant))
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
pub struct CustomerRepo {
    pool: PgPool,
}

impl CustomerRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, customer: &Customer) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO customers \
             (id, person_id, code, credit_limit, payment_term_days, salesperson, \
              registered_on, created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(Uuid::from(customer.id))
        .bind(Uuid::from(customer.person_id))
        .bind(&customer.code)
        .bind(customer.credit_limit)
        .bind(customer.payment_term_days as i32)
        .bind(&customer.salesperson)
        .bind(customer.registered_on)
        .bind(customer.audit.created_at)
        .bind(customer.audit.updated_at)
        .bind(customer.audit.created_by.map(Uuid::from))
        .bind(customer.audit.updated_by.map(Uuid::from))
        .bind(customer.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "customer"))?;
        Ok(())
    }

    pub async fn update(&self, customer: &Customer) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE customers SET \
             code = $2, credit_limit = $3, payment_term_days = $4, salesperson = $5, \
             updated_at = $6, updated_by = $7, active = $8 \
             WHERE id = $1",
        )
        .bind(Uuid::from(customer.id))
        .bind(&customer.code)
        .bind(customer.credit_limit)
        .bind(customer.payment_term_days as i32)
        .bind(&customer.salesperson)
        .bind(customer.audit.updated_at)
        .bind(customer.audit.updated_by.map(Uuid::from))
        .bind(customer.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "customer"))?;
        if result.rows_affected() == 0 {
            return Err(map_sqlx_error(sqlx::Error::RowNotFound, "customer"));
        }
        Ok(())
    }

    pub async fn find(&self, tenant: TenantId, id: EntityId) -> StoreResult<Option<Customer>> {
        let row = sqlx::query(
            "SELECT c.* FROM customers c \
             JOIN people p ON p.id = c.person_id \
             WHERE c.id = $1 AND p.tenant_id = $2 AND c.active",
        )
        .bind(Uuid::from(id))
        .bind(Uuid::from(tenant))
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| map_customer(&r)).transpose().map_err(Into::into)
    }

    pub async fn list(&self, tenant: TenantId) -> StoreResult<Vec<Customer>> {
        let rows = sqlx::query(
            "SELECT c.* FROM customers c \
             JOIN people p ON p.id = c.person_id \
             WHERE p.tenant_id = $1 AND c.active ORDER BY c.code",
        )
        .bind(Uuid::from(tenant))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_customer).collect::<Result<_, _>>().map_err(Into::into)
    }
}

fn map_customer(row: &PgRow) -> Result<Customer, sqlx::Error> {
    Ok(Customer {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        person_id: EntityId::from(row.try_get::<Uuid, _>("person_id")?),
        code: row.try_get("code")?,
        credit_limit: row.try_get("credit_limit")?,
        payment_term_days: row.try_get::<i32, _>("payment_term_days")? as u32,
        salesperson: row.try_get("salesperson")?,
        registered_on: row.try_get("registered_on")?,
        audit: read_stamp(row)?,
    })
}

#[derive(Debug, Clone)]
pub struct SupplierRepo {
    pool: PgPool,
}

impl SupplierRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, supplier: &Supplier) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO suppliers \
             (id, person_id, code, lead_time_days, payment_conditions, \
              registered_on, created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
        )
        .bind(Uuid::from(supplier.id))
        .bind(Uuid::from(supplier.person_id))
        .bind(&supplier.code)
        .bind(supplier.lead_time_days as i32)
        .bind(&supplier.payment_conditions)
        .bind(supplier.registered_on)
        .bind(supplier.audit.created_at)
        .bind(supplier.audit.updated_at)
        .bind(supplier.audit.created_by.map(Uuid::from))
        .bind(supplier.audit.updated_by.map(Uuid::from))
        .bind(supplier.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "supplier"))?;
        Ok(())
    }

    pub async fn find(&self, tenant: TenantId, id: EntityId) -> StoreResult<Option<Supplier>> {
        let row = sqlx::query(
            "SELECT s.* FROM suppliers s \
             JOIN people p ON p.id = s.person_id \
             WHERE s.id = $1 AND p.tenant_id = $2 AND s.active",
        )
        .bind(Uuid::from(id))
        .bind(Uuid::from(tenant))
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| map_supplier(&r)).transpose().map_err(Into::into)
    }

    pub async fn list(&self, tenant: TenantId) -> StoreResult<Vec<Supplier>> {
        let rows = sqlx::query(
            "SELECT s.* FROM suppliers s \
             JOIN people p ON p.id = s.person_id \
             WHERE p.tenant_id = $1 AND s.active ORDER BY s.code",
        )
        .bind(Uuid::from(tenant))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_supplier).collect::<Result<_, _>>().map_err(Into::into)
    }
}

fn map_supplier(row: &PgRow) -> Result<Supplier, sqlx::Error> {
    Ok(Supplier {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        person_id: EntityId::from(row.try_get::<Uuid, _>("person_id")?),
        code: row.try_get("code")?,
        lead_time_days: row.try_get::<i32, _>("lead_time_days")? as u32,
        payment_conditions: row.try_get("payment_conditions")?,
        registered_on: row.try_get("registered_on")?,
        audit: read_stamp(row)?,
    })
}

#[derive(Debug, Clone)]
pub struct EmployeeRepo {
    pool: PgPool,
}

impl EmployeeRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            pool: db.pool().clone(),
        }
    }

    pub async fn insert(&self, employee: &Employee) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO employees \
             (id, person_id, code, position, department, salary, hired_on, \
              terminated_on, status, \
              created_at, updated_at, created_by, updated_by, active) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
        )
        .bind(Uuid::from(employee.id))
        .bind(Uuid::from(employee.person_id))
        .bind(&employee.code)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(employee.salary)
        .bind(employee.hired_on)
        .bind(employee.terminated_on)
        .bind(employee.status.as_str())
        .bind(employee.audit.created_at)
        .bind(employee.audit.updated_at)
        .bind(employee.audit.created_by.map(Uuid::from))
        .bind(employee.audit.updated_by.map(Uuid::from))
        .bind(employee.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "employee"))?;
        Ok(())
    }

    pub async fn update(&self, employee: &Employee) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE employees SET \
             code = $2, position = $3, department = $4, salary = $5, \
             terminated_on = $6, status = $7, \
             updated_at = $8, updated_by = $9, active = $10 \
             WHERE id = $1",
        )
        .bind(Uuid::from(employee.id))
        .bind(&employee.code)
        .bind(&employee.position)
        .bind(&employee.department)
        .bind(employee.salary)
        .bind(employee.terminated_on)
        .bind(employee.status.as_str())
        .bind(employee.audit.updated_at)
        .bind(employee.audit.updated_by.map(Uuid::from))
        .bind(employee.audit.active)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error(e, "employee"))?;
        if result.rows_affected() == 0 {
            return Err(map_sqlx_error(sqlx::Error::RowNotFound, "employee"));
        }
        Ok(())
    }

    pub async fn find(&self, tenant: TenantId, id: EntityId) -> StoreResult<Option<Employee>> {
        let row = sqlx::query(
            "SELECT e.* FROM employees e \
             JOIN people p ON p.id = e.person_id \
             WHERE e.id = $1 AND p.tenant_id = $2 AND e.active",
        )
        .bind(Uuid::from(id))
        .bind(Uuid::from(tenant))
        .fetch_optional(&self.pool)
        .await?;
        row.map(|r| map_employee(&r)).transpose()
    }

    pub async fn list(&self, tenant: TenantId) -> StoreResult<Vec<Employee>> {
        let rows = sqlx::query(
            "SELECT e.* FROM employees e \
             JOIN people p ON p.id = e.person_id \
             WHERE p.tenant_id = $1 AND e.active ORDER BY e.code",
        )
        .bind(Uuid::from(tenant))
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(map_employee).collect()
    }
}

fn map_employee(row: &PgRow) -> StoreResult<Employee> {
    Ok(Employee {
        id: EntityId::from(row.try_get::<Uuid, _>("id")?),
        person_id: EntityId::from(row.try_get::<Uuid, _>("person_id")?),
        code: row.try_get("code")?,
        position: row.try_get("position")?,
        department: row.try_get("department")?,
        salary: row.try_get("salary")?,
        hired_on: row.try_get("hired_on")?,
        terminated_on: row.try_get("terminated_on")?,
        status: EmploymentStatus::parse(row.try_get::<&str, _>("status")?)?,
        audit: read_stamp(row)?,
    })
}
