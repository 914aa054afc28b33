use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use contaerp_core::{DomainError, EntityId};
use contaerp_parties::{Customer, Employee, Person, PersonKind, Supplier};
use uuid::Uuid;

use crate::app::AppState;
use crate::app::dto::{
    CreateCustomer, CreateEmployee, CreatePerson, CreateSupplier, SetCreditLimit,
    TerminateEmployee, UpdatePersonContact,
};
use crate::app::errors::{ApiError, not_found};
use crate::context::Identity;

pub async fn create_person(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreatePerson>,
) -> Result<(StatusCode, Json<Person>), ApiError> {
    let ctx = identity.audit_ctx();
    let kind = PersonKind::parse(&body.kind)?;
    if state
        .services
        .people
        .find_by_tax_id(&body.tax_id)
        .await?
        .is_some()
    {
        return Err(DomainError::conflict("a person with this tax id already exists").into());
    }
    let mut person = Person::new(identity.tenant, body.name, kind, body.tax_id, &ctx)?;
    person.update_contact(body.address, body.phone, body.mobile, body.email, &ctx);
    state.services.people.insert(&person).await?;
    Ok((StatusCode::CREATED, Json(person)))
}

pub async fn list_people(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Person>>, ApiError> {
    Ok(Json(state.services.people.list(identity.tenant).await?))
}

pub async fn get_person(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Person>, ApiError> {
    state
        .services
        .people
        .find(identity.tenant, EntityId::from(id))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn update_person(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePersonContact>,
) -> Result<Json<Person>, ApiError> {
    let ctx = identity.audit_ctx();
    let Some(mut person) = state
        .services
        .people
        .find(identity.tenant, EntityId::from(id))
        .await?
    else {
        return Err(not_found());
    };
    person.update_contact(body.address, body.phone, body.mobile, body.email, &ctx);
    state.services.people.update(&person).await?;
    Ok(Json(person))
}

pub async fn deactivate_person(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let ctx = identity.audit_ctx();
    state
        .services
        .people
        .deactivate(identity.tenant, EntityId::from(id), &ctx)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// The person must already exist in the caller's tenant; a person can hold
/// each role at most once (unique person_id on the role table).
pub async fn create_customer(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateCustomer>,
) -> Result<(StatusCode, Json<Customer>), ApiError> {
    let ctx = identity.audit_ctx();
    let person_id = EntityId::from(body.person_id);
    ensure_person_exists(&state, &identity, person_id).await?;
    let mut customer = Customer::new(person_id, body.code, body.registered_on, &ctx)?;
    if let Some(limit) = body.credit_limit {
        customer.set_credit_limit(limit, &ctx)?;
    }
    state.services.customers.insert(&customer).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn set_credit_limit(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetCreditLimit>,
) -> Result<Json<Customer>, ApiError> {
    let ctx = identity.audit_ctx();
    let Some(mut customer) = state
        .services
        .customers
        .find(identity.tenant, EntityId::from(id))
        .await?
    else {
        return Err(not_found());
    };
    customer.set_credit_limit(body.credit_limit, &ctx)?;
    state.services.customers.update(&customer).await?;
    Ok(Json(customer))
}

pub async fn list_customers(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Customer>>, ApiError> {
    Ok(Json(state.services.customers.list(identity.tenant).await?))
}

pub async fn get_customer(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Customer>, ApiError> {
    state
        .services
        .customers
        .find(identity.tenant, EntityId::from(id))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn create_supplier(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateSupplier>,
) -> Result<(StatusCode, Json<Supplier>), ApiError> {
    let ctx = identity.audit_ctx();
    let person_id = EntityId::from(body.person_id);
    ensure_person_exists(&state, &identity, person_id).await?;
    let supplier = Supplier::new(person_id, body.code, body.registered_on, &ctx)?;
    state.services.suppliers.insert(&supplier).await?;
    Ok((StatusCode::CREATED, Json(supplier)))
}

pub async fn list_suppliers(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Supplier>>, ApiError> {
    Ok(Json(state.services.suppliers.list(identity.tenant).await?))
}

pub async fn get_supplier(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Supplier>, ApiError> {
    state
        .services
        .suppliers
        .find(identity.tenant, EntityId::from(id))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn create_employee(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(body): Json<CreateEmployee>,
) -> Result<(StatusCode, Json<Employee>), ApiError> {
    let ctx = identity.audit_ctx();
    let person_id = EntityId::from(body.person_id);
    ensure_person_exists(&state, &identity, person_id).await?;
    let employee = Employee::new(
        person_id,
        body.code,
        body.position,
        body.department,
        body.salary,
        body.hired_on,
        &ctx,
    )?;
    state.services.employees.insert(&employee).await?;
    Ok((StatusCode::CREATED, Json(employee)))
}

pub async fn list_employees(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Json<Vec<Employee>>, ApiError> {
    Ok(Json(state.services.employees.list(identity.tenant).await?))
}

pub async fn get_employee(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Json<Employee>, ApiError> {
    state
        .services
        .employees
        .find(identity.tenant, EntityId::from(id))
        .await?
        .map(Json)
        .ok_or_else(not_found)
}

pub async fn terminate_employee(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(body): Json<TerminateEmployee>,
) -> Result<Json<Employee>, ApiError> {
    let ctx = identity.audit_ctx();
    let Some(mut employee) = state
        .services
        .employees
        .find(identity.tenant, EntityId::from(id))
        .await?
    else {
        return Err(not_found());
    };
    employee.terminate(body.on, &ctx)?;
    state.services.employees.update(&employee).await?;
    Ok(Json(employee))
}

async fn ensure_person_exists(
    state: &AppState,
    identity: &Identity,
    person_id: EntityId,
) -> Result<(), ApiError> {
    if state
        .services
        .people
        .find(identity.tenant, person_id)
        .await?
        .is_none()
    {
        return Err(DomainError::validation("person does not exist in this tenant").into());
    }
    Ok(())
}
