//! PostgreSQL store: one table per entity, SQL from `crate::sql::builder`.

use crate::error::AppError;
use crate::model::{Adopter, AdopterFilter, Contact, Pet, PetFilter, ShelterFilter, ShelterRef, Shelter};
use crate::sql::{self, ColumnDef, PgBindValue, QueryBuf, TableDef};
use crate::store::{Detached, Entity, Store};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::marker::PhantomData;
use std::str::FromStr;

/// Mapping between an entity and its table row.
pub trait PgEntity: Entity + Sized {
    const TABLE: TableDef;

    /// Every non-key column with its value, in any order.
    fn to_columns(&self) -> Vec<(&'static str, PgBindValue)>;

    fn filter_columns(filter: &Self::Filter) -> Vec<(&'static str, PgBindValue)>;

    fn from_row(row: &PgRow) -> Result<Self, AppError>;
}

pub struct PgStore<E> {
    pool: PgPool,
    schema: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: PgEntity> PgStore<E> {
    pub fn new(pool: PgPool, schema: &str) -> Self {
        PgStore {
            pool,
            schema: schema.to_string(),
            _entity: PhantomData,
        }
    }

    async fn fetch_many(&self, q: QueryBuf) -> Result<Vec<E>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(E::from_row).collect()
    }
}

#[async_trait]
impl<E: PgEntity> Store<E> for PgStore<E> {
    async fn find_all(&self) -> Result<Vec<E>, AppError> {
        self.fetch_many(sql::select_all(&self.schema, &E::TABLE)).await
    }

    async fn find_by_id(&self, id: i64) -> Result<E, AppError> {
        let q = sql::select_by_id(&self.schema, &E::TABLE, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        match query.fetch_optional(&self.pool).await? {
            Some(row) => E::from_row(&row),
            None => Err(AppError::not_found(E::KIND, id)),
        }
    }

    async fn find_by(&self, filter: &E::Filter) -> Result<Vec<E>, AppError> {
        let filters = E::filter_columns(filter);
        self.fetch_many(sql::select_where(&self.schema, &E::TABLE, filters)).await
    }

    async fn save(&self, entity: E) -> Result<E, AppError> {
        let values = entity.to_columns();
        let Some(id) = entity.id() else {
            let q = sql::insert(&self.schema, &E::TABLE, values);
            tracing::debug!(sql = %q.sql, params = ?q.params, "query");
            let mut query = sqlx::query(&q.sql);
            for p in q.params {
                query = query.bind(p);
            }
            let row = query.fetch_one(&self.pool).await.map_err(write_error)?;
            return E::from_row(&row);
        };

        // The sequence must stay at or above every stored id, or a later insert collides.
        let mut tx = self.pool.begin().await?;
        let lock = sql::lock_for_explicit_id(&self.schema, &E::TABLE);
        tracing::debug!(sql = %lock.sql, "query (tx)");
        sqlx::query(&lock.sql).execute(&mut *tx).await?;

        let q = sql::upsert(&self.schema, &E::TABLE, id, values);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let mut query = sqlx::query(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        let row = query.fetch_one(&mut *tx).await.map_err(write_error)?;
        let saved = E::from_row(&row)?;

        let q = sql::advance_id_sequence(&self.schema, &E::TABLE, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
        let mut query = sqlx::query(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        query.execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(saved)
    }

    async fn delete_by_id(&self, id: i64) -> Result<bool, AppError> {
        let q = sql::delete_by_id(&self.schema, &E::TABLE, id);
        tracing::debug!(sql = %q.sql, params = ?q.params, "query");
        let mut query = sqlx::query(&q.sql);
        for p in q.params {
            query = query.bind(p);
        }
        Ok(query.fetch_optional(&self.pool).await?.is_some())
    }
}

const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Column holding the shelter reference in the adopters and pets tables.
const SHELTER_COLUMN: &str = "shelter_id";

/// A foreign key violation on write means the referenced shelter is gone.
fn write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db) = &e {
        if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) {
            return AppError::Validation(format!("referenced shelter does not exist ({})", db.message()));
        }
    }
    AppError::Db(e)
}

async fn execute_tx(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    q: QueryBuf,
) -> Result<sqlx::postgres::PgQueryResult, AppError> {
    tracing::debug!(sql = %q.sql, params = ?q.params, "query (tx)");
    let mut query = sqlx::query(&q.sql);
    for p in q.params {
        query = query.bind(p);
    }
    Ok(query.execute(&mut **tx).await?)
}

/// Detach adopters and pets from a shelter and delete it in one transaction.
/// `None` when no shelter has this id.
pub async fn delete_shelter_detached(pool: &PgPool, schema: &str, id: i64) -> Result<Option<Detached>, AppError> {
    let mut tx = pool.begin().await?;
    let adopters = execute_tx(&mut tx, sql::clear_reference(schema, &Adopter::TABLE, SHELTER_COLUMN, id)).await?;
    let pets = execute_tx(&mut tx, sql::clear_reference(schema, &Pet::TABLE, SHELTER_COLUMN, id)).await?;
    let deleted = execute_tx(&mut tx, sql::delete_by_id(schema, &Shelter::TABLE, id)).await?;
    if deleted.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(None);
    }
    tx.commit().await?;
    Ok(Some(Detached {
        adopters: adopters.rows_affected(),
        pets: pets.rows_affected(),
    }))
}

/// Parse a stored enum name. A bad value means the table was written outside this service.
fn stored_enum<T: FromStr<Err = AppError>>(column: &str, raw: Option<String>) -> Result<Option<T>, AppError> {
    raw.map(|s| {
        s.parse()
            .map_err(|_| AppError::Storage(format!("column {} holds unknown value {:?}", column, s)))
    })
    .transpose()
}

fn shelter_ref(row: &PgRow) -> Result<Option<ShelterRef>, AppError> {
    let id: Option<i64> = row.try_get(SHELTER_COLUMN)?;
    Ok(id.map(ShelterRef::new))
}

macro_rules! contact_column_defs {
    ($($extra:expr),* $(,)?) => {
        &[
            ColumnDef { name: "name", pg_type: "text" },
            ColumnDef { name: "address_line1", pg_type: "text" },
            ColumnDef { name: "address_line2", pg_type: "text" },
            ColumnDef { name: "city", pg_type: "text" },
            ColumnDef { name: "state", pg_type: "text" },
            ColumnDef { name: "zip", pg_type: "text" },
            ColumnDef { name: "phone_number", pg_type: "text" },
            ColumnDef { name: "email", pg_type: "text" },
            ColumnDef { name: "image_url", pg_type: "text" },
            $($extra),*
        ]
    };
}

fn contact_columns(c: &Contact) -> Vec<(&'static str, PgBindValue)> {
    vec![
        ("name", c.name.clone().into()),
        ("address_line1", c.address_line1.clone().into()),
        ("address_line2", c.address_line2.clone().into()),
        ("city", c.city.clone().into()),
        ("state", c.state.clone().into()),
        ("zip", c.zip.clone().into()),
        ("phone_number", c.phone_number.clone().into()),
        ("email", c.email.clone().into()),
        ("image_url", c.image_url.clone().into()),
    ]
}

fn contact_from_row(row: &PgRow) -> Result<Contact, AppError> {
    Ok(Contact {
        name: row.try_get("name")?,
        address_line1: row.try_get("address_line1")?,
        address_line2: row.try_get("address_line2")?,
        city: row.try_get("city")?,
        state: row.try_get("state")?,
        zip: row.try_get("zip")?,
        phone_number: row.try_get("phone_number")?,
        email: row.try_get("email")?,
        image_url: row.try_get("image_url")?,
    })
}

impl PgEntity for Adopter {
    const TABLE: TableDef = TableDef {
        name: "adopters",
        columns: contact_column_defs![
            ColumnDef { name: "preferred_pet_type", pg_type: "text" },
            ColumnDef { name: "adoption_status", pg_type: "text" },
            ColumnDef { name: "notes", pg_type: "text" },
            ColumnDef { name: "shelter_id", pg_type: "bigint" },
        ],
    };

    fn to_columns(&self) -> Vec<(&'static str, PgBindValue)> {
        let mut cols = contact_columns(&self.contact);
        cols.push(("preferred_pet_type", self.preferred_pet_type.map(|t| t.as_str()).into()));
        cols.push(("adoption_status", self.adoption_status.map(|s| s.as_str()).into()));
        cols.push(("notes", self.notes.clone().into()));
        cols.push(("shelter_id", self.shelter_id().into()));
        cols
    }

    fn filter_columns(filter: &AdopterFilter) -> Vec<(&'static str, PgBindValue)> {
        match filter {
            AdopterFilter::NameZip { name, zip } => {
                vec![("name", name.as_str().into()), ("zip", zip.as_str().into())]
            }
            AdopterFilter::PreferredPetTypeZip { pet_type, zip } => vec![
                ("preferred_pet_type", pet_type.as_str().into()),
                ("zip", zip.as_str().into()),
            ],
            AdopterFilter::Shelter(id) => vec![("shelter_id", (*id).into())],
        }
    }

    fn from_row(row: &PgRow) -> Result<Self, AppError> {
        Ok(Adopter {
            id: Some(row.try_get("id")?),
            contact: contact_from_row(row)?,
            preferred_pet_type: stored_enum("preferred_pet_type", row.try_get("preferred_pet_type")?)?,
            adoption_status: stored_enum("adoption_status", row.try_get("adoption_status")?)?,
            notes: row.try_get("notes")?,
            shelter_model: shelter_ref(row)?,
        })
    }
}

impl PgEntity for Shelter {
    const TABLE: TableDef = TableDef {
        name: "shelters",
        columns: contact_column_defs![
            ColumnDef { name: "website", pg_type: "text" },
            ColumnDef { name: "notes", pg_type: "text" },
        ],
    };

    fn to_columns(&self) -> Vec<(&'static str, PgBindValue)> {
        let mut cols = contact_columns(&self.contact);
        cols.push(("website", self.website.clone().into()));
        cols.push(("notes", self.notes.clone().into()));
        cols
    }

    fn filter_columns(filter: &ShelterFilter) -> Vec<(&'static str, PgBindValue)> {
        match filter {
            ShelterFilter::NameZip { name, zip } => {
                vec![("name", name.as_str().into()), ("zip", zip.as_str().into())]
            }
        }
    }

    fn from_row(row: &PgRow) -> Result<Self, AppError> {
        Ok(Shelter {
            id: Some(row.try_get("id")?),
            contact: contact_from_row(row)?,
            website: row.try_get("website")?,
            notes: row.try_get("notes")?,
        })
    }
}

impl PgEntity for Pet {
    const TABLE: TableDef = TableDef {
        name: "pets",
        columns: &[
            ColumnDef { name: "name", pg_type: "text" },
            ColumnDef { name: "pet_type", pg_type: "text" },
            ColumnDef { name: "breed", pg_type: "text" },
            ColumnDef { name: "age", pg_type: "integer" },
            ColumnDef { name: "notes", pg_type: "text" },
            ColumnDef { name: "image_url", pg_type: "text" },
            ColumnDef { name: "shelter_id", pg_type: "bigint" },
        ],
    };

    fn to_columns(&self) -> Vec<(&'static str, PgBindValue)> {
        vec![
            ("name", self.name.clone().into()),
            ("pet_type", self.pet_type.as_str().into()),
            ("breed", self.breed.clone().into()),
            ("age", self.age.into()),
            ("notes", self.notes.clone().into()),
            ("image_url", self.image_url.clone().into()),
            ("shelter_id", self.shelter_id().into()),
        ]
    }

    fn filter_columns(filter: &PetFilter) -> Vec<(&'static str, PgBindValue)> {
        match filter {
            PetFilter::PetType(t) => vec![("pet_type", t.as_str().into())],
            PetFilter::Shelter(id) => vec![("shelter_id", (*id).into())],
        }
    }

    fn from_row(row: &PgRow) -> Result<Self, AppError> {
        let pet_type: String = row.try_get("pet_type")?;
        Ok(Pet {
            id: Some(row.try_get("id")?),
            name: row.try_get("name")?,
            pet_type: stored_enum("pet_type", Some(pet_type))?
                .ok_or_else(|| AppError::Storage("pets.pet_type is null".into()))?,
            breed: row.try_get("breed")?,
            age: row.try_get("age")?,
            notes: row.try_get("notes")?,
            image_url: row.try_get("image_url")?,
            shelter_model: shelter_ref(row)?,
        })
    }
}
