//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::users;

/// Database row for an account (queryable).
///
/// Every column is nullable because the credential table declares no
/// `NOT NULL` constraints.
#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserRow {
    pub id: Option<i32>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
    pub permission: Option<String>,
}

/// Database row for an account (insertable).
#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = users)]
pub struct NewUserRow<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub role: &'a str,
    pub permission: &'a str,
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::adapter::outbound::sqlite::database::connection::{establish, run_migrations};

    #[test]
    fn user_row_roundtrip_with_db() {
        let mut conn = establish(Path::new(":memory:")).unwrap();
        run_migrations(&mut conn).unwrap();

        let row = NewUserRow {
            username: "kim",
            password: "s3cret",
            role: "clerk",
            permission: "Read-only",
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .unwrap();

        let loaded: UserRow = users::table
            .filter(users::username.eq("kim"))
            .select(UserRow::as_select())
            .first(&mut conn)
            .unwrap();

        assert!(loaded.id.is_some());
        assert_eq!(loaded.password.as_deref(), Some("s3cret"));
        assert_eq!(loaded.role.as_deref(), Some("clerk"));
        assert_eq!(loaded.permission.as_deref(), Some("Read-only"));
    }

    #[test]
    fn username_is_unique() {
        let mut conn = establish(Path::new(":memory:")).unwrap();
        run_migrations(&mut conn).unwrap();

        let row = NewUserRow {
            username: "kim",
            password: "a",
            role: "clerk",
            permission: "Write",
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .unwrap();
        let second = diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn);

        assert!(second.is_err());
    }
}
