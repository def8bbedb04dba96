use quillnote_core::db::open_db_in_memory;
use quillnote_core::{NewUserRequest, SqliteUserRepository, UserService};
use rusqlite::Connection;

fn request(email: &str, username: &str, password: &str) -> NewUserRequest {
    NewUserRequest {
        email: email.to_string(),
        username: username.to_string(),
        password: password.to_string(),
    }
}

fn user_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn register_stores_hashed_credential_and_timestamp() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut service = UserService::new(SqliteUserRepository::try_new(&mut conn).unwrap());
        assert!(service.register_user(&request("ada@example.com", "ada_l", "analytical")));
    }

    let (hash, created_at): (String, i64) = conn
        .query_row(
            "SELECT password_hash, created_at FROM users WHERE username = 'ada_l';",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .unwrap();
    assert!(hash.starts_with("$argon2id$"));
    assert!(!hash.contains("analytical"));
    assert!(created_at > 0);
}

#[test]
fn duplicate_email_or_username_is_rejected_case_insensitively() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut service = UserService::new(SqliteUserRepository::try_new(&mut conn).unwrap());
        assert!(service.register_user(&request("ada@example.com", "ada_l", "pw-one")));
        assert!(!service.register_user(&request("ADA@example.com", "someone", "pw-two")));
        assert!(!service.register_user(&request("other@example.com", "Ada_L", "pw-three")));
        assert!(service.register_user(&request("grace@example.com", "grace", "pw-four")));
    }
    assert_eq!(user_count(&conn), 2);
}

#[test]
fn empty_password_fails_without_writing() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let mut service = UserService::new(SqliteUserRepository::try_new(&mut conn).unwrap());
        assert!(!service.register_user(&request("ada@example.com", "ada_l", "")));
    }
    assert_eq!(user_count(&conn), 0);
}

#[test]
fn verify_credentials_matches_only_the_right_password() {
    let mut conn = open_db_in_memory().unwrap();
    let mut service = UserService::new(SqliteUserRepository::try_new(&mut conn).unwrap());
    assert!(service.register_user(&request("ada@example.com", "ada_l", "analytical")));

    let user_id = service
        .verify_credentials("ADA_L", "analytical")
        .unwrap()
        .expect("credentials should match");
    assert!(user_id > 0);

    assert_eq!(service.verify_credentials("ada_l", "wrong").unwrap(), None);
    assert_eq!(service.verify_credentials("nobody", "analytical").unwrap(), None);
}
