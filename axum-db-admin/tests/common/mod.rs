#![allow(dead_code)]

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Single-connection in-memory database; every connection to `:memory:` is a
/// fresh database, so the pool must never open a second one
pub async fn memory_pool() -> SqlitePool {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .unwrap()
}

/// `items` with ids 1..=count
pub async fn create_items(pool: &SqlitePool, count: i64) {
    sqlx::query("CREATE TABLE items (id INTEGER PRIMARY KEY, label TEXT NOT NULL, price REAL)")
        .execute(pool)
        .await
        .unwrap();

    for id in 1..=count {
        sqlx::query("INSERT INTO items (id, label, price) VALUES (?, ?, ?)")
            .bind(id)
            .bind(format!("item {}", id))
            .bind(id as f64 * 1.5)
            .execute(pool)
            .await
            .unwrap();
    }
}

/// A trimmed rental-store schema, enough for every dashboard query
pub async fn create_rental_store(pool: &SqlitePool) {
    let script = r#"
        CREATE TABLE country (country_id INTEGER PRIMARY KEY, country TEXT NOT NULL);
        CREATE TABLE city (city_id INTEGER PRIMARY KEY, city TEXT NOT NULL, country_id INTEGER NOT NULL);
        CREATE TABLE address (address_id INTEGER PRIMARY KEY, address TEXT NOT NULL, city_id INTEGER NOT NULL);
        CREATE TABLE customer (customer_id INTEGER PRIMARY KEY, first_name TEXT, last_name TEXT, address_id INTEGER NOT NULL);
        CREATE TABLE actor (actor_id INTEGER PRIMARY KEY, first_name TEXT, last_name TEXT NOT NULL);
        CREATE TABLE category (category_id INTEGER PRIMARY KEY, name TEXT NOT NULL);
        CREATE TABLE film (film_id INTEGER PRIMARY KEY, title TEXT NOT NULL, rating TEXT);
        CREATE TABLE film_category (film_id INTEGER NOT NULL, category_id INTEGER NOT NULL);
        CREATE TABLE inventory (inventory_id INTEGER PRIMARY KEY, film_id INTEGER NOT NULL);
        CREATE TABLE rental (rental_id INTEGER PRIMARY KEY, rental_date DATETIME NOT NULL, inventory_id INTEGER NOT NULL);

        INSERT INTO country VALUES (1, 'Spain'), (2, 'Japan');
        INSERT INTO city VALUES (1, 'Sevilla', 1), (2, 'Osaka', 2);
        INSERT INTO address VALUES (1, 'Calle Sol 1', 1), (2, 'Calle Luna 2', 1), (3, 'Sakura 3', 2);
        INSERT INTO customer VALUES (1, 'MARY', 'SMITH', 1), (2, 'LUCIA', 'GARCIA', 2), (3, 'HIROSHI', 'TANAKA', 3);
        INSERT INTO actor VALUES (1, 'PENELOPE', 'GUINESS'), (2, 'NICK', 'WAHLBERG'), (3, 'ED', 'GABLE');
        INSERT INTO category VALUES (1, 'Action'), (2, 'Comedy');
        INSERT INTO film VALUES (1, 'ACADEMY DINOSAUR', 'PG'), (2, 'ACE GOLDFINGER', 'G'), (3, 'ADAPTATION HOLES', 'PG'), (4, 'AFFAIR PREJUDICE', 'R');
        INSERT INTO film_category VALUES (1, 1), (2, 2), (3, 1), (4, 2);
        INSERT INTO inventory VALUES (1, 1), (2, 1), (3, 2);
        INSERT INTO rental VALUES (1, '2005-05-24 22:53:30', 1), (2, '2005-05-25 10:00:00', 2), (3, '2005-06-01 09:00:00', 3);
    "#;

    sqlx::raw_sql(script).execute(pool).await.unwrap();
}
