use sqlx::sqlite::SqlitePool;

/// Backend selected from the connection string scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    Postgres,
}

impl Backend {
    pub fn from_url(database_url: &str) -> anyhow::Result<Self> {
        if database_url.starts_with("sqlite:") {
            Ok(Backend::Sqlite)
        } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
            Ok(Backend::Postgres)
        } else {
            Err(anyhow::anyhow!(
                "Unsupported database url '{}': expected sqlite: or postgres://",
                database_url
            ))
        }
    }
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS country (
        country_id INTEGER PRIMARY KEY AUTOINCREMENT,
        country TEXT NOT NULL,
        last_update DATETIME DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS city (
        city_id INTEGER PRIMARY KEY AUTOINCREMENT,
        city TEXT NOT NULL,
        country_id INTEGER NOT NULL REFERENCES country(country_id),
        last_update DATETIME DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS address (
        address_id INTEGER PRIMARY KEY AUTOINCREMENT,
        address TEXT NOT NULL,
        district TEXT,
        city_id INTEGER NOT NULL REFERENCES city(city_id),
        postal_code TEXT,
        phone TEXT,
        last_update DATETIME DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS customer (
        customer_id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT,
        address_id INTEGER NOT NULL REFERENCES address(address_id),
        active BOOLEAN DEFAULT true,
        create_date DATETIME DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS actor (
        actor_id INTEGER PRIMARY KEY AUTOINCREMENT,
        first_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        last_update DATETIME DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS category (
        category_id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        last_update DATETIME DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS film (
        film_id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        release_year INTEGER,
        rental_rate REAL NOT NULL DEFAULT 4.99,
        length INTEGER,
        rating TEXT DEFAULT 'G',
        last_update DATETIME DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS film_actor (
        actor_id INTEGER NOT NULL REFERENCES actor(actor_id),
        film_id INTEGER NOT NULL REFERENCES film(film_id),
        PRIMARY KEY (actor_id, film_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS film_category (
        film_id INTEGER NOT NULL REFERENCES film(film_id),
        category_id INTEGER NOT NULL REFERENCES category(category_id),
        PRIMARY KEY (film_id, category_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS inventory (
        inventory_id INTEGER PRIMARY KEY AUTOINCREMENT,
        film_id INTEGER NOT NULL REFERENCES film(film_id),
        store_id INTEGER NOT NULL,
        last_update DATETIME DEFAULT CURRENT_TIMESTAMP
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rental (
        rental_id INTEGER PRIMARY KEY AUTOINCREMENT,
        rental_date DATETIME NOT NULL,
        inventory_id INTEGER NOT NULL REFERENCES inventory(inventory_id),
        customer_id INTEGER NOT NULL REFERENCES customer(customer_id),
        return_date DATETIME
    )
    "#,
];

/// Create the demo rental schema and seed it when empty
pub async fn setup(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }

    seed_sample_data(pool).await
}

async fn seed_sample_data(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let film_count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM film").fetch_one(pool).await?;

    if film_count.0 > 0 {
        // Data already seeded
        return Ok(());
    }

    let mut transaction = pool.begin().await?;

    let countries = [
        ("Spain", ["Madrid", "Sevilla", "Valencia"]),
        ("Mexico", ["Guadalajara", "Monterrey", "Puebla"]),
        ("Argentina", ["Rosario", "Cordoba", "Mendoza"]),
        ("Japan", ["Osaka", "Kyoto", "Sapporo"]),
        ("Canada", ["Toronto", "Calgary", "Halifax"]),
        ("India", ["Pune", "Jaipur", "Kochi"]),
        ("Brazil", ["Recife", "Curitiba", "Salvador"]),
        ("Italy", ["Torino", "Bologna", "Napoli"]),
        ("Chile", ["Valparaiso", "Temuco", "Arica"]),
        ("France", ["Lyon", "Nantes", "Lille"]),
        ("Germany", ["Bremen", "Leipzig", "Essen"]),
        ("Peru", ["Cusco", "Arequipa", "Trujillo"]),
    ];

    let mut city_count = 0_i64;
    for (country_index, (country, cities)) in countries.iter().enumerate() {
        sqlx::query("INSERT INTO country (country) VALUES (?)")
            .bind(*country)
            .execute(&mut *transaction)
            .await?;

        for city in cities {
            sqlx::query("INSERT INTO city (city, country_id) VALUES (?, ?)")
                .bind(*city)
                .bind(country_index as i64 + 1)
                .execute(&mut *transaction)
                .await?;
            city_count += 1;
        }
    }

    let first_names = [
        "Mary", "Patricia", "Linda", "Barbara", "Elizabeth", "Jennifer", "Maria", "Susan",
        "Carlos", "Lucia", "Hiroshi", "Priya", "Mateo", "Sofia", "Pierre", "Greta",
    ];
    let last_names = [
        "Smith", "Johnson", "Williams", "Jones", "Garcia", "Lopez", "Tanaka", "Sharma",
        "Rossi", "Dubois", "Muller", "Silva", "Quispe", "Martin", "Brown", "Davis",
    ];

    // 300 customers, one address each, spread unevenly over cities
    for index in 0..300_i64 {
        let city_id = (index * index) % city_count + 1;
        sqlx::query("INSERT INTO address (address, district, city_id, postal_code, phone) VALUES (?, ?, ?, ?, ?)")
            .bind(format!("{} Main Street", 100 + index))
            .bind(format!("District {}", index % 7))
            .bind(city_id)
            .bind(format!("{:05}", 10000 + index * 37))
            .bind(format!("555-{:04}", index))
            .execute(&mut *transaction)
            .await?;

        let first = first_names[index as usize % first_names.len()];
        let last = last_names[(index as usize / 3) % last_names.len()];
        sqlx::query("INSERT INTO customer (first_name, last_name, email, address_id, active) VALUES (?, ?, ?, ?, ?)")
            .bind(first.to_uppercase())
            .bind(last.to_uppercase())
            .bind(format!("{}.{}{}@sakilacustomer.org", first.to_lowercase(), last.to_lowercase(), index))
            .bind(index + 1)
            .bind(index % 11 != 0)
            .execute(&mut *transaction)
            .await?;
    }

    let actor_last_names = [
        "Guiness", "Wahlberg", "Chase", "Davis", "Lollobrigida", "Nicholson", "Mostel",
        "Johansson", "Swank", "Gable", "Cage", "Berry", "Wood", "Bergen", "Olivier",
        "Costner", "Voight", "Torn", "Hoffman", "Peck", "Kilmer", "Allen", "Tracy",
    ];
    for index in 0..120 {
        sqlx::query("INSERT INTO actor (first_name, last_name) VALUES (?, ?)")
            .bind(first_names[index % first_names.len()].to_uppercase())
            .bind(actor_last_names[(index * 7) % actor_last_names.len()].to_uppercase())
            .execute(&mut *transaction)
            .await?;
    }

    let categories = [
        "Action", "Animation", "Children", "Classics", "Comedy", "Documentary", "Drama",
        "Family", "Foreign", "Games", "Horror", "Music", "New", "Sci-Fi", "Sports", "Travel",
    ];
    for category in categories {
        sqlx::query("INSERT INTO category (name) VALUES (?)")
            .bind(category)
            .execute(&mut *transaction)
            .await?;
    }

    let ratings = ["G", "PG", "PG-13", "R", "NC-17"];
    let adjectives = [
        "Academy", "Ace", "Adaptation", "Affair", "African", "Agent", "Airplane", "Alabama",
        "Alamo", "Alaska", "Ali", "Alien", "Amadeus", "Angels", "Annie", "Apache",
    ];
    let nouns = [
        "Dinosaur", "Goldfinger", "Holes", "Prejudice", "Egg", "Truman", "Sierra", "Devil",
        "Fiction", "Gables", "Forever", "Center", "Holy", "Life", "Identity", "Wedding",
    ];

    // 200 films, each in one category with three actors and 1-4 copies
    let mut inventory_count = 0_i64;
    for index in 0..200_usize {
        let film_id = index as i64 + 1;
        sqlx::query("INSERT INTO film (title, description, release_year, rental_rate, length, rating) VALUES (?, ?, ?, ?, ?, ?)")
            .bind(format!(
                "{} {}",
                adjectives[index % adjectives.len()].to_uppercase(),
                nouns[(index / adjectives.len() + index) % nouns.len()].to_uppercase()
            ))
            .bind(format!("A thoughtful story number {}", index + 1))
            .bind(2006_i64)
            .bind([0.99, 2.99, 4.99][index % 3])
            .bind(46 + (index as i64 * 13) % 140)
            .bind(ratings[(index * 3 + index / 7) % ratings.len()])
            .execute(&mut *transaction)
            .await?;

        sqlx::query("INSERT INTO film_category (film_id, category_id) VALUES (?, ?)")
            .bind(film_id)
            .bind(((index * index + 3) % categories.len()) as i64 + 1)
            .execute(&mut *transaction)
            .await?;

        for offset in 0..3_usize {
            sqlx::query("INSERT OR IGNORE INTO film_actor (actor_id, film_id) VALUES (?, ?)")
                .bind(((index * 5 + offset * 41) % 120) as i64 + 1)
                .bind(film_id)
                .execute(&mut *transaction)
                .await?;
        }

        for copy in 0..(index % 4 + 1) {
            sqlx::query("INSERT INTO inventory (film_id, store_id) VALUES (?, ?)")
                .bind(film_id)
                .bind((copy % 2) as i64 + 1)
                .execute(&mut *transaction)
                .await?;
            inventory_count += 1;
        }
    }

    // 2000 rentals between May 2005 and February 2006
    let months = [
        "2005-05", "2005-06", "2005-07", "2005-08", "2005-09", "2005-10", "2005-11",
        "2005-12", "2006-01", "2006-02",
    ];
    for index in 0..2000_i64 {
        let month = months[((index * index) % 97 % months.len() as i64) as usize];
        let day = index % 28 + 1;
        let rental_date = format!("{}-{:02} {:02}:{:02}:00", month, day, index % 24, index % 60);
        sqlx::query("INSERT INTO rental (rental_date, inventory_id, customer_id, return_date) VALUES (?, ?, ?, ?)")
            .bind(&rental_date)
            .bind((index * 7) % inventory_count + 1)
            .bind((index * 13) % 300 + 1)
            .bind((index % 9 != 0).then(|| format!("{}-{:02} 12:00:00", month, (day + 3).min(28))))
            .execute(&mut *transaction)
            .await?;
    }

    transaction.commit().await?;

    tracing::info!(
        countries = countries.len(),
        customers = 300,
        films = 200,
        rentals = 2000,
        "demo data seeded"
    );
    Ok(())
}
