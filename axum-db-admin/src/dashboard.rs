//! Dashboard statistics from canned queries
//!
//! Canned queries are server-controlled `.sql` files addressed by logical
//! name. User input only ever reaches them through the file name normalizer.

use include_dir::{include_dir, Dir};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use crate::database::{DatabaseError, DatabaseProvider};
use crate::names::{normalize_sql_filename, SqlFileName};
use crate::schema::{DashboardView, NamedResult, QueryResult};

// Embed the canned queries at compile time
static EMBEDDED_QUERIES: Dir = include_dir!("$CARGO_MANIFEST_DIR/sql");

/// Chart datasets shown on the dashboard: view key and canned query
pub const DASHBOARD_CHARTS: &[(&str, &str)] = &[
    ("filmsByRating", "stat_peliculas_por_rating.sql"),
    ("actorsByInitial", "stat_actores_por_letra.sql"),
    ("filmsByCategory", "stat_peliculas_por_categoria.sql"),
    ("rentalsByMonth", "stat_alquileres_por_mes.sql"),
    ("customersByCountry", "stat_clientes_por_pais.sql"),
    ("mostRentedFilms", "stat_peliculas_mas_alquiladas.sql"),
];

pub const TOTAL_CUSTOMERS_QUERY: &str = "stat_clientes.sql";
pub const TOTAL_COUNTRIES_QUERY: &str = "stat_paises.sql";
pub const TOTAL_FILMS_QUERY: &str = "stat_peliculas.sql";

/// Where canned query files are read from
#[derive(Debug, Clone, Default)]
pub enum CannedQueries {
    /// The `sql/` directory compiled into the crate
    #[default]
    Embedded,

    /// A directory on disk, read at request time
    Directory(PathBuf),
}

impl CannedQueries {
    /// Use `directory` when given, the embedded files otherwise
    pub fn from_directory(directory: Option<PathBuf>) -> Self {
        directory.map_or(CannedQueries::Embedded, CannedQueries::Directory)
    }

    /// Read the SQL text of a canned query
    pub async fn load(&self, file: &SqlFileName) -> io::Result<String> {
        match self {
            CannedQueries::Embedded => {
                let embedded = EMBEDDED_QUERIES.get_file(file.as_str()).ok_or_else(|| {
                    io::Error::new(io::ErrorKind::NotFound, format!("no canned query named {}", file))
                })?;

                embedded
                    .contents_utf8()
                    .map(str::to_string)
                    .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "canned query is not UTF-8"))
            }
            CannedQueries::Directory(directory) => tokio::fs::read_to_string(directory.join(file.as_str())).await,
        }
    }
}

/// Pull a single count out of a COUNT-style result
///
/// Returns the first value of the first row that is numeric or parses as an
/// integer, whatever its column is called. Anything else gives 0.
pub fn extract_scalar_total(result: &QueryResult) -> i64 {
    match result {
        QueryResult::Rows { rows, .. } => rows
            .first()
            .and_then(|row| row.iter().find_map(|value| value.as_integer()))
            .unwrap_or(0),
        QueryResult::Command { .. } => 0,
    }
}

/// Runs canned queries against the configured database
pub struct Dashboard<DB: DatabaseProvider> {
    database: Arc<DB>,
    queries: CannedQueries,
}

impl<DB: DatabaseProvider> Dashboard<DB> {
    pub fn new(database: Arc<DB>, queries: CannedQueries) -> Self {
        Self { database, queries }
    }

    /// Load, trim and execute a canned query
    ///
    /// Load failures and execution failures both come back as
    /// [`DatabaseError::ResourceLoad`].
    pub async fn run_named_query(&self, filename: &str) -> Result<QueryResult, DatabaseError> {
        let file = normalize_sql_filename(filename);

        let sql = self
            .queries
            .load(&file)
            .await
            .map_err(|error| DatabaseError::ResourceLoad {
                file: file.to_string(),
                detail: error.to_string(),
            })?;

        self.database
            .execute(sql.trim())
            .await
            .map_err(|error| DatabaseError::ResourceLoad {
                file: file.to_string(),
                detail: error.to_string(),
            })
    }

    /// Build the dashboard view
    ///
    /// Stops at the first failing query; what was loaded before it is kept and
    /// the failure becomes the view's error banner.
    pub async fn load(&self) -> DashboardView {
        let mut view = DashboardView::default();

        if let Err(error) = self.fill(&mut view).await {
            tracing::error!(error = %error, "failed to load the dashboard");
            view.error = Some(error.to_string());
        }

        view
    }

    async fn fill(&self, view: &mut DashboardView) -> Result<(), DatabaseError> {
        for (key, file) in DASHBOARD_CHARTS {
            let result = self.run_named_query(file).await?;
            view.charts.push(NamedResult {
                key: key.to_string(),
                file: file.to_string(),
                result,
            });
        }

        view.total_customers = Some(extract_scalar_total(
            &self.run_named_query(TOTAL_CUSTOMERS_QUERY).await?,
        ));
        view.total_countries = Some(extract_scalar_total(
            &self.run_named_query(TOTAL_COUNTRIES_QUERY).await?,
        ));
        view.total_films = Some(extract_scalar_total(
            &self.run_named_query(TOTAL_FILMS_QUERY).await?,
        ));

        Ok(())
    }
}
