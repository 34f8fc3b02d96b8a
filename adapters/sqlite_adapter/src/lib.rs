use chrono::SecondsFormat;
use postgeo_core::continent::Continent;
use postgeo_core::domain::{CountryCode, Label, LocationHints, Post, PostFields};
use postgeo_core::ports::{PostRepository, Result};
use postgeo_core::utils::parse_timestamp;
use rusqlite::{params, Connection, Row};
use tracing::debug;

/// SQLite implementation of the PostRepository trait
pub struct SqlitePostRepository {
    db_path: String,
}

impl SqlitePostRepository {
    /// Creates a new SqlitePostRepository with the given database path
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    fn connect(&self) -> Result<Connection> {
        let conn = Connection::open(&self.db_path)?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                position INTEGER PRIMARY KEY,
                text TEXT NOT NULL,
                author_name TEXT NOT NULL,
                author_handle TEXT NOT NULL,
                hashtags TEXT NOT NULL,
                created_at TEXT NOT NULL,
                country_code TEXT,
                continent TEXT,
                label TEXT NOT NULL,
                place_country_code TEXT,
                user_location TEXT
            );
            "#,
        )?;
        Ok(conn)
    }
}

/// Column values as stored, before validation
struct StoredRow {
    text: String,
    author_name: String,
    author_handle: String,
    hashtags: String,
    created_at: String,
    country_code: Option<String>,
    continent: Option<String>,
    label: String,
    place_country_code: Option<String>,
    user_location: Option<String>,
}

impl StoredRow {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            text: row.get(0)?,
            author_name: row.get(1)?,
            author_handle: row.get(2)?,
            hashtags: row.get(3)?,
            created_at: row.get(4)?,
            country_code: row.get(5)?,
            continent: row.get(6)?,
            label: row.get(7)?,
            place_country_code: row.get(8)?,
            user_location: row.get(9)?,
        })
    }

    fn into_post(self) -> Result<Post> {
        let hashtags: Vec<String> = serde_json::from_str(&self.hashtags)?;
        let created_at = parse_timestamp(&self.created_at)?;
        let country_code = match self.country_code {
            Some(raw) => Some(CountryCode::try_from(raw)?),
            None => None,
        };
        let continent = match self.continent {
            Some(name) => Some(name.parse::<Continent>()?),
            None => None,
        };
        let label: Label = self.label.parse()?;

        Ok(Post::restore(PostFields {
            text: self.text,
            author_name: self.author_name,
            author_handle: self.author_handle,
            hashtags,
            created_at,
            country_code,
            continent,
            label,
            hints: LocationHints {
                place_country_code: self.place_country_code,
                user_location: self.user_location,
            },
        }))
    }
}

impl PostRepository for SqlitePostRepository {
    fn save_posts(&self, posts: &[Post]) -> Result<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM posts", [])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO posts (
                    position, text, author_name, author_handle, hashtags, created_at,
                    country_code, continent, label, place_country_code, user_location
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )?;
            for (position, post) in posts.iter().enumerate() {
                stmt.execute(params![
                    position as i64,
                    post.text(),
                    post.author_name(),
                    post.author_handle(),
                    serde_json::to_string(post.hashtags())?,
                    post.created_at().to_rfc3339_opts(SecondsFormat::Secs, true),
                    post.country_code().map(|c| c.as_str()),
                    post.continent().map(|c| c.name()),
                    post.label().as_str(),
                    post.hints().place_country_code.as_deref(),
                    post.hints().user_location.as_deref(),
                ])?;
            }
        }
        tx.commit()?;
        debug!(count = posts.len(), path = %self.db_path, "saved posts");
        Ok(())
    }

    fn load_posts(&self) -> Result<Vec<Post>> {
        let conn = self.connect()?;

        // Ordered by insertion position so the collection order survives a round trip
        let mut stmt = conn.prepare(
            r#"
            SELECT
                text, author_name, author_handle, hashtags, created_at,
                country_code, continent, label, place_country_code, user_location
            FROM posts
            ORDER BY position ASC
            "#,
        )?;

        let rows = stmt
            .query_map([], |row: &Row| StoredRow::from_row(row))?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        let posts = rows
            .into_iter()
            .map(StoredRow::into_post)
            .collect::<Result<Vec<_>>>()?;
        debug!(count = posts.len(), path = %self.db_path, "loaded posts");
        Ok(posts)
    }
}
