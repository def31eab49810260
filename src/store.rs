//! SQLite persistence for pokemon records.
//!
//! The store owns a `sqlx::SqlitePool` configured with `create_if_missing`
//! and foreign keys enforced at the connection level, so the cascade from
//! `pokemon` to its three child tables actually fires. Inserts write the
//! root row and every child row inside one transaction; a failure anywhere
//! rolls the whole record back.

use std::path::Path;
use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::error::ScoutError;
use crate::models::{
    AbilityTag, DbStatistics, ExportFile, NewPokemon, PokemonRecord, PokemonRow, StatEntry,
    TypeCount, TypeTag,
};

const CREATE_TABLES: [&str; 4] = [
    r#"CREATE TABLE IF NOT EXISTS pokemon (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL UNIQUE,
        pokedex_number INTEGER NOT NULL,
        height INTEGER NOT NULL DEFAULT 0,
        weight INTEGER NOT NULL DEFAULT 0,
        base_experience INTEGER NOT NULL DEFAULT 0,
        sprite_url TEXT NOT NULL DEFAULT ''
    )"#,
    r#"CREATE TABLE IF NOT EXISTS pokemon_types (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        pokemon_id INTEGER NOT NULL REFERENCES pokemon(id) ON DELETE CASCADE,
        type_name TEXT NOT NULL,
        slot INTEGER NOT NULL DEFAULT 0
    )"#,
    r#"CREATE TABLE IF NOT EXISTS pokemon_abilities (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        pokemon_id INTEGER NOT NULL REFERENCES pokemon(id) ON DELETE CASCADE,
        ability_name TEXT NOT NULL,
        is_hidden INTEGER NOT NULL DEFAULT 0,
        slot INTEGER NOT NULL DEFAULT 0
    )"#,
    r#"CREATE TABLE IF NOT EXISTS pokemon_stats (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        pokemon_id INTEGER NOT NULL REFERENCES pokemon(id) ON DELETE CASCADE,
        stat_name TEXT NOT NULL,
        base_stat INTEGER NOT NULL,
        effort INTEGER NOT NULL DEFAULT 0
    )"#,
];

// children first, root last
const DROP_TABLES: [&str; 4] = [
    "DROP TABLE IF EXISTS pokemon_stats",
    "DROP TABLE IF EXISTS pokemon_abilities",
    "DROP TABLE IF EXISTS pokemon_types",
    "DROP TABLE IF EXISTS pokemon",
];

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    /// Open the database, creating the file if it does not exist yet.
    pub async fn connect(database_url: &str) -> Result<Self, ScoutError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        Ok(Self { pool })
    }

    /// Create any missing tables. Idempotent; safe to call on every start.
    pub async fn ensure_schema(&self) -> Result<(), ScoutError> {
        for stmt in CREATE_TABLES {
            sqlx::query(stmt).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Drop and recreate all four tables. This is the only way records are
    /// ever deleted.
    pub async fn reset(&self) -> Result<(), ScoutError> {
        let mut tx = self.pool.begin().await?;
        for stmt in DROP_TABLES.into_iter().chain(CREATE_TABLES) {
            sqlx::query(stmt).execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    /// Look a record up by its normalized (capitalized) display name.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<PokemonRecord>, ScoutError> {
        let row: Option<PokemonRow> = sqlx::query_as(
            "SELECT id, name, pokedex_number, height, weight, base_experience, sprite_url
             FROM pokemon WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.attach_children(row).await?)),
            None => Ok(None),
        }
    }

    /// Insert a sanitized record and all of its children as one unit.
    ///
    /// Rolls back entirely on any failure; a partial record is never
    /// visible to readers.
    pub async fn insert(&self, new: &NewPokemon) -> Result<PokemonRecord, ScoutError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "INSERT INTO pokemon (name, pokedex_number, height, weight, base_experience, sprite_url)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.name)
        .bind(new.pokedex_number)
        .bind(new.height)
        .bind(new.weight)
        .bind(new.base_experience)
        .bind(&new.sprite_url)
        .execute(&mut *tx)
        .await?;
        let pokemon_id = result.last_insert_rowid();

        for t in &new.types {
            sqlx::query("INSERT INTO pokemon_types (pokemon_id, type_name, slot) VALUES (?, ?, ?)")
                .bind(pokemon_id)
                .bind(&t.type_name)
                .bind(t.slot)
                .execute(&mut *tx)
                .await?;
        }
        for a in &new.abilities {
            sqlx::query(
                "INSERT INTO pokemon_abilities (pokemon_id, ability_name, is_hidden, slot)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(pokemon_id)
            .bind(&a.ability_name)
            .bind(a.is_hidden)
            .bind(a.slot)
            .execute(&mut *tx)
            .await?;
        }
        for s in &new.stats {
            sqlx::query(
                "INSERT INTO pokemon_stats (pokemon_id, stat_name, base_stat, effort)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(pokemon_id)
            .bind(&s.stat_name)
            .bind(s.base_stat)
            .bind(s.effort)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(PokemonRecord {
            id: pokemon_id,
            name: new.name.clone(),
            pokedex_number: new.pokedex_number,
            height: new.height,
            weight: new.weight,
            base_experience: new.base_experience,
            sprite_url: new.sprite_url.clone(),
            types: new.types.clone(),
            abilities: new.abilities.clone(),
            stats: new.stats.clone(),
        })
    }

    /// All records, ordered by catalog number, children attached.
    pub async fn list_all(&self) -> Result<Vec<PokemonRecord>, ScoutError> {
        let rows: Vec<PokemonRow> = sqlx::query_as(
            "SELECT id, name, pokedex_number, height, weight, base_experience, sprite_url
             FROM pokemon ORDER BY pokedex_number",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(self.attach_children(row).await?);
        }
        Ok(records)
    }

    /// Records carrying the given (capitalized) type name.
    pub async fn find_by_type(&self, type_name: &str) -> Result<Vec<PokemonRecord>, ScoutError> {
        let rows: Vec<PokemonRow> = sqlx::query_as(
            "SELECT p.id, p.name, p.pokedex_number, p.height, p.weight, p.base_experience, p.sprite_url
             FROM pokemon p
             JOIN pokemon_types t ON t.pokemon_id = p.id
             WHERE t.type_name = ?
             ORDER BY p.pokedex_number",
        )
        .bind(type_name)
        .fetch_all(&self.pool)
        .await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            records.push(self.attach_children(row).await?);
        }
        Ok(records)
    }

    pub async fn count(&self) -> Result<i64, ScoutError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pokemon")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Aggregates for the statistics view: total, per-type counts (most
    /// common first), and averages over the numeric fields.
    pub async fn statistics(&self) -> Result<DbStatistics, ScoutError> {
        let total = self.count().await?;

        let type_counts: Vec<TypeCount> = sqlx::query_as(
            "SELECT type_name, COUNT(*) AS count FROM pokemon_types
             GROUP BY type_name ORDER BY count DESC, type_name",
        )
        .fetch_all(&self.pool)
        .await?;

        let (avg_height, avg_weight, avg_base_experience): (f64, f64, f64) = sqlx::query_as(
            "SELECT COALESCE(AVG(height), 0.0), COALESCE(AVG(weight), 0.0),
                    COALESCE(AVG(base_experience), 0.0)
             FROM pokemon",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DbStatistics {
            total,
            type_counts,
            avg_height,
            avg_weight,
            avg_base_experience,
        })
    }

    /// Dump every record to `path` as pretty-printed JSON, preserving the
    /// API body field names. Returns the number of records written.
    pub async fn export_to_file(&self, path: &Path) -> Result<usize, ScoutError> {
        let pokemon = self.list_all().await?;
        let count = pokemon.len();
        let dump = ExportFile { count, pokemon };
        let json = serde_json::to_string_pretty(&dump)?;
        std::fs::write(path, json)?;
        Ok(count)
    }

    async fn attach_children(&self, row: PokemonRow) -> Result<PokemonRecord, ScoutError> {
        let types: Vec<TypeTag> =
            sqlx::query_as("SELECT type_name, slot FROM pokemon_types WHERE pokemon_id = ? ORDER BY id")
                .bind(row.id)
                .fetch_all(&self.pool)
                .await?;
        let abilities: Vec<AbilityTag> = sqlx::query_as(
            "SELECT ability_name, is_hidden, slot FROM pokemon_abilities
             WHERE pokemon_id = ? ORDER BY id",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;
        let stats: Vec<StatEntry> = sqlx::query_as(
            "SELECT stat_name, base_stat, effort FROM pokemon_stats
             WHERE pokemon_id = ? ORDER BY id",
        )
        .bind(row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(PokemonRecord::from_parts(row, types, abilities, stats))
    }
}
