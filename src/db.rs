//! Database schema and operations

use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

use crate::catalog::Catalog;
use crate::models::{Schematic, TypeId, TypeInfo};

/// Pin types that hold goods, with their capacity in m3.
const DEFAULT_CAPACITIES: &[(TypeId, f64)] = &[
    (2544, 10000.0), // Launchpad
    (2524, 500.0),   // Command Center
];

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Item types with their unit volume
        CREATE TABLE IF NOT EXISTS types (
            type_id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            volume REAL NOT NULL DEFAULT 0
        );

        -- Factory recipes (one input, one output)
        CREATE TABLE IF NOT EXISTS planetSchematics (
            schematic_id INTEGER PRIMARY KEY,
            output_typeid INTEGER NOT NULL,
            cycle_time INTEGER NOT NULL,
            output_value INTEGER NOT NULL,
            input_typeid INTEGER NOT NULL,
            input_value INTEGER NOT NULL
        );

        -- Storage capacity per pin type
        CREATE TABLE IF NOT EXISTS pin_capacities (
            type_id INTEGER PRIMARY KEY,
            capacity REAL NOT NULL
        );
        "#,
    )?;

    for (type_id, capacity) in DEFAULT_CAPACITIES {
        conn.execute(
            "INSERT OR IGNORE INTO pin_capacities (type_id, capacity) VALUES (?1, ?2)",
            (type_id, capacity),
        )?;
    }
    Ok(())
}

/// Insert or replace an item type
pub fn upsert_type(conn: &Connection, info: &TypeInfo) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO types (type_id, name, volume) VALUES (?1, ?2, ?3)",
        (info.type_id, &info.name, info.volume),
    )?;
    Ok(())
}

/// Insert or replace a schematic
pub fn upsert_schematic(conn: &Connection, schematic: &Schematic) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO planetSchematics
             (schematic_id, output_typeid, cycle_time, output_value, input_typeid, input_value)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        (
            schematic.schematic_id,
            schematic.output_type_id,
            schematic.cycle_time,
            schematic.output_quantity,
            schematic.input_type_id,
            schematic.input_quantity,
        ),
    )?;
    Ok(())
}

/// Insert or replace a storage capacity
pub fn upsert_capacity(conn: &Connection, pin_type_id: TypeId, capacity: f64) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO pin_capacities (type_id, capacity) VALUES (?1, ?2)",
        (pin_type_id, capacity),
    )?;
    Ok(())
}

/// Clear types and schematics (capacities are kept)
pub fn clear_static_data(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        DELETE FROM planetSchematics;
        DELETE FROM types;
        "#,
    )?;
    Ok(())
}

fn schematic_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Schematic> {
    Ok(Schematic {
        schematic_id: row.get(0)?,
        output_type_id: row.get(1)?,
        cycle_time: row.get(2)?,
        output_quantity: row.get(3)?,
        input_type_id: row.get(4)?,
        input_quantity: row.get(5)?,
    })
}

/// Get a single schematic by id
pub fn get_schematic(conn: &Connection, schematic_id: i64) -> Result<Option<Schematic>> {
    let schematic = conn
        .query_row(
            "SELECT schematic_id, output_typeid, cycle_time, output_value, input_typeid, input_value
             FROM planetSchematics
             WHERE schematic_id = ?1",
            [schematic_id],
            schematic_from_row,
        )
        .optional()?;
    Ok(schematic)
}

/// List all schematics ordered by id
pub fn list_schematics(conn: &Connection) -> Result<Vec<Schematic>> {
    let mut stmt = conn.prepare(
        "SELECT schematic_id, output_typeid, cycle_time, output_value, input_typeid, input_value
         FROM planetSchematics
         ORDER BY schematic_id",
    )?;

    let rows = stmt.query_map([], schematic_from_row)?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// List all item types
pub fn list_types(conn: &Connection) -> Result<Vec<TypeInfo>> {
    let mut stmt = conn.prepare("SELECT type_id, name, volume FROM types ORDER BY type_id")?;

    let rows = stmt.query_map([], |row| {
        Ok(TypeInfo {
            type_id: row.get(0)?,
            name: row.get(1)?,
            volume: row.get(2)?,
        })
    })?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// List all storage capacities
pub fn list_capacities(conn: &Connection) -> Result<Vec<(TypeId, f64)>> {
    let mut stmt = conn.prepare("SELECT type_id, capacity FROM pin_capacities")?;
    let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;

    let mut results = Vec::new();
    for row in rows {
        results.push(row?);
    }
    Ok(results)
}

/// Read everything the simulator needs into memory
pub fn load_catalog(conn: &Connection) -> Result<Catalog> {
    let catalog = Catalog::new(list_types(conn)?, list_schematics(conn)?, list_capacities(conn)?);
    tracing::info!(
        types = catalog.type_count(),
        schematics = catalog.schematic_count(),
        "loaded static data"
    );
    Ok(catalog)
}
