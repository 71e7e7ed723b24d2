use std::collections::HashSet;

use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

use super::schema::{create_tables, HAND_COLUMNS};
use crate::rakeback::{adjusted_profit, recompute, StoredStreets};
use crate::record::{HandRecord, Position, PreflopScenario};

/// Settings key holding the rakeback percentage (0–100).
pub const RAKEBACK_KEY: &str = "rakeback_percentage";

pub struct HandStore {
    conn: Connection,
}

fn insert_sql(verb: &str) -> String {
    let placeholders = vec!["?"; HAND_COLUMNS.len()].join(", ");
    format!(
        "{} INTO hands ({}) VALUES ({})",
        verb,
        HAND_COLUMNS.join(", "),
        placeholders
    )
}

fn write_hand(conn: &Connection, sql: &str, r: &HandRecord) -> Result<usize> {
    conn.execute(
        sql,
        params![
            r.hand_id,
            r.stake,
            r.date_time,
            r.hero_position.as_str(),
            r.hero_cards,
            r.preflop_action,
            r.preflop_all,
            r.flop_action,
            r.flop_all,
            r.turn_action,
            r.turn_all,
            r.river_action,
            r.river_all,
            r.board_flop,
            r.board_turn,
            r.board_river,
            r.total_pot,
            r.rake,
            r.jackpot,
            r.hero_profit,
            r.hero_profit_with_rake,
            r.seats_info,
            r.imported_on,
            r.preflop_scenario.as_str(),
            r.had_rfi_opportunity,
            r.had_3bet_op,
            r.had_4bet_op,
            r.hero_contribution,
            r.adjusted_profit,
            r.paid_rake,
            r.hero_starting_stack,
        ],
    )
}

fn text(row: &Row, column: &str) -> Result<String> {
    Ok(row.get::<_, Option<String>>(column)?.unwrap_or_default())
}

fn real(row: &Row, column: &str) -> Result<f64> {
    Ok(row.get::<_, Option<f64>>(column)?.unwrap_or(0.0))
}

fn flag(row: &Row, column: &str) -> Result<u8> {
    Ok(row.get::<_, Option<u8>>(column)?.unwrap_or(0))
}

fn hand_from_row(row: &Row) -> Result<HandRecord> {
    let position = text(row, "hero_position")?;
    let scenario = text(row, "preflop_scenario")?;
    Ok(HandRecord {
        hand_id: row.get("hand_id")?,
        date_time: text(row, "date_time")?,
        stake: text(row, "stake")?,
        hero_position: position.parse().unwrap_or(Position::Unknown),
        hero_cards: text(row, "hero_cards")?,
        preflop_all: text(row, "preflop_all")?,
        flop_all: text(row, "flop_all")?,
        turn_all: text(row, "turn_all")?,
        river_all: text(row, "river_all")?,
        preflop_action: text(row, "preflop_action")?,
        flop_action: text(row, "flop_action")?,
        turn_action: text(row, "turn_action")?,
        river_action: text(row, "river_action")?,
        board_flop: text(row, "board_flop")?,
        board_turn: text(row, "board_turn")?,
        board_river: text(row, "board_river")?,
        total_pot: real(row, "total_pot")?,
        rake: real(row, "rake")?,
        jackpot: real(row, "jackpot")?,
        hero_contribution: real(row, "hero_contribution")?,
        hero_profit: real(row, "hero_profit")?,
        hero_profit_with_rake: real(row, "hero_profit_with_rake")?,
        paid_rake: real(row, "paid_rake")?,
        adjusted_profit: real(row, "adjusted_profit")?,
        hero_starting_stack: real(row, "hero_starting_stack")?,
        preflop_scenario: PreflopScenario::parse(&scenario).unwrap_or(PreflopScenario::NoAction),
        had_rfi_opportunity: flag(row, "had_rfi_opportunity")?,
        had_3bet_op: flag(row, "had_3bet_op")?,
        had_4bet_op: flag(row, "had_4bet_op")?,
        seats_info: text(row, "seats_info")?,
        imported_on: text(row, "imported_on")?,
    })
}

fn streets_from_row(row: &Row) -> Result<StoredStreets> {
    let position = text(row, "hero_position")?;
    Ok(StoredStreets {
        hand_id: row.get("hand_id")?,
        preflop_all: text(row, "preflop_all")?,
        flop_all: text(row, "flop_all")?,
        turn_all: text(row, "turn_all")?,
        river_all: text(row, "river_all")?,
        hero_position: position.parse().unwrap_or(Position::Unknown),
        stake: text(row, "stake")?,
        hero_profit: real(row, "hero_profit")?,
        hero_profit_with_rake: real(row, "hero_profit_with_rake")?,
        rake: real(row, "rake")?,
        seats_info: text(row, "seats_info")?,
    })
}

impl HandStore {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        create_tables(&conn)?;
        info!("[STORAGE] Database initialized at {}", path);
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_tables(&conn)?;
        Ok(Self { conn })
    }

    pub fn existing_hand_ids(&self) -> Result<HashSet<String>> {
        let mut stmt = self.conn.prepare("SELECT hand_id FROM hands")?;
        let ids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>>>()?;
        Ok(ids)
    }

    /// Insert hands whose `hand_id` is not stored yet; existing rows are left
    /// untouched. Returns how many rows were added.
    pub fn insert_hands(&self, records: &[HandRecord]) -> Result<usize> {
        let existing = self.existing_hand_ids()?;
        let sql = insert_sql("INSERT OR IGNORE");
        let tx = self.conn.unchecked_transaction()?;

        let mut inserted = 0;
        for record in records {
            if existing.contains(&record.hand_id) {
                debug!("[STORAGE] {} already stored, skipping", record.hand_id);
                continue;
            }
            inserted += write_hand(&tx, &sql, record)?;
        }
        tx.commit()?;

        info!(
            "[STORAGE] Inserted {} of {} hands ({} already stored)",
            inserted,
            records.len(),
            records.len() - inserted
        );
        Ok(inserted)
    }

    /// Store `record`, overwriting any row with the same `hand_id`.
    pub fn replace_hand(&self, record: &HandRecord) -> Result<()> {
        write_hand(&self.conn, &insert_sql("INSERT OR REPLACE"), record)?;
        Ok(())
    }

    pub fn hand_count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM hands", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn get_hand(&self, hand_id: &str) -> Result<Option<HandRecord>> {
        self.conn
            .query_row(
                "SELECT * FROM hands WHERE hand_id = ?1",
                params![hand_id],
                hand_from_row,
            )
            .optional()
    }

    /// Stored rakeback percentage, 0.0 when unset or unreadable.
    pub fn rakeback_percentage(&self) -> Result<f64> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM settings WHERE key = ?1",
                params![RAKEBACK_KEY],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value.and_then(|v| v.trim().parse::<f64>().ok()).unwrap_or(0.0))
    }

    pub fn set_rakeback_percentage(&self, percentage: f64) -> Result<()> {
        if !(0.0..=100.0).contains(&percentage) {
            return Err(rusqlite::Error::ToSqlConversionFailure(
                format!("rakeback percentage {} is outside 0-100", percentage).into(),
            ));
        }
        self.conn.execute(
            "INSERT OR REPLACE INTO settings (key, value) VALUES (?1, ?2)",
            params![RAKEBACK_KEY, percentage.to_string()],
        )?;
        Ok(())
    }

    pub fn stored_streets(&self) -> Result<Vec<StoredStreets>> {
        let mut stmt = self.conn.prepare(
            "SELECT hand_id, preflop_all, flop_all, turn_all, river_all, hero_position, stake,
                    hero_profit, hero_profit_with_rake, rake, seats_info
             FROM hands",
        )?;
        let rows = stmt
            .query_map([], streets_from_row)?
            .collect::<Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Re-run contribution and rakeback figures for every stored hand at
    /// `percentage`. Returns the number of rows updated.
    pub fn recalculate_all(&self, percentage: f64) -> Result<usize> {
        let hands = self.stored_streets()?;
        let tx = self.conn.unchecked_transaction()?;

        let mut updated = 0;
        {
            let mut stmt = tx.prepare(
                "UPDATE hands
                 SET hero_contribution = ?1, adjusted_profit = ?2, hero_starting_stack = ?3
                 WHERE hand_id = ?4",
            )?;
            for hand in &hands {
                let r = recompute(hand, percentage);
                updated += stmt.execute(params![
                    r.hero_contribution,
                    r.adjusted_profit,
                    r.hero_starting_stack,
                    r.hand_id
                ])?;
            }
        }
        tx.commit()?;

        info!("[STORAGE] Recalculated {} hands at {}% rakeback", updated, percentage);
        Ok(updated)
    }

    /// Rewrite `adjusted_profit` for every stored hand at `percentage`,
    /// leaving every other column as stored. Returns the number of rows updated.
    pub fn update_adjusted_profit(&self, percentage: f64) -> Result<usize> {
        let rows = {
            let mut stmt = self
                .conn
                .prepare("SELECT hand_id, hero_profit, hero_profit_with_rake, rake FROM hands")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((
                        row.get::<_, String>("hand_id")?,
                        real(row, "hero_profit")?,
                        real(row, "hero_profit_with_rake")?,
                        real(row, "rake")?,
                    ))
                })?
                .collect::<Result<Vec<_>>>()?;
            rows
        };

        let tx = self.conn.unchecked_transaction()?;
        let mut updated = 0;
        {
            let mut stmt = tx.prepare("UPDATE hands SET adjusted_profit = ?1 WHERE hand_id = ?2")?;
            for (hand_id, profit, with_rake, rake) in &rows {
                let adjusted = adjusted_profit(*profit, *with_rake, *rake, percentage);
                updated += stmt.execute(params![adjusted, hand_id])?;
            }
        }
        tx.commit()?;

        info!("[STORAGE] Adjusted profit refreshed for {} hands at {}% rakeback", updated, percentage);
        Ok(updated)
    }
}
