//! Database schema creation.

use rusqlite::{Connection, Result};

/// Stored hand columns, in insert order.
pub const HAND_COLUMNS: [&str; 31] = [
    "hand_id",
    "stake",
    "date_time",
    "hero_position",
    "hero_cards",
    "preflop_action",
    "preflop_all",
    "flop_action",
    "flop_all",
    "turn_action",
    "turn_all",
    "river_action",
    "river_all",
    "board_flop",
    "board_turn",
    "board_river",
    "total_pot",
    "rake",
    "jackpot",
    "hero_profit",
    "hero_profit_with_rake",
    "seats_info",
    "imported_on",
    "preflop_scenario",
    "had_rfi_opportunity",
    "had_3bet_op",
    "had_4bet_op",
    "hero_contribution",
    "adjusted_profit",
    "paid_rake",
    "hero_starting_stack",
];

/// Create all tables and indexes.
pub fn create_tables(conn: &Connection) -> Result<()> {
    // Hands table: one row per parsed hand, hand_id is the dedup key
    conn.execute(
        "CREATE TABLE IF NOT EXISTS hands (
            hand_id TEXT PRIMARY KEY,
            stake TEXT,
            date_time TEXT,
            hero_position TEXT,
            hero_cards TEXT,
            preflop_action TEXT,
            preflop_all TEXT,
            flop_action TEXT,
            flop_all TEXT,
            turn_action TEXT,
            turn_all TEXT,
            river_action TEXT,
            river_all TEXT,
            board_flop TEXT,
            board_turn TEXT,
            board_river TEXT,
            total_pot REAL,
            rake REAL,
            jackpot REAL,
            hero_profit REAL,
            hero_profit_with_rake REAL,
            seats_info TEXT,
            imported_on TEXT,
            preflop_scenario TEXT,
            had_rfi_opportunity INTEGER,
            had_3bet_op INTEGER,
            had_4bet_op INTEGER,
            hero_contribution REAL,
            adjusted_profit REAL,
            paid_rake REAL,
            hero_starting_stack REAL DEFAULT 0.0
        )",
        [],
    )?;

    // Settings table: string-keyed user settings
    conn.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_hands_date ON hands(date_time)",
        [],
    )?;
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_hands_position_scenario ON hands(hero_position, preflop_scenario)",
        [],
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tables_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_tables(&conn).unwrap();
        create_tables(&conn).unwrap();

        let mut stmt = conn.prepare("PRAGMA table_info(hands)").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .flatten()
            .collect();
        assert_eq!(columns, HAND_COLUMNS.to_vec());
    }
}
