use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use handvault_lib::money::fmt_money;
use handvault_lib::{ingest, HandRecord, HandStore, ParseOptions};

fn open_store(db: &str) -> Result<HandStore> {
    HandStore::open(db).with_context(|| format!("Failed to open database {}", db))
}

pub fn import(db: &str, paths: &[PathBuf]) -> Result<()> {
    let store = open_store(db)?;
    let summary = handvault_lib::import_file_paths(&store, paths).map_err(|e| anyhow!(e))?;
    let report = summary.report;

    println!("Files read:     {}", report.files_read);
    if report.files_failed > 0 {
        println!("Files failed:   {}", report.files_failed);
    }
    println!("Blocks seen:    {}", report.blocks_seen);
    println!("Hands parsed:   {}", report.hands_parsed);
    println!("Blocks skipped: {}", report.blocks_skipped);
    println!("Inserted:       {}", summary.inserted);
    println!("Duplicates:     {}", summary.duplicates);
    Ok(())
}

pub fn parse(path: &Path, pretty: bool) -> Result<()> {
    let outcome = ingest::parse_file(path, &ParseOptions::default()).map_err(|e| anyhow!(e))?;
    let json = if pretty {
        serde_json::to_string_pretty(&outcome.records)
    } else {
        serde_json::to_string(&outcome.records)
    }
    .context("Failed to serialize records")?;
    println!("{}", json);
    Ok(())
}

fn print_hand(hand: &HandRecord) {
    println!("Hand {}  {}  {}", hand.hand_id, hand.stake, hand.date_time);
    println!(
        "Hero: {} [{}] starting stack {}",
        hand.hero_position,
        hand.hero_cards,
        fmt_money(hand.hero_starting_stack)
    );

    let board = [&hand.board_flop, &hand.board_turn, &hand.board_river]
        .iter()
        .filter(|s| !s.is_empty())
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    if !board.is_empty() {
        println!("Board: {}", board);
    }

    println!(
        "Preflop: {} (RFI {}, 3bet {}, 4bet {})",
        hand.preflop_scenario, hand.had_rfi_opportunity, hand.had_3bet_op, hand.had_4bet_op
    );
    println!(
        "Pot {}  rake {}  jackpot {}",
        fmt_money(hand.total_pot),
        fmt_money(hand.rake),
        fmt_money(hand.jackpot)
    );
    println!("Contribution:       {}", fmt_money(hand.hero_contribution));
    println!("Profit:             {}", fmt_money(hand.hero_profit));
    println!("Profit before rake: {}", fmt_money(hand.hero_profit_with_rake));
    println!("Rake paid:          {}", fmt_money(hand.paid_rake));
    println!("Adjusted profit:    {}", fmt_money(hand.adjusted_profit));

    for seat in hand.seats() {
        println!("  Seat {}: {} (${})", seat.seat, seat.player, seat.stack);
    }
}

pub fn show(db: &str, hand_id: &str) -> Result<()> {
    let store = open_store(db)?;
    let hand = store
        .get_hand(hand_id)
        .with_context(|| format!("Failed to load hand {}", hand_id))?
        .ok_or_else(|| anyhow!("Hand {} not found", hand_id))?;
    print_hand(&hand);
    Ok(())
}

pub fn rakeback(db: &str, percentage: Option<f64>) -> Result<()> {
    let store = open_store(db)?;
    match percentage {
        None => {
            let current = store
                .rakeback_percentage()
                .context("Failed to read rakeback setting")?;
            println!("Rakeback: {}%", current);
        }
        Some(pct) => {
            let updated = handvault_lib::update_rakeback(&store, pct).map_err(|e| anyhow!(e))?;
            println!("Rakeback set to {}%, {} hands updated", pct, updated);
        }
    }
    Ok(())
}

pub fn recalculate(db: &str) -> Result<()> {
    let store = open_store(db)?;
    let updated = handvault_lib::recalculate_all(&store).map_err(|e| anyhow!(e))?;
    println!("{} hands updated", updated);
    Ok(())
}

pub fn save(db: &str, path: &Path) -> Result<()> {
    let store = open_store(db)?;
    let content = ingest::read_text_file(path).map_err(|e| anyhow!(e))?;
    let saved = handvault_lib::save_hand_content(&store, &content).map_err(|e| anyhow!(e))?;
    println!("{} hands saved", saved);
    Ok(())
}
