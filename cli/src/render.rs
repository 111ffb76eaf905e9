use std::fmt::Write;

use mines_core::{ActionOutcome, GameView, HistoryStats, RoundRecord, RoundResult, TileView};

const fn tile_symbol(tile: TileView) -> char {
    match tile {
        TileView::Hidden => '#',
        TileView::Gem => '*',
        TileView::Mine => 'X',
    }
}

/// Grid with tile indices on the left so players know what to reveal.
pub(crate) fn board(view: &GameView) -> String {
    let side = usize::from(view.grid_size);
    let width = (side * side - 1).to_string().len();
    let mut out = String::new();
    for (row, tiles) in view.rows().enumerate() {
        let _ = write!(out, "{:>width$} ", row * side);
        for tile in tiles {
            out.push(' ');
            out.push(tile_symbol(tile));
        }
        out.push('\n');
    }
    out
}

pub(crate) fn status(view: &GameView) -> String {
    let mut out = format!(
        "{} | balance {:.2} | bet {:.2} | mines {}",
        view.username, view.balance, view.bet_amount, view.mine_count
    );
    if view.is_playing {
        let _ = write!(
            out,
            " | {:.2}x | cashout {:.2} | {} tiles left",
            view.current_multiplier, view.potential_win, view.remaining_tiles
        );
        if let Some(next) = view.next_multiplier {
            let _ = write!(out, " | next {:.2}x", next);
        }
    } else if view.game_over {
        out.push_str(if view.won { " | You Won!" } else { " | You Lost!" });
    }
    out
}

/// Message for an action, `None` when the board speaks for itself.
pub(crate) fn outcome(outcome: ActionOutcome) -> Option<String> {
    Some(match outcome {
        ActionOutcome::NoChange | ActionOutcome::Configured => return None,
        ActionOutcome::Started => "Round started, reveal tiles or cash out.".to_string(),
        ActionOutcome::Revealed { multiplier } => {
            format!("Gem! Multiplier is now {multiplier:.2}x.")
        }
        ActionOutcome::Won(record) => format!(
            "You Won! {:+.2} at {:.2}x after {} tiles.",
            record.profit, record.multiplier, record.tiles_revealed
        ),
        ActionOutcome::Lost(record) => format!(
            "Boom! You Lost {:.2} after {} tiles.",
            -record.profit, record.tiles_revealed
        ),
    })
}

pub(crate) fn history<'a>(records: impl IntoIterator<Item = &'a RoundRecord>) -> String {
    let mut out = String::from("  id  result      bet   mult   tiles     profit\n");
    let mut empty = true;
    for record in records {
        empty = false;
        let result = match record.result {
            RoundResult::Win => "win",
            RoundResult::Loss => "loss",
        };
        let _ = writeln!(
            out,
            "{:>4}  {:<6} {:>8.2} {:>6.2} {:>7} {:>+10.2}",
            record.id,
            result,
            record.bet_amount,
            record.multiplier,
            record.tiles_revealed,
            record.profit
        );
    }
    if empty {
        out.push_str("  no rounds played yet\n");
    }
    out
}

pub(crate) fn stats(stats: &HistoryStats) -> String {
    format!(
        "rounds {} | wins {} | losses {} | win rate {:.1}% | net {:+.2} | best {:.2}x",
        stats.rounds,
        stats.wins,
        stats.losses,
        stats.win_rate(),
        stats.net_profit,
        stats.best_multiplier
    )
}
