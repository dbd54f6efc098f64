//! Text rendering of the board
//!
//! Cells are drawn as hexagons inside the board boundaries, odd rows shifted
//! half a cell to the right. Each cell shows the code of its top piece.

use hive_core::{Cell, Hive};

pub fn render(hive: &Hive) -> String {
    let (min_x, min_y, max_x, max_y) = hive.board_boundaries();
    let width = (max_x - min_x + 1) as usize;
    let odd = |y: i32| y.rem_euclid(2) == 1;

    let mut out = String::from("\n");
    for y in min_y..=max_y {
        // Tops of this row double as bottoms of the row above
        if odd(y) {
            out.push_str(if y > min_y { " \\" } else { "  " });
        }
        out.push_str(&" / \\".repeat(width));
        if y > min_y && !odd(y) {
            out.push_str(" /");
        }
        out.push('\n');

        if odd(y) {
            out.push_str("  ");
        }
        for x in min_x..=max_x {
            out.push('|');
            match hive.get_pieces(Cell::new(x, y)).last() {
                Some(piece) => out.push_str(&piece.to_string()),
                None => out.push_str("   "),
            }
        }
        out.push_str("|\n");
    }

    if odd(max_y) {
        out.push_str("  ");
    }
    out.push_str(&" \\ /".repeat(width));
    out.push('\n');
    out
}
