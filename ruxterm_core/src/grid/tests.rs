use crate::cell::Cell;
use crate::grid::{Grid, PrivateModes, Size};
use crate::index::Line;

fn grid(cols: usize, rows: usize, scrollback: usize) -> Grid {
    Grid::new(Size::new(cols, rows, scrollback))
}

fn row_text(grid: &Grid, line: i32) -> String {
    grid.row(Line(line))
        .iter()
        .map(|c| if c.ch == '\0' { ' ' } else { c.ch })
        .collect()
}

#[test]
fn new_grid_is_blank() {
    let g = grid(10, 3, 5);
    for line in 0..3 {
        assert!(g.row(Line(line)).iter().all(|c| c.is_empty()));
    }
    assert_eq!(g.scrollback_len(), 0);
    assert_eq!(g.cursor().line(), 0);
    assert_eq!(g.cursor().col(), 0);
}

#[test]
fn row_is_cols_wide() {
    let g = grid(17, 4, 0);
    assert_eq!(g.row(Line(0)).len(), 17);
    assert_eq!(g.row(Line(3)).len(), 17);
}

#[test]
fn rotate_view_retires_top_row_into_scrollback() {
    let mut g = grid(4, 2, 3);
    g.row_mut(Line(0))[0].ch = 'a';
    g.row_mut(Line(1))[0].ch = 'b';

    g.rotate_view_up(1);

    assert_eq!(g.scrollback_len(), 1);
    // The old top row is now history row -1.
    assert_eq!(g.row(Line(-1))[0].ch, 'a');
    // The old second row is the new top; the exposed bottom row is blank.
    assert_eq!(g.row(Line(0))[0].ch, 'b');
    assert!(g.row(Line(1)).iter().all(|c| c.is_empty()));
}

#[test]
fn scrollback_saturates_at_capacity() {
    let mut g = grid(4, 2, 3);
    for i in 0..10 {
        g.row_mut(Line(1))[0].ch = char::from(b'a' + i);
        g.rotate_view_up(1);
    }
    assert_eq!(g.scrollback_len(), 3);
}

#[test]
fn oldest_history_row_is_dropped_past_capacity() {
    let mut g = grid(4, 1, 2);
    for ch in ['a', 'b', 'c', 'd'] {
        g.row_mut(Line(0))[0].ch = ch;
        g.rotate_view_up(1);
    }
    // Only the two most recent retired rows survive.
    assert_eq!(g.row(Line(-1))[0].ch, 'd');
    assert_eq!(g.row(Line(-2))[0].ch, 'c');
}

#[test]
fn rotate_with_zero_scrollback_recycles_rows() {
    let mut g = grid(3, 2, 0);
    g.row_mut(Line(0))[0].ch = 'x';
    g.row_mut(Line(1))[0].ch = 'y';

    g.rotate_view_up(1);

    assert_eq!(g.scrollback_len(), 0);
    assert_eq!(row_text(&g, 0), "y  ");
    assert_eq!(row_text(&g, 1), "   ");
}

#[test]
fn copy_row_moves_cells() {
    let mut g = grid(3, 3, 0);
    g.row_mut(Line(2)).fill(Cell { ch: 'z', ..Cell::EMPTY });
    g.copy_row(Line(2), Line(0));
    assert_eq!(row_text(&g, 0), "zzz");
    assert_eq!(row_text(&g, 2), "zzz");
}

#[test]
fn save_and_restore_cursor() {
    let mut g = grid(10, 5, 0);
    g.move_to(3, 7);
    g.save_cursor();
    g.move_to(0, 0);
    g.restore_cursor();
    assert_eq!(g.cursor().line(), 3);
    assert_eq!(g.cursor().col(), 7);
}

#[test]
fn restore_without_save_resets_to_origin() {
    let mut g = grid(10, 5, 0);
    g.move_to(3, 7);
    g.restore_cursor();
    assert_eq!(g.cursor().line(), 0);
    assert_eq!(g.cursor().col(), 0);
}

#[test]
fn private_modes_default_and_toggle() {
    let mut g = grid(4, 2, 0);
    assert!(g.modes().contains(PrivateModes::CURSOR_VISIBLE));
    assert!(!g.modes().contains(PrivateModes::BRACKETED_PASTE));

    g.set_private_mode(PrivateModes::BRACKETED_PASTE, true);
    assert!(g.modes().contains(PrivateModes::BRACKETED_PASTE));

    g.set_private_mode(PrivateModes::CURSOR_VISIBLE, false);
    assert!(!g.modes().contains(PrivateModes::CURSOR_VISIBLE));
}

#[test]
fn take_dirty_resets() {
    let mut g = grid(4, 2, 0);
    assert!(g.take_dirty());
    assert!(!g.take_dirty());
    g.row_mut(Line(0))[0].ch = 'a';
    assert!(g.take_dirty());
}
