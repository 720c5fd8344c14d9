use crate::grid::{Grid, Size};
use crate::index::Line;

fn grid(cols: usize, rows: usize) -> Grid {
    Grid::new(Size::new(cols, rows, 0))
}

#[test]
fn move_up_clamps_at_top() {
    let mut g = grid(10, 5);
    g.move_to(2, 0);
    g.move_up(10);
    assert_eq!(g.cursor().line(), 0);
}

#[test]
fn move_down_clamps_at_bottom() {
    let mut g = grid(10, 5);
    g.move_down(10);
    assert_eq!(g.cursor().line(), 4);
}

#[test]
fn vertical_moves_respect_scroll_region() {
    let mut g = grid(10, 10);
    g.set_scroll_margins(3, Some(7));
    g.move_to(4, 0);
    g.move_up(10);
    // Clamped to the region top (1-based 3 → 0-based 2).
    assert_eq!(g.cursor().line(), 2);
    g.move_down(10);
    // Clamped to the region bottom (1-based 7 inclusive → 0-based 6).
    assert_eq!(g.cursor().line(), 6);
}

#[test]
fn horizontal_moves_clamp() {
    let mut g = grid(8, 3);
    g.move_forward(100);
    assert_eq!(g.cursor().col(), 7);
    g.move_backward(100);
    assert_eq!(g.cursor().col(), 0);
}

#[test]
fn motion_clears_wrap_anchor() {
    let mut g = grid(10, 3);
    g.write('a');
    assert!(g.cursor().anchored());
    g.move_to(0, 0);
    assert!(!g.cursor().anchored());
}

#[test]
fn carriage_return_resets_column() {
    let mut g = grid(10, 3);
    g.write('a');
    g.write('b');
    g.carriage_return();
    assert_eq!(g.cursor().col(), 0);
    assert_eq!(g.cursor().line(), 0);
}

#[test]
fn backspace_moves_one_left() {
    let mut g = grid(10, 3);
    g.write('a');
    g.write('b');
    g.backspace();
    assert_eq!(g.cursor().col(), 1);
}

#[test]
fn backspace_at_column_zero_is_noop() {
    let mut g = grid(10, 3);
    g.backspace();
    assert_eq!(g.cursor().col(), 0);
}

#[test]
fn backspace_snaps_pending_wrap() {
    let mut g = grid(3, 2);
    for ch in "abc".chars() {
        g.write(ch);
    }
    // Cursor is transiently past the last column; backspace snaps it back.
    assert_eq!(g.cursor().col(), 3);
    g.backspace();
    assert_eq!(g.cursor().col(), 2);
}

#[test]
fn tab_pads_spaces_to_next_stop() {
    let mut g = grid(20, 3);
    g.write('a');
    g.tab();
    assert_eq!(g.cursor().col(), 8);
    assert_eq!(g.row(Line(0))[1].ch, ' ');
    assert_eq!(g.row(Line(0))[7].ch, ' ');
}

#[test]
fn tab_at_stop_advances_full_stop() {
    let mut g = grid(20, 3);
    g.tab();
    assert_eq!(g.cursor().col(), 8);
    g.tab();
    assert_eq!(g.cursor().col(), 16);
}

#[test]
fn tab_clamps_at_line_end() {
    let mut g = grid(10, 3);
    g.move_to(0, 9);
    g.tab();
    // Only one space fits; the cursor parks in the pending-wrap column.
    assert_eq!(g.cursor().line(), 0);
    assert_eq!(g.cursor().col(), 10);
}
