use crate::grid::{Grid, LineInsertPoint, Size};
use crate::index::Line;

fn grid(cols: usize, rows: usize, scrollback: usize) -> Grid {
    Grid::new(Size::new(cols, rows, scrollback))
}

fn fill_rows(grid: &mut Grid, rows: &[&str]) {
    for (i, text) in rows.iter().enumerate() {
        for (j, ch) in text.chars().enumerate() {
            grid.row_mut(Line(i as i32))[j].ch = ch;
        }
    }
}

fn row_text(grid: &Grid, line: i32) -> String {
    grid.row(Line(line))
        .iter()
        .map(|c| if c.ch == '\0' { ' ' } else { c.ch })
        .collect()
}

#[test]
fn margins_are_one_based_inclusive() {
    let mut g = grid(10, 10, 0);
    g.set_scroll_margins(2, Some(8));
    assert_eq!(g.scroll_margins(), (1, 8));
}

#[test]
fn absent_bottom_means_view_bottom() {
    let mut g = grid(10, 10, 0);
    g.set_scroll_margins(3, None);
    assert_eq!(g.scroll_margins(), (2, 10));
}

#[test]
fn degenerate_margins_are_ignored() {
    let mut g = grid(10, 10, 0);
    let before = g.scroll_margins();
    g.set_scroll_margins(8, Some(3));
    assert_eq!(g.scroll_margins(), before);
}

#[test]
fn set_margins_homes_cursor() {
    let mut g = grid(10, 10, 0);
    g.move_to(5, 5);
    g.set_scroll_margins(2, Some(8));
    assert_eq!((g.cursor().line(), g.cursor().col()), (0, 0));
}

#[test]
fn linefeed_moves_down() {
    let mut g = grid(10, 3, 0);
    g.linefeed();
    assert_eq!(g.cursor().line(), 1);
}

#[test]
fn linefeed_at_bottom_scrolls_into_scrollback() {
    let mut g = grid(4, 2, 4);
    fill_rows(&mut g, &["aaaa", "bbbb"]);
    g.move_to(1, 0);
    g.linefeed();
    assert_eq!(g.cursor().line(), 1);
    assert_eq!(g.scrollback_len(), 1);
    assert_eq!(row_text(&g, -1), "aaaa");
    assert_eq!(row_text(&g, 0), "bbbb");
    assert_eq!(row_text(&g, 1), "    ");
}

#[test]
fn linefeed_inside_margins_scrolls_region_only() {
    let mut g = grid(4, 4, 4);
    fill_rows(&mut g, &["1111", "2222", "3333", "4444"]);
    g.set_scroll_margins(2, Some(3));
    g.move_to(2, 0);
    g.linefeed();
    // Rows outside the region are untouched; nothing entered scrollback.
    assert_eq!(row_text(&g, 0), "1111");
    assert_eq!(row_text(&g, 1), "3333");
    assert_eq!(row_text(&g, 2), "    ");
    assert_eq!(row_text(&g, 3), "4444");
    assert_eq!(g.scrollback_len(), 0);
}

#[test]
fn reverse_index_moves_up() {
    let mut g = grid(10, 3, 0);
    g.move_to(2, 0);
    g.reverse_index();
    assert_eq!(g.cursor().line(), 1);
}

#[test]
fn reverse_index_at_top_margin_scrolls_down() {
    let mut g = grid(4, 3, 0);
    fill_rows(&mut g, &["aaaa", "bbbb", "cccc"]);
    g.reverse_index();
    assert_eq!(row_text(&g, 0), "    ");
    assert_eq!(row_text(&g, 1), "aaaa");
    assert_eq!(row_text(&g, 2), "bbbb");
    assert_eq!(g.cursor().line(), 0);
}

#[test]
fn scroll_up_full_view_uses_scrollback() {
    let mut g = grid(4, 3, 2);
    fill_rows(&mut g, &["aaaa", "bbbb", "cccc"]);
    g.scroll_up(2);
    assert_eq!(g.scrollback_len(), 2);
    assert_eq!(row_text(&g, -2), "aaaa");
    assert_eq!(row_text(&g, -1), "bbbb");
    assert_eq!(row_text(&g, 0), "cccc");
    assert_eq!(row_text(&g, 1), "    ");
}

#[test]
fn scroll_down_discards_bottom_rows() {
    let mut g = grid(4, 3, 0);
    fill_rows(&mut g, &["aaaa", "bbbb", "cccc"]);
    g.scroll_down(1);
    assert_eq!(row_text(&g, 0), "    ");
    assert_eq!(row_text(&g, 1), "aaaa");
    assert_eq!(row_text(&g, 2), "bbbb");
}

#[test]
fn insert_blank_lines_at_cursor_within_margins() {
    // Literal scenario: 4x4 grid, margins rows 2..=3 (1-based), cursor on
    // row 1, insert one blank line.
    let mut g = grid(4, 4, 0);
    fill_rows(&mut g, &["1111", "2222", "3333", "4444"]);
    g.set_scroll_margins(2, Some(3));
    g.move_to(1, 0);
    g.insert_blank_lines(1, LineInsertPoint::Cursor);
    assert_eq!(row_text(&g, 0), "1111");
    assert_eq!(row_text(&g, 1), "    ");
    assert_eq!(row_text(&g, 2), "2222");
    assert_eq!(row_text(&g, 3), "4444");
}

#[test]
fn insert_blank_lines_at_top_margin() {
    let mut g = grid(4, 4, 0);
    fill_rows(&mut g, &["1111", "2222", "3333", "4444"]);
    g.set_scroll_margins(2, Some(4));
    g.move_to(2, 0);
    g.insert_blank_lines(1, LineInsertPoint::Top);
    assert_eq!(row_text(&g, 0), "1111");
    assert_eq!(row_text(&g, 1), "    ");
    assert_eq!(row_text(&g, 2), "2222");
    assert_eq!(row_text(&g, 3), "3333");
}

#[test]
fn insert_blank_lines_count_capped() {
    let mut g = grid(4, 3, 0);
    fill_rows(&mut g, &["aaaa", "bbbb", "cccc"]);
    g.move_to(1, 0);
    g.insert_blank_lines(100, LineInsertPoint::Cursor);
    assert_eq!(row_text(&g, 0), "aaaa");
    assert_eq!(row_text(&g, 1), "    ");
    assert_eq!(row_text(&g, 2), "    ");
}

#[test]
fn delete_lines_pulls_rows_up() {
    let mut g = grid(4, 4, 0);
    fill_rows(&mut g, &["aaaa", "bbbb", "cccc", "dddd"]);
    g.move_to(1, 0);
    g.delete_lines(2);
    assert_eq!(row_text(&g, 0), "aaaa");
    assert_eq!(row_text(&g, 1), "dddd");
    assert_eq!(row_text(&g, 2), "    ");
    assert_eq!(row_text(&g, 3), "    ");
}

#[test]
fn delete_lines_below_margins_is_noop() {
    let mut g = grid(4, 4, 0);
    fill_rows(&mut g, &["aaaa", "bbbb", "cccc", "dddd"]);
    g.set_scroll_margins(1, Some(2));
    g.move_to(3, 0);
    g.delete_lines(1);
    assert_eq!(row_text(&g, 3), "dddd");
}

#[test]
fn scrollback_never_exceeds_capacity() {
    let mut g = grid(4, 2, 3);
    for _ in 0..20 {
        g.scroll_up(1);
    }
    assert_eq!(g.scrollback_len(), 3);
}
