use crate::cell::CellFlags;
use crate::grid::{Grid, Size};
use crate::index::Line;

fn grid(cols: usize, rows: usize, scrollback: usize) -> Grid {
    Grid::new(Size::new(cols, rows, scrollback))
}

fn write_str(grid: &mut Grid, s: &str) {
    for ch in s.chars() {
        match ch {
            '\n' => {
                grid.carriage_return();
                grid.linefeed();
            }
            _ => grid.write(ch),
        }
    }
}

fn row_text(grid: &Grid, line: i32) -> String {
    grid.row(Line(line))
        .iter()
        .map(|c| if c.ch == '\0' { ' ' } else { c.ch })
        .collect::<String>()
        .trim_end()
        .to_string()
}

#[test]
fn identity_at_equal_size() {
    let mut src = grid(10, 4, 10);
    write_str(&mut src, "hello\nworld with a long wrapped line\nbye");

    let mut dst = grid(10, 4, 10);
    src.reflow_into(&mut dst);

    let lo = -(src.scrollback_len() as i32);
    for line in lo..4 {
        assert_eq!(row_text(&src, line), row_text(&dst, line), "row {line}");
    }
    assert_eq!(src.cursor().line(), dst.cursor().line());
    assert_eq!(src.cursor().col(), dst.cursor().col());
}

#[test]
fn blank_lines_survive_reflow() {
    let mut src = grid(10, 5, 0);
    write_str(&mut src, "a\n\nb");

    let mut dst = grid(10, 5, 0);
    src.reflow_into(&mut dst);

    assert_eq!(row_text(&dst, 0), "a");
    assert_eq!(row_text(&dst, 1), "");
    assert_eq!(row_text(&dst, 2), "b");
    assert_eq!(dst.cursor().line(), 2);
}

#[test]
fn wrapped_line_rejoins_at_wider_target() {
    let mut src = grid(5, 4, 0);
    write_str(&mut src, "abcdefgh");
    assert_eq!(row_text(&src, 0), "abcde");
    assert_eq!(row_text(&src, 1), "fgh");

    let mut dst = grid(10, 4, 0);
    src.reflow_into(&mut dst);

    assert_eq!(row_text(&dst, 0), "abcdefgh");
    assert_eq!(row_text(&dst, 1), "");
}

#[test]
fn long_line_rewraps_at_narrower_target() {
    let mut src = grid(10, 4, 0);
    write_str(&mut src, "abcdefgh\nxy");

    let mut dst = grid(4, 4, 0);
    src.reflow_into(&mut dst);

    assert_eq!(row_text(&dst, 0), "abcd");
    assert_eq!(row_text(&dst, 1), "efgh");
    assert_eq!(row_text(&dst, 2), "xy");
    // The rewrapped second row is a continuation, the hard break is not.
    assert!(dst.row(Line(1))[0].flags.contains(CellFlags::LINE_CONTINUATION));
    assert!(!dst.row(Line(2))[0].flags.contains(CellFlags::LINE_CONTINUATION));
}

#[test]
fn hard_breaks_stay_separate_at_wider_target() {
    let mut src = grid(5, 4, 0);
    write_str(&mut src, "abc\ndef");

    let mut dst = grid(20, 4, 0);
    src.reflow_into(&mut dst);

    assert_eq!(row_text(&dst, 0), "abc");
    assert_eq!(row_text(&dst, 1), "def");
}

#[test]
fn scrollback_content_reflows_first() {
    let mut src = grid(4, 2, 4);
    write_str(&mut src, "aaaa\nbbbb\ncccc");
    assert_eq!(src.scrollback_len(), 1);

    let mut dst = grid(4, 3, 4);
    src.reflow_into(&mut dst);

    // Taller target: everything fits in the view again.
    assert_eq!(row_text(&dst, 0), "aaaa");
    assert_eq!(row_text(&dst, 1), "bbbb");
    assert_eq!(row_text(&dst, 2), "cccc");
    assert_eq!(dst.scrollback_len(), 0);
}

#[test]
fn wide_glyphs_reflow_with_spacers() {
    let mut src = grid(6, 3, 0);
    write_str(&mut src, "ab世cd");

    let mut dst = grid(4, 3, 0);
    src.reflow_into(&mut dst);

    assert_eq!(dst.row(Line(0))[0].ch, 'a');
    assert_eq!(dst.row(Line(0))[2].ch, '世');
    assert!(dst.row(Line(0))[3].is_wide_spacer());
    assert_eq!(dst.row(Line(1))[0].ch, 'c');
}

#[test]
fn styles_survive_reflow() {
    use crate::cell::StyleFlags;
    use crate::color::Color;

    let mut src = grid(10, 3, 0);
    src.cursor_mut().brush.flags |= StyleFlags::BOLD;
    src.cursor_mut().brush.fg = Color::Indexed(2);
    write_str(&mut src, "ok");

    let mut dst = grid(8, 3, 0);
    src.reflow_into(&mut dst);

    let cell = dst.row(Line(0))[0];
    assert!(cell.style.flags.contains(StyleFlags::BOLD));
    assert_eq!(cell.style.fg, Color::Indexed(2));
}

#[test]
fn narrower_target_overflow_scrolls() {
    let mut src = grid(8, 2, 10);
    write_str(&mut src, "aaaaaaaa\nbbbbbbbb");

    let mut dst = grid(4, 2, 10);
    src.reflow_into(&mut dst);

    // 16 cells of content in a 4x2 view: the excess lands in scrollback.
    assert_eq!(dst.scrollback_len(), 2);
    assert_eq!(row_text(&dst, -2), "aaaa");
    assert_eq!(row_text(&dst, -1), "aaaa");
    assert_eq!(row_text(&dst, 0), "bbbb");
    assert_eq!(row_text(&dst, 1), "bbbb");
}
