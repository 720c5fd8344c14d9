use std::cell::RefCell;

use crate::cell::StyleFlags;
use crate::color::{Color, Rgb};
use crate::event::{Event, EventListener, VoidListener};
use crate::grid::{CursorShape, PrivateModes, Size};
use crate::index::Line;
use crate::term::Term;

#[derive(Default)]
struct Recorder(RefCell<Vec<Event>>);

impl EventListener for Recorder {
    fn send_event(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }
}

fn term(cols: usize, rows: usize) -> Term<VoidListener> {
    Term::new(Size::new(cols, rows, 100), VoidListener)
}

fn recording_term(cols: usize, rows: usize) -> Term<Recorder> {
    Term::new(Size::new(cols, rows, 100), Recorder::default())
}

fn row_text<T: EventListener>(term: &Term<T>, line: i32) -> String {
    term.grid()
        .row(Line(line))
        .iter()
        .map(|c| if c.ch == '\0' { ' ' } else { c.ch })
        .collect()
}

// --- literal end-to-end scenarios ---

#[test]
fn wrap_scenario() {
    // S1: 13 printable bytes into a 10x3 grid.
    let mut t = term(10, 3);
    t.advance(b"abcdefghijklm");
    assert_eq!(row_text(&t, 0), "abcdefghij");
    assert_eq!(row_text(&t, 1), "klm       ");
    assert_eq!(row_text(&t, 2), "          ");
    assert_eq!(t.grid().cursor().line(), 1);
    assert_eq!(t.grid().cursor().col(), 3);
    // The wrapped row records its continuation; the hard start does not.
    assert!(!t.grid().row(Line(0))[0].flags.contains(crate::cell::CellFlags::LINE_CONTINUATION));
    assert!(t.grid().row(Line(1))[0].flags.contains(crate::cell::CellFlags::LINE_CONTINUATION));
}

#[test]
fn cursor_home_and_clear_scenario() {
    // S2: write, home, erase display, write again.
    let mut t = term(10, 3);
    t.advance(b"AB\x1b[H\x1b[2JCD");
    assert_eq!(row_text(&t, 0), "CD        ");
    assert_eq!(row_text(&t, 1), "          ");
    assert_eq!(row_text(&t, 2), "          ");
    assert_eq!(t.grid().cursor().line(), 0);
    assert_eq!(t.grid().cursor().col(), 2);
}

#[test]
fn sgr_truecolor_scenario() {
    // S3: truecolor foreground.
    let mut t = term(10, 3);
    t.advance(b"\x1b[38;2;10;20;30mX");
    let cell = t.grid().row(Line(0))[0];
    assert_eq!(cell.ch, 'X');
    assert_eq!(cell.style.fg, Color::Rgb(Rgb::new(10, 20, 30)));
}

#[test]
fn osc_title_scenario() {
    // S4: OSC 0 sets the title and leaves the grid untouched.
    let mut t = recording_term(10, 3);
    t.advance(b"\x1b]0;hello\x07");
    assert_eq!(t.title(), "hello");
    assert_eq!(
        *t.listener().0.borrow(),
        vec![Event::Title("hello".into())]
    );
    assert_eq!(row_text(&t, 0), "          ");
    assert_eq!(t.grid().cursor().col(), 0);
}

#[test]
fn scroll_margin_insert_scenario() {
    // S5: margins rows 1..3 (0-based), cursor on row 1, insert one line.
    let mut t = term(4, 4);
    t.advance(b"1111\r\n2222\r\n3333\r\n4444");
    t.advance(b"\x1b[2;3r"); // top=1, bot=3 half-open in 0-based terms
    t.advance(b"\x1b[2;1H"); // cursor to row 1
    t.advance(b"\x1b[L");
    assert_eq!(row_text(&t, 0), "1111");
    assert_eq!(row_text(&t, 1), "    ");
    assert_eq!(row_text(&t, 2), "2222");
    assert_eq!(row_text(&t, 3), "4444");
}

#[test]
fn parser_restart_scenario() {
    // S6 at the interpreter level: a split SGR applies once completed.
    let mut t = term(10, 3);
    t.advance(b"\x1b[3");
    // Nothing happened yet.
    assert_eq!(t.grid().cursor().brush.fg, Color::Default);
    t.advance(b"8;5;200mX");
    let cell = t.grid().row(Line(0))[0];
    assert_eq!(cell.ch, 'X');
    assert_eq!(cell.style.fg, Color::Indexed(200));
}

// --- control codes ---

#[test]
fn carriage_return_and_linefeed() {
    let mut t = term(10, 3);
    t.advance(b"ab\r\ncd");
    assert_eq!(row_text(&t, 0), "ab        ");
    assert_eq!(row_text(&t, 1), "cd        ");
}

#[test]
fn linefeed_alone_keeps_column() {
    let mut t = term(10, 3);
    t.advance(b"ab\ncd");
    assert_eq!(row_text(&t, 0), "ab        ");
    assert_eq!(row_text(&t, 1), "  cd      ");
}

#[test]
fn backspace_moves_left() {
    let mut t = term(10, 3);
    t.advance(b"ab\x08c");
    assert_eq!(row_text(&t, 0), "ac        ");
}

#[test]
fn tab_pads_to_stop() {
    let mut t = term(20, 3);
    t.advance(b"a\tb");
    assert_eq!(t.grid().row(Line(0))[8].ch, 'b');
}

#[test]
fn bell_reaches_listener() {
    let mut t = recording_term(10, 3);
    t.advance(b"\x07");
    assert_eq!(*t.listener().0.borrow(), vec![Event::Bell]);
}

#[test]
fn nul_is_ignored() {
    let mut t = term(10, 3);
    t.advance(b"a\x00b");
    assert_eq!(row_text(&t, 0), "ab        ");
}

#[test]
fn invalid_byte_becomes_replacement() {
    let mut t = term(10, 3);
    t.advance(&[b'a', 0xff, b'b']);
    assert_eq!(t.grid().row(Line(0))[1].ch, '\u{fffd}');
    assert_eq!(t.grid().row(Line(0))[2].ch, 'b');
}

#[test]
fn utf8_text_lands_in_cells() {
    let mut t = term(10, 3);
    t.advance("héllo 世".as_bytes());
    assert_eq!(t.grid().row(Line(0))[1].ch, 'é');
    assert_eq!(t.grid().row(Line(0))[6].ch, '世');
    assert!(t.grid().row(Line(0))[7].is_wide_spacer());
}

#[test]
fn utf8_split_across_reads() {
    let mut t = term(10, 3);
    let bytes = "世".as_bytes();
    t.advance(&bytes[..1]);
    t.advance(&bytes[1..2]);
    t.advance(&bytes[2..]);
    assert_eq!(t.grid().row(Line(0))[0].ch, '世');
}

// --- cursor motion ---

#[test]
fn cursor_moves_clamp() {
    let mut t = term(10, 3);
    t.advance(b"\x1b[99;99H");
    assert_eq!(t.grid().cursor().line(), 2);
    assert_eq!(t.grid().cursor().col(), 9);
    t.advance(b"\x1b[99A\x1b[99D");
    assert_eq!(t.grid().cursor().line(), 0);
    assert_eq!(t.grid().cursor().col(), 0);
}

#[test]
fn cursor_motion_counts_default_to_one() {
    let mut t = term(10, 3);
    t.advance(b"\x1b[2;5H\x1b[A\x1b[D");
    assert_eq!(t.grid().cursor().line(), 0);
    assert_eq!(t.grid().cursor().col(), 3);
    t.advance(b"\x1b[B\x1b[C");
    assert_eq!(t.grid().cursor().line(), 1);
    assert_eq!(t.grid().cursor().col(), 4);
}

#[test]
fn reverse_index_scrolls_at_top() {
    let mut t = term(4, 3);
    t.advance(b"aaaa\r\nbbbb\x1b[H\x1bM");
    assert_eq!(row_text(&t, 0), "    ");
    assert_eq!(row_text(&t, 1), "aaaa");
    assert_eq!(row_text(&t, 2), "bbbb");
}

#[test]
fn save_restore_cursor_escape() {
    let mut t = term(10, 3);
    t.advance(b"\x1b[2;4H\x1b7\x1b[H\x1b8");
    assert_eq!(t.grid().cursor().line(), 1);
    assert_eq!(t.grid().cursor().col(), 3);
}

// --- editing finals ---

#[test]
fn insert_and_delete_chars() {
    let mut t = term(10, 3);
    t.advance(b"abcdef\x1b[1;3H\x1b[2@");
    assert_eq!(row_text(&t, 0), "ab  cdef  ");
    t.advance(b"\x1b[2P");
    assert_eq!(row_text(&t, 0), "abcdef    ");
}

#[test]
fn erase_chars_without_shift() {
    let mut t = term(10, 3);
    t.advance(b"abcdef\x1b[1;2H\x1b[3X");
    assert_eq!(row_text(&t, 0), "a   ef    ");
}

#[test]
fn erase_line_modes() {
    let mut t = term(6, 2);
    t.advance(b"abcdef\x1b[1;4H\x1b[K");
    assert_eq!(row_text(&t, 0), "abc   ");
    t.advance(b"\x1b[1;2H\x1b[1K");
    assert_eq!(row_text(&t, 0), "  c   ");
}

#[test]
fn insert_and_delete_lines() {
    let mut t = term(4, 4);
    t.advance(b"aaaa\r\nbbbb\r\ncccc\r\ndddd\x1b[2;1H\x1b[M");
    assert_eq!(row_text(&t, 0), "aaaa");
    assert_eq!(row_text(&t, 1), "cccc");
    assert_eq!(row_text(&t, 2), "dddd");
    t.advance(b"\x1b[L");
    assert_eq!(row_text(&t, 1), "    ");
    assert_eq!(row_text(&t, 2), "cccc");
}

// --- SGR ---

#[test]
fn sgr_attributes_toggle() {
    let mut t = term(10, 3);
    t.advance(b"\x1b[1;4mX\x1b[22;24mY");
    let x = t.grid().row(Line(0))[0];
    let y = t.grid().row(Line(0))[1];
    assert!(x.style.flags.contains(StyleFlags::BOLD | StyleFlags::UNDERLINE));
    assert!(y.style.flags.is_empty());
}

#[test]
fn sgr_reset_on_empty_and_zero() {
    let mut t = term(10, 3);
    t.advance(b"\x1b[1;31mA\x1b[mB\x1b[7mC\x1b[0mD");
    assert_eq!(t.grid().row(Line(0))[1].style.flags, StyleFlags::empty());
    assert_eq!(t.grid().row(Line(0))[1].style.fg, Color::Default);
    assert!(t.grid().row(Line(0))[2].style.flags.contains(StyleFlags::INVERSE));
    assert_eq!(t.grid().row(Line(0))[3].style.flags, StyleFlags::empty());
}

#[test]
fn sgr_indexed_and_bright() {
    let mut t = term(10, 3);
    t.advance(b"\x1b[31mA\x1b[42mB\x1b[94mC\x1b[103mD");
    assert_eq!(t.grid().row(Line(0))[0].style.fg, Color::Indexed(1));
    assert_eq!(t.grid().row(Line(0))[1].style.bg, Color::Indexed(2));
    assert_eq!(t.grid().row(Line(0))[2].style.fg, Color::Indexed(12));
    assert_eq!(t.grid().row(Line(0))[3].style.bg, Color::Indexed(11));
}

#[test]
fn sgr_256_background() {
    let mut t = term(10, 3);
    t.advance(b"\x1b[48;5;17mZ");
    assert_eq!(t.grid().row(Line(0))[0].style.bg, Color::Indexed(17));
}

#[test]
fn sgr_unknown_code_stops_iteration() {
    let mut t = term(10, 3);
    // 73 is unhandled: the following 31 must not be applied.
    t.advance(b"\x1b[73;31mA");
    assert_eq!(t.grid().row(Line(0))[0].style.fg, Color::Default);
}

#[test]
fn sgr_colon_separated_extended_color() {
    let mut t = term(10, 3);
    t.advance(b"\x1b[38:5:100mQ");
    assert_eq!(t.grid().row(Line(0))[0].style.fg, Color::Indexed(100));
}

// --- private modes ---

#[test]
fn cursor_visibility_mode() {
    let mut t = term(10, 3);
    assert!(t.grid().modes().contains(PrivateModes::CURSOR_VISIBLE));
    t.advance(b"\x1b[?25l");
    assert!(!t.grid().modes().contains(PrivateModes::CURSOR_VISIBLE));
    t.advance(b"\x1b[?25h");
    assert!(t.grid().modes().contains(PrivateModes::CURSOR_VISIBLE));
}

#[test]
fn bracketed_paste_mode() {
    let mut t = term(10, 3);
    t.advance(b"\x1b[?2004h");
    assert!(t.grid().modes().contains(PrivateModes::BRACKETED_PASTE));
    t.advance(b"\x1b[?2004l");
    assert!(!t.grid().modes().contains(PrivateModes::BRACKETED_PASTE));
}

#[test]
fn alternate_screen_round_trip() {
    let mut t = term(10, 3);
    t.advance(b"shell\x1b[?1049h");
    assert!(t.is_alt_screen());
    // The alternate screen starts blank; drawing there leaves the
    // primary content alone.
    assert_eq!(row_text(&t, 0), "          ");
    t.advance(b"full-screen");
    t.advance(b"\x1b[?1049l");
    assert!(!t.is_alt_screen());
    assert_eq!(row_text(&t, 0), "shell     ");
    assert_eq!(t.grid().cursor().col(), 5);
}

#[test]
fn unknown_private_mode_is_ignored() {
    let mut t = term(10, 3);
    t.advance(b"\x1b[?2026h\x1b[?2026l");
    assert_eq!(row_text(&t, 0), "          ");
}

// --- replies and misc ---

#[test]
fn identify_terminal_replies() {
    let mut t = recording_term(10, 3);
    t.advance(b"\x1bZ");
    t.advance(b"\x1b[c");
    let events = t.listener().0.borrow();
    assert_eq!(
        *events,
        vec![
            Event::PtyWrite(b"\x1b[?6c".to_vec()),
            Event::PtyWrite(b"\x1b[?6c".to_vec()),
        ]
    );
}

#[test]
fn cursor_shape_sequence() {
    let mut t = term(10, 3);
    assert_eq!(t.cursor_shape(), CursorShape::Block);
    t.advance(b"\x1b[5 q");
    assert_eq!(t.cursor_shape(), CursorShape::Bar);
    t.advance(b"\x1b[4 q");
    assert_eq!(t.cursor_shape(), CursorShape::Underline);
    t.advance(b"\x1b[0 q");
    assert_eq!(t.cursor_shape(), CursorShape::Block);
}

#[test]
fn progressive_keyboard_query_is_ignored() {
    let mut t = term(10, 3);
    t.advance(b"\x1b[=5uX");
    assert_eq!(row_text(&t, 0), "X         ");
}

#[test]
fn scroll_margins_sequence() {
    let mut t = term(10, 6);
    t.advance(b"\x1b[2;4r");
    assert_eq!(t.grid().scroll_margins(), (1, 4));
    // Absent bottom means the bottom of the view.
    t.advance(b"\x1b[3r");
    assert_eq!(t.grid().scroll_margins(), (2, 6));
}

#[test]
fn osc_split_across_reads() {
    let mut t = recording_term(10, 3);
    t.advance(b"\x1b]0;he");
    t.advance(b"llo\x07after");
    assert_eq!(t.title(), "hello");
    assert_eq!(row_text(&t, 0), "after     ");
}

#[test]
fn resize_reflows_primary() {
    let mut t = term(10, 3);
    t.advance(b"abcdefgh\r\nxy");
    t.resize(Size::new(4, 3, 100));
    assert_eq!(row_text(&t, 0), "abcd");
    assert_eq!(row_text(&t, 1), "efgh");
    assert_eq!(row_text(&t, 2), "xy  ");
}

#[test]
fn printable_occupancy_matches_input() {
    let mut t = term(8, 4);
    let input = "the quick brown fox jumps";
    t.advance(input.as_bytes());
    let mut collected = String::new();
    let lo = -(t.grid().scrollback_len() as i32);
    for line in lo..4 {
        for cell in t.grid().row(Line(line)) {
            if cell.ch != '\0' {
                collected.push(cell.ch);
            }
        }
    }
    assert_eq!(collected, input);
}
